use crate::core::delta::{midpoint, rebase};
use crate::types::{ConvertError, ConvertResult, GsiComplex, PulseCapture, PulsesRecord};
use ndarray::{Array1, Zip};

/// Convert a raw phase-history capture into a GSI pulses record.
///
/// The complex matrix is reconstructed from the stored real/imaginary
/// planes, range and antenna track are re-based at the midpoint pulse, and
/// the frequency metadata is derived from the capture attributes. All three
/// antenna axes share the same reference pulse, so the resulting base is a
/// single integer triple.
pub fn convert_pulses(capture: &PulseCapture) -> ConvertResult<PulsesRecord> {
    let (n_pulses, n_samples) = capture.real.dim();
    log::info!(
        "Converting pulse capture: {} pulses x {} samples",
        n_pulses,
        n_samples
    );

    validate_capture(capture, n_pulses, n_samples)?;

    let bandwidth = *capture.bandwidth.get(0).ok_or_else(|| {
        ConvertError::MalformedInput("bandwidth attribute holds no values".to_string())
    })?;
    let rf_center = scalar_rf_frequency(&capture.rf_frequency)?;

    // Reconstruct real + j*imag, reducing to 32-bit components.
    let pulses = Zip::from(&capture.real)
        .and(&capture.imag)
        .map_collect(|&re, &im| GsiComplex::new(re as f32, im as f32));

    let mid = midpoint(n_pulses);
    let (range_base, range_offsets) = rebase(&capture.range, mid)?;

    // Frequency step per sample; bandwidth is taken as invariant across the
    // capture, so only the first stored value participates. The minimum
    // frequency stays in double precision until the final cast.
    let frequency_step = bandwidth / n_samples as f64;
    let min_frequency = rf_center - frequency_step * (n_samples as f64 - 1.0) / 2.0;
    let min_frequencies = Array1::from_elem(n_pulses, min_frequency as f32);

    let (base_x, off_x) = rebase(&capture.antenna[0], mid)?;
    let (base_y, off_y) = rebase(&capture.antenna[1], mid)?;
    let (base_z, off_z) = rebase(&capture.antenna[2], mid)?;

    log::debug!(
        "Reference pulse {}: range base {}, antenna base [{}, {}, {}]",
        mid,
        range_base,
        base_x,
        base_y,
        base_z
    );

    Ok(PulsesRecord {
        pulses,
        range_offsets,
        range_base,
        frequency_step: frequency_step as f32,
        min_frequencies,
        position_offsets: [off_x, off_y, off_z],
        antenna_base: [base_x, base_y, base_z],
    })
}

/// Reject captures whose vectors disagree with the pulse matrix before any
/// array is indexed.
fn validate_capture(
    capture: &PulseCapture,
    n_pulses: usize,
    n_samples: usize,
) -> ConvertResult<()> {
    if n_pulses == 0 || n_samples == 0 {
        return Err(ConvertError::MalformedInput(
            "capture holds no pulse samples".to_string(),
        ));
    }

    if capture.imag.dim() != (n_pulses, n_samples) {
        return Err(ConvertError::ShapeMismatch(format!(
            "imaginary plane is {:?} but real plane is {:?}",
            capture.imag.dim(),
            (n_pulses, n_samples)
        )));
    }

    if capture.range.len() != n_pulses {
        return Err(ConvertError::ShapeMismatch(format!(
            "range vector has {} entries for {} pulses",
            capture.range.len(),
            n_pulses
        )));
    }

    for (axis, name) in capture.antenna.iter().zip(["x", "y", "z"]) {
        if axis.len() != n_pulses {
            return Err(ConvertError::ShapeMismatch(format!(
                "antenna {} track has {} entries for {} pulses",
                name,
                axis.len(),
                n_pulses
            )));
        }
    }

    Ok(())
}

/// Per-pulse center frequencies are not modeled: the capture carries one
/// scalar that is broadcast to every pulse, and anything else is rejected.
fn scalar_rf_frequency(values: &Array1<f64>) -> ConvertResult<f64> {
    if values.len() != 1 {
        return Err(ConvertError::MalformedInput(format!(
            "RF center frequency must squeeze to a single value, found {}",
            values.len()
        )));
    }
    Ok(values[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, Array2};

    fn test_capture() -> PulseCapture {
        let n_pulses = 4;
        let n_samples = 2;
        let real = Array2::from_shape_fn((n_pulses, n_samples), |(p, s)| (p * 10 + s) as f64);
        let imag = real.mapv(|v| -v);

        PulseCapture {
            real,
            imag,
            range: arr1(&[100000.2, 100000.4, 100000.6, 100000.8]),
            antenna: [
                arr1(&[2000.5, 2001.5, 2002.5, 2003.5]),
                arr1(&[-500.25, -499.25, -498.25, -497.25]),
                arr1(&[9000.125, 9000.375, 9000.625, 9000.875]),
            ],
            bandwidth: arr1(&[30.0e6]),
            rf_frequency: arr1(&[10.0e9]),
        }
    }

    #[test]
    fn test_conversion_matches_reference_example() {
        let record = convert_pulses(&test_capture()).unwrap();

        // Midpoint of 4 pulses is index 2 (range 100000.6).
        assert_eq!(record.range_base, 100000);
        let expected = [0.2f32, 0.4, 0.6, 0.8];
        for (offset, want) in record.range_offsets.iter().zip(expected) {
            assert_abs_diff_eq!(*offset, want, epsilon = 1e-4);
        }

        assert_eq!(record.antenna_base, [2002, -498, 9000]);
        assert_abs_diff_eq!(record.position_offsets[0][2], 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(record.position_offsets[1][2], -0.25, epsilon = 1e-5);
        assert_abs_diff_eq!(record.position_offsets[2][2], 0.625, epsilon = 1e-5);
    }

    #[test]
    fn test_frequency_metadata() {
        let record = convert_pulses(&test_capture()).unwrap();

        // 30 MHz over 2 samples.
        assert_abs_diff_eq!(record.frequency_step, 15.0e6, epsilon = 1.0);

        // 10 GHz - 15 MHz * (2 - 1) / 2, broadcast to every pulse.
        let want = (10.0e9 - 7.5e6) as f32;
        assert_eq!(record.min_frequencies.len(), 4);
        for min_freq in record.min_frequencies.iter() {
            assert_abs_diff_eq!(*min_freq, want, epsilon = 1.0);
        }
    }

    #[test]
    fn test_complex_reconstruction_and_shape() {
        let capture = test_capture();
        let record = convert_pulses(&capture).unwrap();

        assert_eq!(record.dims(), capture.real.dim());
        assert_eq!(record.pulses[[1, 1]], GsiComplex::new(11.0, -11.0));
        assert_eq!(record.range_offsets.len(), 4);
        for axis in &record.position_offsets {
            assert_eq!(axis.len(), 4);
        }
    }

    #[test]
    fn test_range_length_mismatch_is_rejected() {
        let mut capture = test_capture();
        capture.range = arr1(&[100000.2, 100000.4]);

        let err = convert_pulses(&capture).unwrap_err();
        assert!(matches!(err, ConvertError::ShapeMismatch(_)));
    }

    #[test]
    fn test_antenna_length_mismatch_is_rejected() {
        let mut capture = test_capture();
        capture.antenna[2] = arr1(&[9000.125]);

        let err = convert_pulses(&capture).unwrap_err();
        assert!(matches!(err, ConvertError::ShapeMismatch(_)));
    }

    #[test]
    fn test_imaginary_plane_mismatch_is_rejected() {
        let mut capture = test_capture();
        capture.imag = Array2::zeros((4, 3));

        let err = convert_pulses(&capture).unwrap_err();
        assert!(matches!(err, ConvertError::ShapeMismatch(_)));
    }

    #[test]
    fn test_empty_capture_is_rejected() {
        let mut capture = test_capture();
        capture.real = Array2::zeros((0, 0));
        capture.imag = Array2::zeros((0, 0));

        let err = convert_pulses(&capture).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput(_)));
    }

    #[test]
    fn test_bandwidth_uses_first_value_only() {
        let mut capture = test_capture();
        capture.bandwidth = arr1(&[30.0e6, 60.0e6, 90.0e6]);

        let record = convert_pulses(&capture).unwrap();
        assert_abs_diff_eq!(record.frequency_step, 15.0e6, epsilon = 1.0);
    }

    #[test]
    fn test_vector_rf_frequency_is_rejected() {
        let mut capture = test_capture();
        capture.rf_frequency = arr1(&[10.0e9, 10.1e9]);

        let err = convert_pulses(&capture).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput(_)));

        capture.rf_frequency = ndarray::Array1::zeros(0);
        assert!(convert_pulses(&capture).is_err());
    }
}
