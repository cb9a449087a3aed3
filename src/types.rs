use ndarray::{Array1, Array2};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Complex-valued pulse sample type (I + jQ) as stored in the GSI schema
pub type GsiComplex = Complex<f32>;

/// 2D complex phase-history array (pulse x sample)
pub type PulseMatrix = Array2<GsiComplex>;

/// Raw phase-history capture as materialized from the input container.
///
/// The real and imaginary planes are kept separate, exactly as stored;
/// reconstruction into a complex matrix happens during conversion.
#[derive(Debug, Clone)]
pub struct PulseCapture {
    /// Real plane (pulse x sample)
    pub real: Array2<f64>,
    /// Imaginary plane (pulse x sample)
    pub imag: Array2<f64>,
    /// Slant range to the reference scene point, one value per pulse
    pub range: Array1<f64>,
    /// Antenna phase-center track, x/y/z, one value per pulse
    pub antenna: [Array1<f64>; 3],
    /// Capture bandwidth attribute values (scalar captures yield one value)
    pub bandwidth: Array1<f64>,
    /// RF center frequency attribute values (scalar captures yield one value)
    pub rf_frequency: Array1<f64>,
}

/// Terrain point grid as materialized from the input container.
///
/// All three grids are read as 64-bit floats; the reader rejects any other
/// stored dtype before this struct is built.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
}

/// Converted pulses record matching the GSI pulses file schema.
///
/// Reconstruction invariant: `range_offsets[i] + range_base` recovers the
/// original range within 32-bit float rounding, and likewise per axis for
/// `position_offsets` against `antenna_base`.
#[derive(Debug, Clone)]
pub struct PulsesRecord {
    /// Reduced-precision complex pulse matrix (pulse x sample)
    pub pulses: PulseMatrix,
    /// Per-pulse range offsets relative to `range_base`
    pub range_offsets: Array1<f32>,
    /// Exact integer part of the range at the reference pulse
    pub range_base: i32,
    /// Per-sample frequency step of the capture
    pub frequency_step: f32,
    /// Minimum frequency, broadcast to one value per pulse
    pub min_frequencies: Array1<f32>,
    /// Antenna track offsets, x/y/z, relative to `antenna_base`
    pub position_offsets: [Array1<f32>; 3],
    /// Exact integer antenna position at the reference pulse, x/y/z
    pub antenna_base: [i32; 3],
}

impl PulsesRecord {
    /// Number of pulses and samples in the converted matrix
    pub fn dims(&self) -> (usize, usize) {
        self.pulses.dim()
    }

    /// Digest of the record for reporting
    pub fn summary(&self) -> PulsesSummary {
        let (pulse_count, sample_count) = self.dims();
        PulsesSummary {
            pulse_count,
            sample_count,
            range_base: self.range_base,
            frequency_step: self.frequency_step,
            antenna_base: self.antenna_base,
        }
    }
}

/// Converted DTM record matching the GSI DTM file schema.
#[derive(Debug, Clone)]
pub struct DtmRecord {
    /// Grid offsets relative to `grid_base`, x/y/z
    pub x: Array2<f32>,
    pub y: Array2<f32>,
    pub z: Array2<f32>,
    /// Exact integer grid position at the reference cell, x/y/z
    pub grid_base: [i32; 3],
}

impl DtmRecord {
    /// Grid dimensions (rows, cols)
    pub fn dims(&self) -> (usize, usize) {
        self.x.dim()
    }

    /// Digest of the record for reporting
    pub fn summary(&self) -> DtmSummary {
        let (rows, cols) = self.dims();
        DtmSummary {
            rows,
            cols,
            grid_base: self.grid_base,
        }
    }
}

/// Pulses conversion digest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulsesSummary {
    pub pulse_count: usize,
    pub sample_count: usize,
    pub range_base: i32,
    pub frequency_step: f32,
    pub antenna_base: [i32; 3],
}

/// DTM conversion digest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtmSummary {
    pub rows: usize,
    pub cols: usize,
    pub grid_base: [i32; 3],
}

/// Complete conversion report, serialized to JSON on request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub format_version: String,
    pub input: String,
    pub pulses: PulsesSummary,
    pub dtm: DtmSummary,
}

/// Error types for capture conversion
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HDF5 error: {0}")]
    Container(#[from] hdf5::Error),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("dtype mismatch: {0}")]
    TypeMismatch(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("processing error: {0}")]
    Processing(String),
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;
