use crate::types::{ConvertError, ConvertResult};
use ndarray::{Array, Dimension, NdIndex};
use std::fmt;

/// Reference index for a vector of `len` elements.
///
/// Floor division biases even lengths toward the later element, so the
/// same pulse is chosen every run for a given capture size.
pub fn midpoint(len: usize) -> usize {
    len / 2
}

/// Reference cell for a grid, applying the floor-midpoint rule per axis.
pub fn grid_midpoint(shape: (usize, usize)) -> (usize, usize) {
    (shape.0 / 2, shape.1 / 2)
}

/// Split an array of doubles into an exact integer base and reduced-precision
/// offsets.
///
/// The base is the integer part (truncation toward zero) of the material
/// value at `pivot`; no interpolation or averaging is involved. The base is
/// subtracted in full double precision *before* the cast to f32, so the high
/// dynamic range of absolute range/geodetic coordinates is removed first and
/// the residual offsets sit near zero where 32-bit floats are densest.
///
/// # Arguments
/// * `values` - 1D or 2D array of doubles
/// * `pivot` - reference index (or index pair), must be in bounds
///
/// # Returns
/// * The integer base and the offset array of the same shape as `values`
pub fn rebase<D, I>(values: &Array<f64, D>, pivot: I) -> ConvertResult<(i32, Array<f32, D>)>
where
    D: Dimension,
    I: NdIndex<D> + fmt::Debug + Copy,
{
    let anchor = *values.get(pivot).ok_or_else(|| {
        ConvertError::Processing(format!(
            "reference index {:?} is outside an array of shape {:?}",
            pivot,
            values.shape()
        ))
    })?;

    // Checked truncation toward zero; rejects NaN/inf and anchors beyond
    // the 32-bit integer range instead of wrapping.
    let base: i32 = num_traits::cast(anchor).ok_or_else(|| {
        ConvertError::Processing(format!(
            "reference value {} has no 32-bit integer base",
            anchor
        ))
    })?;

    let offsets = values.mapv(|v| (v - f64::from(base)) as f32);
    Ok((base, offsets))
}
