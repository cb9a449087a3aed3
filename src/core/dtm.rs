use crate::core::delta::{grid_midpoint, rebase};
use crate::types::{ConvertError, ConvertResult, DtmRecord, TerrainGrid};

/// Convert a terrain grid into a GSI DTM record.
///
/// All three axes are re-based at the same midpoint cell, producing one
/// shared integer base triple and three f32 offset grids of the input shape.
pub fn convert_dtm(grid: &TerrainGrid) -> ConvertResult<DtmRecord> {
    let shape = grid.x.dim();
    log::info!("Converting DTM grid: {} x {} points", shape.0, shape.1);

    if grid.y.dim() != shape || grid.z.dim() != shape {
        return Err(ConvertError::ShapeMismatch(format!(
            "DTM grids disagree: x {:?}, y {:?}, z {:?}",
            grid.x.dim(),
            grid.y.dim(),
            grid.z.dim()
        )));
    }

    if shape.0 == 0 || shape.1 == 0 {
        return Err(ConvertError::MalformedInput(
            "DTM grid holds no points".to_string(),
        ));
    }

    let pivot = grid_midpoint(shape);
    let (base_x, x) = rebase(&grid.x, pivot)?;
    let (base_y, y) = rebase(&grid.y, pivot)?;
    let (base_z, z) = rebase(&grid.z, pivot)?;

    log::debug!(
        "Reference cell {:?}: grid base [{}, {}, {}]",
        pivot,
        base_x,
        base_y,
        base_z
    );

    Ok(DtmRecord {
        x,
        y,
        z,
        grid_base: [base_x, base_y, base_z],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;

    fn test_grid() -> TerrainGrid {
        // 3x4 patch of a regular grid with metre-scale offsets around
        // large absolute coordinates.
        let x = Array2::from_shape_fn((3, 4), |(r, c)| 712000.0 + r as f64 * 10.0 + c as f64);
        let y = Array2::from_shape_fn((3, 4), |(r, c)| 3448000.0 + r as f64 + c as f64 * 10.0);
        let z = Array2::from_shape_fn((3, 4), |(r, c)| 120.5 + (r + c) as f64 * 0.25);
        TerrainGrid { x, y, z }
    }

    #[test]
    fn test_shared_base_from_midpoint_cell() {
        let grid = test_grid();
        let record = convert_dtm(&grid).unwrap();

        // Midpoint of a 3x4 grid is cell (1, 2).
        assert_eq!(record.grid_base, [712012, 3448021, 121]);
        assert_abs_diff_eq!(record.x[[1, 2]], 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(record.z[[1, 2]], 0.25, epsilon = 1e-5);
    }

    #[test]
    fn test_shape_preserved_and_round_trip() {
        let grid = test_grid();
        let record = convert_dtm(&grid).unwrap();

        assert_eq!(record.dims(), grid.x.dim());
        assert_eq!(record.y.dim(), grid.y.dim());
        assert_eq!(record.z.dim(), grid.z.dim());

        let planes = [
            (&grid.x, &record.x, record.grid_base[0]),
            (&grid.y, &record.y, record.grid_base[1]),
            (&grid.z, &record.z, record.grid_base[2]),
        ];
        for (orig, off, base) in planes {
            for (orig, off) in orig.iter().zip(off.iter()) {
                let recon = f64::from(base) + f64::from(*off);
                assert_abs_diff_eq!(recon, *orig, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_differing_shapes_are_rejected() {
        let mut grid = test_grid();
        grid.z = Array2::zeros((3, 5));

        let err = convert_dtm(&grid).unwrap_err();
        assert!(matches!(err, ConvertError::ShapeMismatch(_)));
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let grid = TerrainGrid {
            x: Array2::zeros((0, 0)),
            y: Array2::zeros((0, 0)),
            z: Array2::zeros((0, 0)),
        };

        let err = convert_dtm(&grid).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput(_)));
    }
}
