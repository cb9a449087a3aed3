use crate::types::{ConvertError, ConvertResult, PulseCapture, TerrainGrid};
use hdf5::types::{FloatSize, TypeDescriptor};
use hdf5::{Dataset, File};
use ndarray::{Array1, Array2, Axis, Ix3};
use std::path::{Path, PathBuf};

/// Reader for phase-history capture containers
///
/// The capture holds the synthetic pulse planes, the per-pulse slant range
/// and antenna track, the frequency attributes, and the DTM grid. Everything
/// is materialized into owned arrays before any conversion runs.
#[derive(Debug)]
pub struct CaptureReader {
    path: PathBuf,
    file: File,
}

impl CaptureReader {
    /// Open a capture container read-only
    pub fn open<P: AsRef<Path>>(path: P) -> ConvertResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(ConvertError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )));
        }

        log::info!("Opening capture container: {}", path.display());
        let file = File::open(&path)?;

        Ok(Self { path, file })
    }

    /// Read the pulse collection: complex planes, slant range, antenna
    /// track, and the frequency attributes
    pub fn read_pulse_capture(&self) -> ConvertResult<PulseCapture> {
        let planes = self.dataset("SyntheticPulses")?;
        let dims = planes.shape();
        if dims.len() != 3 || dims[0] != 2 {
            return Err(ConvertError::MalformedInput(format!(
                "SyntheticPulses must hold real/imaginary planes of shape (2, pulses, samples), found {:?}",
                dims
            )));
        }
        let planes = planes
            .read_dyn::<f64>()?
            .into_dimensionality::<Ix3>()
            .map_err(|e| {
                ConvertError::MalformedInput(format!("SyntheticPulses has no 3-d layout: {}", e))
            })?;
        let real = planes.index_axis(Axis(0), 0).to_owned();
        let imag = planes.index_axis(Axis(0), 1).to_owned();

        // Stored layout of the range vector varies between producers;
        // flatten row-major exactly as it sits on disk.
        let range = self.dataset("SyntheticPulseData1/Range")?;
        let range = Array1::from_vec(range.read_raw::<f64>()?);

        let positions = self.dataset("PulsePositions")?;
        let dims = positions.shape();
        if dims.len() != 2 || dims[0] != 3 {
            return Err(ConvertError::MalformedInput(format!(
                "PulsePositions must hold x/y/z tracks of shape (3, pulses), found {:?}",
                dims
            )));
        }
        let positions = positions.read_2d::<f64>()?;
        let antenna = [
            positions.row(0).to_owned(),
            positions.row(1).to_owned(),
            positions.row(2).to_owned(),
        ];

        let bandwidth = self.root_attr_values("Band_Width")?;
        let rf_frequency = self.root_attr_values("RF_Frequency")?;

        log::debug!(
            "Capture: {} pulses x {} samples, range of {} bins",
            real.dim().0,
            real.dim().1,
            range.len()
        );

        Ok(PulseCapture {
            real,
            imag,
            range,
            antenna,
            bandwidth,
            rf_frequency,
        })
    }

    /// Read the DTM coordinate grids
    pub fn read_terrain_grid(&self) -> ConvertResult<TerrainGrid> {
        let x = self.read_grid_plane("DTM/x")?;
        let y = self.read_grid_plane("DTM/y")?;
        let z = self.read_grid_plane("DTM/z")?;

        log::debug!("Terrain grid: {} x {} points", x.dim().0, x.dim().1);

        Ok(TerrainGrid { x, y, z })
    }

    /// Fetch a dataset, naming the container when it is absent
    fn dataset(&self, name: &str) -> ConvertResult<Dataset> {
        self.file.dataset(name).map_err(|_| {
            ConvertError::MalformedInput(format!(
                "dataset '{}' is missing from {}",
                name,
                self.path.display()
            ))
        })
    }

    /// Read a root attribute as a value list; scalar attributes yield one value
    fn root_attr_values(&self, name: &str) -> ConvertResult<Array1<f64>> {
        let attr = self.file.attr(name).map_err(|_| {
            ConvertError::MalformedInput(format!(
                "attribute '{}' is missing from {}",
                name,
                self.path.display()
            ))
        })?;
        Ok(Array1::from_vec(attr.read_raw::<f64>()?))
    }

    /// One DTM plane: stored dtype must be double precision, rank must be 2
    fn read_grid_plane(&self, name: &str) -> ConvertResult<Array2<f64>> {
        let dataset = self.dataset(name)?;

        let descriptor = dataset.dtype()?.to_descriptor()?;
        if descriptor != TypeDescriptor::Float(FloatSize::U8) {
            return Err(ConvertError::TypeMismatch(format!(
                "{} must be stored as double precision, found {:?}",
                name, descriptor
            )));
        }

        let dims = dataset.shape();
        if dims.len() != 2 {
            return Err(ConvertError::MalformedInput(format!(
                "{} must be a two-dimensional grid, found rank {}",
                name,
                dims.len()
            )));
        }

        Ok(dataset.read_2d::<f64>()?)
    }
}
