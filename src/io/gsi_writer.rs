use crate::types::{ConvertError, ConvertResult, DtmRecord, PulseMatrix, PulsesRecord};
use hdf5::types::FixedAscii;
use hdf5::{File, H5Type};
use ndarray::{Array1, Array2};
use std::path::Path;

/// Version tag stamped on every GSI container
pub const GSI_FORMAT_VERSION: &str = "GSI-SAR-HDF5-FORMAT-0.2";

/// Fixed-length ASCII type of the version attribute
pub type VersionTag = FixedAscii<{ GSI_FORMAT_VERSION.len() }>;

/// Complex sample layout shared with the reference readers: a compound of
/// two f32 fields, interchangeable with a single-precision complex dtype.
#[derive(H5Type, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct ComplexSample {
    pub r: f32,
    pub i: f32,
}

/// Stamp the format version attribute on a freshly created container
pub fn write_version_attr(file: &File) -> ConvertResult<()> {
    let tag = VersionTag::from_ascii(GSI_FORMAT_VERSION.as_bytes())
        .map_err(|e| ConvertError::Processing(format!("version tag is not ascii: {}", e)))?;
    file.new_attr::<VersionTag>()
        .create("version")?
        .write_scalar(&tag)?;
    Ok(())
}

/// Read the format version attribute back for verification
pub fn read_version_attr(file: &File) -> ConvertResult<String> {
    let attr = file.attr("version").map_err(|_| {
        ConvertError::MalformedInput("container carries no version attribute".to_string())
    })?;
    let tag = attr.read_scalar::<VersionTag>()?;
    Ok(tag.as_str().to_string())
}

/// Writer for the GSI pulses container
///
/// Created exclusively (an existing path is refused) and stamped with the
/// format version exactly once. The underlying container flushes and closes
/// when the writer drops, on success and failure paths alike.
#[derive(Debug)]
pub struct PulsesFile {
    file: File,
}

impl PulsesFile {
    /// Create a new pulses container at a non-existing path
    pub fn create<P: AsRef<Path>>(path: P) -> ConvertResult<Self> {
        let path = path.as_ref();
        log::info!("Creating GSI pulses file: {}", path.display());

        let file = File::create_excl(path)?;
        write_version_attr(&file)?;

        Ok(Self { file })
    }

    /// Write every dataset of a converted pulse record
    pub fn write_record(&self, record: &PulsesRecord) -> ConvertResult<()> {
        self.set_pulses(&record.pulses)?;
        self.set_range_offsets(&record.range_offsets)?;
        self.set_range_base(record.range_base)?;
        self.set_frequency_step(record.frequency_step)?;
        self.set_min_frequencies(&record.min_frequencies)?;
        self.set_positions(&record.position_offsets)?;
        self.set_antenna_base(record.antenna_base)?;

        let (pulses, samples) = record.dims();
        log::debug!("Wrote pulses container: {} pulses x {} samples", pulses, samples);
        Ok(())
    }

    pub fn set_pulses(&self, pulses: &PulseMatrix) -> ConvertResult<()> {
        let samples = pulses.mapv(|c| ComplexSample { r: c.re, i: c.im });
        self.file
            .new_dataset_builder()
            .with_data(&samples)
            .create("pulses")?;
        Ok(())
    }

    pub fn set_range_offsets(&self, offsets: &Array1<f32>) -> ConvertResult<()> {
        self.file
            .new_dataset_builder()
            .with_data(offsets)
            .create("range")?;
        Ok(())
    }

    /// The integer range base keeps its historical dataset name
    pub fn set_range_base(&self, base: i32) -> ConvertResult<()> {
        self.file
            .new_dataset::<i32>()
            .shape(())
            .create("range_offset")?
            .write_scalar(&base)?;
        Ok(())
    }

    pub fn set_frequency_step(&self, step: f32) -> ConvertResult<()> {
        self.file
            .new_dataset::<f32>()
            .shape(())
            .create("frequency_delta")?
            .write_scalar(&step)?;
        Ok(())
    }

    pub fn set_min_frequencies(&self, frequencies: &Array1<f32>) -> ConvertResult<()> {
        self.file
            .new_dataset_builder()
            .with_data(frequencies)
            .create("minimal_frequencies")?;
        Ok(())
    }

    pub fn set_positions(&self, offsets: &[Array1<f32>; 3]) -> ConvertResult<()> {
        for (name, axis) in ["x", "y", "z"].iter().zip(offsets) {
            self.file
                .new_dataset_builder()
                .with_data(axis)
                .create(*name)?;
        }
        Ok(())
    }

    pub fn set_antenna_base(&self, base: [i32; 3]) -> ConvertResult<()> {
        self.file
            .new_dataset_builder()
            .with_data(&base[..])
            .create("antenna_base")?;
        Ok(())
    }
}

/// Writer for the GSI DTM container
///
/// Same creation and closing contract as [`PulsesFile`].
pub struct DtmFile {
    file: File,
}

impl DtmFile {
    /// Create a new DTM container at a non-existing path
    pub fn create<P: AsRef<Path>>(path: P) -> ConvertResult<Self> {
        let path = path.as_ref();
        log::info!("Creating GSI DTM file: {}", path.display());

        let file = File::create_excl(path)?;
        write_version_attr(&file)?;

        Ok(Self { file })
    }

    /// Write every dataset of a converted terrain record
    pub fn write_record(&self, record: &DtmRecord) -> ConvertResult<()> {
        self.set_positions(&record.x, &record.y, &record.z)?;
        self.set_grid_base(record.grid_base)?;

        let (rows, cols) = record.dims();
        log::debug!("Wrote DTM container: {} x {} points", rows, cols);
        Ok(())
    }

    pub fn set_positions(
        &self,
        x: &Array2<f32>,
        y: &Array2<f32>,
        z: &Array2<f32>,
    ) -> ConvertResult<()> {
        for (name, grid) in [("x", x), ("y", y), ("z", z)] {
            self.file
                .new_dataset_builder()
                .with_data(grid)
                .create(name)?;
        }
        Ok(())
    }

    pub fn set_grid_base(&self, base: [i32; 3]) -> ConvertResult<()> {
        self.file
            .new_dataset_builder()
            .with_data(&base[..])
            .create("dtm_base")?;
        Ok(())
    }
}
