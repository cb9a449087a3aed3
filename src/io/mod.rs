//! I/O modules for reading captures and writing GSI containers

pub mod capture_reader;
pub mod gsi_writer;

pub use capture_reader::CaptureReader;
pub use gsi_writer::{DtmFile, PulsesFile, GSI_FORMAT_VERSION};
