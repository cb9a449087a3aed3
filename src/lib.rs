//! gsiconv: Phase-History to GSI Container Converter
//!
//! This library converts SAR phase-history captures (synthetic pulse planes,
//! slant range, antenna track, frequency attributes, DTM grids) into the
//! fixed GSI container schema. Large geodetic-scale coordinates are delta
//! encoded: an exact integer base taken at the midpoint sample plus
//! single-precision offsets, so downstream consumers keep sub-metre
//! resolution in half the storage.

pub mod core;
pub mod io;
pub mod types;

// Re-export main types and functions for easier access
pub use types::{
    ConversionReport, ConvertError, ConvertResult, DtmRecord, GsiComplex, PulseCapture,
    PulsesRecord, TerrainGrid,
};

pub use crate::core::{convert_dtm, convert_pulses};
pub use crate::io::{CaptureReader, DtmFile, PulsesFile, GSI_FORMAT_VERSION};
