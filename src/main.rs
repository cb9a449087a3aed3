use anyhow::{bail, Context};
use clap::Parser;
use gsiconv::types::ConversionReport;
use gsiconv::{
    convert_dtm, convert_pulses, CaptureReader, DtmFile, PulsesFile, GSI_FORMAT_VERSION,
};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Converts a phase-history capture into GSI format containers"
)]
struct Args {
    /// Path to a non-existing pulses output file
    pulses: PathBuf,
    /// Path to a non-existing DTM output file
    dtm: PathBuf,
    /// Path to an input capture file
    input: PathBuf,
    /// Write a JSON conversion report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    // No container is opened until all three paths pass.
    if !args.input.exists() {
        bail!("{} doesn't exist!", args.input.display());
    }
    if args.pulses.exists() {
        bail!("{} already exists!", args.pulses.display());
    }
    if args.dtm.exists() {
        bail!("{} already exists!", args.dtm.display());
    }

    let reader = CaptureReader::open(&args.input)?;
    let capture = reader.read_pulse_capture()?;
    let grid = reader.read_terrain_grid()?;

    // Convert before creating any output so a rejected capture leaves
    // nothing behind on disk.
    let pulses_record = convert_pulses(&capture).context("converting pulse collection")?;
    let dtm_record = convert_dtm(&grid).context("converting DTM grid")?;

    let pulses_file = PulsesFile::create(&args.pulses)?;
    pulses_file.write_record(&pulses_record)?;

    let dtm_file = DtmFile::create(&args.dtm)?;
    dtm_file.write_record(&dtm_record)?;

    if let Some(path) = &args.report {
        let report = ConversionReport {
            format_version: GSI_FORMAT_VERSION.to_string(),
            input: args.input.display().to_string(),
            pulses: pulses_record.summary(),
            dtm: dtm_record.summary(),
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    log::info!(
        "Conversion finished: {} and {}",
        args.pulses.display(),
        args.dtm.display()
    );
    Ok(())
}
