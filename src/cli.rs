use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use railsweep::CantModel;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Lays out railway tracks from a JSON layout document and prints the
/// resulting placements as JSON
pub struct Args {
    /// Layout document. Expects a .json file with a "railways" object
    pub input: PathBuf,

    /// Only build this railway. Defaults to every railway in the document
    #[arg(short, long)]
    pub railway: Option<String>,

    /// What to print for each railway
    #[arg(short, long, value_enum, default_value_t = Output::Placements)]
    pub output: Output,

    /// Override the document's cant model
    #[arg(long, value_enum)]
    pub cant_model: Option<CantArg>,

    /// Print frames resampled at this arc spacing instead of raw output
    #[arg(long, value_parser = parse_spacing)]
    pub sample_spacing: Option<f32>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    /// Transform matrices and positions
    Placements,
    /// Positions only
    Positions,
    /// Per-segment placement ranges and turn angles
    Sections,
    /// Frame after the last placement
    EndFrame,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CantArg {
    Sine,
    Linear,
}

impl From<CantArg> for CantModel {
    fn from(arg: CantArg) -> Self {
        match arg {
            CantArg::Sine => CantModel::Sine,
            CantArg::Linear => CantModel::Linear,
        }
    }
}

fn parse_spacing(arg: &str) -> Result<f32, String> {
    let spacing: f32 = arg.parse().map_err(|e| format!("{e}"))?;
    if spacing > 0.0 && spacing.is_finite() {
        Ok(spacing)
    } else {
        Err(format!("spacing must be a positive number, got {arg}"))
    }
}
