//! Builds railway tracks from a layout document and prints them as JSON.
//! Logs go to stderr; set `RUST_LOG=railsweep=debug` for per-segment detail.

mod cli;

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Output};
use railsweep::{LayoutDocument, Track};
use serde_json::{json, Map, Value};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let mut document = LayoutDocument::from_json(&text)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    if let Some(model) = args.cant_model {
        document.config = document.config.with_cant_model(model.into());
    }

    let names: Vec<String> = match &args.railway {
        Some(name) => {
            document.railway(name)?;
            vec![name.clone()]
        }
        None => document.names().map(str::to_string).collect(),
    };

    let mut report = Map::new();
    for name in &names {
        let path = document.railway(name)?;
        let track = Track::from_canonical(path, &document.config)
            .with_context(|| format!("failed to build railway {name:?}"))?;
        info!(railway = %name, placements = track.len(), "railway built");
        report.insert(name.clone(), render(&track, &args)?);
    }

    let value = match (&args.railway, report.len()) {
        (Some(_), 1) => report.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null),
        _ => Value::Object(report),
    };

    let out = if args.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{out}");
    Ok(())
}

fn render(track: &Track, args: &Args) -> Result<Value> {
    if let Some(spacing) = args.sample_spacing {
        return Ok(serde_json::to_value(track.resample(spacing)?)?);
    }
    let value = match args.output {
        Output::Placements => json!(track
            .placements()
            .iter()
            .map(|p| json!({
                "matrix": p.transform.to_cols_array(),
                "position": p.position,
            }))
            .collect::<Vec<_>>()),
        Output::Positions => serde_json::to_value(track.positions())?,
        Output::Sections => serde_json::to_value(track.sections())?,
        Output::EndFrame => serde_json::to_value(track.end_frame())?,
    };
    Ok(value)
}
