use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::config::SweepConfig;
use super::error::{SegmentFault, TrackError};
use super::segment::{Path, Segment, Turn};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    settings: SweepConfig,
    #[serde(default)]
    railways: BTreeMap<String, Vec<RawCommand>>,
}

#[derive(Deserialize)]
struct RawCommand {
    command: String,
    #[serde(default)]
    params: Vec<Value>,
}

/// Parsed layout document: named railways plus sweep settings.
///
/// ```json
/// {
///   "settings": { "cant_model": "sine" },
///   "railways": {
///     "main": [
///       { "command": "Straight", "params": [10] },
///       { "command": "Curve", "params": ["Right", 50, 20, 0.05, 1.0] }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutDocument {
    pub config: SweepConfig,
    pub railways: BTreeMap<String, Path>,
}

impl LayoutDocument {
    pub fn from_json(text: &str) -> Result<Self, TrackError> {
        let raw: RawDocument = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TrackError> {
        let raw: RawDocument = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDocument) -> Result<Self, TrackError> {
        let mut railways = BTreeMap::new();
        for (name, commands) in raw.railways {
            let path = parse_commands(&name, &commands)?;
            debug!(railway = %name, segments = path.len(), units = path.total_length(), "railway parsed");
            railways.insert(name, path);
        }
        Ok(Self {
            config: raw.settings,
            railways,
        })
    }

    pub fn railway(&self, name: &str) -> Result<&Path, TrackError> {
        self.railways
            .get(name)
            .ok_or_else(|| TrackError::UnknownPath(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.railways.keys().map(String::as_str)
    }
}

fn parse_commands(name: &str, commands: &[RawCommand]) -> Result<Path, TrackError> {
    commands
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_command(name, index, raw))
        .collect::<Result<Vec<_>, _>>()
        .map(Path::new)
}

fn parse_command(name: &str, index: usize, raw: &RawCommand) -> Result<Segment, TrackError> {
    let at = |param: usize| format!("{name}[{index}].params[{param}]");
    let params = &raw.params;

    let segment = match raw.command.as_str() {
        "Straight" => {
            expect_arity(name, index, params, 1, 1)?;
            Segment::Straight {
                length: parse_length(name, index, &params[0], || at(0))?,
            }
        }
        "Curve" => {
            expect_arity(name, index, params, 3, 5)?;
            Segment::Curve {
                turn: parse_turn(&params[0], || at(0))?,
                radius: parse_radius(&params[1], || at(1))?,
                length: parse_length(name, index, &params[2], || at(2))?,
                cant: parse_float(params.get(3), 0.0, || at(3))?,
                scale: parse_float(params.get(4), 1.0, || at(4))?,
            }
        }
        other => {
            return Err(TrackError::UnknownCommand {
                path: name.to_string(),
                index,
                command: other.to_string(),
            })
        }
    };

    segment
        .check()
        .map_err(|reason| TrackError::InvalidSegment {
            path: Some(name.to_string()),
            index,
            reason,
        })?;
    Ok(segment)
}

fn expect_arity(
    name: &str,
    index: usize,
    params: &[Value],
    min: usize,
    max: usize,
) -> Result<(), TrackError> {
    if (min..=max).contains(&params.len()) {
        return Ok(());
    }
    let expected = if min == max {
        format!("{min}")
    } else {
        format!("{min} to {max}")
    };
    Err(TrackError::malformed(
        format!("{name}[{index}].params"),
        format!("expected {expected} parameters, got {}", params.len()),
    ))
}

fn parse_turn(value: &Value, at: impl Fn() -> String) -> Result<Turn, TrackError> {
    match value.as_str() {
        Some(s) if s.eq_ignore_ascii_case("left") => Ok(Turn::Left),
        Some(s) if s.eq_ignore_ascii_case("right") => Ok(Turn::Right),
        _ => Err(TrackError::malformed(
            at(),
            format!("expected \"Left\" or \"Right\", got {value}"),
        )),
    }
}

fn parse_radius(value: &Value, at: impl Fn() -> String) -> Result<i32, TrackError> {
    value
        .as_i64()
        .and_then(|r| i32::try_from(r).ok())
        .ok_or_else(|| TrackError::malformed(at(), format!("expected integer radius, got {value}")))
}

fn parse_length(
    name: &str,
    index: usize,
    value: &Value,
    at: impl Fn() -> String,
) -> Result<u32, TrackError> {
    let Some(length) = value.as_i64() else {
        return Err(TrackError::malformed(
            at(),
            format!("expected integer length, got {value}"),
        ));
    };
    if length < 0 {
        return Err(TrackError::InvalidSegment {
            path: Some(name.to_string()),
            index,
            reason: SegmentFault::NegativeLength(length),
        });
    }
    u32::try_from(length)
        .map_err(|_| TrackError::malformed(at(), format!("length {length} is too large")))
}

fn parse_float(value: Option<&Value>, default: f32, at: impl Fn() -> String) -> Result<f32, TrackError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .as_f64()
            .map(|f| f as f32)
            .ok_or_else(|| TrackError::malformed(at(), format!("expected number, got {v}"))),
    }
}
