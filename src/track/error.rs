use thiserror::Error;

/// Failure building a railway. Every variant aborts the whole pass.
#[derive(Error, Debug)]
pub enum TrackError {
    /// `path` is the railway name when the segment came from a named railway.
    #[error("invalid segment {index}{}: {reason}", railway_suffix(.path))]
    InvalidSegment {
        path: Option<String>,
        index: usize,
        reason: SegmentFault,
    },

    #[error("unknown command {command:?} at {path}[{index}]")]
    UnknownCommand {
        path: String,
        index: usize,
        command: String,
    },

    #[error("malformed input at {location}: {detail}")]
    MalformedInput { location: String, detail: String },

    #[error("no railway named {0:?}")]
    UnknownPath(String),

    #[error("start frame is degenerate: tangent and normal must be non-zero and not parallel")]
    DegenerateFrame,

    #[error("failed to parse layout document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a segment was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SegmentFault {
    #[error("curve radius must be non-zero")]
    ZeroRadius,
    #[error("length must not be negative (got {0})")]
    NegativeLength(i64),
    #[error("cant must be finite (got {0})")]
    NonFiniteCant(f32),
    #[error("scale must be finite (got {0})")]
    NonFiniteScale(f32),
}

impl TrackError {
    pub(crate) fn malformed(location: impl Into<String>, detail: impl Into<String>) -> Self {
        TrackError::MalformedInput {
            location: location.into(),
            detail: detail.into(),
        }
    }

    /// Names the railway an unlocated `InvalidSegment` belongs to.
    pub(crate) fn in_railway(self, name: &str) -> Self {
        match self {
            TrackError::InvalidSegment {
                path: None,
                index,
                reason,
            } => TrackError::InvalidSegment {
                path: Some(name.to_string()),
                index,
                reason,
            },
            other => other,
        }
    }

    /// Stable numeric code for the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            TrackError::MalformedInput { .. } | TrackError::Json(_) => -2,
            TrackError::UnknownCommand { .. } => -4,
            TrackError::InvalidSegment { .. } => -5,
            TrackError::UnknownPath(_) => -6,
            TrackError::DegenerateFrame => -7,
        }
    }
}

fn railway_suffix(path: &Option<String>) -> String {
    path.as_deref()
        .map(|name| format!(" of railway {name:?}"))
        .unwrap_or_default()
}
