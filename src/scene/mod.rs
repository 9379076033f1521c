//! Published railway tracks and transactional reload.
//!
//! A reload builds every railway of a document into fresh tracks and only
//! then swaps them in as a new snapshot. Readers hold an `Arc` to whichever
//! snapshot was current when they asked, so they never see a half-built
//! scene. Reloads are serialized; a failed reload leaves the previous
//! snapshot in place.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{info, warn};

use crate::track::{LayoutDocument, SweepConfig, Track, TrackError};

/// Immutable set of built tracks from one successful reload.
#[derive(Debug, Default)]
pub struct SceneSnapshot {
    generation: u64,
    config: SweepConfig,
    tracks: BTreeMap<String, Track>,
}

impl SceneSnapshot {
    /// Number of successful reloads that led to this snapshot; `0` is the empty scene.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> SweepConfig {
        self.config
    }

    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.get(name)
    }

    pub fn tracks(&self) -> impl Iterator<Item = (&str, &Track)> {
        self.tracks.iter().map(|(name, track)| (name.as_str(), track))
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Holder of the current snapshot.
#[derive(Debug, Default)]
pub struct RailwayScene {
    current: RwLock<Arc<SceneSnapshot>>,
    reload_lock: Mutex<()>,
}

impl RailwayScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot current at the time of the call.
    pub fn snapshot(&self) -> Arc<SceneSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn generation(&self) -> u64 {
        self.snapshot().generation
    }

    /// Rebuilds every railway in `document` from the canonical frame.
    ///
    /// On success the new snapshot is published and returned. On failure
    /// the error is returned and the previous snapshot stays current.
    pub fn reload(&self, document: &LayoutDocument) -> Result<Arc<SceneSnapshot>, TrackError> {
        let _serial = self
            .reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let previous = self.snapshot();
        let tracks = match build_all(document) {
            Ok(tracks) => tracks,
            Err(err) => {
                warn!(
                    generation = previous.generation,
                    error = %err,
                    "reload rejected, keeping previous railways"
                );
                return Err(err);
            }
        };

        let next = Arc::new(SceneSnapshot {
            generation: previous.generation + 1,
            config: document.config,
            tracks,
        });
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);

        info!(
            generation = next.generation,
            railways = next.tracks.len(),
            placements = next.tracks.values().map(Track::len).sum::<usize>(),
            "railways reloaded"
        );
        Ok(next)
    }

    /// Parses `text` as a layout document and reloads from it.
    pub fn reload_json(&self, text: &str) -> Result<Arc<SceneSnapshot>, TrackError> {
        match LayoutDocument::from_json(text) {
            Ok(document) => self.reload(&document),
            Err(err) => {
                warn!(error = %err, "layout document rejected, keeping previous railways");
                Err(err)
            }
        }
    }
}

fn build_all(document: &LayoutDocument) -> Result<BTreeMap<String, Track>, TrackError> {
    document
        .railways
        .iter()
        .map(|(name, path)| {
            Track::from_canonical(path, &document.config)
                .map(|track| (name.clone(), track))
                .map_err(|err| err.in_railway(name))
        })
        .collect()
}
