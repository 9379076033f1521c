use serde::{Deserialize, Serialize};

use crate::sim::CantModel;

/// Tunables for a propagation pass.
///
/// Read from the layout document's optional `settings` object; every field
/// has a default so an empty object is valid.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub cant_model: CantModel,
}

impl SweepConfig {
    pub fn with_cant_model(self, cant_model: CantModel) -> Self {
        Self { cant_model }
    }
}
