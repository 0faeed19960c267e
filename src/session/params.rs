//! Shared initialization for a session and its extra caches.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Span;

/// Parameters every calculation in a session may read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitParams {
    /// Physical size of one voxel along x, y and z.
    pub resolution: Option<[f64; 3]>,
    /// Named numeric constants.
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

impl InitParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolution(mut self, resolution: [f64; 3]) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

/// Initialization state carried by an initialized session. Extra caches get a
/// clone, so the parameters are shared rather than copied.
#[derive(Debug, Clone)]
pub(crate) struct SessionInit {
    pub(crate) params: Arc<InitParams>,
    pub(crate) span: Span,
}
