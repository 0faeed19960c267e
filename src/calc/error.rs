//! Error types for the feature-calculation cache.
//!
//! Precondition violations (`Init`, `InvalidInput`, `NotSeeded`, `UnknownBinding`,
//! `SessionBusy`)
//! are rejected before any state is touched. Calculation and retrieval failures
//! propagate unchanged in kind, carrying the descriptor or key that caused them.

use thiserror::Error;

/// Boxed cause of a failed calculation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Session used before initialization, or re-initialized with different parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InitError {
    #[error("Session used before initialization")]
    NotInitialized,

    #[error("Session already initialized with {existing}, cannot re-initialize with {requested}")]
    IncompatibleParams { existing: String, requested: String },
}

/// A calculation failed while executing against an input.
#[derive(Debug, Error)]
#[error("Calculation {descriptor} failed: {source}")]
pub struct CalcError {
    descriptor: String,
    #[source]
    source: BoxError,
}

impl CalcError {
    pub fn new(descriptor: impl Into<String>, source: BoxError) -> Self {
        Self { descriptor: descriptor.into(), source }
    }

    /// Debug rendering of the descriptor that failed.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

/// Errors surfaced by sessions and replace strategies.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Calculation(#[from] CalcError),

    #[error("Failed to build session for key {key}: {source}")]
    Retrieval {
        key: String,
        #[source]
        source: Box<CacheError>,
    },

    #[error("Input is absent")]
    InvalidInput,

    #[error("Session has no input seeded")]
    NotSeeded,

    #[error("Binding {0} does not belong to this session")]
    UnknownBinding(usize),

    #[error("Session is still locked by a previous caller")]
    SessionBusy,
}

impl CacheError {
    /// Returns true for errors that reject a call before it mutates anything.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Init(_)
                | Self::InvalidInput
                | Self::NotSeeded
                | Self::UnknownBinding(_)
                | Self::SessionBusy
        )
    }

    /// The descriptor that originated a calculation failure, looking through
    /// retrieval wrappers.
    pub fn descriptor(&self) -> Option<&str> {
        match self {
            Self::Calculation(e) => Some(e.descriptor()),
            Self::Retrieval { source, .. } => source.descriptor(),
            _ => None,
        }
    }
}
