//! Resolved bindings: a descriptor attached to one session's memo slot.

use std::collections::HashMap;
use std::fmt;

use tracing::{trace, warn};

use super::descriptor::{Calculation, CalculationMap};
use super::error::CalcError;
use crate::telemetry::{record_calc_execution, record_calc_failure};

/// Handle to a single-valued binding inside the session that resolved it.
///
/// Carries the resolving session's family, so an id handed to any other
/// session is rejected instead of addressing an unrelated slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId {
    pub(crate) family: u64,
    pub(crate) index: usize,
}

impl BindingId {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Handle to a keyed (map) binding inside the session that resolved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapBindingId {
    pub(crate) family: u64,
    pub(crate) index: usize,
}

impl MapBindingId {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A session-owned copy of a descriptor with at most one cached result.
pub struct ResolvedBinding<C: Calculation> {
    descriptor: C,
    cached: Option<C::Output>,
    executions: u64,
}

impl<C: Calculation> ResolvedBinding<C> {
    pub(crate) fn new(descriptor: C) -> Self {
        Self { descriptor, cached: None, executions: 0 }
    }

    pub fn descriptor(&self) -> &C {
        &self.descriptor
    }

    pub fn has_cached_result(&self) -> bool {
        self.cached.is_some()
    }

    pub fn clear_cached_result(&mut self) {
        self.cached = None;
    }

    /// Number of times the descriptor has actually executed in this binding.
    pub fn execution_count(&self) -> u64 {
        self.executions
    }

    /// Return the cached result, executing the descriptor on a miss.
    /// Failures are not cached; the next call retries.
    pub fn get_or_compute(&mut self, input: &C::Input) -> Result<C::Output, CalcError> {
        if let Some(value) = &self.cached {
            trace!(descriptor = ?self.descriptor, "memo hit");
            return Ok(value.clone());
        }

        self.executions += 1;
        record_calc_execution();
        match self.descriptor.execute(input) {
            Ok(value) => {
                self.cached = Some(value.clone());
                Ok(value)
            }
            Err(source) => {
                record_calc_failure();
                warn!(descriptor = ?self.descriptor, error = %source, "calculation failed");
                Err(CalcError::new(format!("{:?}", self.descriptor), source))
            }
        }
    }

    /// Same descriptor, nothing cached.
    pub(crate) fn duplicate(&self) -> Self {
        Self::new(self.descriptor.clone())
    }
}

impl<C: Calculation> fmt::Debug for ResolvedBinding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedBinding")
            .field("descriptor", &self.descriptor)
            .field("cached", &self.cached.is_some())
            .field("executions", &self.executions)
            .finish()
    }
}

/// A session-owned copy of a map descriptor with one cached result per key.
pub struct ResolvedMapBinding<M: CalculationMap> {
    descriptor: M,
    cached: HashMap<M::Key, M::Output>,
    executions: u64,
}

impl<M: CalculationMap> ResolvedMapBinding<M> {
    pub(crate) fn new(descriptor: M) -> Self {
        Self { descriptor, cached: HashMap::new(), executions: 0 }
    }

    pub fn descriptor(&self) -> &M {
        &self.descriptor
    }

    pub fn has_cached_result(&self, key: &M::Key) -> bool {
        self.cached.contains_key(key)
    }

    pub fn cached_keys(&self) -> impl Iterator<Item = &M::Key> {
        self.cached.keys()
    }

    pub fn clear_cached_results(&mut self) {
        self.cached.clear();
    }

    pub fn execution_count(&self) -> u64 {
        self.executions
    }

    pub fn get_or_compute(&mut self, input: &M::Input, key: &M::Key) -> Result<M::Output, CalcError> {
        if let Some(value) = self.cached.get(key) {
            trace!(descriptor = ?self.descriptor, ?key, "memo hit");
            return Ok(value.clone());
        }

        self.executions += 1;
        record_calc_execution();
        match self.descriptor.execute(input, key) {
            Ok(value) => {
                self.cached.insert(key.clone(), value.clone());
                Ok(value)
            }
            Err(source) => {
                record_calc_failure();
                warn!(descriptor = ?self.descriptor, ?key, error = %source, "calculation failed");
                Err(CalcError::new(format!("{:?}[{:?}]", self.descriptor, key), source))
            }
        }
    }

    pub(crate) fn duplicate(&self) -> Self {
        Self::new(self.descriptor.clone())
    }
}

impl<M: CalculationMap> fmt::Debug for ResolvedMapBinding<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedMapBinding")
            .field("descriptor", &self.descriptor)
            .field("cached_keys", &self.cached.len())
            .field("executions", &self.executions)
            .finish()
    }
}
