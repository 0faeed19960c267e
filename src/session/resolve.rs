//! Search/resolve: map a descriptor to the session's memo slot for it.
//!
//! Lookup is by structural hash and equality of the descriptor. A descriptor
//! equal to one already resolved gets the existing binding back, so unrelated
//! features asking for the same computation share one execution. On a miss the
//! session stores its own clone; the caller's instance is never retained.

use tracing::debug;

use super::feature_session::Session;
use crate::calc::{
    BindingId, CacheError, Calculation, CalculationMap, MapBindingId, ResolvedBinding,
    ResolvedMapBinding,
};

impl<C, M> Session<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    /// Find or create the binding for `descriptor`.
    pub fn resolve(&mut self, descriptor: &C) -> Result<BindingId, CacheError> {
        self.require_init()?;
        if let Some(id) = self.index.get(descriptor) {
            return Ok(*id);
        }

        let id = BindingId { family: self.family, index: self.bindings.len() };
        debug!(?descriptor, binding = id.index(), "new binding");
        self.bindings.push(ResolvedBinding::new(descriptor.clone()));
        self.index.insert(descriptor.clone(), id);
        Ok(id)
    }

    /// Find or create the keyed binding for `descriptor`.
    pub fn resolve_map(&mut self, descriptor: &M) -> Result<MapBindingId, CacheError> {
        self.require_init()?;
        if let Some(id) = self.map_index.get(descriptor) {
            return Ok(*id);
        }

        let id = MapBindingId { family: self.family, index: self.map_bindings.len() };
        debug!(?descriptor, binding = id.index(), "new map binding");
        self.map_bindings.push(ResolvedMapBinding::new(descriptor.clone()));
        self.map_index.insert(descriptor.clone(), id);
        Ok(id)
    }

    /// Look up an existing binding without creating one.
    pub fn find(&self, descriptor: &C) -> Option<BindingId> {
        self.index.get(descriptor).copied()
    }

    pub fn find_map(&self, descriptor: &M) -> Option<MapBindingId> {
        self.map_index.get(descriptor).copied()
    }
}
