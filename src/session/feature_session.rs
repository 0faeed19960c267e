//! The reuse scope for one input.
//!
//! A session moves through `Uninitialized -> Initialized(no input) ->
//! Initialized(seeded)`. `invalidate` returns it to `Initialized(no input)`
//! without dropping bindings or extra caches, so the next input reuses the same
//! shape. Extra caches are owned by value; there are no back-references.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info_span, Span};

use super::params::{InitParams, SessionInit};
use crate::calc::{
    BindingId, CacheError, Calculation, CalculationMap, InitError, MapBindingId,
    NoCalculationMap, ResolvedBinding, ResolvedMapBinding,
};
use crate::telemetry::{SessionSpan, SpanExt};

static NEXT_FAMILY: AtomicU64 = AtomicU64::new(1);

/// Memo scope for one input: bindings, keyed bindings, and named extra caches.
pub struct Session<
    C: Calculation,
    M: CalculationMap<Input = C::Input> = NoCalculationMap<<C as Calculation>::Input>,
> {
    /// Tag stamped into every id this session resolves. Shared by duplicates.
    pub(super) family: u64,
    pub(super) init: Option<SessionInit>,
    pub(super) input: Option<C::Input>,
    pub(super) bindings: Vec<ResolvedBinding<C>>,
    pub(super) index: HashMap<C, BindingId>,
    pub(super) map_bindings: Vec<ResolvedMapBinding<M>>,
    pub(super) map_index: HashMap<M, MapBindingId>,
    pub(super) children: HashMap<String, Session<C, M>>,
}

impl<C, M> Session<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    /// Create an uninitialized session.
    pub fn new() -> Self {
        Self {
            family: NEXT_FAMILY.fetch_add(1, Ordering::Relaxed),
            init: None,
            input: None,
            bindings: Vec::new(),
            index: HashMap::new(),
            map_bindings: Vec::new(),
            map_index: HashMap::new(),
            children: HashMap::new(),
        }
    }

    fn with_init(init: SessionInit) -> Self {
        let mut session = Self::new();
        session.init = Some(init);
        session
    }

    /// One-time setup. Repeating it with equal parameters is a no-op; repeating
    /// it with different parameters is rejected and leaves the session as it was.
    pub fn initialize(&mut self, params: InitParams, logger: Span) -> Result<(), InitError> {
        if let Some(existing) = &self.init {
            if *existing.params == params {
                return Ok(());
            }
            return Err(InitError::IncompatibleParams {
                existing: format!("{:?}", existing.params),
                requested: format!("{:?}", params),
            });
        }
        self.init = Some(SessionInit { params: Arc::new(params), span: logger });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.init.is_some()
    }

    pub fn params(&self) -> Option<&InitParams> {
        self.init.as_ref().map(|init| init.params.as_ref())
    }

    /// The span calculations in this session log under.
    pub fn span(&self) -> Option<&Span> {
        self.init.as_ref().map(|init| &init.span)
    }

    pub(super) fn require_init(&self) -> Result<&SessionInit, InitError> {
        self.init.as_ref().ok_or(InitError::NotInitialized)
    }

    /// Attach `input`. A session that already holds an input is invalidated
    /// first, so nothing computed for the old input survives.
    pub fn seed(&mut self, input: C::Input) -> Result<(), CacheError> {
        self.require_init()?;
        if self.input.is_some() {
            self.invalidate();
        }
        self.input = Some(input);
        Ok(())
    }

    pub fn input(&self) -> Option<&C::Input> {
        self.input.as_ref()
    }

    pub fn is_seeded(&self) -> bool {
        self.input.is_some()
    }

    /// Clear every cached result and the current input, here and in every
    /// extra cache. Bindings and extra caches stay allocated.
    pub fn invalidate(&mut self) {
        debug_assert!(self.is_initialized(), "invalidate called on an uninitialized session");
        self.input = None;
        for binding in &mut self.bindings {
            binding.clear_cached_result();
        }
        for binding in &mut self.map_bindings {
            binding.clear_cached_results();
        }
        for child in self.children.values_mut() {
            child.invalidate();
        }
    }

    /// Result of the binding for the current input, computed on first access.
    pub fn calculate(&mut self, id: BindingId) -> Result<C::Output, CacheError> {
        let init = self.require_init()?;
        let span = SessionSpan::calculation(&init.span, id.index());
        let _entered = span.enter();

        let family = self.family;
        let input = self.input.as_ref().ok_or(CacheError::NotSeeded)?;
        let binding = self
            .bindings
            .get_mut(id.index)
            .filter(|_| id.family == family)
            .ok_or(CacheError::UnknownBinding(id.index))?;
        let result = binding.get_or_compute(input).map_err(CacheError::from);
        span.record_result(&result);
        result
    }

    /// Resolve `descriptor` and calculate it in one step.
    pub fn calculate_for(&mut self, descriptor: &C) -> Result<C::Output, CacheError> {
        let id = self.resolve(descriptor)?;
        self.calculate(id)
    }

    /// Result of a keyed binding for `key` under the current input.
    pub fn calculate_map(&mut self, id: MapBindingId, key: &M::Key) -> Result<M::Output, CacheError> {
        let init = self.require_init()?;
        let span = SessionSpan::calculation(&init.span, id.index());
        let _entered = span.enter();

        let family = self.family;
        let input = self.input.as_ref().ok_or(CacheError::NotSeeded)?;
        let binding = self
            .map_bindings
            .get_mut(id.index)
            .filter(|_| id.family == family)
            .ok_or(CacheError::UnknownBinding(id.index))?;
        let result = binding.get_or_compute(input, key).map_err(CacheError::from);
        span.record_result(&result);
        result
    }

    pub fn calculate_map_for(&mut self, descriptor: &M, key: &M::Key) -> Result<M::Output, CacheError> {
        let id = self.resolve_map(descriptor)?;
        self.calculate_map(id, key)
    }

    /// The binding `id` addresses, if `id` was resolved by this session or
    /// one of its duplicates.
    pub fn binding(&self, id: BindingId) -> Option<&ResolvedBinding<C>> {
        if id.family != self.family {
            return None;
        }
        self.bindings.get(id.index)
    }

    pub fn map_binding(&self, id: MapBindingId) -> Option<&ResolvedMapBinding<M>> {
        if id.family != self.family {
            return None;
        }
        self.map_bindings.get(id.index)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn map_binding_count(&self) -> usize {
        self.map_bindings.len()
    }

    /// The child session registered under `unique_id`, created on first request.
    /// It shares this session's initialization but has its own bindings and input.
    pub fn obtain_extra_cache(&mut self, unique_id: &str) -> Result<&mut Session<C, M>, CacheError> {
        let init = self.require_init()?.clone();
        let child = self.children.entry(unique_id.to_owned()).or_insert_with(|| {
            debug!(extra_cache = unique_id, "creating extra cache");
            let span = info_span!(parent: &init.span, "extra_cache", name = %unique_id);
            Self::with_init(SessionInit { params: init.params.clone(), span })
        });
        Ok(child)
    }

    pub fn extra_cache(&self, unique_id: &str) -> Option<&Session<C, M>> {
        self.children.get(unique_id)
    }

    pub fn extra_cache_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Copy the shape of this session: initialization, descriptors and extra
    /// caches, recursively. No input and no cached result is carried over, and
    /// binding ids resolved here stay valid on the copy.
    pub fn duplicate(&self) -> Self {
        Self {
            family: self.family,
            init: self.init.clone(),
            input: None,
            bindings: self.bindings.iter().map(ResolvedBinding::duplicate).collect(),
            index: self.index.clone(),
            map_bindings: self.map_bindings.iter().map(ResolvedMapBinding::duplicate).collect(),
            map_index: self.map_index.clone(),
            children: self
                .children
                .iter()
                .map(|(name, child)| (name.clone(), child.duplicate()))
                .collect(),
        }
    }
}

impl<C, M> Default for Session<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, M> fmt::Debug for Session<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("initialized", &self.is_initialized())
            .field("seeded", &self.is_seeded())
            .field("bindings", &self.bindings)
            .field("map_bindings", &self.map_bindings)
            .field("extra_caches", &self.children)
            .finish()
    }
}
