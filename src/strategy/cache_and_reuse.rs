//! Keep one session per distinct input, bounded by an LRU cache.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::{AlwaysNew, ReplaceStrategy, SessionFactory, SharedSession};
use crate::calc::{CacheError, Calculation, CalculationMap, NoCalculationMap};
use crate::memory::{CacheStats, LruCache, DEFAULT_CAPACITY};
use crate::session::InitParams;

/// Returns the same session for structurally equal inputs, up to `capacity`
/// distinct inputs. A hit is returned untouched: the input is unchanged, so
/// its cached results are still valid. An evicted input that comes back gets
/// a brand-new session from the factory `F`.
///
/// A factory failure is reported as `CacheError::Retrieval` and nothing is
/// inserted or evicted.
///
/// The LRU lock is held only for lookup and insertion. Sessions are built
/// outside it; if two threads race on the same new input, the first insert
/// wins and both get that session.
pub struct CacheAndReuse<
    C: Calculation,
    M: CalculationMap<Input = C::Input> = NoCalculationMap<<C as Calculation>::Input>,
    F = AlwaysNew<C, M>,
> {
    factory: F,
    cache: Mutex<LruCache<C::Input, SharedSession<C, M>>>,
}

impl<C, M> CacheAndReuse<C, M>
where
    C: Calculation,
    C::Input: Eq + Hash + Clone + fmt::Debug,
    M: CalculationMap<Input = C::Input>,
{
    pub fn new(params: InitParams) -> Self {
        Self::with_capacity(params, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(params: InitParams, capacity: usize) -> Self {
        Self::with_factory(capacity, AlwaysNew::with_label(params, "cache_and_reuse"))
    }
}

impl<C, M, F> CacheAndReuse<C, M, F>
where
    C: Calculation,
    C::Input: Eq + Hash + Clone + fmt::Debug,
    M: CalculationMap<Input = C::Input>,
    F: SessionFactory<C, M>,
{
    /// Build sessions for unseen inputs with `factory`.
    pub fn with_factory(capacity: usize, factory: F) -> Self {
        Self { factory, cache: Mutex::new(LruCache::new(capacity)) }
    }

    /// Discard the session held for `input`, if any.
    pub fn evict(&self, input: &C::Input) -> bool {
        self.cache.lock().remove(input).is_some()
    }

    pub fn contains(&self, input: &C::Input) -> bool {
        self.cache.lock().contains(input)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }
}

impl<C, M, F> ReplaceStrategy<C, M> for CacheAndReuse<C, M, F>
where
    C: Calculation,
    C::Input: Eq + Hash + Clone + fmt::Debug,
    M: CalculationMap<Input = C::Input>,
    F: SessionFactory<C, M>,
{
    fn create_or_reuse(
        &self,
        input: impl Into<Option<C::Input>>,
    ) -> Result<SharedSession<C, M>, CacheError> {
        let input = input.into().ok_or(CacheError::InvalidInput)?;

        let cached = self.cache.lock().get(&input).cloned();
        if let Some(session) = cached {
            return Ok(session);
        }

        debug!(?input, "session cache miss");
        let session = self
            .factory
            .build(&input)
            .map_err(|e| CacheError::Retrieval {
                key: format!("{:?}", input),
                source: Box::new(e),
            })?;
        let session = Arc::new(Mutex::new(session));
        Ok(self.cache.lock().insert_if_absent(input, session))
    }
}

impl<C, M, F> fmt::Debug for CacheAndReuse<C, M, F>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheAndReuse")
            .field("factory", &std::any::type_name::<F>())
            .field("cache", &*self.cache.lock())
            .finish()
    }
}
