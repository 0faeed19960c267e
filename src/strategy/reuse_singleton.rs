//! Keep one session and recycle it for every input.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::{AlwaysNew, ReplaceStrategy, SharedSession};
use crate::calc::{CacheError, Calculation, CalculationMap, NoCalculationMap};
use crate::session::InitParams;

/// Holds at most one session. Each new input invalidates it and reseeds it,
/// keeping its bindings and extra caches allocated.
///
/// Callers must release the session's lock before asking for the next input;
/// a request made while it is still held fails with `CacheError::SessionBusy`
/// and leaves the session untouched. Results from an earlier input never
/// survive.
pub struct ReuseSingleton<
    C: Calculation,
    M: CalculationMap<Input = C::Input> = NoCalculationMap<<C as Calculation>::Input>,
> {
    factory: AlwaysNew<C, M>,
    current: Mutex<Option<SharedSession<C, M>>>,
}

impl<C, M> ReuseSingleton<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    pub fn new(params: InitParams) -> Self {
        Self {
            factory: AlwaysNew::with_label(params, "reuse_singleton"),
            current: Mutex::new(None),
        }
    }

    /// Drop the held session. The next input allocates a new one.
    pub fn discard(&self) -> Option<SharedSession<C, M>> {
        self.current.lock().take()
    }

    pub fn is_allocated(&self) -> bool {
        self.current.lock().is_some()
    }
}

impl<C, M> ReplaceStrategy<C, M> for ReuseSingleton<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    fn create_or_reuse(
        &self,
        input: impl Into<Option<C::Input>>,
    ) -> Result<SharedSession<C, M>, CacheError> {
        let input = input.into().ok_or(CacheError::InvalidInput)?;
        let mut current = self.current.lock();

        if let Some(session) = current.as_ref() {
            let mut guard = session.try_lock().ok_or(CacheError::SessionBusy)?;
            guard.invalidate();
            guard.seed(input)?;
            drop(guard);
            return Ok(Arc::clone(session));
        }

        debug!("allocating singleton session");
        let session = Arc::new(Mutex::new(self.factory.allocate(input)?));
        *current = Some(Arc::clone(&session));
        Ok(session)
    }
}

impl<C, M> fmt::Debug for ReuseSingleton<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReuseSingleton")
            .field("factory", &self.factory)
            .field("allocated", &self.current.lock().is_some())
            .finish()
    }
}
