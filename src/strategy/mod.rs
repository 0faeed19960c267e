//! Replace strategies: how a session is obtained for each new input.
//!
//! - `AlwaysNew` allocates a fresh session every time.
//! - `ReuseSingleton` recycles one session, invalidating it between inputs.
//! - `CacheAndReuse` keeps one session per distinct input in an LRU cache.
//!
//! Sessions are handed out as `SharedSession`, so identity can be checked
//! with `Arc::ptr_eq` and a `CacheAndReuse` instance can be shared by workers.

mod always_new;
mod cache_and_reuse;
mod policy;
mod reuse_singleton;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::calc::{CacheError, Calculation, CalculationMap, NoCalculationMap};
use crate::session::Session;

pub use always_new::AlwaysNew;
pub use cache_and_reuse::CacheAndReuse;
pub use policy::{ReplacePolicy, SessionReplacer};
pub use reuse_singleton::ReuseSingleton;

/// A session handed out by a strategy.
pub type SharedSession<C, M = NoCalculationMap<<C as Calculation>::Input>> =
    Arc<Mutex<Session<C, M>>>;

/// Policy deciding whether and how a session is reused across inputs.
pub trait ReplaceStrategy<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    /// Return a session seeded with `input`, ready for calculations.
    /// An absent input fails with `CacheError::InvalidInput` and changes nothing.
    fn create_or_reuse(
        &self,
        input: impl Into<Option<C::Input>>,
    ) -> Result<SharedSession<C, M>, CacheError>;
}

/// Builds the session for an input that `CacheAndReuse` has not seen.
///
/// `AlwaysNew` is the default. Any `Fn(&Input) -> Result<Session, CacheError>`
/// closure also works, e.g. to preload extra caches or to reject inputs.
pub trait SessionFactory<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    fn build(&self, input: &C::Input) -> Result<Session<C, M>, CacheError>;
}

impl<C, M, F> SessionFactory<C, M> for F
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
    F: Fn(&C::Input) -> Result<Session<C, M>, CacheError>,
{
    fn build(&self, input: &C::Input) -> Result<Session<C, M>, CacheError> {
        self(input)
    }
}
