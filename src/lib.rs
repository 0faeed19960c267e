//! Feature-calculation memoization engine.
//!
//! Features over image objects share expensive sub-calculations. This crate
//! decides, for a stream of inputs, whether a calculation was already done and
//! can be reused, how long that reuse scope lives, and how many scopes may
//! coexist before older ones are evicted.
//!
//! # Pieces
//!
//! - **Calculation**: a value-comparable descriptor of a deferred computation.
//!   Equal descriptors share one memo slot.
//! - **Session**: the memo scope for one input. Owns resolved bindings and
//!   named extra caches; can be invalidated and reseeded without reallocation.
//! - **LruCache**: bounded, least-recently-used store of sessions.
//! - **ReplaceStrategy**: `AlwaysNew`, `ReuseSingleton` or `CacheAndReuse`,
//!   deciding how a session is obtained for each input.
//!
//! ```ignore
//! let strategy = CacheAndReuse::<Feature>::with_capacity(InitParams::new(), 200);
//! let session = strategy.create_or_reuse(object)?;
//! let volume = session.lock().calculate_for(&Feature::NumVoxels)?;
//! ```

pub mod calc;
pub mod config;
pub mod memory;
pub mod session;
pub mod strategy;
pub mod telemetry;

pub use calc::{
    BindingId, BoxError, CacheError, CalcError, Calculation, CalculationMap, InitError,
    MapBindingId, NoCalculationMap, ResolvedBinding, ResolvedMapBinding,
};
pub use config::{ConfigError, EngineConfig};
pub use memory::{CacheStats, LruCache, DEFAULT_CAPACITY};
pub use session::{InitParams, Session};
pub use strategy::{
    AlwaysNew, CacheAndReuse, ReplacePolicy, ReplaceStrategy, ReuseSingleton, SessionFactory,
    SessionReplacer, SharedSession,
};
