//! Telemetry for the feature cache.
//!
//! Structured logging and spans through `tracing`, counters through the
//! `metrics` facade.

mod counters;
mod logging;
mod spans;

pub use counters::{
    record_cache_eviction, record_cache_hit, record_cache_miss, record_calc_execution,
    record_calc_failure, CACHE_EVICTIONS, CACHE_HITS, CACHE_MISSES, CALC_EXECUTIONS,
    CALC_FAILURES,
};
pub use logging::{build_filter, init_logging, LogConfig, LogError, LogFormat};
pub use spans::{SessionSpan, SpanExt};
