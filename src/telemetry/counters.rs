//! Counters recorded through the `metrics` facade.
//!
//! Without an installed recorder these are no-ops.

use metrics::counter;

pub const CACHE_HITS: &str = "feature_cache_hits_total";
pub const CACHE_MISSES: &str = "feature_cache_misses_total";
pub const CACHE_EVICTIONS: &str = "feature_cache_evictions_total";
pub const CALC_EXECUTIONS: &str = "feature_calc_executions_total";
pub const CALC_FAILURES: &str = "feature_calc_failures_total";

pub fn record_cache_hit() {
    counter!(CACHE_HITS).increment(1);
}

pub fn record_cache_miss() {
    counter!(CACHE_MISSES).increment(1);
}

pub fn record_cache_eviction() {
    counter!(CACHE_EVICTIONS).increment(1);
}

pub fn record_calc_execution() {
    counter!(CALC_EXECUTIONS).increment(1);
}

pub fn record_calc_failure() {
    counter!(CALC_FAILURES).increment(1);
}
