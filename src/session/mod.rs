//! Sessions: per-input memo scopes with nested extra caches.

mod feature_session;
mod params;
mod resolve;

pub use feature_session::Session;
pub use params::InitParams;
