//! Calculation descriptors, their session-bound memo slots, and the error types
//! shared by the rest of the crate.

mod binding;
mod descriptor;
mod error;

pub use binding::{BindingId, MapBindingId, ResolvedBinding, ResolvedMapBinding};
pub use descriptor::{Calculation, CalculationMap, NoCalculationMap};
pub use error::{BoxError, CacheError, CalcError, InitError};
