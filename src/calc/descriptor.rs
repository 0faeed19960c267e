//! Calculation descriptors.
//!
//! A descriptor is a plain value: its variant (the kind of computation) plus
//! its parameters. Two descriptors that compare equal are interchangeable and
//! share one memo slot in a session. Descriptor families are closed enums that
//! derive `Eq` and `Hash`, so equality is structural and never looks at cached
//! state.

use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use super::error::BoxError;

/// A deferred, cacheable computation over one input.
pub trait Calculation: Clone + Eq + Hash + fmt::Debug {
    type Input;
    type Output: Clone;

    /// Compute the result for `input`. Must not depend on anything but the
    /// descriptor's own parameters and the input.
    fn execute(&self, input: &Self::Input) -> Result<Self::Output, BoxError>;
}

/// A computation parameterized by an additional runtime key, yielding one
/// result per key.
pub trait CalculationMap: Clone + Eq + Hash + fmt::Debug {
    type Input;
    type Key: Clone + Eq + Hash + fmt::Debug;
    type Output: Clone;

    fn execute(&self, input: &Self::Input, key: &Self::Key) -> Result<Self::Output, BoxError>;
}

/// Placeholder map family for sessions that only hold single-valued calculations.
/// It has no values, so no map binding can ever be created for it.
pub struct NoCalculationMap<I>(Infallible, PhantomData<fn() -> I>);

impl<I> Clone for NoCalculationMap<I> {
    fn clone(&self) -> Self {
        match self.0 {}
    }
}

impl<I> PartialEq for NoCalculationMap<I> {
    fn eq(&self, _other: &Self) -> bool {
        match self.0 {}
    }
}

impl<I> Eq for NoCalculationMap<I> {}

impl<I> Hash for NoCalculationMap<I> {
    fn hash<H: Hasher>(&self, _state: &mut H) {
        match self.0 {}
    }
}

impl<I> fmt::Debug for NoCalculationMap<I> {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {}
    }
}

impl<I> CalculationMap for NoCalculationMap<I> {
    type Input = I;
    type Key = ();
    type Output = ();

    fn execute(&self, _input: &I, _key: &()) -> Result<(), BoxError> {
        match self.0 {}
    }
}
