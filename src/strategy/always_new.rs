//! Allocate a fresh session for every input.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::{ReplaceStrategy, SessionFactory, SharedSession};
use crate::calc::{CacheError, Calculation, CalculationMap, NoCalculationMap};
use crate::session::{InitParams, Session};
use crate::telemetry::SessionSpan;

/// Never reuses anything. Also serves as the session factory for the other
/// strategies.
pub struct AlwaysNew<
    C: Calculation,
    M: CalculationMap<Input = C::Input> = NoCalculationMap<<C as Calculation>::Input>,
> {
    params: InitParams,
    label: String,
    _marker: PhantomData<fn() -> (C, M)>,
}

impl<C, M> AlwaysNew<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    pub fn new(params: InitParams) -> Self {
        Self::with_label(params, "always_new")
    }

    /// `label` is attached to the span of every session this factory builds.
    pub fn with_label(params: InitParams, label: impl Into<String>) -> Self {
        Self { params, label: label.into(), _marker: PhantomData }
    }

    pub fn params(&self) -> &InitParams {
        &self.params
    }

    /// Build an initialized session seeded with `input`.
    pub fn allocate(&self, input: C::Input) -> Result<Session<C, M>, CacheError> {
        debug!(label = %self.label, "allocating session");
        let mut session = Session::new();
        session.initialize(self.params.clone(), SessionSpan::new(&self.label))?;
        session.seed(input)?;
        Ok(session)
    }
}

impl<C, M> ReplaceStrategy<C, M> for AlwaysNew<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    fn create_or_reuse(
        &self,
        input: impl Into<Option<C::Input>>,
    ) -> Result<SharedSession<C, M>, CacheError> {
        let input = input.into().ok_or(CacheError::InvalidInput)?;
        Ok(Arc::new(Mutex::new(self.allocate(input)?)))
    }
}

impl<C, M> SessionFactory<C, M> for AlwaysNew<C, M>
where
    C: Calculation,
    C::Input: Clone,
    M: CalculationMap<Input = C::Input>,
{
    fn build(&self, input: &C::Input) -> Result<Session<C, M>, CacheError> {
        self.allocate(input.clone())
    }
}

impl<C, M> fmt::Debug for AlwaysNew<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlwaysNew")
            .field("params", &self.params)
            .field("label", &self.label)
            .finish()
    }
}
