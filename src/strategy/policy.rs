//! Configurable choice of replace strategy.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::{AlwaysNew, CacheAndReuse, ReplaceStrategy, ReuseSingleton, SharedSession};
use crate::calc::{CacheError, Calculation, CalculationMap, NoCalculationMap};
use crate::memory::DEFAULT_CAPACITY;
use crate::session::InitParams;

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// Which strategy to build, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ReplacePolicy {
    AlwaysNew,
    ReuseSingleton,
    CacheAndReuse {
        #[serde(default = "default_capacity")]
        capacity: usize,
    },
}

impl Default for ReplacePolicy {
    fn default() -> Self {
        Self::CacheAndReuse { capacity: DEFAULT_CAPACITY }
    }
}

impl ReplacePolicy {
    /// Parse a policy name. `capacity` only applies to `cache_and_reuse`.
    pub fn from_name(name: &str, capacity: usize) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "always_new" => Some(Self::AlwaysNew),
            "reuse_singleton" => Some(Self::ReuseSingleton),
            "cache_and_reuse" => Some(Self::CacheAndReuse { capacity: capacity.max(1) }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AlwaysNew => "always_new",
            Self::ReuseSingleton => "reuse_singleton",
            Self::CacheAndReuse { .. } => "cache_and_reuse",
        }
    }
}

/// The strategy variants as one closed type.
pub enum SessionReplacer<
    C: Calculation,
    M: CalculationMap<Input = C::Input> = NoCalculationMap<<C as Calculation>::Input>,
> {
    AlwaysNew(AlwaysNew<C, M>),
    ReuseSingleton(ReuseSingleton<C, M>),
    CacheAndReuse(CacheAndReuse<C, M>),
}

impl<C, M> SessionReplacer<C, M>
where
    C: Calculation,
    C::Input: Eq + Hash + Clone + fmt::Debug,
    M: CalculationMap<Input = C::Input>,
{
    pub fn from_policy(policy: ReplacePolicy, params: InitParams) -> Self {
        match policy {
            ReplacePolicy::AlwaysNew => Self::AlwaysNew(AlwaysNew::new(params)),
            ReplacePolicy::ReuseSingleton => Self::ReuseSingleton(ReuseSingleton::new(params)),
            ReplacePolicy::CacheAndReuse { capacity } => {
                Self::CacheAndReuse(CacheAndReuse::with_capacity(params, capacity))
            }
        }
    }

    pub fn policy(&self) -> ReplacePolicy {
        match self {
            Self::AlwaysNew(_) => ReplacePolicy::AlwaysNew,
            Self::ReuseSingleton(_) => ReplacePolicy::ReuseSingleton,
            Self::CacheAndReuse(s) => ReplacePolicy::CacheAndReuse { capacity: s.capacity() },
        }
    }
}

impl<C, M> ReplaceStrategy<C, M> for SessionReplacer<C, M>
where
    C: Calculation,
    C::Input: Eq + Hash + Clone + fmt::Debug,
    M: CalculationMap<Input = C::Input>,
{
    fn create_or_reuse(
        &self,
        input: impl Into<Option<C::Input>>,
    ) -> Result<SharedSession<C, M>, CacheError> {
        match self {
            Self::AlwaysNew(s) => s.create_or_reuse(input),
            Self::ReuseSingleton(s) => s.create_or_reuse(input),
            Self::CacheAndReuse(s) => s.create_or_reuse(input),
        }
    }
}

impl<C, M> fmt::Debug for SessionReplacer<C, M>
where
    C: Calculation,
    M: CalculationMap<Input = C::Input>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlwaysNew(s) => fmt::Debug::fmt(s, f),
            Self::ReuseSingleton(s) => fmt::Debug::fmt(s, f),
            Self::CacheAndReuse(s) => fmt::Debug::fmt(s, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_names_round_trip() {
        for policy in [
            ReplacePolicy::AlwaysNew,
            ReplacePolicy::ReuseSingleton,
            ReplacePolicy::CacheAndReuse { capacity: 7 },
        ] {
            assert_eq!(ReplacePolicy::from_name(policy.name(), 7), Some(policy));
        }
        assert_eq!(ReplacePolicy::from_name("lru", 7), None);
    }

    #[test]
    fn test_default_policy_is_cache_and_reuse() {
        assert_eq!(
            ReplacePolicy::default(),
            ReplacePolicy::CacheAndReuse { capacity: DEFAULT_CAPACITY }
        );
    }

    #[test]
    fn test_capacity_floor() {
        assert_eq!(
            ReplacePolicy::from_name("cache_and_reuse", 0),
            Some(ReplacePolicy::CacheAndReuse { capacity: 1 })
        );
    }
}
