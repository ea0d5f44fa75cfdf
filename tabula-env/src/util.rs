//! Helpers shared by the environments.
use anyhow::{bail, Result};
use rand::{rngs::SmallRng, SeedableRng};
use std::fmt::Debug;
use tabula_core::error::TabulaError;

/// Random number generator of an environment built with `seed`.
pub(crate) fn seeded_rng(seed: i64) -> SmallRng {
    SmallRng::seed_from_u64(seed as u64)
}

/// Fails with [`TabulaError::InvalidAction`] unless `a` is one of `legal`.
pub(crate) fn check_action<A, S>(legal: &[A], a: &A, state: S) -> Result<()>
where
    A: PartialEq + Debug,
    S: Debug,
{
    if legal.contains(a) {
        Ok(())
    } else {
        Err(TabulaError::InvalidAction(format!(
            "{:?} in state {:?}, legal actions are {:?}",
            a, state, legal
        ))
        .into())
    }
}

/// Fails unless `state < n_states`.
pub(crate) fn check_state(state: usize, n_states: usize) -> Result<()> {
    if state >= n_states {
        bail!("State {} is out of range 0..{}", state, n_states);
    }
    Ok(())
}
