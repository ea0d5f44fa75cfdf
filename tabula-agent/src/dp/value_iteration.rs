//! Value Iteration.
use super::{argmax, is_absorbing, lookahead, placeholder_action, DpConfig};
use crate::util::act_or_random;
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::SmallRng, SeedableRng};
use tabula_core::{
    Agent, Capability, Configurable, Env, Policy, PolicyTable, Trained, VTable,
};

/// Value Iteration.
///
/// Sweeps `V[s] = max_a (r + gamma * V[s'])` until the largest change falls
/// below `theta` or the sweep budget is spent, then extracts the greedy policy.
/// Running out of sweeps is not an error, the values of the last sweep are used.
pub struct ValueIteration<E: Env> {
    config: DpConfig,
    env: E,
    v: VTable<E::State>,
    policy: PolicyTable<E::State, E::Act>,
    rng: SmallRng,
}

impl<E: Env> ValueIteration<E> {
    fn sweep(&mut self, states: &[E::State]) -> Result<f64> {
        let mut delta: f64 = 0.0;
        for s in states {
            if is_absorbing(&self.env, s) {
                continue;
            }
            let values = lookahead(&mut self.env, &self.v, self.config.discount_factor, s)?;
            let v = values.iter().map(|(_, q)| *q).fold(f64::NEG_INFINITY, f64::max);
            delta = delta.max((v - self.v.get(s)).abs());
            self.v.set(s, v);
        }
        Ok(delta)
    }

    fn extract_policy(&mut self, states: &[E::State]) -> Result<()> {
        self.policy = PolicyTable::default();
        for s in states {
            let a = if is_absorbing(&self.env, s) {
                placeholder_action(&self.env, s)
            } else {
                let values = lookahead(&mut self.env, &self.v, self.config.discount_factor, s)?;
                argmax(&values).unwrap_or_else(|| placeholder_action(&self.env, s))
            };
            self.policy.insert(s.clone(), a);
        }
        Ok(())
    }
}

impl<E: Env> Configurable<E> for ValueIteration<E> {
    type Config = DpConfig;

    fn build(config: Self::Config, env: E) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            env,
            v: VTable::default(),
            policy: PolicyTable::default(),
        }
    }
}

impl<E: Env> Policy<E> for ValueIteration<E> {
    fn act(&mut self, state: &E::State) -> Result<E::Act> {
        act_or_random(&self.policy, &self.env, state, &mut self.rng)
    }
}

impl<E: Env> Agent<E> for ValueIteration<E> {
    type Table = VTable<E::State>;

    /// Runs at most `episodes` sweeps.
    fn train(&mut self, episodes: usize) -> Result<Trained<E::State, E::Act, Self::Table>> {
        self.env
            .capabilities()
            .require(Capability::StateForcing, "Value Iteration")?;

        let states = self.env.states();
        self.v = VTable::zeros(&states);

        let mut converged = false;
        for i in 0..episodes {
            let delta = self.sweep(&states)?;
            trace!("Sweep {}: delta = {}", i + 1, delta);
            if delta < self.config.theta {
                debug!("Value iteration converged after {} sweeps", i + 1);
                converged = true;
                break;
            }
        }
        if !converged {
            debug!("Value iteration stopped after {} sweeps", episodes);
        }

        self.extract_policy(&states)?;
        Ok(Trained::new(self.policy.clone(), self.v.clone()))
    }

    fn policy(&self) -> &PolicyTable<E::State, E::Act> {
        &self.policy
    }

    fn table(&self) -> &Self::Table {
        &self.v
    }

    fn env(&self) -> &E {
        &self.env
    }

    fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&(&self.config, &self.v, &self.policy))?)
    }

    fn restore(&mut self, blob: &[u8]) -> Result<()> {
        let (config, v, policy): (DpConfig, _, _) = bincode::deserialize(blob)?;
        self.rng = SmallRng::seed_from_u64(config.seed);
        self.config = config;
        self.v = v;
        self.policy = policy;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::dummy::{DummyConfig, DummyEnv};

    #[test]
    fn test_sweep_budget() -> Result<()> {
        let env = DummyEnv::build(&DummyConfig::default().length(4), 0)?;
        let mut agent = ValueIteration::build(DpConfig::default().discount_factor(0.5), env);

        // A single in-place sweep in state order only reaches the last transition.
        let trained = agent.train(1)?;
        assert_eq!(trained.table.get(&2), 1.0);
        assert_eq!(trained.table.get(&0), 0.0);

        let trained = agent.train(100)?;
        assert_eq!(trained.table.get(&0), 0.25);
        assert_eq!(trained.policy.get(&0), Some(&1));
        assert_eq!(trained.policy.get(&3), Some(&0));
        Ok(())
    }
}
