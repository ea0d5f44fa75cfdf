//! Policy Iteration.
use super::{argmax, is_absorbing, lookahead, placeholder_action, simulate, DpConfig};
use crate::util::act_or_random;
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use tabula_core::{
    Agent, Capability, Configurable, Env, Policy, PolicyTable, Trained, VTable,
};

/// Policy Iteration.
///
/// Alternates full policy evaluation and greedy policy improvement until no
/// action changes. There is no cap on the number of rounds, so transitions
/// observed through [`Env::force_state`] must be deterministic for the
/// evaluation to converge.
pub struct PolicyIteration<E: Env> {
    config: DpConfig,
    env: E,
    v: VTable<E::State>,
    policy: PolicyTable<E::State, E::Act>,
    rng: SmallRng,
}

impl<E: Env> PolicyIteration<E> {
    /// Sweeps `V[s] = r + gamma * V[s']` under the current policy until the
    /// largest change falls below `theta`.
    fn evaluate(&mut self, states: &[E::State]) -> Result<usize> {
        self.v = VTable::zeros(states);
        let mut n_sweeps = 0;
        loop {
            let mut delta: f64 = 0.0;
            for s in states {
                if is_absorbing(&self.env, s) {
                    continue;
                }
                let a = match self.policy.get(s) {
                    Some(a) => a.clone(),
                    None => continue,
                };
                let (next, r) = simulate(&mut self.env, s, &a)?;
                let v = r + self.config.discount_factor * self.v.get(&next);
                delta = delta.max((v - self.v.get(s)).abs());
                self.v.set(s, v);
            }
            n_sweeps += 1;
            trace!("Evaluation sweep {}: delta = {}", n_sweeps, delta);

            if delta < self.config.theta {
                return Ok(n_sweeps);
            }
        }
    }

    /// Makes the policy greedy with respect to `V`, returns `true` if no action changed.
    fn improve(&mut self, states: &[E::State]) -> Result<bool> {
        let mut stable = true;
        let mut policy = PolicyTable::default();

        for s in states {
            if is_absorbing(&self.env, s) {
                policy.insert(s.clone(), placeholder_action(&self.env, s));
                continue;
            }
            let values = lookahead(&mut self.env, &self.v, self.config.discount_factor, s)?;
            let best = argmax(&values).unwrap_or_else(|| placeholder_action(&self.env, s));
            if self.policy.get(s) != Some(&best) {
                stable = false;
            }
            policy.insert(s.clone(), best);
        }

        self.policy = policy;
        Ok(stable)
    }
}

impl<E: Env> Configurable<E> for PolicyIteration<E> {
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

impl<E: Env> Policy<E> for PolicyIteration<E> {
    fn act(&mut self, state: &E::State) -> Result<E::Act> {
        act_or_random(&self.policy, &self.env, state, &mut self.rng)
    }
}

impl<E: Env> Agent<E> for PolicyIteration<E> {
    type Table = VTable<E::State>;

    /// Runs until the policy is stable, the episode budget is not used.
    fn train(&mut self, _episodes: usize) -> Result<Trained<E::State, E::Act, Self::Table>> {
        self.env
            .capabilities()
            .require(Capability::StateForcing, "Policy Iteration")?;

        let states = self.env.states();
        self.policy = PolicyTable::default();
        for s in states.iter() {
            let a = match self.env.actions(s).choose(&mut self.rng) {
                Some(a) => a.clone(),
                None => placeholder_action(&self.env, s),
            };
            self.policy.insert(s.clone(), a);
        }

        let mut n_rounds = 0;
        loop {
            let n_sweeps = self.evaluate(&states)?;
            let stable = self.improve(&states)?;
            n_rounds += 1;
            debug!(
                "Policy iteration round {}: {} evaluation sweeps, stable = {}",
                n_rounds, n_sweeps, stable
            );
            if stable {
                break;
            }
        }

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
    fn test_chain() -> Result<()> {
        let env = DummyEnv::build(&DummyConfig::default().length(4), 0)?;
        let mut agent = PolicyIteration::build(DpConfig::default().discount_factor(0.5), env);
        let trained = agent.train(0)?;

        for s in 0..3 {
            assert_eq!(trained.policy.get(&s), Some(&1));
        }
        assert_eq!(trained.table.get(&2), 1.0);
        assert_eq!(trained.table.get(&1), 0.5);
        assert_eq!(trained.table.get(&0), 0.25);

        // The terminal state keeps its initial value and gets the first legal action.
        assert_eq!(trained.table.get(&3), 0.0);
        assert_eq!(trained.policy.get(&3), Some(&0));
        Ok(())
    }
}
