//! Off-policy Monte Carlo control with weighted importance sampling.
use super::{generate_episode, Episode, McConfig};
use crate::util::{act_or_random, complete_policy};
use anyhow::Result;
use log::trace;
use rand::{rngs::SmallRng, SeedableRng};
use tabula_core::{Agent, Configurable, Env, EpsilonGreedy, Policy, PolicyTable, QTable, Trained};

/// Off-policy Monte Carlo control.
///
/// Episodes are generated by an epsilon-greedy behaviour policy while the
/// greedy target policy is learned with weighted importance sampling. The
/// backward pass over an episode stops at the first action the target policy
/// would not take.
pub struct OffPolicyMc<E: Env> {
    config: McConfig,
    env: E,
    explorer: EpsilonGreedy,
    q: QTable<E::State, E::Act>,
    c: QTable<E::State, E::Act>,
    policy: PolicyTable<E::State, E::Act>,
    rng: SmallRng,
}

impl<E: Env> OffPolicyMc<E> {
    /// Learns from the episode, returns the importance weight reached when the pass stopped.
    fn update(&mut self, episode: &Episode<E>) -> f64 {
        let mut g = 0.0;
        let mut w = 1.0;

        for (s, a, r) in episode.iter().rev() {
            g = self.config.discount_factor * g + r;

            let c = self.c.entry(s, a);
            *c += w;
            let ratio = w / *c;
            let q = self.q.entry(s, a);
            *q += ratio * (g - *q);

            let target = match self.q.greedy(s) {
                Some(target) => target,
                None => break,
            };
            self.policy.insert(s.clone(), target.clone());
            if *a != target {
                break;
            }

            let n_actions = self.env.actions(s).len();
            let b = self.explorer.action_probability(true, n_actions);
            if b <= 0.0 {
                break;
            }
            w /= b;
        }
        w
    }
}

impl<E: Env> Configurable<E> for OffPolicyMc<E> {
    type Config = McConfig;

    fn build(config: Self::Config, env: E) -> Self {
        Self {
            explorer: EpsilonGreedy::new(config.epsilon),
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            env,
            q: QTable::default(),
            c: QTable::default(),
            policy: PolicyTable::default(),
        }
    }
}

impl<E: Env> Policy<E> for OffPolicyMc<E> {
    fn act(&mut self, state: &E::State) -> Result<E::Act> {
        act_or_random(&self.policy, &self.env, state, &mut self.rng)
    }
}

impl<E: Env> Agent<E> for OffPolicyMc<E> {
    type Table = QTable<E::State, E::Act>;

    fn train(&mut self, episodes: usize) -> Result<Trained<E::State, E::Act, Self::Table>> {
        for i in 0..episodes {
            let episode = generate_episode(
                &mut self.env,
                &mut self.q,
                &self.explorer,
                &mut self.rng,
                self.config.max_episode_len,
            )?;
            let w = self.update(&episode);
            trace!("Episode {}: {} steps, weight = {}", i, episode.len(), w);
        }

        complete_policy(&mut self.policy, &self.env);
        Ok(Trained::new(self.policy.clone(), self.q.clone()))
    }

    fn policy(&self) -> &PolicyTable<E::State, E::Act> {
        &self.policy
    }

    fn table(&self) -> &Self::Table {
        &self.q
    }

    fn env(&self) -> &E {
        &self.env
    }

    fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&(
            &self.config,
            &self.q,
            &self.c,
            &self.policy,
        ))?)
    }

    fn restore(&mut self, blob: &[u8]) -> Result<()> {
        let (config, q, c, policy): (McConfig, _, _, _) = bincode::deserialize(blob)?;
        self.explorer = EpsilonGreedy::new(config.epsilon);
        self.rng = SmallRng::seed_from_u64(config.seed);
        self.config = config;
        self.q = q;
        self.c = c;
        self.policy = policy;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::dummy::{DummyConfig, DummyEnv};

    #[test]
    fn test_weights_stay_finite() -> Result<()> {
        let env = DummyEnv::build(&DummyConfig::default().length(4), 0)?;
        let config = McConfig::default().epsilon(0.2).max_episode_len(50);
        let mut agent = OffPolicyMc::build(config, env);

        for _ in 0..200 {
            let episode = generate_episode(
                &mut agent.env,
                &mut agent.q,
                &agent.explorer,
                &mut agent.rng,
                agent.config.max_episode_len,
            )?;
            let w = agent.update(&episode);
            assert!(w.is_finite() && w > 0.0, "{}", w);
        }
        for row in agent.c.states().filter_map(|s| agent.c.row(s)) {
            assert!(row.values().all(|c| c.is_finite() && *c > 0.0));
        }
        assert_eq!(agent.policy.get(&2), Some(&1));
        Ok(())
    }

    fn agent() -> Result<OffPolicyMc<DummyEnv>> {
        let env = DummyEnv::build(&DummyConfig::default().length(4), 0)?;
        let config = McConfig::default().epsilon(0.2).discount_factor(1.0);
        Ok(OffPolicyMc::build(config, env))
    }

    #[test]
    fn test_weight_divides_by_greedy_behaviour_probability() -> Result<()> {
        let mut agent = agent()?;
        // Behaviour probability of the greedy action, (1 - 0.2) + 0.2 / 2.
        let b = 0.9;

        let w = agent.update(&vec![(1, 1, 0.0), (2, 1, 1.0)]);
        assert!((w - 1.0 / (b * b)).abs() < 1e-12, "{}", w);
        assert_eq!(agent.c.get(&2, &1), 1.0);
        assert!((agent.c.get(&1, &1) - 1.0 / b).abs() < 1e-12);
        assert_eq!(agent.q.get(&1, &1), 1.0);
        Ok(())
    }

    #[test]
    fn test_pass_stops_at_non_greedy_action() -> Result<()> {
        let mut agent = agent()?;
        agent.q.set(&1, &1, 5.0);

        // Action 0 in state 1 is not greedy, so the pair before it is never reached.
        let w = agent.update(&vec![(0, 1, 0.0), (1, 0, 0.0), (2, 1, 1.0)]);
        assert!((w - 1.0 / 0.9).abs() < 1e-12, "{}", w);
        assert!(agent.c.get(&1, &0) > 0.0);
        assert_eq!(agent.q.get(&1, &0), 1.0);
        assert_eq!(agent.policy.get(&1), Some(&1));
        assert_eq!(agent.c.get(&0, &1), 0.0);
        assert_eq!(agent.q.get(&0, &1), 0.0);
        assert!(agent.c.row(&0).is_none());
        assert_eq!(agent.policy.get(&0), None);
        Ok(())
    }
}
