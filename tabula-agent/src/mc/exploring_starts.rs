//! Monte Carlo Exploring Starts.
use super::{first_visits, returns, Episode, McConfig, ReturnStats};
use crate::util::{act_or_random, complete_policy, non_terminal_states, random_action};
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use tabula_core::{
    Agent, Capability, Configurable, Env, Policy, PolicyTable, QTable, Trained,
};

/// Monte Carlo control with exploring starts.
///
/// Each episode starts from a uniformly random non-terminal state with a
/// uniformly random action and then follows the current greedy policy. The
/// value of a pair is the mean of the returns from its first occurrence in
/// every episode, and the policy of a state is made greedy as soon as one of
/// its pairs is updated.
///
/// Without [`Capability::StateForcing`], episodes start from [`Env::reset`]
/// and only the first action is random.
pub struct MonteCarloEs<E: Env> {
    config: McConfig,
    env: E,
    q: QTable<E::State, E::Act>,
    stats: ReturnStats<E::State, E::Act>,
    policy: PolicyTable<E::State, E::Act>,
    rng: SmallRng,
}

impl<E: Env> MonteCarloEs<E> {
    /// Runs an episode from `start` (or from reset when it is `None`) with a random first action.
    fn generate_episode(&mut self, start: Option<&E::State>) -> Result<Episode<E>> {
        let mut state = self.env.reset()?;
        if let Some(s) = start {
            self.env.force_state(s)?;
            state = s.clone();
        }

        let mut episode = vec![];
        let mut a = random_action(&self.env, &state, &mut self.rng)?;
        for _ in 0..self.config.max_episode_len {
            let step = self.env.step(&a)?;
            let done = step.is_done();
            episode.push((state, a, step.reward));
            state = step.state;
            if done {
                break;
            }
            a = act_or_random(&self.policy, &self.env, &state, &mut self.rng)?;
        }
        Ok(episode)
    }

    fn update(&mut self, episode: &Episode<E>) {
        let gs = returns(episode, self.config.discount_factor);
        for t in first_visits(episode) {
            let (s, a, _) = &episode[t];
            self.stats.record(&mut self.q, s, a, gs[t]);
            if let Some(best) = self.q.greedy(s) {
                self.policy.insert(s.clone(), best);
            }
        }
    }
}

impl<E: Env> Configurable<E> for MonteCarloEs<E> {
    type Config = McConfig;

    fn build(config: Self::Config, env: E) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            env,
            q: QTable::default(),
            stats: ReturnStats::default(),
            policy: PolicyTable::default(),
        }
    }
}

impl<E: Env> Policy<E> for MonteCarloEs<E> {
    fn act(&mut self, state: &E::State) -> Result<E::Act> {
        act_or_random(&self.policy, &self.env, state, &mut self.rng)
    }
}

impl<E: Env> Agent<E> for MonteCarloEs<E> {
    type Table = QTable<E::State, E::Act>;

    fn train(&mut self, episodes: usize) -> Result<Trained<E::State, E::Act, Self::Table>> {
        let forcing = self.env.capabilities().has(Capability::StateForcing);
        let starts = non_terminal_states(&self.env);
        if !forcing {
            debug!("No state forcing, episodes of exploring starts begin at reset");
        }

        // States learned before keep their action.
        for s in starts.iter() {
            if self.policy.get(s).is_none() {
                if let Some(a) = self.env.actions(s).choose(&mut self.rng) {
                    self.policy.insert(s.clone(), a.clone());
                }
            }
        }

        for i in 0..episodes {
            if starts.is_empty() {
                debug!("No non-terminal state to start from");
                break;
            }
            let start = if forcing {
                starts.choose(&mut self.rng)
            } else {
                None
            };
            let episode = self.generate_episode(start)?;
            trace!("Episode {}: {} steps", i, episode.len());
            self.update(&episode);
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
            &self.stats,
            &self.policy,
        ))?)
    }

    fn restore(&mut self, blob: &[u8]) -> Result<()> {
        let (config, q, stats, policy): (McConfig, _, _, _) = bincode::deserialize(blob)?;
        self.rng = SmallRng::seed_from_u64(config.seed);
        self.config = config;
        self.q = q;
        self.stats = stats;
        self.policy = policy;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::dummy::{DummyConfig, DummyEnv};

    #[test]
    fn test_first_visit_means() -> Result<()> {
        let env = DummyEnv::build(&DummyConfig::default().length(3), 0)?;
        let config = McConfig::default().discount_factor(1.0).max_episode_len(20);
        let mut agent = MonteCarloEs::build(config, env);
        let trained = agent.train(200)?;

        // Moving forward from state 1 always ends the episode with reward 1.
        assert_eq!(trained.table.get(&1, &1), 1.0);
        assert_eq!(trained.policy.get(&1), Some(&1));
        assert!(agent.stats.count(&1, &1) > 0);
        Ok(())
    }
}
