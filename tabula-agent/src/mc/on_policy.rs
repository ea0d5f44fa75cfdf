//! On-policy first-visit Monte Carlo control.
use super::{first_visits, generate_episode, returns, McConfig, ReturnStats};
use crate::util::{act_or_random, complete_policy};
use anyhow::Result;
use log::trace;
use rand::{rngs::SmallRng, SeedableRng};
use tabula_core::{Agent, Configurable, Env, EpsilonGreedy, Policy, PolicyTable, QTable, Trained};

/// On-policy first-visit Monte Carlo control with an epsilon-greedy policy.
///
/// After every episode the policy of each state in the action-value table is
/// reset to its greedy action.
pub struct OnPolicyMc<E: Env> {
    config: McConfig,
    env: E,
    explorer: EpsilonGreedy,
    q: QTable<E::State, E::Act>,
    stats: ReturnStats<E::State, E::Act>,
    policy: PolicyTable<E::State, E::Act>,
    rng: SmallRng,
}

impl<E: Env> Configurable<E> for OnPolicyMc<E> {
    type Config = McConfig;

    fn build(config: Self::Config, env: E) -> Self {
        Self {
            explorer: EpsilonGreedy::new(config.epsilon),
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            env,
            q: QTable::default(),
            stats: ReturnStats::default(),
            policy: PolicyTable::default(),
        }
    }
}

impl<E: Env> Policy<E> for OnPolicyMc<E> {
    fn act(&mut self, state: &E::State) -> Result<E::Act> {
        act_or_random(&self.policy, &self.env, state, &mut self.rng)
    }
}

impl<E: Env> Agent<E> for OnPolicyMc<E> {
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
            trace!("Episode {}: {} steps", i, episode.len());

            let gs = returns(&episode, self.config.discount_factor);
            for t in first_visits(&episode) {
                let (s, a, _) = &episode[t];
                self.stats.record(&mut self.q, s, a, gs[t]);
            }
            self.policy = self.q.greedy_policy();
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
        self.explorer = EpsilonGreedy::new(config.epsilon);
        self.rng = SmallRng::seed_from_u64(config.seed);
        self.config = config;
        self.q = q;
        self.stats = stats;
        self.policy = policy;
        Ok(())
    }
}
