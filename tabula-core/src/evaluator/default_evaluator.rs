//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{
    record::{Record, RecordValue},
    util::run_episode,
    Env, Policy,
};
use anyhow::Result;

/// Runs a fixed number of episodes in its own environment.
///
/// The resulting record holds the mean return (`"episode_return"`) and the
/// fraction of episodes with a positive return (`"success_rate"`). Episodes
/// are cut after `max_steps` steps, so a policy cycling between states cannot
/// stall the evaluation.
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::<LineWorld>::new(&LineWorldConfig::default(), 0, 100)?;
/// let record = evaluator.evaluate(&mut agent)?;
/// println!("Success rate: {}", record.get_scalar("success_rate")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    max_steps: usize,
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<Record> {
        if self.n_episodes == 0 {
            return Ok(Record::empty());
        }

        let mut r_total = 0.0;
        let mut n_success = 0;
        for _ in 0..self.n_episodes {
            let summary = run_episode(&mut self.env, policy, self.max_steps)?;
            r_total += summary.episode_return;
            if summary.episode_return > 0.0 {
                n_success += 1;
            }
        }

        let n = self.n_episodes as f64;
        Ok(Record::from_slice(&[
            ("episode_return", RecordValue::Scalar((r_total / n) as f32)),
            ("success_rate", RecordValue::Scalar((n_success as f64 / n) as f32)),
        ]))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - configuration of the environment.
    /// * `seed` - random seed for the environment.
    /// * `n_episodes` - number of episodes per evaluation.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            max_steps: 1000,
            env: E::build(config, seed)?,
        })
    }

    /// Sets the step limit of an episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyAgent, DummyConfig, DummyEnv};
    use crate::Agent;

    #[test]
    fn test_evaluate() -> Result<()> {
        let config = DummyConfig::default().length(5);
        let mut evaluator = DefaultEvaluator::<DummyEnv>::new(&config, 0, 4)?.max_steps(20);
        let mut agent = DummyAgent::new(DummyEnv::build(&config, 0)?);

        // The untrained agent stays put and never succeeds.
        let record = evaluator.evaluate(&mut agent)?;
        assert_eq!(record.get_scalar("success_rate")?, 0.0);

        agent.train(1)?;
        let record = evaluator.evaluate(&mut agent)?;
        assert_eq!(record.get_scalar("episode_return")?, 1.0);
        assert_eq!(record.get_scalar("success_rate")?, 1.0);
        Ok(())
    }
}
