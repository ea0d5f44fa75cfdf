//! Utilities for interaction of agents and environments.
use crate::{
    record::{NullRecorder, Record, RecordValue, Recorder},
    Discrete, Env, Policy, PolicyTable,
};
use anyhow::Result;

/// Summary of a single episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// Sum of rewards.
    pub episode_return: f64,

    /// Number of steps taken.
    pub steps: usize,

    /// `false` if the episode was cut at the step limit.
    pub terminated: bool,
}

/// Runs an episode with the policy, at most `max_steps` steps.
pub fn run_episode<E, P>(env: &mut E, policy: &mut P, max_steps: usize) -> Result<EpisodeSummary>
where
    E: Env,
    P: Policy<E>,
{
    eval_with_recorder(env, policy, max_steps, &mut NullRecorder::default())
}

/// Runs an episode with the policy and writes a record at every step.
///
/// Each record holds the step index, the state before the step, the action,
/// the reward and the rendering of the environment after the step.
pub fn eval_with_recorder<E, P, R>(
    env: &mut E,
    policy: &mut P,
    max_steps: usize,
    recorder: &mut R,
) -> Result<EpisodeSummary>
where
    E: Env,
    P: Policy<E>,
    R: Recorder + ?Sized,
{
    let mut state = env.reset()?;
    let mut summary = EpisodeSummary {
        episode_return: 0.0,
        steps: 0,
        terminated: false,
    };

    while summary.steps < max_steps {
        let act = policy.act(&state)?;
        let step = env.step(&act)?;
        summary.episode_return += step.reward;
        summary.steps += 1;

        let mut record = Record::from_scalar("step", summary.steps as f32);
        record.insert("state", RecordValue::String(format!("{:?}", state)));
        record.insert("act", RecordValue::String(format!("{:?}", act)));
        record.insert("reward", RecordValue::Scalar(step.reward as f32));
        record.insert("render", RecordValue::String(env.render()));
        recorder.write(record);

        if step.is_done() {
            summary.terminated = true;
            break;
        }
        state = step.state;
    }

    Ok(summary)
}

/// A fixed policy, typically loaded from a trained artifact.
///
/// States without an entry take `E::Act::default()`.
pub struct TablePolicy<E: Env> {
    policy: PolicyTable<E::State, E::Act>,
}

impl<E: Env> TablePolicy<E> {
    /// Wraps the policy table.
    pub fn new(policy: PolicyTable<E::State, E::Act>) -> Self {
        Self { policy }
    }
}

impl<E: Env> Policy<E> for TablePolicy<E> {
    fn act(&mut self, state: &E::State) -> Result<E::Act> {
        Ok(self.policy.get(state).cloned().unwrap_or_default())
    }
}

/// Number of states on which two policies choose different actions.
pub fn policy_disagreements<S: Discrete, A: Discrete>(
    p1: &PolicyTable<S, A>,
    p2: &PolicyTable<S, A>,
) -> usize {
    p1.iter().filter(|(s, a)| p2.get(s) != Some(*a)).count()
}
