//! This module is used for tests.
use crate::{
    error::TabulaError, Agent, Capabilities, Env, Policy, PolicyTable, Step, Trained, VTable,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration of [`DummyEnv`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DummyConfig {
    length: usize,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self { length: 3 }
    }
}

impl DummyConfig {
    /// Sets the number of states.
    pub fn length(mut self, v: usize) -> Self {
        self.length = v;
        self
    }
}

/// Dummy env, a chain of states starting at `0`.
///
/// Action `1` moves forward, action `0` stays. Reaching the last state
/// terminates the episode with reward `1.0`.
pub struct DummyEnv {
    length: usize,
    state: usize,
}

impl Env for DummyEnv {
    type Config = DummyConfig;
    type State = usize;
    type Act = usize;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            length: config.length,
            state: 0,
        })
    }

    fn reset(&mut self) -> Result<usize> {
        self.state = 0;
        Ok(self.state)
    }

    fn step(&mut self, a: &usize) -> Result<Step<Self>> {
        if self.is_terminal(&self.state) {
            return Ok(Step::new(self.state, *a, 0.0, true, ()));
        }
        match a {
            0 => {}
            1 => self.state += 1,
            _ => return Err(TabulaError::InvalidAction(format!("{}", a)).into()),
        }
        let done = self.is_terminal(&self.state);
        let reward = if done { 1.0 } else { 0.0 };
        Ok(Step::new(self.state, *a, reward, done, ()))
    }

    fn actions(&self, _state: &usize) -> Vec<usize> {
        vec![0, 1]
    }

    fn states(&self) -> Vec<usize> {
        (0..self.length).collect()
    }

    fn render(&self) -> String {
        format!("{}/{}", self.state, self.length - 1)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn is_terminal(&self, state: &usize) -> bool {
        *state + 1 == self.length
    }

    fn force_state(&mut self, state: &usize) -> Result<()> {
        self.state = *state;
        Ok(())
    }
}

/// Dummy agent, always moving forward on [`DummyEnv`].
pub struct DummyAgent {
    env: DummyEnv,
    policy: PolicyTable<usize, usize>,
    table: VTable<usize>,
}

impl DummyAgent {
    /// Constructs the agent.
    pub fn new(env: DummyEnv) -> Self {
        Self {
            env,
            policy: PolicyTable::default(),
            table: VTable::default(),
        }
    }
}

impl Policy<DummyEnv> for DummyAgent {
    fn act(&mut self, state: &usize) -> Result<usize> {
        Ok(self.policy.get(state).copied().unwrap_or(0))
    }
}

impl Agent<DummyEnv> for DummyAgent {
    type Table = VTable<usize>;

    fn train(&mut self, _episodes: usize) -> Result<Trained<usize, usize, VTable<usize>>> {
        for s in self.env.states() {
            self.policy.insert(s, 1);
        }
        self.table = VTable::zeros(&self.env.states());
        Ok(Trained::new(self.policy.clone(), self.table.clone()))
    }

    fn policy(&self) -> &PolicyTable<usize, usize> {
        &self.policy
    }

    fn table(&self) -> &VTable<usize> {
        &self.table
    }

    fn env(&self) -> &DummyEnv {
        &self.env
    }

    fn env_mut(&mut self) -> &mut DummyEnv {
        &mut self.env
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&(&self.policy, &self.table))?)
    }

    fn restore(&mut self, blob: &[u8]) -> Result<()> {
        let (policy, table) = bincode::deserialize(blob)?;
        self.policy = policy;
        self.table = table;
        Ok(())
    }
}
