//! Train [`Agent`].
mod config;
use crate::{
    record::{Record, RecordValue, Recorder},
    Agent, Env, Evaluator, Trained,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::{info, warn};
use std::{path::Path, time::SystemTime};

/// File name of the trained artifact in the model directory.
pub const ARTIFACT_FILE: &str = "artifact.yaml";

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages a training run and the objects around it.
///
/// Agents run their own episode loops; the trainer times them, logs, records
/// and saves the results.
///
/// # Training run
///
/// 1. Start a timer and call [`Agent::train`] with `max_episodes`.
/// 2. Write a [`Record`] with the episode budget (`"episodes"`), the elapsed
///    time (`"train_secs"`), the number of states covered by the policy
///    (`"policy_states"`), a timestamp (`"finished_at"`) and the entries of
///    the evaluation.
/// 3. If `model_dir` is given, save the trained artifact into
///    `(model_dir)/artifact.yaml` and the agent parameters into `model_dir`.
///    Failures to save are logged and do not abort the run.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     T[Trainer] -->|episodes| A[Agent]
///     A -->|Env::Act| B[Env]
///     B -->|"Step&lt;E: Env&gt;"|A
///     A -->|"Trained&lt;S, A, T&gt;"|T
///     T -->|policy|D[Evaluator]
///     D -->|Record|R[Recorder]
///     T -->|Record|R
/// ```
pub struct Trainer {
    /// The episode budget.
    max_episodes: usize,

    /// Where to save the trained model.
    model_dir: Option<String>,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            max_episodes: config.max_episodes,
            model_dir: config.model_dir,
        }
    }

    fn save_model<E, A>(agent: &A, trained: &Trained<E::State, E::Act, A::Table>, model_dir: &str)
    where
        E: Env,
        A: Agent<E>,
    {
        let dir = Path::new(model_dir);
        match trained
            .save(dir.join(ARTIFACT_FILE))
            .and_then(|_| agent.save_params(dir))
        {
            Ok(()) => info!("Saved the model in {:?}.", model_dir),
            Err(e) => warn!("Failed to save model in {:?}: {}", model_dir, e),
        }
    }

    /// Train the agent.
    pub fn train<E, A, D>(
        &mut self,
        agent: &mut A,
        recorder: &mut dyn Recorder,
        evaluator: &mut D,
    ) -> Result<Trained<E::State, E::Act, A::Table>>
    where
        E: Env,
        A: Agent<E>,
        D: Evaluator<E>,
    {
        info!("Starts training for {} episodes", self.max_episodes);
        let timer = SystemTime::now();
        let trained = agent.train(self.max_episodes)?;
        let train_secs = timer.elapsed()?.as_secs_f32();
        info!(
            "Finished training in {:.3} sec, policy covers {} states",
            train_secs,
            trained.policy.len()
        );

        let mut record = Record::from_slice(&[
            ("episodes", RecordValue::Scalar(self.max_episodes as f32)),
            ("train_secs", RecordValue::Scalar(train_secs)),
            ("policy_states", RecordValue::Scalar(trained.policy.len() as f32)),
            ("finished_at", RecordValue::DateTime(Local::now())),
        ]);

        info!("Starts evaluation of the trained model");
        let eval = evaluator.evaluate(agent)?;
        if eval.is_empty() {
            info!("No evaluation episode was run");
        }
        for (k, v) in eval.iter() {
            if let RecordValue::Scalar(v) = v {
                info!("{}: {}", k, v);
            }
        }
        record.merge_inplace(eval);
        recorder.write(record);

        if let Some(model_dir) = &self.model_dir {
            Self::save_model::<E, A>(agent, &trained, model_dir);
        }

        Ok(trained)
    }
}
