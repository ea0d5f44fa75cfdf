use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::Path;
use tabula::{
    env::{
        GridWorld, GridWorldConfig, LineWorld, LineWorldConfig, MontyHallLvl1,
        MontyHallLvl1Config, MontyHallLvl2, MontyHallLvl2Config, RockPaperScissors,
        RockPaperScissorsConfig,
    },
    record::{Record, Recorder},
    util::{eval_with_recorder, EpisodeSummary, TablePolicy},
    Env, Trained,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EnvName {
    LineWorld,
    GridWorld,
    MontyHallLvl1,
    MontyHallLvl2,
    RockPaperScissors,
}

/// Replay a trained policy and print the environment after every step
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Environment the policy was trained on
    #[arg(long, value_enum)]
    env: EnvName,

    /// Trained artifact, `artifact.yaml` in the model directory
    #[arg(long)]
    artifact: String,

    /// Random seed of the environment
    #[arg(long, default_value_t = 0)]
    seed: i64,

    /// Step limit of the episode
    #[arg(long, default_value_t = 100)]
    max_steps: usize,
}

/// Prints the records of a replayed episode.
#[derive(Default)]
struct StepPrinter {
    n_records: usize,
}

impl Recorder for StepPrinter {
    fn write(&mut self, record: Record) {
        self.n_records += 1;
        let text = |k: &str| record.get_string(k).unwrap_or_default();
        println!(
            "step {}: {} --{}--> reward {}",
            record.get_scalar("step").unwrap_or(f32::NAN),
            text("state"),
            text("act"),
            record.get_scalar("reward").unwrap_or(f32::NAN),
        );
        println!("{}", text("render"));
    }
}

fn replay<E>(
    config: &E::Config,
    artifact: &Path,
    args: &Args,
    printer: &mut StepPrinter,
) -> Result<EpisodeSummary>
where
    E: Env<State = usize, Act = usize>,
{
    // Only the policy is replayed, so the table is kept as untyped YAML.
    let trained = Trained::<usize, usize, serde_yaml::Value>::load(artifact)?;
    let mut env = E::build(config, args.seed)?;
    let mut policy = TablePolicy::<E>::new(trained.policy);
    eval_with_recorder(&mut env, &mut policy, args.max_steps, printer)
}

fn run(args: &Args, printer: &mut StepPrinter) -> Result<EpisodeSummary> {
    let artifact = Path::new(&args.artifact);
    match args.env {
        EnvName::LineWorld => {
            replay::<LineWorld>(&LineWorldConfig::default(), artifact, args, printer)
        }
        EnvName::GridWorld => {
            replay::<GridWorld>(&GridWorldConfig::default(), artifact, args, printer)
        }
        EnvName::MontyHallLvl1 => {
            replay::<MontyHallLvl1>(&MontyHallLvl1Config::default(), artifact, args, printer)
        }
        EnvName::MontyHallLvl2 => {
            replay::<MontyHallLvl2>(&MontyHallLvl2Config::default(), artifact, args, printer)
        }
        EnvName::RockPaperScissors => replay::<RockPaperScissors>(
            &RockPaperScissorsConfig::default(),
            artifact,
            args,
            printer,
        ),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let summary = run(&args, &mut StepPrinter::default())?;
    println!(
        "Return {} in {} steps{}",
        summary.episode_return,
        summary.steps,
        if summary.terminated { "" } else { " (cut)" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula::{PolicyTable, VTable};
    use tempdir::TempDir;

    #[test]
    fn test_replay_line_world() -> Result<()> {
        let tmp_dir = TempDir::new("replay_policy")?;
        let path = tmp_dir.path().join("artifact.yaml");
        let mut policy = PolicyTable::<usize, usize>::default();
        for s in 0..6 {
            policy.insert(s, 1);
        }
        Trained::new(policy, VTable::<usize>::default()).save(&path)?;

        let args = Args {
            env: EnvName::LineWorld,
            artifact: path.to_string_lossy().into_owned(),
            seed: 0,
            max_steps: 10,
        };
        let mut printer = StepPrinter::default();
        let summary = run(&args, &mut printer)?;
        assert!(summary.terminated);
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.episode_return, 1.0);
        assert_eq!(printer.n_records, 3);
        Ok(())
    }
}
