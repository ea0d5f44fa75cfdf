use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};
use tabula::{
    agent::{
        dp::{DpConfig, PolicyIteration, ValueIteration},
        mc::{McConfig, MonteCarloEs, OffPolicyMc, OnPolicyMc},
        planning::{DynaConfig, DynaQ, DynaQPlus},
        td::{ExpectedSarsa, QLearning, Sarsa, TdConfig},
    },
    env::{
        GridWorld, GridWorldConfig, LineWorld, LineWorldConfig, MontyHallLvl1,
        MontyHallLvl1Config, MontyHallLvl2, MontyHallLvl2Config, RockPaperScissors,
        RockPaperScissorsConfig,
    },
    record::{BufferedRecorder, Record},
    Agent, Capability, Configurable, DefaultEvaluator, Env, Trainer, TrainerConfig,
};

/// Train every applicable algorithm on every environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Episode budget of Monte Carlo, temporal-difference and planning agents
    #[arg(long, default_value_t = 2000)]
    episodes: usize,

    /// Sweep budget of Value Iteration
    #[arg(long, default_value_t = 1000)]
    sweeps: usize,

    /// Number of evaluation episodes after each training run
    #[arg(long, default_value_t = 100)]
    eval_episodes: usize,

    /// Directory where the trained models are saved
    #[arg(long, default_value = "model/train_all")]
    model_dir: String,

    /// Random seed of agents and environments
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Results of the training runs, labelled by environment and algorithm.
struct Summary {
    labels: Vec<(String, String)>,
    recorder: BufferedRecorder,
}

impl Summary {
    fn new() -> Self {
        Self {
            labels: vec![],
            recorder: BufferedRecorder::new(),
        }
    }

    fn print(&self) {
        println!(
            "{:<22} {:<22} {:>8} {:>8} {:>10}",
            "environment", "algorithm", "return", "success", "secs"
        );
        for ((env, algo), record) in self.records() {
            let scalar = |k: &str| record.get_scalar(k).unwrap_or(f32::NAN);
            println!(
                "{:<22} {:<22} {:>8.3} {:>8.3} {:>10.3}",
                env,
                algo,
                scalar("episode_return"),
                scalar("success_rate"),
                scalar("train_secs")
            );
        }
    }

    fn records(&self) -> impl Iterator<Item = (&(String, String), &Record)> {
        self.labels.iter().zip(self.recorder.iter())
    }
}

fn model_dir(args: &Args, env_name: &str, algo: &str) -> PathBuf {
    Path::new(&args.model_dir).join(env_name).join(algo)
}

fn train<E, A>(
    args: &Args,
    env_name: &str,
    env_config: &E::Config,
    algo: &str,
    mut agent: A,
    budget: usize,
    summary: &mut Summary,
) -> Result<()>
where
    E: Env,
    A: Agent<E>,
{
    info!("Train {} on {}", algo, env_name);
    let config = TrainerConfig::default()
        .max_episodes(budget)
        .model_dir(model_dir(args, env_name, algo).to_string_lossy());
    let mut trainer = Trainer::build(config);
    let mut evaluator =
        DefaultEvaluator::<E>::new(env_config, args.seed as i64 + 1, args.eval_episodes)?;

    trainer.train(&mut agent, &mut summary.recorder, &mut evaluator)?;
    summary.labels.push((env_name.to_string(), algo.to_string()));
    Ok(())
}

/// Trains all algorithms on an environment.
///
/// Dynamic programming runs only if the environment can be forced into a
/// state. Policy Iteration additionally needs deterministic transitions.
fn train_env<E: Env>(
    args: &Args,
    env_name: &str,
    env_config: &E::Config,
    deterministic: bool,
    summary: &mut Summary,
) -> Result<()> {
    let env = || E::build(env_config, args.seed as i64);
    let dp_config = DpConfig::default().seed(args.seed);
    let mc_config = McConfig::default().seed(args.seed);
    let td_config = TdConfig::default().seed(args.seed);
    let dyna_config = DynaConfig::default().seed(args.seed);
    let episodes = args.episodes;

    if env()?.capabilities().has(Capability::StateForcing) {
        if deterministic {
            let agent = PolicyIteration::build(dp_config.clone(), env()?);
            train::<E, _>(args, env_name, env_config, "policy_iteration", agent, 0, summary)?;
        }
        let agent = ValueIteration::build(dp_config, env()?);
        let sweeps = args.sweeps;
        train::<E, _>(args, env_name, env_config, "value_iteration", agent, sweeps, summary)?;
    } else {
        info!("{} cannot be forced into a state, skip dynamic programming", env_name);
    }

    let agent = MonteCarloEs::build(mc_config.clone(), env()?);
    train::<E, _>(args, env_name, env_config, "mc_exploring_starts", agent, episodes, summary)?;
    let agent = OnPolicyMc::build(mc_config.clone(), env()?);
    train::<E, _>(args, env_name, env_config, "mc_on_policy", agent, episodes, summary)?;
    let agent = OffPolicyMc::build(mc_config, env()?);
    train::<E, _>(args, env_name, env_config, "mc_off_policy", agent, episodes, summary)?;

    let agent = Sarsa::build(td_config.clone(), env()?);
    train::<E, _>(args, env_name, env_config, "sarsa", agent, episodes, summary)?;
    let agent = QLearning::build(td_config.clone(), env()?);
    train::<E, _>(args, env_name, env_config, "q_learning", agent, episodes, summary)?;
    let agent = ExpectedSarsa::build(td_config, env()?);
    train::<E, _>(args, env_name, env_config, "expected_sarsa", agent, episodes, summary)?;

    let agent = DynaQ::build(dyna_config.clone(), env()?);
    train::<E, _>(args, env_name, env_config, "dyna_q", agent, episodes, summary)?;
    let agent = DynaQPlus::build(dyna_config, env()?);
    train::<E, _>(args, env_name, env_config, "dyna_q_plus", agent, episodes, summary)?;

    Ok(())
}

fn train_all(args: &Args) -> Result<Summary> {
    let mut summary = Summary::new();
    train_env::<LineWorld>(args, "line_world", &LineWorldConfig::default(), true, &mut summary)?;
    train_env::<GridWorld>(args, "grid_world", &GridWorldConfig::default(), true, &mut summary)?;
    train_env::<MontyHallLvl1>(
        args,
        "monty_hall_lvl1",
        &MontyHallLvl1Config::default(),
        false,
        &mut summary,
    )?;
    train_env::<MontyHallLvl2>(
        args,
        "monty_hall_lvl2",
        &MontyHallLvl2Config::default(),
        false,
        &mut summary,
    )?;
    train_env::<RockPaperScissors>(
        args,
        "rock_paper_scissors",
        &RockPaperScissorsConfig::default(),
        false,
        &mut summary,
    )?;
    Ok(summary)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let summary = train_all(&args)?;
    summary.print();
    Ok(())
}
