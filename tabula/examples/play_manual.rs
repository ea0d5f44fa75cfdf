use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use tabula::{
    env::{
        GridWorld, GridWorldConfig, LineWorld, LineWorldConfig, MontyHallLvl1,
        MontyHallLvl1Config, MontyHallLvl2, MontyHallLvl2Config, RockPaperScissors,
        RockPaperScissorsConfig,
    },
    util::EpisodeSummary,
    Env,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EnvName {
    LineWorld,
    GridWorld,
    MontyHallLvl1,
    MontyHallLvl2,
    RockPaperScissors,
}

/// Play an episode by typing the actions
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Environment to play
    #[arg(long, value_enum)]
    env: EnvName,

    /// Random seed of the environment
    #[arg(long, default_value_t = 0)]
    seed: i64,
}

/// Plays one episode, reading an action per line from `input`.
///
/// Unparsable and illegal actions are reported and asked again. The episode
/// ends when the environment terminates or `input` is exhausted.
fn play<E, R, W>(
    config: &E::Config,
    seed: i64,
    input: R,
    output: &mut W,
) -> Result<EpisodeSummary>
where
    E: Env<State = usize, Act = usize>,
    R: BufRead,
    W: Write,
{
    let mut env = E::build(config, seed)?;
    let mut state = env.reset()?;
    let mut summary = EpisodeSummary {
        episode_return: 0.0,
        steps: 0,
        terminated: false,
    };
    let mut lines = input.lines();

    loop {
        let actions = env.actions(&state);
        writeln!(output, "{}", env.render())?;
        write!(output, "state {}, actions {:?}> ", state, actions)?;
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let a = match line.trim().parse::<usize>() {
            Ok(a) if actions.contains(&a) => a,
            Ok(a) => {
                writeln!(output, "{} is not a legal action", a)?;
                continue;
            }
            Err(_) => {
                writeln!(output, "type one of {:?}", actions)?;
                continue;
            }
        };

        let step = env.step(&a)?;
        summary.episode_return += step.reward;
        summary.steps += 1;
        writeln!(output, "reward {}", step.reward)?;
        if step.is_done() {
            summary.terminated = true;
            writeln!(output, "{}", env.render())?;
            break;
        }
        state = step.state;
    }
    Ok(summary)
}

fn run<R: BufRead, W: Write>(args: &Args, input: R, output: &mut W) -> Result<EpisodeSummary> {
    let seed = args.seed;
    match args.env {
        EnvName::LineWorld => {
            play::<LineWorld, _, _>(&LineWorldConfig::default(), seed, input, output)
        }
        EnvName::GridWorld => {
            play::<GridWorld, _, _>(&GridWorldConfig::default(), seed, input, output)
        }
        EnvName::MontyHallLvl1 => {
            play::<MontyHallLvl1, _, _>(&MontyHallLvl1Config::default(), seed, input, output)
        }
        EnvName::MontyHallLvl2 => {
            play::<MontyHallLvl2, _, _>(&MontyHallLvl2Config::default(), seed, input, output)
        }
        EnvName::RockPaperScissors => play::<RockPaperScissors, _, _>(
            &RockPaperScissorsConfig::default(),
            seed,
            input,
            output,
        ),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let summary = run(&args, io::stdin().lock(), &mut io::stdout())?;
    println!(
        "Return {} in {} steps{}",
        summary.episode_return,
        summary.steps,
        if summary.terminated { "" } else { " (quit)" }
    );
    Ok(())
}
