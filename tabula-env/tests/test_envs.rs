use anyhow::Result;
use tabula_core::{Capability, Env};
use tabula_env::{
    GridWorld, GridWorldConfig, LineWorld, LineWorldConfig, MontyHallLvl2, MontyHallLvl2Config,
    RockPaperScissors, RockPaperScissorsConfig,
};
use tempdir::TempDir;

/// Applies the first legal action until the episode ends.
fn rollout<E: Env>(env: &mut E, max_steps: usize) -> Result<(usize, f64)> {
    let mut state = env.reset()?;
    let mut ret = 0.0;
    for t in 1..=max_steps {
        let a = env.actions(&state)[0].clone();
        let step = env.step(&a)?;
        ret += step.reward;
        state = step.state.clone();
        if step.is_done() {
            assert!(env.is_terminal(&state));
            return Ok((t, ret));
        }
    }
    Ok((max_steps, ret))
}

#[test]
fn test_terminal_states_are_enumerated() -> Result<()> {
    let line = LineWorld::build(&LineWorldConfig::default(), 0)?;
    let grid = GridWorld::build(&GridWorldConfig::default(), 0)?;
    let rps = RockPaperScissors::build(&RockPaperScissorsConfig::default(), 0)?;
    let mh2 = MontyHallLvl2::build(&MontyHallLvl2Config::default(), 0)?;

    assert_eq!(line.states().iter().filter(|s| line.is_terminal(s)).count(), 1);
    assert_eq!(grid.states().iter().filter(|s| grid.is_terminal(s)).count(), 1);
    assert_eq!(rps.states().iter().filter(|s| rps.is_terminal(s)).count(), 1);
    assert_eq!(mh2.states().iter().filter(|s| mh2.is_terminal(s)).count(), 5);
    Ok(())
}

#[test]
fn test_rollouts_end() -> Result<()> {
    // Line World moves left first and never reaches the goal.
    let mut line = LineWorld::build(&LineWorldConfig::default(), 0)?;
    assert_eq!(rollout(&mut line, 50)?, (50, 0.0));

    let mut rps = RockPaperScissors::build(&RockPaperScissorsConfig::default(), 0)?;
    assert_eq!(rollout(&mut rps, 50)?.0, 2);

    let mut mh2 = MontyHallLvl2::build(&MontyHallLvl2Config::default(), 0)?;
    assert_eq!(rollout(&mut mh2, 50)?.0, 4);
    Ok(())
}

#[test]
fn test_monty_hall_lvl2_switching_pays() -> Result<()> {
    let mut env = MontyHallLvl2::build(&MontyHallLvl2Config::default(), 42)?;
    let n = 5_000;
    let mut wins = [0.0, 0.0];
    for (a, wins) in wins.iter_mut().enumerate() {
        for _ in 0..n {
            env.reset()?;
            loop {
                let step = env.step(&a)?;
                if step.is_done() {
                    *wins += step.reward;
                    break;
                }
            }
        }
    }
    let (keep, switch) = (wins[0] / n as f64, wins[1] / n as f64);
    assert!((keep - 0.2).abs() < 0.03, "{}", keep);
    assert!(switch > keep + 0.2, "{} {}", switch, keep);
    Ok(())
}

#[test]
fn test_capabilities() -> Result<()> {
    let line = LineWorld::build(&LineWorldConfig::default(), 0)?;
    let mh2 = MontyHallLvl2::build(&MontyHallLvl2Config::default(), 0)?;
    assert!(line.capabilities().require(Capability::StateForcing, "test").is_ok());
    assert!(mh2.capabilities().require(Capability::StateForcing, "test").is_err());
    assert!(mh2.capabilities().require(Capability::TerminalDetection, "test").is_ok());
    Ok(())
}

#[test]
fn test_config_yaml() -> Result<()> {
    let tmp = TempDir::new("env_config")?;
    let path = tmp.path().join("line_world.yaml");
    let config = LineWorldConfig::default().length(10).start_pos(2).goal_pos(0);
    std::fs::write(&path, serde_yaml::to_string(&config)?)?;

    let loaded: LineWorldConfig = serde_yaml::from_reader(std::fs::File::open(&path)?)?;
    assert_eq!(loaded, config);

    let mut env = LineWorld::build(&loaded, 0)?;
    assert_eq!(env.reset()?, 2);
    env.step(&0)?;
    assert!(env.step(&0)?.is_done());
    Ok(())
}
