use anyhow::Result;
use tabula_agent::{
    dp::{DpConfig, PolicyIteration, ValueIteration},
    mc::{McConfig, MonteCarloEs},
    planning::{DynaConfig, DynaQ},
    td::{ExpectedSarsa, QLearning, Sarsa, TdConfig},
};
use tabula_core::{
    util::{run_episode, TablePolicy},
    Agent, Configurable, Env, PolicyTable,
};
use tabula_env::{GridWorld, GridWorldConfig, LineWorld, LineWorldConfig};

const NON_TERMINAL: [usize; 6] = [0, 1, 2, 3, 4, 5];

fn line_world() -> Result<LineWorld> {
    LineWorld::build(&LineWorldConfig::default(), 0)
}

fn assert_moves_right(policy: &PolicyTable<usize, usize>) {
    for s in NON_TERMINAL {
        assert_eq!(policy.get(&s), Some(&1), "state {}", s);
    }
}

#[test]
fn test_value_iteration_matches_policy_iteration() -> Result<()> {
    let config = DpConfig::default().discount_factor(0.9);

    let mut vi = ValueIteration::build(config.clone(), line_world()?);
    let mut pi = PolicyIteration::build(config.clone(), line_world()?);
    let v_vi = vi.train(1000)?.table;
    let v_pi = pi.train(0)?.table;
    assert!(v_vi.max_abs_diff(&v_pi) < 1e-4);
    assert_moves_right(vi.policy());
    assert_moves_right(pi.policy());
    assert_eq!(v_vi.get(&6), 0.0);
    assert!((v_vi.get(&5) - 1.0).abs() < 1e-9);

    let grid = || GridWorld::build(&GridWorldConfig::default().size(4), 0);
    let mut vi = ValueIteration::build(config.clone(), grid()?);
    let mut pi = PolicyIteration::build(config, grid()?);
    let v_vi = vi.train(1000)?.table;
    let v_pi = pi.train(0)?.table;
    assert!(v_vi.max_abs_diff(&v_pi) < 1e-4);

    // Both policies reach the goal along a shortest path.
    for policy in [vi.policy(), pi.policy()] {
        let mut env = grid()?;
        let mut policy = TablePolicy::<GridWorld>::new(policy.clone());
        let summary = run_episode(&mut env, &mut policy, 100)?;
        assert!(summary.terminated);
        assert_eq!(summary.steps, 6);
    }
    Ok(())
}

#[test]
fn test_q_learning_moves_right() -> Result<()> {
    let config = TdConfig::default()
        .discount_factor(0.9)
        .epsilon(0.3)
        .learning_rate(0.1);
    let mut agent = QLearning::build(config, line_world()?);
    let trained = agent.train(1000)?;
    assert_moves_right(&trained.policy);
    Ok(())
}

#[test]
fn test_sarsa_moves_right() -> Result<()> {
    let config = TdConfig::default()
        .discount_factor(0.9)
        .epsilon(0.5)
        .learning_rate(0.1);
    let mut agent = Sarsa::build(config, line_world()?);
    let trained = agent.train(2000)?;
    assert_moves_right(&trained.policy);
    Ok(())
}

#[test]
fn test_expected_sarsa_moves_right() -> Result<()> {
    let config = TdConfig::default()
        .discount_factor(0.9)
        .epsilon(0.5)
        .learning_rate(0.1);
    let mut agent = ExpectedSarsa::build(config, line_world()?);
    let trained = agent.train(2000)?;
    assert_moves_right(&trained.policy);
    Ok(())
}

#[test]
fn test_dyna_q_moves_right() -> Result<()> {
    let config = DynaConfig::default()
        .discount_factor(0.9)
        .epsilon(0.5)
        .n_planning_steps(10);
    let mut agent = DynaQ::build(config, line_world()?);
    let trained = agent.train(500)?;
    assert_moves_right(&trained.policy);
    Ok(())
}

#[test]
fn test_exploring_starts_reaches_goal() -> Result<()> {
    let config = McConfig::default().discount_factor(0.9).max_episode_len(100);
    let mut agent = MonteCarloEs::build(config, line_world()?);
    agent.train(2000)?;

    let mut env = line_world()?;
    let summary = run_episode(&mut env, &mut agent, 100)?;
    assert!(summary.terminated);
    assert_eq!(summary.steps, 3);
    assert_eq!(summary.episode_return, 1.0);
    Ok(())
}
