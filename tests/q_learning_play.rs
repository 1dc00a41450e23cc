//! Q-learning against the random opponent, checked against the exact values
//! from value iteration

use std::sync::Arc;

use tictactoe_mdp::{
    GameState, Move, OpponentKind, Player, QLearningConfig, QLearningSolver, RewardConfig, StateSpace,
    TicTacToeMdp, ValueIterationConfig, ValueIterationSolver,
    opponents::OpponentAgent,
    pipeline::{Exhibition, ExhibitionConfig},
    ports::PolicyAgent,
};

fn optimal_opening_value(space: &Arc<StateSpace>) -> f64 {
    let mdp = TicTacToeMdp::new(
        Player::X,
        RewardConfig::default(),
        OpponentKind::Random.build(),
        Arc::clone(space),
    )
    .unwrap();
    let mut vi = ValueIterationSolver::new(mdp, ValueIterationConfig::default()).unwrap();
    vi.run().unwrap();
    vi.values().get(&GameState::new()).unwrap()
}

#[test]
fn test_learned_opening_ranks_like_value_iteration() {
    let space = Arc::new(StateSpace::enumerate(Player::X).unwrap());
    let optimal = optimal_opening_value(&space);

    // Per-pair step size α / n^0.7. Corners beat edges by about 0.06 under V*.
    let config = QLearningConfig::default()
        .with_learning_rate(1.0)
        .with_learning_rate_decay(0.7)
        .with_epsilon(0.5)
        .with_episodes(100_000)
        .with_seed(2024);
    let mut solver = QLearningSolver::for_game(
        Player::X,
        RewardConfig::default(),
        OpponentKind::Random.build(),
        Arc::clone(&space),
        config,
    )
    .unwrap();
    let policy = solver.train().unwrap();

    let empty = GameState::new();
    let learned = solver.table().max_q(&empty);
    assert!(
        (learned - optimal).abs() < 0.1,
        "max Q(empty) = {learned}, V* = {optimal}"
    );

    let opening = policy.action(&empty).unwrap().position;
    assert!([0, 2, 4, 6, 8].contains(&opening), "opened on edge {opening}");

    let q = |cells: [usize; 4]| -> Vec<f64> {
        cells
            .iter()
            .map(|&pos| solver.table().get(&empty, &Move::new(pos, Player::X)).unwrap())
            .collect()
    };
    let corners = q([0, 2, 6, 8]);
    let edges = q([1, 3, 5, 7]);
    let mean = |values: &[f64]| values.iter().sum::<f64>() / values.len() as f64;
    let best = |values: &[f64]| values.iter().copied().fold(f64::MIN, f64::max);
    assert!(
        mean(&corners) > mean(&edges),
        "corners {corners:?} should outrank edges {edges:?}"
    );
    assert!(best(&corners) > best(&edges), "corners {corners:?}, edges {edges:?}");

    let config = ExhibitionConfig {
        games: 500,
        agent_player: Player::X,
        seed: Some(99),
    };
    let mut agent = PolicyAgent::new("q-learning", Arc::new(policy));
    let mut opponent = OpponentAgent::new(OpponentKind::Random.build());
    let result = Exhibition::new(config)
        .run(&mut agent, &mut opponent)
        .unwrap();
    assert!(result.win_rate > 0.9, "win rate {}", result.win_rate);
}
