use clap::Parser;
use tempfile::tempdir;
use tictactoe_mdp::cli::commands::{
    compare::{self, CompareArgs},
    solve::{self, SolveArgs},
};

fn read_json(path: &std::path::Path) -> serde_json::Value {
    let contents = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&contents).unwrap()
}

#[test]
fn solve_summary_reports_value_iteration_opening() {
    let tmp = tempdir().unwrap();
    let summary = tmp.path().join("vi.json");

    let args = SolveArgs::parse_from([
        "tictactoe-mdp-solve",
        "--method",
        "vi",
        "--games",
        "20",
        "--seed",
        "3",
        "--no-progress",
        "--summary",
        summary.to_str().unwrap(),
    ]);
    solve::execute(args).expect("value iteration solve should succeed");

    let parsed = read_json(&summary);
    assert_eq!(parsed["player"], "X");
    assert_eq!(parsed["opponent"], "random");
    assert_eq!(parsed["states"], 3381);
    assert_eq!(parsed["config"]["method"], "value_iteration");
    assert_eq!(parsed["config"]["iterations"], 50);
    assert_eq!(parsed["reference_state"], "........._X");
    assert_eq!(parsed["reference_move"], 0);
    let value = parsed["reference_value"].as_f64().unwrap();
    assert!((value - 7.92703).abs() < 1e-4, "V(empty) = {value}");
    assert_eq!(parsed["exhibition"]["games"], 20);
}

#[test]
fn solve_summary_for_q_learning_as_o() {
    let tmp = tempdir().unwrap();
    let summary = tmp.path().join("ql.json");

    let args = SolveArgs::parse_from([
        "tictactoe-mdp-solve",
        "-m",
        "ql",
        "--player",
        "o",
        "-o",
        "defensive",
        "--episodes",
        "200",
        "--games",
        "0",
        "--seed",
        "17",
        "--no-progress",
        "--summary",
        summary.to_str().unwrap(),
    ]);
    solve::execute(args).expect("q-learning solve should succeed");

    let parsed = read_json(&summary);
    assert_eq!(parsed["player"], "O");
    assert_eq!(parsed["opponent"], "defensive");
    assert_eq!(parsed["states"], 3055);
    assert_eq!(parsed["config"]["method"], "q_learning");
    assert_eq!(parsed["config"]["episodes"], 200);
    assert_eq!(parsed["config"]["seed"], 17);
    assert_eq!(parsed["reference_state"], "....X...._O");
    assert!(parsed["exhibition"].is_null());
}

#[test]
fn solve_rejects_invalid_discount() {
    let args = SolveArgs::parse_from([
        "tictactoe-mdp-solve",
        "--method",
        "pi",
        "--discount",
        "1.5",
        "--games",
        "0",
        "--no-progress",
    ]);
    assert!(solve::execute(args).is_err());
}

#[test]
fn compare_export_lists_every_method_pair() {
    let tmp = tempdir().unwrap();
    let export = tmp.path().join("compare.json");

    let args = CompareArgs::parse_from([
        "tictactoe-mdp-compare",
        "--episodes",
        "500",
        "--seed",
        "1",
        "--export",
        export.to_str().unwrap(),
    ]);
    compare::execute(args).expect("compare should succeed");

    let parsed = read_json(&export);
    let methods = parsed["methods"].as_array().unwrap();
    assert_eq!(methods.len(), 3);
    assert_eq!(methods[0]["method"], "vi");
    assert_eq!(methods[2]["method"], "ql");

    let agreements = parsed["agreements"].as_array().unwrap();
    assert_eq!(agreements.len(), 3);
    // Both planners reach V*; the corner they open on may differ.
    let vi_value = methods[0]["reference_value"].as_f64().unwrap();
    let pi_value = methods[1]["reference_value"].as_f64().unwrap();
    assert!((vi_value - pi_value).abs() < 1e-6);
    for agreement in agreements {
        assert!(agreement["matching"].as_u64().unwrap() <= agreement["total"].as_u64().unwrap());
    }
}
