use energyequiv::*;
use energyequiv::energygame::is_antichain;

use energyequiv::Player::{Attacker, Defender};

macro_rules! earray {
    ($conf:expr, $( $x:expr ),* ) => {
        EnergyArray::from_conf([ $( $x, )* ].as_slice(), $conf).unwrap()
    }
}

fn solve(n_vertices: u32, edges: Vec<(u32, u32, Vec<Upd>)>, owners: Vec<Player>) -> Vec<EnergyArray> {
    let graph = GameGraph::new(n_vertices, edges, owners, EnergyConf::STANDARD).unwrap();
    let mut game = EnergyGame::standard_reach(graph);
    game.run().to_vec()
}

#[test]
fn trivial_seed() {
    let energies = solve(1, vec![], vec![Defender]);
    assert_eq!(energies[0], EnergyArray::zero(1, EnergyConf::STANDARD));
}

#[test]
fn delta_move() {
    let c = EnergyConf::STANDARD;
    let energies = solve(
        2,
        vec![(0, 1, update![-1, 0, 0, 0, 0, 0])],
        vec![Attacker, Defender],
    );
    assert_eq!(energies[1], earray!(c, vec![0, 0, 0, 0, 0, 0]));
    assert_eq!(energies[0], earray!(c, vec![1, 0, 0, 0, 0, 0]));
}

#[test]
fn branch_move() {
    let c = EnergyConf::STANDARD;
    let energies = solve(
        3,
        vec![
            (0, 1, update![(1, 3), 0, 0, 0, 0, 0]),
            (1, 2, update![-2]),
        ],
        vec![Attacker, Attacker, Defender],
    );
    assert_eq!(energies[1], earray!(c, vec![2, 0, 0, 0, 0, 0]));
    // The value 2 of dimension 1 is reserved in dimensions 1 and 3
    assert_eq!(energies[0], earray!(c, vec![2, 0, 2, 0, 0, 0]));
}

// Defender position 0 with successors 1 and 2, which need (1, 0, ..) and (0, 2, ..)
fn defender_edges() -> Vec<(u32, u32, Vec<Upd>)> {
    vec![
        (0, 1, update![0, 0, 0, 0, 0, 0]),
        (0, 2, update![0, 0, 0, 0, 0, 0]),
        (1, 3, update![-1]),
        (2, 4, update![0, -2]),
    ]
}

#[test]
fn defender_combination() {
    let c = EnergyConf::STANDARD;
    let energies = solve(5, defender_edges(), vec![Defender, Attacker, Attacker, Defender, Defender]);
    assert_eq!(energies[1], earray!(c, vec![1, 0, 0, 0, 0, 0]));
    assert_eq!(energies[2], earray!(c, vec![0, 2, 0, 0, 0, 0]));
    assert_eq!(energies[0], earray!(c, vec![1, 2, 0, 0, 0, 0]));
}

#[test]
fn defender_escapes() {
    let mut edges = defender_edges();
    // Position 5 only leads back to itself, the attacker never wins there
    edges.push((0, 5, update![]));
    edges.push((5, 5, update![-1]));
    let energies = solve(6, edges, vec![Defender, Attacker, Attacker, Defender, Defender, Attacker]);
    assert!(energies[5].is_empty());
    assert!(energies[0].is_empty());
    assert!(!energies[1].is_empty() && !energies[2].is_empty());
}

#[test]
fn attacker_choice() {
    let c = EnergyConf::STANDARD;
    let graph = GameGraph::new(
        6,
        vec![
            (0, 1, update![-1, 0]),
            (0, 2, update![0, -1]),
            (1, 3, update![]),
            (1, 4, update![]),
            (3, 5, update![0, 0, -1]),
            (4, 5, update![0, 0, 0, -1]),
        ],
        vec![Attacker, Defender, Defender, Attacker, Attacker, Defender],
        c,
    ).unwrap();
    let mut game = EnergyGame::standard_reach(graph);
    let energies = game.run();
    assert_eq!(energies[1], earray!(c, vec![0, 0, 1, 1]));
    assert_eq!(energies[0], earray!(c, vec![1, 0, 1, 1], vec![0, 1]));
    assert!(energies.iter().all(is_antichain));

    let budget = |values: &[i64]| Energy::new(values, c).unwrap();
    assert!(energies[0].covers(&budget(&[0, 1])));
    assert!(energies[0].covers(&budget(&[1, 0, 1, 1])));
    assert!(!energies[0].covers(&budget(&[1, 0, 1, 0])));
    assert!(!energies[0].covers(&budget(&[0, 0, 5, 5])));
}

#[test]
fn cycle() {
    let c = EnergyConf::STANDARD;
    let energies = solve(
        3,
        vec![
            (0, 1, update![-1]),
            (0, 2, update![0, -1]),
            (2, 0, update![0, 0, -1]),
        ],
        vec![Attacker, Defender, Attacker],
    );
    assert_eq!(energies[0], earray!(c, vec![1]));
    assert_eq!(energies[1], EnergyArray::zero(1, c));
    assert_eq!(energies[2], earray!(c, vec![1, 0, 1]));
}

#[test]
fn attacker_trapped_in_cycle() {
    // Neither position can ever reach a stuck defender
    let energies = solve(
        2,
        vec![
            (0, 1, update![-1]),
            (1, 0, update![0, -1]),
        ],
        vec![Attacker, Defender],
    );
    assert!(energies.iter().all(EnergyArray::is_empty));
}

#[test]
fn gain_before_stuck_defender() {
    let energies = solve(2, vec![(0, 1, update![1])], vec![Attacker, Defender]);
    assert_eq!(energies[0], EnergyArray::zero(1, EnergyConf::STANDARD));
}

#[test]
fn gains_on_cycle() {
    // Looping on position 0 refills the first dimension, but not the second one
    let c = EnergyConf::STANDARD;
    let energies = solve(
        2,
        vec![
            (0, 1, update![-2, -1]),
            (0, 0, update![1]),
        ],
        vec![Attacker, Defender],
    );
    assert_eq!(energies[0], earray!(c, vec![0, 1]));
    assert!(energies.iter()
        .flat_map(|energies| energies.iter())
        .all(|e| e.raw_data().iter().all(|&v| v >= 0)));
}

#[test]
fn rerun_is_stable() {
    let graph = GameGraph::new(
        5,
        defender_edges(),
        vec![Defender, Attacker, Attacker, Defender, Defender],
        EnergyConf::STANDARD,
    ).unwrap();
    let mut game = EnergyGame::standard_reach(graph);
    let first = game.run().to_vec();
    let second = game.run().to_vec();
    assert_eq!(first, second);
}

#[test]
fn start_budget() {
    let c = EnergyConf::STANDARD;
    let graph = GameGraph::new(
        5,
        defender_edges(),
        vec![Defender, Attacker, Attacker, Defender, Defender],
        c,
    ).unwrap();
    let game = EnergyGame::standard_reach(graph);

    let mut unbounded = game.clone();
    unbounded.run();
    assert!(unbounded.attacker_wins());

    let mut sufficient = game.clone().with_start(0, Energy::new(&[1, 2, 0, 3], c).unwrap()).unwrap();
    sufficient.run();
    assert!(sufficient.attacker_wins());

    let mut insufficient = game.with_start(0, Energy::new(&[1, 1], c).unwrap()).unwrap();
    insufficient.run();
    assert!(!insufficient.attacker_wins());
    assert_eq!(insufficient.start_energies(), Some(&earray!(c, vec![1, 2])));
}

#[cfg(feature = "serde")]
mod json {
    use super::*;

    #[test]
    fn read_json_graph() {
        let json = r#"{
            "conf": { "elements": 6 },
            "adj": [[1], []],
            "weights": [[[-1, [1, 3]]], []],
            "owners": ["attacker", "defender"]
        }"#;
        let graph: GameGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.adj(0), &[1]);
        assert_eq!(graph.owner(0), Player::Attacker);
        assert_eq!(graph.weights(0)[0].to_vec(), update![-1, (1, 3), 0, 0, 0, 0]);

        let mut game = EnergyGame::standard_reach(graph);
        let energies = game.run();
        assert_eq!(energies[0], earray!(EnergyConf::STANDARD, vec![1]));
    }

    #[test]
    fn write_json_graph() {
        let graph = GameGraph::new(
            2,
            vec![(0, 1, update![0, (2, 3)])],
            vec![Player::Defender, Player::Defender],
            EnergyConf { elements: 3 },
        ).unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(json,
            r#"{"conf":{"elements":3},"adj":[[1],[]],"weights":[[[0,[2,3],0]],[]],"owners":["defender","defender"]}"#);

        let read: GameGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(read.adj(0), graph.adj(0));
        assert_eq!(read.weights(0), graph.weights(0));
    }

    #[test]
    fn reject_invalid_json_graph() {
        let out_of_range = r#"{"conf":{"elements":6},"adj":[[2],[]],"weights":[[[-1]],[]],"owners":["attacker","defender"]}"#;
        assert!(serde_json::from_str::<GameGraph>(out_of_range).is_err());

        let mismatched = r#"{"conf":{"elements":6},"adj":[[1],[]],"weights":[[],[]],"owners":["attacker","defender"]}"#;
        assert!(serde_json::from_str::<GameGraph>(mismatched).is_err());

        let bad_branch = r#"{"conf":{"elements":6},"adj":[[1],[]],"weights":[[[[0,1]]],[]],"owners":["attacker","defender"]}"#;
        assert!(serde_json::from_str::<GameGraph>(bad_branch).is_err());
    }
}
