// In this example an energy game is manually constructed and then solved.
// The resulting winning energies are printed to stdout.
//
// Set `RUST_LOG=trace` to follow every change of the solver.

use energyequiv::*;

use energyequiv::Player::{Attacker, Defender};

fn game() -> Result<EnergyGame> {
    let conf = EnergyConf::STANDARD;
    let graph = GameGraph::new(
        9, // Number of positions
        vec![
            // The attacker chooses between two challenges
            (0, 1, update![-1]), // Move with start, target and update
            (0, 2, update![0, -1]),

            // The defender answers with either of two moves,
            // so the attacker needs enough energy for both
            (1, 3, update![]),
            (1, 4, update![0, 0, -1]),
            (3, 5, update![0, 0, 0, -1]),
            (4, 5, update![0, 0, 0, 0, -1]),

            // Whatever is left in dimension 1 must also be available in dimension 4
            (2, 6, update![(1, 4)]),
            (6, 7, update![-1]),
            (6, 8, update![0, 0, 0, -1]),
        ],
        vec![Attacker, Defender, Attacker, Attacker, Attacker, Defender, Defender, Defender, Defender],
        conf,
    )?;
    Ok(EnergyGame::standard_reach(graph))
}

fn main() -> Result<()> {
    env_logger::init();
    let mut game = game()?;

    let energies = game.run();
    for (i, node) in energies.iter().enumerate() {
        println!("{i}: {node}");
    }
    println!("Attacker wins from position {}: {}", game.start(), game.attacker_wins());
    Ok(())
}
