// Example to show JSON serialization and deserialization of energy game graphs.
//
// When run with no arguments, a game graph is written to `./graph.json`.
// With a path as a command line argument (for example 'graph.json',
// that was previously written by this example), that file is read as
// the input game graph and processed.
//
// Example usage:
// `cargo run --features serde --example json`
//     (Writes a graph into ./graph.json)
// `cargo run --features serde --example json -- graph.json`
//     (Reads that graph again and processes it)

use std::ffi::OsStr;
use std::fs::File;
use std::env;
use std::io;

use energyequiv::*;
use energyequiv::Player::{Attacker, Defender};

fn graph() -> Result<GameGraph> {
    GameGraph::new(
        7,
        vec![
            (0, 1, update![0, 0, -1]),
            // Position 2 refills the first dimension before returning to 0
            (0, 2, update![0, -1]),
            (2, 0, update![2]),
            // Defender position 1 may go to 3 or 4
            (1, 3, update![-1]),
            (1, 4, update![(2, 3)]),
            (3, 5, update![0, -1]),
            (4, 6, update![-1, 0, -1]),
        ],
        vec![Attacker, Defender, Attacker, Attacker, Attacker, Defender, Defender],
        EnergyConf::STANDARD,
    )
}

fn dump_graph() -> io::Result<()> {
    let graph = graph().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    const FNAME: &str = "graph.json";
    let f = File::create(FNAME)?;
    serde_json::to_writer_pretty(f, &graph)?;

    println!("Written energy game graph to `./{FNAME}`");
    println!("Try processing it with `{} {FNAME}`.",
             env::args().next().unwrap_or_default());
    Ok(())
}

fn run_json_graph(fname: &OsStr) -> io::Result<()> {
    let reader = File::open(fname)?;
    // Invalid graphs are rejected while deserializing
    let graph: GameGraph = serde_json::from_reader(&reader)?;
    println!("Read game graph from {}.", fname.to_string_lossy());

    // Create an energy game using the game graph
    let mut game = EnergyGame::standard_reach(graph);
    let energies = game.run();
    for (i, node) in energies.iter().enumerate() {
        println!("{i}: {node}");
    }
    Ok(())
}

fn main() -> io::Result<()> {
    env_logger::init();
    match env::args_os().nth(1) {
        Some(fname) => run_json_graph(&fname),
        None => dump_graph(),
    }
}
