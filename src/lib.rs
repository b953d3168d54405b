//! A solver for multi-dimensional energy games, computing the minimal energy budgets
//! with which an attacker can win from every position of a game graph.
//!
//! Energy games of this kind are the core of the
//! [Spectroscopy algorithm](https://arxiv.org/abs/2303.08904) by B. Bisping,
//! where a labeled transition system is compiled into a game between an attacker,
//! who tries to show that two processes differ, and a defender.
//! The energies the attacker needs to win then encode which behavioral equivalences
//! hold between the processes.
//! This crate only solves the game. Building the game graph for some transition system,
//! and interpreting the resulting energies, is left to the caller.
//!
//! # Energy games
//!
//! A [`GameGraph`] consists of positions, each owned by either the [`Player::Attacker`]
//! or the [`Player::Defender`], and of moves between them.
//! Every move is labeled with an [`Update`], one entry per energy dimension:
//!
//! * [`Upd::Delta`] subtracts a value from the dimension when the move is taken,
//! * [`Upd::Branch`] requires the dimension's energy to be available in two
//!   (1-indexed) dimensions at once.
//!
//! The attacker wins once the defender is stuck, that is, in a defender position
//! without any moves. [`EnergyGame::run()`] computes for every position the set of
//! minimal winning budgets as an [`EnergyArray`]. These sets are antichains:
//! no energy in them is dominated by another one.
//!
//! # Usage
//!
//! ```
//! use energyequiv::*;
//!
//! let graph = GameGraph::new(
//!     4, // Number of positions
//!     vec![
//!         (0, 1, update![-1]), // Move with start, target and update
//!         (0, 2, update![0, -1]),
//!         (2, 3, update![(1, 3)]),
//!     ],
//!     vec![Player::Attacker, Player::Defender, Player::Attacker, Player::Defender],
//!     EnergyConf::STANDARD,
//! ).unwrap();
//!
//! let mut game = EnergyGame::standard_reach(graph);
//! let energies = game.run();
//!
//! // Two incomparable ways to win from position 0
//! let expected = EnergyArray::from_conf(
//!     [vec![1], vec![0, 1]].as_slice(),
//!     EnergyConf::STANDARD,
//! ).unwrap();
//! assert_eq!(energies[0], expected);
//!
//! // The start position 0 is won with an unbounded budget
//! assert!(game.attacker_wins());
//! ```
//!
//! # Logging
//!
//! Progress of the solver is reported through the [`log`](https://docs.rs/log) facade,
//! at `debug` level for every run and at `trace` level for every changed position.
//!
//! # Serde
//!
//! When compiled with the feature flag `serde` (disabled by default),
//! [`GameGraph`](crate::energygame::GameGraph) implements serde's
//! `Serialize` and `Deserialize` traits.
//! Deserialized graphs are validated just like graphs built with [`GameGraph::new()`].

pub mod energygame;
mod energy;
mod error;

// Re-exports
pub use energy::*;
pub use error::*;
pub use energygame::{EnergyGame, GameGraph, Player};
