// Private submodules
mod antichain;


use std::fmt;
use std::iter;

use log::Level::Trace;
use log::{trace, debug, log_enabled};
use rustc_hash::FxHashMap;

use crate::error::*;
use crate::energy::*;

pub use antichain::{minimize, combine, is_antichain};

/// The owner of a game position, who picks the next move there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum Player {
    Attacker,
    Defender,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Attacker => write!(f, "attacker"),
            Player::Defender => write!(f, "defender"),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SerdeGameGraph {
    conf: EnergyConf,
    adj: Vec<Vec<u32>>,
    weights: Vec<Vec<Vec<Upd>>>,
    owners: Vec<Player>,
}

#[cfg(feature = "serde")]
impl From<GameGraph> for SerdeGameGraph {
    fn from(graph: GameGraph) -> Self {
        let mut adj = Vec::new();
        let mut weights = Vec::new();
        for v in 0..graph.n_vertices() {
            adj.push(graph.adj(v).to_vec());
            weights.push(graph.weights(v).iter().map(Update::to_vec).collect());
        }
        Self {
            conf: graph.conf,
            adj,
            weights,
            owners: graph.owners,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<SerdeGameGraph> for GameGraph {
    type Error = Error;
    fn try_from(deserialized: SerdeGameGraph) -> Result<Self> {
        let n_vertices = deserialized.adj.len();
        if deserialized.weights.len() != n_vertices {
            return Err(Error::MalformedLists);
        }
        let mut edges = Vec::new();
        for (from, (successors, weights)) in
            iter::zip(deserialized.adj, deserialized.weights).enumerate()
        {
            if successors.len() != weights.len() {
                return Err(Error::MalformedLists);
            }
            edges.extend(iter::zip(successors, weights).map(|(to, w)| (from as u32, to, w)));
        }
        GameGraph::new(n_vertices as u32, edges, deserialized.owners, deserialized.conf)
    }
}


/// Game graph with positions owned by either attacker or defender
/// and moves labelled with [`Update`]s.
///
/// Positions are identified by their index `0..n_vertices`.
/// Any further data describing a position stays with the caller, keyed by the same index.
/// Successors and predecessors are stored in compressed sparse row form,
/// so both directions can be looked up without scanning all moves.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SerdeGameGraph", into = "SerdeGameGraph"))]
pub struct GameGraph {
    // CSR graph representation. column_indices is all adjacency lists, flattened out
    column_indices: Vec<u32>,
    // row_offsets shows where each node's successors start in column_indices array
    row_offsets: Vec<u32>,
    // weights is structured like column_indices, they must have the same length
    weights: Vec<Update>,

    // Reverse edges of graph, also as CSR
    rev_column_indices: Vec<u32>,
    rev_row_offsets: Vec<u32>,

    owners: Vec<Player>,
    conf: EnergyConf,
}

// Cumulative sum of all list lengths. 0 is prepended manually
fn row_offsets<T>(lists: &[Vec<T>]) -> Vec<u32> {
    iter::once(0).chain(
        lists.iter()
        .scan(0, |state, list| {
            *state += list.len() as u32;
            Some(*state)
        }))
        .collect()
}

impl GameGraph {
    /// Build a game graph from a list of moves `(from, to, update)`.
    ///
    /// `owners` must contain one entry for every position.
    /// The graph is validated once here: all moves must connect existing positions
    /// and all updates must fit `conf`.
    ///
    /// # Example
    ///
    /// ```
    /// use energyequiv::*;
    ///
    /// let graph = GameGraph::new(
    ///     3,
    ///     vec![
    ///         (0, 1, update![-1]),
    ///         (0, 2, update![0, (1, 2)]),
    ///     ],
    ///     vec![Player::Attacker, Player::Defender, Player::Defender],
    ///     EnergyConf::STANDARD,
    /// ).unwrap();
    /// assert_eq!(graph.adj(0), &[1, 2]);
    /// assert!(graph.is_stuck(1));
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::OwnerCount`] if `owners` has the wrong length,
    /// [`Error::PositionOutOfRange`] if a move refers to a missing position and
    /// [`Error::InvalidUpdate`] if an update can not be built for `conf`.
    pub fn new<T>(
        n_vertices: u32,
        edges: Vec<(u32, u32, T)>,
        owners: Vec<Player>,
        conf: EnergyConf,
    ) -> Result<Self>
    where
        // Accept any type T for weights that can be turned into an Update
        Update: FromEnergyConf<T>,
    {
        if owners.len() != n_vertices as usize {
            return Err(Error::OwnerCount { expected: n_vertices as usize, found: owners.len() });
        }
        let mut adj = vec![vec![]; n_vertices as usize];
        let mut reverse = vec![vec![]; n_vertices as usize];
        let mut raw_weights = vec![vec![]; n_vertices as usize];
        for (from, to, e) in edges {
            if let Some(&position) = [from, to].iter().find(|&&v| v >= n_vertices) {
                return Err(Error::PositionOutOfRange { position, n_vertices });
            }
            let update = Update::from_conf(e, conf)
                .map_err(|_| Error::InvalidUpdate { from, to })?;
            adj[from as usize].push(to);
            reverse[to as usize].push(from);
            raw_weights[from as usize].push(update);
        }

        Ok(Self {
            row_offsets: row_offsets(&adj),
            column_indices: adj.into_iter().flatten().collect(),
            weights: raw_weights.into_iter().flatten().collect(),
            rev_row_offsets: row_offsets(&reverse),
            rev_column_indices: reverse.into_iter().flatten().collect(),
            owners,
            conf,
        })
    }

    pub fn empty(conf: EnergyConf) -> Self {
        Self {
            column_indices: Vec::new(),
            row_offsets: vec![0],
            weights: Vec::new(),
            rev_column_indices: Vec::new(),
            rev_row_offsets: vec![0],
            owners: Vec::new(),
            conf,
        }
    }

    #[inline]
    pub fn n_vertices(&self) -> u32 {
        self.owners.len() as u32
    }

    #[inline]
    pub fn n_edges(&self) -> usize {
        self.column_indices.len()
    }

    #[inline]
    pub fn get_conf(&self) -> EnergyConf {
        self.conf
    }

    #[inline]
    pub fn owner(&self, v: u32) -> Player {
        self.owners[v as usize]
    }

    /// Successors of `v`, one entry per move.
    #[inline]
    pub fn adj(&self, v: u32) -> &[u32] {
        let v = v as usize;
        &self.column_indices[self.row_offsets[v] as usize .. self.row_offsets[v + 1] as usize]
    }

    /// Updates of the moves leaving `v`, in the same order as [`adj()`](GameGraph::adj).
    #[inline]
    pub fn weights(&self, v: u32) -> &[Update] {
        let v = v as usize;
        &self.weights[self.row_offsets[v] as usize .. self.row_offsets[v + 1] as usize]
    }

    /// Predecessors of `v`, one entry per move.
    #[inline]
    pub fn reverse(&self, v: u32) -> &[u32] {
        let v = v as usize;
        &self.rev_column_indices[self.rev_row_offsets[v] as usize .. self.rev_row_offsets[v + 1] as usize]
    }

    /// All moves leaving `v` as pairs of target position and update.
    pub fn moves(&self, v: u32) -> impl Iterator<Item=(u32, &Update)> + '_ {
        iter::zip(self.adj(v).iter().copied(), self.weights(v))
    }

    /// Whether the defender is stuck in `v`, having no move left.
    ///
    /// # Panics
    ///
    /// Stuck-ness is only defined for defender positions,
    /// this panics if `v` belongs to the attacker.
    pub fn is_stuck(&self, v: u32) -> bool {
        assert_eq!(self.owner(v), Player::Defender, "Not a defender position: {v}");
        self.adj(v).is_empty()
    }
}


/// An energy game on a [`GameGraph`] together with the table of winning budgets.
///
/// The attacker wins by reaching any of the positions in `to_reach`.
/// After [`run()`](EnergyGame::run), `energies` holds for every position
/// the minimal energies the attacker needs to win from there.
/// An empty array means that the attacker can not win from that position at all.
#[derive(Debug, Clone)]
pub struct EnergyGame {
    pub graph: GameGraph,
    // One array of energies for each node
    pub energies: Vec<EnergyArray>,
    pub to_reach: Vec<u32>,
    start: u32,
    start_budget: Energy,
}

impl EnergyGame {

    // Automatically set nodes to be reached to all defense nodes without outgoing edges
    pub fn standard_reach(graph: GameGraph) -> Self {
        let to_reach = (0..graph.n_vertices())
            .filter(|&v| graph.owner(v) == Player::Defender && graph.is_stuck(v))
            .collect();
        Self::seeded(graph, to_reach)
    }

    /// Create a game where the attacker wins by reaching any position in `to_reach`.
    /// These positions are winning with zero energy and are never recomputed.
    ///
    /// The start position is 0 with an unbounded budget,
    /// see [`with_start()`](EnergyGame::with_start).
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfRange`] if a position in `to_reach` does not exist in `graph`.
    pub fn with_reach(graph: GameGraph, to_reach: Vec<u32>) -> Result<Self> {
        let n_vertices = graph.n_vertices();
        if let Some(&position) = to_reach.iter().find(|&&v| v >= n_vertices) {
            return Err(Error::PositionOutOfRange { position, n_vertices });
        }
        Ok(Self::seeded(graph, to_reach))
    }

    // Targets must be positions of the graph
    fn seeded(graph: GameGraph, to_reach: Vec<u32>) -> Self {
        let conf = graph.get_conf();
        let mut energies = vec![EnergyArray::empty(conf); graph.n_vertices() as usize];
        for v in &to_reach {
            energies[*v as usize] = EnergyArray::zero(1, conf);
        }
        EnergyGame {
            graph,
            energies,
            to_reach,
            start: 0,
            start_budget: Energy::infinity(conf),
        }
    }

    /// Set the start position and the energy budget the attacker starts with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfRange`] if `start` is not a position of the graph.
    ///
    /// # Panics
    ///
    /// Panics if `budget` has a different configuration than the graph.
    pub fn with_start(mut self, start: u32, budget: Energy) -> Result<Self> {
        if start >= self.graph.n_vertices() {
            return Err(Error::PositionOutOfRange { position: start, n_vertices: self.graph.n_vertices() });
        }
        assert_eq!(budget.get_conf(), self.graph.get_conf(), "Incompatible Energy configurations");
        self.start = start;
        self.start_budget = budget;
        Ok(self)
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub fn start_budget(&self) -> &Energy {
        &self.start_budget
    }

    /// Minimal winning budgets of the start position.
    /// Returns `None` if the graph has no positions.
    pub fn start_energies(&self) -> Option<&EnergyArray> {
        self.energies.get(self.start as usize)
    }

    /// Whether the start budget is enough for the attacker to win from the start position.
    /// Only meaningful after [`run()`](EnergyGame::run).
    pub fn attacker_wins(&self) -> bool {
        self.start_energies()
            .is_some_and(|energies| energies.covers(&self.start_budget))
    }

    /// Solve the game, computing the minimal winning budgets of every position.
    ///
    /// Returns the final energy table, indexed by position.
    pub fn run(&mut self) -> &[EnergyArray] {
        Runner::with_game(self).execute();
        // Return final energy table
        self.energies.as_slice()
    }
}


// Backward worklist iteration over the positions whose successors have changed.
struct Runner<'a> {
    game: &'a mut EnergyGame,
    worklist: Vec<u32>,
    // Whether a position is currently on the worklist
    queued: Vec<bool>,
    // Positions to reach keep their energies
    fixed: Vec<bool>,
}

impl<'a> Runner<'a> {

    fn with_game(game: &'a mut EnergyGame) -> Runner<'a> {
        let n_vertices = game.graph.n_vertices() as usize;
        let mut fixed = vec![false; n_vertices];
        for &v in &game.to_reach {
            fixed[v as usize] = true;
        }
        Runner {
            game,
            worklist: Vec::new(),
            queued: vec![false; n_vertices],
            fixed,
        }
    }

    fn initialize_visit_list(&mut self) {
        // We need to clone to_reach in order to call changed_node with &mut self
        let to_reach = self.game.to_reach.clone();
        for v in to_reach {
            self.changed_node(v);
        }
    }

    // Schedule all predecessors of a position with new energies
    fn changed_node(&mut self, v: u32) {
        for &w in self.game.graph.reverse(v) {
            if !self.queued[w as usize] && !self.fixed[w as usize] {
                self.queued[w as usize] = true;
                self.worklist.push(w);
            }
        }
    }

    fn execute(&mut self) {
        self.initialize_visit_list();
        debug!("Positions to reach: {}", self.game.to_reach.len());
        let mut iterations: u64 = 0;
        let mut changes: u64 = 0;
        while let Some(changed) = self.step() {
            iterations += 1;
            if changed {
                changes += 1;
            }
        }
        debug!("Fixpoint reached after {iterations} iterations with {changes} changes");
    }

    // Recompute the next position of the worklist and schedule its predecessors if it changed.
    // Returns None once the worklist is empty.
    fn step(&mut self) -> Option<bool> {
        let v = self.worklist.pop()?;
        self.queued[v as usize] = false;

        let new_energies = match self.game.graph.owner(v) {
            Player::Attacker => self.attack(v),
            Player::Defender => self.defend(v),
        };
        if new_energies == self.game.energies[v as usize] {
            return Some(false);
        }
        if log_enabled!(Trace) {
            trace!("Position {v} ({}): {} -> {}",
                self.game.graph.owner(v), self.game.energies[v as usize], new_energies);
        }
        self.game.energies[v as usize] = new_energies;
        self.changed_node(v);
        Some(true)
    }

    // The attacker picks one move, so every successor's energies pulled back
    // through the move are winning. Current energies are kept as candidates.
    fn attack(&self, v: u32) -> EnergyArray {
        let game = &*self.game;
        let candidates = game.graph.moves(v)
            .flat_map(|(w, update)| game.energies[w as usize].iter()
                .map(move |e| update.inverse(&e)));
        let current = game.energies[v as usize].iter();
        minimize(current.chain(candidates), game.graph.get_conf())
    }

    // The defender picks the move, so the energy must suffice for every successor.
    fn defend(&self, v: u32) -> EnergyArray {
        let game = &*self.game;
        let conf = game.graph.get_conf();

        // Options per distinct successor, in order of adjacency
        let mut options: Vec<Vec<Energy>> = Vec::new();
        let mut successor_idx: FxHashMap<u32, usize> = FxHashMap::default();
        for (w, update) in game.graph.moves(v) {
            let idx = *successor_idx.entry(w).or_insert_with(|| {
                options.push(Vec::new());
                options.len() - 1
            });
            options[idx].extend(game.energies[w as usize].iter().map(|e| update.inverse(&e)));
        }

        // The defender can escape to a successor that is not won (yet).
        // A position without moves is only winning if it is to be reached.
        if options.is_empty() || options.iter().any(Vec::is_empty) {
            return EnergyArray::empty(conf);
        }
        options.into_iter()
            .map(|option| minimize(option, conf))
            .reduce(|acc, next| combine(&acc, &next))
            .unwrap_or_else(|| EnergyArray::empty(conf))
    }
}
