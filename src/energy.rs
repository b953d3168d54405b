use std::fmt;
use std::cmp::Ordering;
use std::iter;

use rustc_hash::FxHashSet;
use ndarray::{Array2, ArrayView1, aview1};

macro_rules! fn_get_conf {
    () => {
        pub fn get_conf(&self) -> EnergyConf {
            self.conf
        }
    };
}

pub trait FromEnergyConf<T>: Sized {
    type Error: std::fmt::Debug;
    fn from_conf(a: T, conf: EnergyConf) -> Result<Self, Self::Error>;
}

/// Component value standing for an unbounded amount of energy.
pub const INFINITY: i64 = i64::MAX;

/// Dimensionality shared by all energies and updates of one game.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyConf {
    pub elements: u32,
}

impl EnergyConf {
    pub const STANDARD: Self = EnergyConf { elements: 6 };
    pub const SILENT_STEP: Self = EnergyConf { elements: 8 };
    pub const ONE_DIMENSION: Self = EnergyConf { elements: 1 };

    // Number of i64's required to store all elements
    #[inline]
    pub fn energy_size(&self) -> usize {
        self.elements as usize
    }

    fn contains_dimension(&self, idx: u32) -> bool {
        (1..=self.elements).contains(&idx)
    }
}


/// A budget vector over the integers extended by [`INFINITY`].
///
/// Energies are compared by dominance: `a <= b` holds iff every component of `a` is at most the
/// corresponding component of `b`, meaning `a` is at least as good for the attacker.
/// Incomparable energies yield `None` from [`partial_cmp()`](PartialOrd::partial_cmp).
///
/// All arithmetic returns a fresh energy and never modifies `self`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Energy {
    data: Vec<i64>,
    conf: EnergyConf,
}

impl Energy {
    /// Create an energy from its components.
    /// Missing trailing components are filled with 0.
    ///
    /// Returns `None` if there are more values than `conf` has elements.
    pub fn new(values: &[i64], conf: EnergyConf) -> Option<Self> {
        if values.len() > conf.energy_size() {
            return None;
        }
        let mut data = values.to_vec();
        data.resize(conf.energy_size(), 0);
        Some(Self { data, conf })
    }

    /// # Panics
    ///
    /// Panics if `data` does not have exactly one value per element of `conf`.
    pub fn from_raw_data(data: &[i64], conf: EnergyConf) -> Self {
        assert_eq!(data.len(), conf.energy_size());
        Self {
            data: data.to_vec(),
            conf,
        }
    }

    pub fn raw_data(&self) -> &[i64] {
        &self.data
    }

    pub fn zero(conf: EnergyConf) -> Self {
        Energy {
            data: vec![0; conf.energy_size()],
            conf,
        }
    }

    /// The all-∞ energy, an unconstrained attacker budget.
    pub fn infinity(conf: EnergyConf) -> Self {
        Energy {
            data: vec![INFINITY; conf.energy_size()],
            conf,
        }
    }

    pub fn to_vec(&self) -> Vec<i64> {
        self.data.clone()
    }

    /// Dominance `self ⪯ other`: `self` needs no more energy than `other` in any dimension.
    ///
    /// # Panics
    ///
    /// Panics if both energies have different configurations.
    pub fn dominates(&self, other: &Energy) -> bool {
        assert_eq!(self.conf, other.conf, "Incompatible Energy configurations");
        iter::zip(&self.data, &other.data).all(|(e0, e1)| e0 <= e1)
    }

    /// Componentwise maximum (supremum) of two energies.
    ///
    /// # Panics
    ///
    /// Panics if both energies have different configurations.
    pub fn sup(&self, other: &Energy) -> Energy {
        assert_eq!(self.conf, other.conf, "Incompatible Energy configurations");
        Energy {
            data: iter::zip(&self.data, &other.data)
                .map(|(&e0, &e1)| e0.max(e1))
                .collect(),
            conf: self.conf,
        }
    }

    /// Subtract `delta` from component `idx` (0-indexed).
    /// Infinite components stay infinite. The result may become negative.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn apply_delta(&self, idx: usize, delta: i64) -> Energy {
        let mut data = self.data.clone();
        if data[idx] != INFINITY {
            data[idx] = data[idx].saturating_sub(delta);
        }
        Energy { data, conf: self.conf }
    }

    /// An energy that is zero everywhere except for the 1-indexed dimensions `a` and `b`,
    /// which both hold the value of component `idx` (0-indexed) of `self`.
    ///
    /// # Panics
    ///
    /// Panics if any of the indices is out of range.
    pub fn branch_contribute(&self, idx: usize, a: u32, b: u32) -> Energy {
        assert!(self.conf.contains_dimension(a) && self.conf.contains_dimension(b),
            "Branch dimensions ({a}, {b}) out of range");
        let mut data = vec![0; self.conf.energy_size()];
        data[a as usize - 1] = self.data[idx];
        data[b as usize - 1] = self.data[idx];
        Energy { data, conf: self.conf }
    }

    fn_get_conf!();
}

impl PartialOrd for Energy {
    // Element-wise partial comparison between two energy tuples
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        assert_eq!(self.conf, other.conf, "Incompatible Energy configurations");
        let mut less = true;
        let mut greater = true;
        for (e0, e1) in iter::zip(&self.data, &other.data) {
            match e0.cmp(e1) {
                Ordering::Less => greater = false,
                Ordering::Greater => less = false,
                Ordering::Equal => {},
            }
        }
        match (less, greater) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, &val) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if val == INFINITY {
                write!(f, "∞")?;
            } else {
                write!(f, "{val}")?;
            }
        }
        write!(f, ")")
    }
}


/// A set of energies, stored as the rows of a matrix.
///
/// In a solved game each position holds one `EnergyArray`
/// containing the minimal winning budgets of the attacker, an antichain.
/// Equality does not depend on the order of the rows.
#[derive(Debug, Clone, Eq)]
pub struct EnergyArray {
    array: Array2<i64>,
    conf: EnergyConf,
}

impl EnergyArray {
    pub fn empty(conf: EnergyConf) -> Self {
        Self::zero(0, conf)
    }

    pub fn zero(n: usize, conf: EnergyConf) -> Self {
        let array = Array2::zeros((n, conf.energy_size()));
        Self {
            array,
            conf,
        }
    }

    pub fn get(&self, idx: usize) -> Option<Energy> {
        if idx >= self.array.nrows() {
            return None;
        }
        Some(Energy::from_raw_data(&self.array.row(idx).to_vec(), self.conf))
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn n_energies(&self) -> usize {
        self.array.nrows()
    }

    pub fn iter(&self) -> impl Iterator<Item=Energy> + '_ {
        self.array.rows().into_iter().map(|row|
            Energy::from_raw_data(&row.to_vec(), self.conf))
    }

    /// Test whether `budget` suffices for the attacker to win.
    ///
    /// This assumes that `self` holds the minimal winning budgets of a position,
    /// the minimal points of an upward-closed set. The budget is winning if it lies above
    /// (or equal to) one of these points.
    /// An empty array is covered by no budget at all.
    ///
    /// # Panics
    ///
    /// If `self` and `budget` do not have the same [`EnergyConf`].
    pub fn covers(&self, budget: &Energy) -> bool {
        assert_eq!(self.conf, budget.conf, "Incompatible Energy configurations");
        self.iter().any(|e| &e <= budget)
    }

    // Pack energies that are known to share the configuration `conf`.
    pub(crate) fn from_energies(energies: &[Energy], conf: EnergyConf) -> Self {
        let mut array = Array2::zeros((energies.len(), conf.energy_size()));
        for (mut row, energy) in array.rows_mut().into_iter().zip(energies) {
            assert_eq!(energy.conf, conf, "Incompatible Energy configurations");
            row.assign(&aview1(&energy.data));
        }
        Self { array, conf }
    }

    fn_get_conf!();
}

impl PartialEq for EnergyArray {
    // Compare the sets of rows, without regard to ordering or repetition
    fn eq(&self, other: &Self) -> bool {
        if self.conf != other.conf {
            return false;
        }
        let rows: FxHashSet<ArrayView1<i64>> = self.array.rows().into_iter().collect();
        let other_rows: FxHashSet<ArrayView1<i64>> = other.array.rows().into_iter().collect();
        rows == other_rows
    }
}

impl fmt::Display for EnergyArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, energy) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{energy}")?;
        }
        write!(f, "]")
    }
}

impl FromEnergyConf<&[Vec<i64>]> for EnergyArray {
    type Error = &'static str;
    fn from_conf(energies: &[Vec<i64>], conf: EnergyConf) -> Result<Self, Self::Error> {
        let energies: Option<Vec<Energy>> = energies.iter()
            .map(|values| Energy::new(values, conf))
            .collect();
        let energies = energies.ok_or("Energies don't match configuration")?;
        Ok(Self::from_energies(&energies, conf))
    }
}


/// A single element of an [`Update`]-tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum Upd {
    /// Relative update: moving costs this much energy in the dimension.
    Delta(i64),
    /// The value of this dimension must be reserved in both of the given 1-indexed dimensions.
    Branch(u32, u32),
}

impl Default for Upd {
    fn default() -> Self {
        Upd::Delta(0)
    }
}

impl fmt::Display for Upd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upd::Delta(delta) => write!(f, "{delta}"),
            Upd::Branch(a, b) => write!(f, "Branch({a}, {b})"),
        }
    }
}

impl From<i64> for Upd {
    /// Plain integers are relative updates:
    ///
    /// -1 => Decrement update
    /// 0  => No update
    fn from(delta: i64) -> Upd {
        Upd::Delta(delta)
    }
}

impl From<(u32, u32)> for Upd {
    /// Pairs of 1-indexed dimensions are branch updates.
    fn from((a, b): (u32, u32)) -> Upd {
        Upd::Branch(a, b)
    }
}


/// The update rule labelling a move, one [`Upd`] per dimension.
#[derive(Clone, PartialEq, Eq)]
pub struct Update {
    data: Vec<Upd>,
    conf: EnergyConf,
}

impl Update {
    /// Create an update from its entries.
    /// Missing trailing entries are filled with `Upd::Delta(0)`.
    ///
    /// Returns `None` if there are more entries than `conf` has elements,
    /// or if a branch entry names a dimension outside of `conf`.
    pub fn new(values: &[Upd], conf: EnergyConf) -> Option<Self> {
        if values.len() > conf.energy_size() {
            return None;
        }
        for val in values {
            if let Upd::Branch(a, b) = *val {
                // Upd::Branch is 1-indexed
                if !conf.contains_dimension(a) || !conf.contains_dimension(b) {
                    return None;
                }
            }
        }
        let mut data = values.to_vec();
        data.resize(conf.energy_size(), Upd::default());
        Some(Self { data, conf })
    }

    pub fn zero(conf: EnergyConf) -> Self {
        Self {
            data: vec![Upd::default(); conf.energy_size()],
            conf,
        }
    }

    pub fn to_vec(&self) -> Vec<Upd> {
        self.data.clone()
    }

    /// Compute the minimal energy needed before taking a move with this update,
    /// so that at least `post` is left afterwards.
    ///
    /// Relative entries are subtracted from their own dimension.
    /// Each branch entry yields an energy reserving the dimension's value of `post` in both named
    /// dimensions. The result is the supremum of the adjusted `post` and all branch energies.
    /// A negative component means the requirement is already met by the move,
    /// so it is raised to 0.
    ///
    /// # Panics
    ///
    /// Panics if `post` has a different configuration than this update.
    pub fn inverse(&self, post: &Energy) -> Energy {
        assert_eq!(self.conf, post.conf, "Incompatible Energy configurations");
        let mut adjusted = post.clone();
        let mut branches = Vec::new();
        for (i, upd) in self.data.iter().enumerate() {
            match *upd {
                Upd::Delta(0) => {},
                Upd::Delta(delta) => adjusted = adjusted.apply_delta(i, delta),
                Upd::Branch(a, b) => branches.push(post.branch_contribute(i, a, b)),
            }
        }
        let mut pre = branches.iter().fold(adjusted, |sup, part| sup.sup(part));
        for e in pre.data.iter_mut() {
            *e = (*e).max(0);
        }
        pre
    }

    fn_get_conf!();
}

impl fmt::Debug for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.data.first().copied().unwrap_or_default())?;
        for e in self.data.iter().skip(1) {
            write!(f, " {e}")?;
        }
        write!(f, ">")
    }
}

/// Build a list of [`Upd`] entries from integers (relative updates)
/// and pairs of dimensions (branch updates):
///
/// ```
/// use energyequiv::{update, Upd};
///
/// assert_eq!(update![0, -1, (1, 3)], vec![Upd::Delta(0), Upd::Delta(-1), Upd::Branch(1, 3)]);
/// ```
#[macro_export]
macro_rules! update {
    ( $( $x:expr ),* ) => {
        vec![ $( $crate::Upd::from($x), )* ]
    };
}

impl FromEnergyConf<Update> for Update {
    type Error = &'static str;
    fn from_conf(update: Update, conf: EnergyConf) -> Result<Self, Self::Error> {
        if update.conf != conf {
            return Err("EnergyConf of update doesn't match provided EnergyConf");
        }
        Ok(update)
    }
}

impl FromEnergyConf<&[Upd]> for Update {
    type Error = &'static str;
    fn from_conf(upds: &[Upd], conf: EnergyConf) -> Result<Self, Self::Error> {
        Update::new(upds, conf).ok_or("Update doesn't match configuration")
    }
}

impl FromEnergyConf<Vec<Upd>> for Update {
    type Error = &'static str;
    fn from_conf(upds: Vec<Upd>, conf: EnergyConf) -> Result<Self, Self::Error> {
        Self::from_conf(upds.as_slice(), conf)
    }
}

impl FromEnergyConf<Vec<i64>> for Update {
    type Error = &'static str;
    fn from_conf(deltas: Vec<i64>, conf: EnergyConf) -> Result<Self, Self::Error> {
        let upds: Vec<Upd> = deltas.into_iter().map(Upd::from).collect();
        Self::from_conf(upds.as_slice(), conf)
    }
}
