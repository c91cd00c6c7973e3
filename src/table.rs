use std::hash::Hash;

use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use ndarray::Array1;

/// State -> per-action values, one `Array1<f64>` of `action_count` entries
/// per state.
///
/// Entries are created lazily: [`get`](Self::get), [`get_mut`](Self::get_mut)
/// and [`set`](Self::set) insert an all-zero entry the first time a state is
/// seen, so the key set of the table is exactly the set of states that have
/// been touched. [`peek`](Self::peek) reads without inserting. Keys iterate
/// in insertion order.
///
/// Action indices at or above `action_count` panic.
#[derive(Debug, Clone)]
pub struct ActionTable<S: Hash + Eq> {
    action_count: usize,
    entries: IndexMap<S, Array1<f64>, FxBuildHasher>,
}

/// Action values `Q(s, a)`.
pub type ValueTable<S> = ActionTable<S>;
/// Eligibility traces `e(s, a)`.
pub type TraceTable<S> = ActionTable<S>;

impl<S: Hash + Eq + Clone> ActionTable<S> {
    pub fn new(action_count: usize) -> Self {
        Self {
            action_count,
            entries: IndexMap::with_hasher(FxBuildHasher::default()),
        }
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }

    pub fn get(&mut self, state: &S) -> &Array1<f64> {
        self.get_mut(state)
    }

    pub fn get_mut(&mut self, state: &S) -> &mut Array1<f64> {
        let action_count: usize = self.action_count;
        self.entries
            .entry(state.clone())
            .or_insert_with(|| Array1::zeros(action_count))
    }

    pub fn set(&mut self, state: &S, action: usize, value: f64) {
        self.get_mut(state)[action] = value;
    }

    pub fn peek(&self, state: &S) -> Option<&Array1<f64>> {
        self.entries.get(state)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.entries.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &Array1<f64>)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&S, &mut Array1<f64>)> {
        self.entries.iter_mut()
    }

    /// Zeroes every entry, keeping the key set.
    pub fn fill_zero(&mut self) {
        for values in self.entries.values_mut() {
            values.fill(0.0);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
