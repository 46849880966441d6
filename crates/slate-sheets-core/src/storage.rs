//! Sparse storage for sheet data
//!
//! Two layers:
//! - [`IndexedMap`] - a one-dimensional sparse map with O(1) lookup and an
//!   independently maintained ascending index list for ordered traversal
//! - [`Grid`] - the row-major two-dimensional composition used for cells
//!
//! Only occupied slots cost memory, so the footprint is independent of how
//! far apart the occupied positions are.

use std::collections::hash_map::Entry;
use std::hash::Hash;

use ahash::AHashMap;

use crate::position::{Position, Size};

/// Sparse map from an integer index to a value
///
/// Lookup goes through the hash map; ordered traversal goes through the
/// index list. Invariant: the key set of the map equals the member set of
/// the index list, and the list is strictly ascending.
#[derive(Debug, Clone)]
pub struct IndexedMap<I, T> {
    /// Access by index
    data: AHashMap<I, T>,
    /// Occupied indices in ascending order
    indices: Vec<I>,
}

impl<I, T> IndexedMap<I, T>
where
    I: Copy + Ord + Hash,
{
    /// Create a new empty map
    pub fn new() -> Self {
        Self {
            data: AHashMap::new(),
            indices: Vec::new(),
        }
    }

    /// Get a value by index
    pub fn get(&self, index: I) -> Option<&T> {
        self.data.get(&index)
    }

    /// Get a mutable value by index
    pub fn get_mut(&mut self, index: I) -> Option<&mut T> {
        self.data.get_mut(&index)
    }

    /// Check whether an index is occupied
    pub fn contains(&self, index: I) -> bool {
        self.data.contains_key(&index)
    }

    /// Insert or overwrite a value, returning the displaced value
    ///
    /// A fresh index is spliced into the index list by binary search.
    pub fn insert(&mut self, index: I, value: T) -> Option<T> {
        let displaced = self.data.insert(index, value);
        if displaced.is_none() {
            if let Err(slot) = self.indices.binary_search(&index) {
                self.indices.insert(slot, index);
            }
        }
        displaced
    }

    /// Get a value by index, inserting a default first if absent
    pub fn get_or_insert_with<F: FnOnce() -> T>(&mut self, index: I, default: F) -> &mut T {
        match self.data.entry(index) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                if let Err(slot) = self.indices.binary_search(&index) {
                    self.indices.insert(slot, index);
                }
                entry.insert(default())
            }
        }
    }

    /// Remove an entry, returning its value; `None` if the index is absent
    pub fn remove(&mut self, index: I) -> Option<T> {
        let removed = self.data.remove(&index)?;
        if let Ok(slot) = self.indices.binary_search(&index) {
            self.indices.remove(slot);
        }
        debug_assert_eq!(self.data.len(), self.indices.len());
        Some(removed)
    }

    /// Number of occupied indices
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.data.len(), self.indices.len());
        self.data.len()
    }

    /// Check whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.data.clear();
        self.indices.clear();
    }

    /// Smallest occupied index
    pub fn front_index(&self) -> Option<I> {
        self.indices.first().copied()
    }

    /// Largest occupied index
    pub fn back_index(&self) -> Option<I> {
        self.indices.last().copied()
    }

    /// Occupied indices in ascending order
    pub fn indices(&self) -> &[I] {
        &self.indices
    }

    /// Iterate over (index, value) pairs in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.indices
            .iter()
            .filter_map(move |&i| self.data.get(&i).map(|v| (i, v)))
    }
}

impl<I, T> Default for IndexedMap<I, T>
where
    I: Copy + Ord + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Sparse row-major grid keyed by [`Position`]
///
/// Structure: `IndexedMap<row, IndexedMap<col, T>>`. Rows that empty out
/// are removed, so an occupied row always has at least one occupied column.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    rows: IndexedMap<u32, IndexedMap<u16, T>>,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Grid<T> {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            rows: IndexedMap::new(),
        }
    }

    /// Get the value at a position
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col))
    }

    /// Get a mutable value at a position
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.rows
            .get_mut(pos.row)
            .and_then(|row| row.get_mut(pos.col))
    }

    /// Insert or overwrite the value at a position
    pub fn set(&mut self, pos: Position, value: T) -> Option<T> {
        self.rows
            .get_or_insert_with(pos.row, IndexedMap::new)
            .insert(pos.col, value)
    }

    /// Remove the value at a position, cleaning up the row if it empties
    pub fn remove(&mut self, pos: Position) -> Option<T> {
        let row = self.rows.get_mut(pos.row)?;
        let removed = row.remove(pos.col);
        if row.is_empty() {
            self.rows.remove(pos.row);
        }
        removed
    }

    /// Number of occupied slots
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|(_, row)| row.len()).sum()
    }

    /// Check whether the grid is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Remove all slots
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Iterate in ascending row order, ascending column within a row
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        self.rows.iter().flat_map(|(row, cols)| {
            cols.iter().map(move |(col, value)| (Position::new(row, col), value))
        })
    }

    /// Printable bounding box over slots satisfying `occupied`
    ///
    /// Returns one past the largest occupied row and column, or (0, 0) when
    /// nothing qualifies. The predicate lets callers exclude slots that are
    /// materialised but present no content.
    pub fn printable_size<F>(&self, occupied: F) -> Size
    where
        F: Fn(&T) -> bool,
    {
        let mut size = Size::default();
        for (pos, value) in self.iter() {
            if occupied(value) {
                size.rows = size.rows.max(pos.row + 1);
                size.cols = size.cols.max(pos.col + 1);
            }
        }
        size
    }
}
