/*
 * binding.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Repeat and table binding state carried through expansion.
//!
//! A subtree starts [`BindingState::Unbound`]. Expanding a `repeat` binds
//! the index and expanding a `table` binds the coordinates; each dimension
//! moves from unbound to bound at most once, so a directive nested inside an
//! already-bound subtree is inert.

/// A table coordinate, stored column first.
///
/// Expressions see the slots positionally: `row` reads slot 0 and `col`
/// reads slot 1. A clone produced at loop position (row 4, col 2) therefore
/// evaluates `"{row}/{col}"` to `"2/4"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCoords(pub usize, pub usize, pub usize);

impl TableCoords {
    /// Coordinates for the table loop position `(row, col, dim)`.
    pub fn at(row: usize, col: usize, dim: usize) -> Self {
        TableCoords(col, row, dim)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Unbound,
    IndexBound,
    CoordsBound,
    FullyBound,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Binding {
    index: Option<usize>,
    coords: Option<TableCoords>,
}

impl Binding {
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BindingState {
        match (self.index, self.coords) {
            (None, None) => BindingState::Unbound,
            (Some(_), None) => BindingState::IndexBound,
            (None, Some(_)) => BindingState::CoordsBound,
            (Some(_), Some(_)) => BindingState::FullyBound,
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn coords(&self) -> Option<TableCoords> {
        self.coords
    }

    pub fn is_index_bound(&self) -> bool {
        self.index.is_some()
    }

    pub fn is_coords_bound(&self) -> bool {
        self.coords.is_some()
    }

    /// Bind the repeat index. An already-bound index is kept.
    pub fn bind_index(self, index: usize) -> Self {
        Self {
            index: self.index.or(Some(index)),
            ..self
        }
    }

    /// Bind the table coordinates. Already-bound coordinates are kept.
    pub fn bind_coords(self, coords: TableCoords) -> Self {
        Self {
            coords: self.coords.or(Some(coords)),
            ..self
        }
    }

    /// The `index`, `row`, `col` and `dim` values exposed to expressions,
    /// zero where unbound.
    pub fn variables(&self) -> [(&'static str, usize); 4] {
        let TableCoords(first, second, dim) = self.coords.unwrap_or(TableCoords(0, 0, 0));
        [
            ("index", self.index.unwrap_or(0)),
            ("row", first),
            ("col", second),
            ("dim", dim),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let binding = Binding::unbound();
        assert_eq!(binding.state(), BindingState::Unbound);

        let indexed = binding.bind_index(3);
        assert_eq!(indexed.state(), BindingState::IndexBound);

        let full = indexed.bind_coords(TableCoords::at(1, 2, 0));
        assert_eq!(full.state(), BindingState::FullyBound);
        assert_eq!(
            binding.bind_coords(TableCoords::at(0, 0, 0)).state(),
            BindingState::CoordsBound
        );
    }

    #[test]
    fn test_binding_is_set_once() {
        let binding = Binding::unbound().bind_index(2).bind_index(7);
        assert_eq!(binding.index(), Some(2));

        let binding = binding
            .bind_coords(TableCoords::at(1, 1, 1))
            .bind_coords(TableCoords::at(4, 4, 4));
        assert_eq!(binding.coords(), Some(TableCoords(1, 1, 1)));
    }

    #[test]
    fn test_variables_read_slots_positionally() {
        let binding = Binding::unbound().bind_coords(TableCoords::at(4, 2, 1));
        assert_eq!(
            binding.variables(),
            [("index", 0), ("row", 2), ("col", 4), ("dim", 1)]
        );
    }

    #[test]
    fn test_unbound_variables_are_zero() {
        assert_eq!(
            Binding::unbound().variables(),
            [("index", 0), ("row", 0), ("col", 0), ("dim", 0)]
        );
    }
}
