// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared column widths of aligned panels.

use alloc::collections::BTreeMap;

/// Per-render widths of aligned columns, keyed by `(panel, column)`.
///
/// The base pass clears the grid, folds in the width of every measured aligned face, and
/// seals the grid once its stream is exhausted. Aligned panels only read a sealed grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlignedGridState {
    widths: BTreeMap<(u32, usize), f64>,
    sealed: bool,
}

impl AlignedGridState {
    /// An empty, unsealed grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every width and unseal.
    pub fn clear(&mut self) {
        self.widths.clear();
        self.sealed = false;
    }

    /// Whether a complete base pass has measured the grid.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    /// Widen a column to at least `width`.
    pub(crate) fn fold(&mut self, panel: u32, column: usize, width: f64) {
        debug_assert!(!self.sealed, "a sealed grid is read-only");
        let w = self.widths.entry((panel, column)).or_insert(0.0);
        *w = w.max(width);
    }

    /// Width of a column, or `None` when nothing was measured in it.
    pub fn width(&self, panel: u32, column: usize) -> Option<f64> {
        self.widths.get(&(panel, column)).copied()
    }

    /// Start of a column relative to the panel's first column.
    pub fn offset(&self, panel: u32, column: usize) -> f64 {
        self.widths
            .range((panel, 0)..(panel, column))
            .map(|(_, w)| w)
            .sum()
    }

    /// Total width of a panel.
    pub fn panel_width(&self, panel: u32) -> f64 {
        self.columns(panel).map(|(_, w)| w).sum()
    }

    /// Measured columns of a panel in ascending order.
    pub fn columns(&self, panel: u32) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.widths
            .range((panel, 0)..=(panel, usize::MAX))
            .map(|(&(_, c), &w)| (c, w))
    }

    /// Number of measured columns over all panels.
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Whether no column was measured.
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn fold_keeps_the_maximum() {
        let mut g = AlignedGridState::new();
        g.fold(1, 0, 2.0);
        g.fold(1, 0, 5.0);
        g.fold(1, 0, 3.0);
        g.fold(1, 2, 1.5);
        g.fold(2, 0, 9.0);
        assert_eq!(g.width(1, 0), Some(5.0));
        assert_eq!(g.width(1, 1), None);
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn offsets_sum_previous_columns_of_the_same_panel() {
        let mut g = AlignedGridState::new();
        g.fold(1, 0, 2.0);
        g.fold(1, 1, 3.0);
        g.fold(1, 3, 4.0);
        g.fold(2, 0, 100.0);
        assert_eq!(g.offset(1, 0), 0.0);
        assert_eq!(g.offset(1, 1), 2.0);
        assert_eq!(g.offset(1, 3), 5.0);
        assert_eq!(g.offset(2, 1), 100.0);
        assert_eq!(g.panel_width(1), 9.0);
        assert_eq!(
            g.columns(1).collect::<Vec<_>>(),
            [(0, 2.0), (1, 3.0), (3, 4.0)]
        );
    }

    #[test]
    fn clear_unseals() {
        let mut g = AlignedGridState::new();
        g.fold(1, 0, 1.0);
        g.seal();
        assert!(g.is_sealed());
        g.clear();
        assert!(!g.is_sealed() && g.is_empty());
    }
}
