use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Precomputed mine-adjacency counts, one per free cell.
///
/// Built exactly once, after the mine layout is fixed and before the
/// first reveal; mines carry `None` since their hint is meaningless.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HintGrid {
    hints: Array2<Option<u8>>,
}

impl HintGrid {
    /// Counts mine neighbors for every free cell, zeros included.
    /// O(rows * cols), eight neighbor probes per cell.
    pub fn build(layout: &MineLayout) -> Self {
        let size = layout.size();
        let mut hints = Array2::from_elem(size.to_nd_index(), None);

        let (row_end, col_end) = size;
        for row in 0..row_end {
            for col in 0..col_end {
                let coords = (row, col);
                if !layout.contains_mine(coords) {
                    hints[coords.to_nd_index()] = Some(layout.adjacent_mine_count(coords));
                }
            }
        }

        Self { hints }
    }

    /// Hint for `coords`; `None` for mines and out-of-bounds lookups.
    pub fn hint_of(&self, coords: Coord2) -> Option<u8> {
        self.hints.get(coords.to_nd_index()).copied().flatten()
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.hints.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }
}
