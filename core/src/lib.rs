use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use hints::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod hints;
mod types;

/// Fraction of the board that becomes mines when no explicit count is given.
pub const DEFAULT_MINE_DENSITY: f64 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new((rows, cols): Coord2, mines: CellCount) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        let mines = mines.min(mult(rows, cols));
        Self::new_unchecked((rows, cols), mines)
    }

    /// Board whose mine count is `floor(rows * cols * density)`.
    ///
    /// Degenerate inputs are clamped rather than rejected: the density is
    /// forced into `[0, 1]` and the size to at least one cell per axis.
    pub fn from_density(size: Coord2, density: f64) -> Self {
        if !(0.0..1.0).contains(&density) {
            log::warn!("mine density {} outside [0, 1), clamping", density);
        }
        let density = density.clamp(0.0, 1.0);
        let rows = size.0.clamp(1, Coord::MAX);
        let cols = size.1.clamp(1, Coord::MAX);
        let mines = (f64::from(mult(rows, cols)) * density).floor() as CellCount;
        Self::new((rows, cols), mines)
    }

    /// Default board for a viewport that fits `size` cells.
    pub fn with_default_density(size: Coord2) -> Self {
        Self::from_density(size, DEFAULT_MINE_DENSITY)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Where the mines are. Fixed once generated; the rest of the game only
/// ever asks for membership and neighbor counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if linear_index(coords, size).is_none() {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mine_mask.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }

    /// Coordinates of every mine, in row-major order.
    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mine_coords_rejects_out_of_bounds_mines() {
        let result = MineLayout::from_mine_coords((2, 2), &[(0, 0), (2, 0)]);
        assert_eq!(result.unwrap_err(), GameError::InvalidCoords);
    }

    #[test]
    fn layout_counts_and_lists_its_mines() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (1, 1)]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 7);
        assert!(layout.contains_mine((1, 1)));
        assert!(!layout.contains_mine((2, 2)));
        assert_eq!(layout.iter_mines().collect::<Vec<_>>(), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn adjacent_mine_count_checks_all_eight_neighbors() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (1, 1)]).unwrap();

        assert_eq!(layout.adjacent_mine_count((0, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((2, 2)), 1);
        assert_eq!(layout.adjacent_mine_count((2, 0)), 1);
    }
}
