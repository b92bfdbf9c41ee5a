use ndarray::Array2;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`, zero-indexed.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// True iff `coords` lies inside a `size`-shaped grid.
pub const fn in_bounds(coords: Coord2, size: Coord2) -> bool {
    coords.0 < size.0 && coords.1 < size.1
}

/// Row-major index into backing storage, `None` when out of bounds.
pub fn linear_index(coords: Coord2, size: Coord2) -> Option<CellCount> {
    if !in_bounds(coords, size) {
        return None;
    }
    Some(coords.0 as CellCount * size.1 as CellCount + coords.1 as CellCount)
}

/// Inverse of [`linear_index`] for indices in `[0, rows * cols)`.
pub fn coords_of(index: CellCount, size: Coord2) -> Coord2 {
    let cols = size.1 as CellCount;
    ((index / cols) as Coord, (index % cols) as Coord)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let dim = self.dim();
        let size = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        NeighborIter::new(index, size)
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (dr, dc) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(dr.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dc.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

/// Walks the up-to-eight cells around a center, in the fixed
/// [`DISPLACEMENTS`] order, skipping positions that fall off the grid.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_iter_respects_grid_edges() {
        let grid: Array2<bool> = Array2::default([3, 3]);

        let corner: Vec<_> = grid.iter_neighbors((0, 0)).collect();
        assert_eq!(corner, vec![(0, 1), (1, 0), (1, 1)]);

        let edge: Vec<_> = grid.iter_neighbors((0, 1)).collect();
        assert_eq!(edge.len(), 5);

        let center: Vec<_> = grid.iter_neighbors((1, 1)).collect();
        assert_eq!(center.len(), 8);
    }

    #[test]
    fn linear_index_uses_none_as_out_of_bounds_sentinel() {
        let size = (4, 3);
        assert_eq!(linear_index((0, 0), size), Some(0));
        assert_eq!(linear_index((1, 2), size), Some(5));
        assert_eq!(linear_index((4, 0), size), None);
        assert_eq!(linear_index((0, 3), size), None);

        assert_eq!(coords_of(5, size), (1, 2));
        assert_eq!(coords_of(11, size), (3, 2));
    }
}
