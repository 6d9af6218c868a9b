//! # Tile Grid
//!
//! Dense 2D cell storage addressed by signed local coordinates.
//!
//! Cells are stored row-major at `y * width + x`. Every accessor accepts
//! coordinates outside the grid: reads yield `None`, writes are ignored.
//! Signed coordinates let callers probe `x - 1` at the left edge without
//! any casting gymnastics.

/// A fixed-size 2D grid of optional cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid<T> {
    width: usize,
    height: usize,
    cells: Vec<Option<T>>,
}

impl<T> TileGrid<T> {
    /// Creates a grid where every cell is unset.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        cells.resize_with(width * height, || None);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns true if `(x, y)` lies inside `[0, width) x [0, height)`.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.width + x as usize)
    }

    /// Reads a cell. `None` when out of bounds or unset.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index(x, y).and_then(|i| self.cells[i].as_ref())
    }

    /// Writes a cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Some(value);
        }
    }

    /// Unsets a cell and returns what was there.
    #[inline]
    pub fn take(&mut self, x: i32, y: i32) -> Option<T> {
        self.index(x, y).and_then(|i| self.cells[i].take())
    }

    /// Unsets every cell.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    /// Iterates `(x, y, cell)` for every set cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &T)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref()
                .map(|value| ((i % width) as i32, (i / width) as i32, value))
        })
    }

    /// Number of set cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

impl<T: Clone> TileGrid<T> {
    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.iter_mut().for_each(|cell| *cell = Some(value.clone()));
    }
}

impl<T: Copy> TileGrid<T> {
    /// Reads a cell by value.
    #[inline]
    #[must_use]
    pub fn get_copied(&self, x: i32, y: i32) -> Option<T> {
        self.get(x, y).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_absent() {
        let mut grid: TileGrid<u8> = TileGrid::new(4, 3);
        grid.fill(1);

        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(0, -1), None);
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 3), None);
        assert_eq!(grid.get(i32::MIN, i32::MAX), None);
        assert_eq!(grid.get(3, 2), Some(&1));
    }

    #[test]
    fn test_out_of_bounds_write_is_ignored() {
        let mut grid: TileGrid<u8> = TileGrid::new(4, 3);
        grid.set(-1, 0, 9);
        grid.set(4, 2, 9);
        grid.set(0, 3, 9);
        assert_eq!(grid.occupied(), 0);
        assert_eq!(grid.take(10, 10), None);
    }

    #[test]
    fn test_row_major_layout() {
        let mut grid = TileGrid::new(3, 2);
        grid.set(2, 1, 'z');
        grid.set(0, 1, 'a');

        let cells: Vec<_> = grid.iter().collect();
        assert_eq!(cells, vec![(0, 1, &'a'), (2, 1, &'z')]);
    }

    #[test]
    fn test_take_and_clear() {
        let mut grid = TileGrid::new(2, 2);
        grid.fill(5u32);
        assert_eq!(grid.take(1, 1), Some(5));
        assert_eq!(grid.get_copied(1, 1), None);
        assert_eq!(grid.occupied(), 3);

        grid.clear();
        assert_eq!(grid.occupied(), 0);
        assert!(grid.in_bounds(1, 1));
    }
}
