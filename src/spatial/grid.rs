//! Generic grid for per-tile data

use crate::core::types::Position;

/// Generic 2D grid addressed by signed tile position
///
/// Out-of-bounds reads return `None` and out-of-bounds writes are ignored,
/// so callers can look up neighbours at map edges without checks.
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index(pos).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        match self.index(pos) {
            Some(i) => Some(&mut self.data[i]),
            None => None,
        }
    }

    #[inline]
    pub fn set(&mut self, pos: Position, value: T) {
        if let Some(i) = self.index(pos) {
            self.data[i] = value;
        }
    }

    /// Overwrite every cell
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Apply `f` to every cell
    pub fn for_each_mut(&mut self, f: impl FnMut(&mut T)) {
        self.data.iter_mut().for_each(f);
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}
