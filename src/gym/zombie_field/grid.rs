use std::ops::{Index, IndexMut};

/// Cell coordinates `(row, col)` with `(0, 0)` in the top left corner
pub type Pos = (usize, usize);

/// Observation channel holding the player
pub const PLAYER: usize = 0;

/// Observation channel holding the zombie with index `i`
pub const fn zombie_channel(i: usize) -> usize {
    1 + i
}

/// Observation channel holding the exit once it is revealed
pub const EXIT: usize = 4;

/// A dense `size x size x channels` tensor of 0/1 occupancy values
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    channels: usize,
    cells: Vec<f32>,
}

impl Grid {
    pub fn new(size: usize, channels: usize) -> Self {
        Self {
            size,
            channels,
            cells: vec![0.0; size * size * channels],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `[rows, cols, channels]`
    pub fn shape(&self) -> [usize; 3] {
        [self.size, self.size, self.channels]
    }

    /// Row-major view of the underlying values, channels varying fastest
    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    /// First cell, in row-major order, that is set in `channel`
    pub fn find(&self, channel: usize) -> Option<Pos> {
        self.positions()
            .find(|&pos| self[(pos.0, pos.1, channel)] == 1.0)
    }

    /// Number of cells set in `channel`
    pub fn count(&self, channel: usize) -> usize {
        self.positions()
            .filter(|&pos| self[(pos.0, pos.1, channel)] == 1.0)
            .count()
    }

    fn positions(&self) -> impl Iterator<Item = Pos> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
    }

    fn offset(&self, (row, col, channel): (usize, usize, usize)) -> usize {
        assert!(
            row < self.size && col < self.size && channel < self.channels,
            "Cell ({row}, {col}, {channel}) is outside a grid of shape {:?}.",
            self.shape()
        );
        (row * self.size + col) * self.channels + channel
    }
}

impl Index<(usize, usize, usize)> for Grid {
    type Output = f32;

    fn index(&self, index: (usize, usize, usize)) -> &Self::Output {
        &self.cells[self.offset(index)]
    }
}

impl IndexMut<(usize, usize, usize)> for Grid {
    fn index_mut(&mut self, index: (usize, usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index);
        &mut self.cells[offset]
    }
}
