//! Whole-grid neighbor shifts used by the erosion kernels.
//!
//! `shift(src, dir, edge, out)` writes, for every cell, the value of its
//! neighbor in direction `dir`. Cells whose neighbor falls outside the grid
//! take either their own value (`Edge::Clamp`) or zero (`Edge::Zero`).

/// One of the four axis-aligned grid neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Row above (j - 1).
    Up,
    /// Row below (j + 1).
    Down,
    /// Column to the left (i - 1).
    Left,
    /// Column to the right (i + 1).
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Out-of-grid substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Replicate the border cell.
    Clamp,
    /// Substitute zero.
    Zero,
}

/// Fill `out` with the `dir` neighbor of every cell of the `n`x`n` grid `src`.
pub fn shift(src: &[f32], n: usize, dir: Direction, edge: Edge, out: &mut [f32]) {
    debug_assert_eq!(src.len(), n * n);
    debug_assert_eq!(out.len(), n * n);
    if n == 0 {
        return;
    }
    match dir {
        Direction::Up => {
            out[n..].copy_from_slice(&src[..n * (n - 1)]);
            fill_border(&src[..n], &mut out[..n], edge);
        }
        Direction::Down => {
            out[..n * (n - 1)].copy_from_slice(&src[n..]);
            let last = n * (n - 1);
            fill_border(&src[last..], &mut out[last..], edge);
        }
        Direction::Left => {
            for (src_row, out_row) in src.chunks_exact(n).zip(out.chunks_exact_mut(n)) {
                out_row[1..].copy_from_slice(&src_row[..n - 1]);
                out_row[0] = border_value(src_row[0], edge);
            }
        }
        Direction::Right => {
            for (src_row, out_row) in src.chunks_exact(n).zip(out.chunks_exact_mut(n)) {
                out_row[..n - 1].copy_from_slice(&src_row[1..]);
                out_row[n - 1] = border_value(src_row[n - 1], edge);
            }
        }
    }
}

fn fill_border(src: &[f32], out: &mut [f32], edge: Edge) {
    match edge {
        Edge::Clamp => out.copy_from_slice(src),
        Edge::Zero => out.fill(0.0),
    }
}

#[inline]
fn border_value(own: f32, edge: Edge) -> f32 {
    match edge {
        Edge::Clamp => own,
        Edge::Zero => 0.0,
    }
}
