//! Dense 0/1 adjacency matrix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Square 0/1 matrix, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyMatrix {
    size: usize,
    cells: Vec<u8>,
}

impl AdjacencyMatrix {
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build from nested rows. Any non-zero cell counts as connected.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let size = rows.len();
        let mut m = Self::zeros(size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(CoreError::NotSquare {
                    rows: size,
                    row: i,
                    cols: row.len(),
                });
            }
            for (j, &cell) in row.iter().enumerate() {
                m.cells[i * size + j] = u8::from(cell != 0);
            }
        }
        Ok(m)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Mark `a` and `b` as mutually connected.
    pub(crate) fn connect(&mut self, a: usize, b: usize) {
        self.cells[a * self.size + b] = 1;
        self.cells[b * self.size + a] = 1;
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.size + col]
    }

    pub fn is_connected(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == 1
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }

    pub fn has_zero_diagonal(&self) -> bool {
        (0..self.size).all(|i| self.get(i, i) == 0)
    }

    /// Connected pairs `(i, j)` with `i < j`, in row-major order.
    pub fn connections(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.is_connected(i, j) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

/// Prints in the familiar nested-bracket layout, one row per line.
impl fmt::Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.size {
            if i > 0 {
                write!(f, "\n ")?;
            }
            write!(f, "[")?;
            for (j, cell) in self.row(i).iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{cell}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
