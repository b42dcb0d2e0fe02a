use std::ops::Index;

/// Square row-major matrix of real-valued edge weights.
///
/// Shape mismatches and out-of-range indices indicate a matrix/field-list
/// pair that fell out of sync upstream, so both fail fast.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Matrix {
	n: usize,
	cells: Vec<f64>,
}

impl Matrix {
	/// An `n`×`n` matrix of zeros.
	pub fn zeros(n: usize) -> Self {
		Self {
			n,
			cells: vec![0.0; n * n],
		}
	}

	/// Build from nested rows. Panics unless every row has `rows.len()` entries.
	pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
		let n = rows.len();
		for row in &rows {
			assert_eq!(row.len(), n, "matrix rows must form a square");
		}
		Self {
			n,
			cells: rows.into_iter().flatten().collect(),
		}
	}

	/// Number of rows (and columns).
	pub fn size(&self) -> usize {
		self.n
	}

	/// Overwrite one cell.
	pub fn set(&mut self, i: usize, j: usize, value: f64) {
		assert!(i < self.n && j < self.n, "cell ({i}, {j}) out of range");
		self.cells[i * self.n + j] = value;
	}
}

impl Index<(usize, usize)> for Matrix {
	type Output = f64;

	fn index(&self, (i, j): (usize, usize)) -> &f64 {
		assert!(i < self.n && j < self.n, "cell ({i}, {j}) out of range");
		&self.cells[i * self.n + j]
	}
}

/// Square matrix of algorithm-specific structural flags (`-1`, `0`, `1`, `2`).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FlagMatrix {
	n: usize,
	cells: Vec<i8>,
}

impl FlagMatrix {
	/// An `n`×`n` matrix of zero flags.
	pub fn zeros(n: usize) -> Self {
		Self {
			n,
			cells: vec![0; n * n],
		}
	}

	/// Build from nested rows. Panics unless every row has `rows.len()` entries.
	pub fn from_rows(rows: Vec<Vec<i8>>) -> Self {
		let n = rows.len();
		for row in &rows {
			assert_eq!(row.len(), n, "matrix rows must form a square");
		}
		Self {
			n,
			cells: rows.into_iter().flatten().collect(),
		}
	}

	/// Number of rows (and columns).
	pub fn size(&self) -> usize {
		self.n
	}
}

impl Index<(usize, usize)> for FlagMatrix {
	type Output = i8;

	fn index(&self, (i, j): (usize, usize)) -> &i8 {
		assert!(i < self.n && j < self.n, "cell ({i}, {j}) out of range");
		&self.cells[i * self.n + j]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn from_rows_round_trips_cells() {
		let m = Matrix::from_rows(vec![vec![0.0, 1.5], vec![-2.0, 0.0]]);
		assert_eq!(m.size(), 2);
		assert_eq!(m[(0, 1)], 1.5);
		assert_eq!(m[(1, 0)], -2.0);
	}

	#[test]
	fn set_overwrites_single_cell() {
		let mut m = Matrix::zeros(3);
		m.set(2, 1, 0.25);
		assert_eq!(m[(2, 1)], 0.25);
		assert_eq!(m[(1, 2)], 0.0);
	}

	#[test]
	#[should_panic(expected = "square")]
	fn ragged_rows_panic() {
		Matrix::from_rows(vec![vec![0.0, 1.0], vec![0.0]]);
	}

	#[test]
	#[should_panic(expected = "out of range")]
	fn out_of_range_index_panics() {
		let m = FlagMatrix::zeros(2);
		let _ = m[(0, 2)];
	}
}
