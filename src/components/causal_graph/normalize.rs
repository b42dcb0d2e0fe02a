//! Squashes raw discovery weights into a bounded range so edge scores stay
//! comparable regardless of the raw matrix's scale.

use super::matrix::Matrix;

/// Saturating transform `2 / (1 + e^(-x)) - 1`.
///
/// Maps all finite inputs strictly inside `(-1, 1)` and fixes `0` at `0`.
/// The raw expression rounds to `±1.0` once `|x|` passes ~37, which would
/// collide with the edit sentinel, so the result is clamped just inside
/// the interval.
pub fn squash(x: f64) -> f64 {
	const LIMIT: f64 = 1.0 - f64::EPSILON;
	(2.0 / (1.0 + (-x).exp()) - 1.0).clamp(-LIMIT, LIMIT)
}

/// Sign of `v` with zero preserved (`f64::signum` maps `0.0` to `1.0`).
fn sign(v: f64) -> f64 {
	if v == 0.0 { 0.0 } else { v.signum() }
}

/// Normalize `raw` element-wise, sign-correcting each cell against the
/// discovery run's own score in `reference` before squashing.
///
/// Panics if the two matrices disagree on shape.
pub fn normalize(raw: &Matrix, reference: &Matrix) -> Matrix {
	assert_eq!(
		raw.size(),
		reference.size(),
		"raw and reference matrices must share a shape"
	);
	let n = raw.size();
	let mut out = Matrix::zeros(n);
	for i in 0..n {
		for j in 0..n {
			out.set(i, j, squash(-raw[(i, j)] * sign(reference[(i, j)])));
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn squash_fixes_zero() {
		assert_eq!(squash(0.0), 0.0);
	}

	#[test]
	fn squash_stays_strictly_bounded() {
		// includes inputs past the ~37 saturation point of the raw sigmoid
		for x in [
			f64::MIN,
			-1e6,
			-50.0,
			-1.0,
			-1e-9,
			1e-9,
			1.0,
			50.0,
			1e6,
			f64::MAX,
		] {
			let y = squash(x);
			assert!(y > -1.0 && y < 1.0, "squash({x}) = {y} escaped (-1, 1)");
		}
	}

	#[test]
	fn saturated_inputs_stay_below_the_assertion_score() {
		// a full ±1 cell must remain reachable only through an edit
		assert!(squash(50.0) < 1.0);
		assert!(squash(-50.0) > -1.0);
		assert!(squash(50.0) > 0.99);
	}

	#[test]
	fn squash_is_odd_and_monotone() {
		assert!((squash(2.0) + squash(-2.0)).abs() < 1e-12);
		assert!(squash(0.5) < squash(1.0));
	}

	#[test]
	fn zero_reference_cell_kills_the_weight() {
		let raw = Matrix::from_rows(vec![vec![0.0, 3.0], vec![3.0, 0.0]]);
		let reference = Matrix::from_rows(vec![vec![0.0, 0.0], vec![-1.0, 0.0]]);
		let norm = normalize(&raw, &reference);
		assert_eq!(norm[(0, 1)], 0.0);
		// sign(-1) flips the negation back to +3
		assert!((norm[(1, 0)] - squash(3.0)).abs() < 1e-12);
	}

	#[test]
	fn self_reference_negates_every_magnitude() {
		// The component passes the score matrix as its own sign reference, so
		// each cell squashes -|raw|.
		let raw = Matrix::from_rows(vec![vec![0.0, 2.0], vec![-2.0, 0.0]]);
		let norm = normalize(&raw, &raw);
		assert!((norm[(0, 1)] - squash(-2.0)).abs() < 1e-12);
		assert!((norm[(1, 0)] - squash(-2.0)).abs() < 1e-12);
		assert_eq!(norm[(0, 0)], 0.0);
	}

	#[test]
	#[should_panic(expected = "share a shape")]
	fn shape_mismatch_fails_fast() {
		normalize(&Matrix::zeros(2), &Matrix::zeros(3));
	}
}
