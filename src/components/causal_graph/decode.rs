//! Algorithm-aware decoding of (score, flag) matrix pairs into a typed,
//! confidence-sorted edge list.

use super::matrix::{FlagMatrix, Matrix};
use super::types::{Algorithm, Edge, EdgeKind};

/// Score written into the working matrix when the user asserts a link.
///
/// Normalized scores are strictly inside `(-1, 1)`, so a full `±1` cell can
/// only come from an edit, never from a discovery run.
pub const ASSERTED: f64 = 1.0;

/// Flag-pair convention for one algorithm family:
/// `(flag[i][j], flag[j][i]) -> kind`, matched literally per unordered pair.
type FlagRules = &'static [((i8, i8), EdgeKind)];

const PC_RULES: FlagRules = &[
	((1, -1), EdgeKind::Directed),
	((-1, -1), EdgeKind::Undirected),
	((1, 1), EdgeKind::Bidirected),
];

const FCI_RULES: FlagRules = &[
	((1, -1), EdgeKind::Directed),
	((-1, -1), EdgeKind::Undirected),
	((1, 1), EdgeKind::Bidirected),
	((1, 2), EdgeKind::WeakDirected),
];

const GES_RULES: FlagRules = &[
	((1, -1), EdgeKind::Directed),
	((-1, -1), EdgeKind::Undirected),
];

/// `None` selects the generic sign-of-score fallback.
fn flag_rules(algorithm: Algorithm) -> Option<FlagRules> {
	match algorithm {
		Algorithm::Pc | Algorithm::CdNod => Some(PC_RULES),
		Algorithm::Fci => Some(FCI_RULES),
		Algorithm::Ges => Some(GES_RULES),
		Algorithm::Generic => None,
	}
}

fn sort_by_score(links: &mut [Edge]) {
	// Stable, so tied scores keep pair-visit order.
	links.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Decode a matrix pair into at most one edge per unordered node pair,
/// sorted by descending score.
///
/// For the named algorithms the flag pair selects structure and kind while
/// `|scores[i][j]|` supplies the magnitude; flag pairs outside the
/// algorithm's table carry no usable evidence and are dropped. The generic
/// fallback ignores flags entirely: a positive `scores[i][j]` reads as
/// `i → j`, a negative one as `j → i`, zero as no edge.
///
/// Panics if the matrices disagree on shape.
pub fn decode(scores: &Matrix, flags: &FlagMatrix, algorithm: Algorithm) -> Vec<Edge> {
	assert_eq!(
		scores.size(),
		flags.size(),
		"score and flag matrices must share a shape"
	);
	let n = scores.size();
	let mut links = Vec::new();
	let rules = flag_rules(algorithm);

	for i in 0..n {
		for j in (i + 1)..n {
			match rules {
				Some(rules) => {
					let pair = (flags[(i, j)], flags[(j, i)]);
					if let Some((_, kind)) = rules.iter().find(|(p, _)| *p == pair) {
						links.push(Edge {
							cause: i,
							effect: j,
							score: scores[(i, j)].abs(),
							kind: *kind,
						});
					}
				}
				None => {
					let weight = scores[(i, j)];
					if weight > 0.0 {
						links.push(Edge {
							cause: i,
							effect: j,
							score: weight,
							kind: EdgeKind::Directed,
						});
					} else if weight < 0.0 {
						links.push(Edge {
							cause: j,
							effect: i,
							score: -weight,
							kind: EdgeKind::Directed,
						});
					}
				}
			}
		}
	}

	sort_by_score(&mut links);
	links
}

fn covers_pair(edge: &Edge, a: usize, b: usize) -> bool {
	(edge.cause == a && edge.effect == b) || (edge.cause == b && edge.effect == a)
}

/// Decode the working matrix, then lay user assertions on top.
///
/// A cell at or above [`ASSERTED`] wins its pair outright: whatever the pair
/// decoded to is replaced by a directed edge at that score, and the reverse
/// cell (held at the negated sentinel) can no longer produce an edge. The
/// edge list therefore stays a pure function of
/// `(working matrix, flags, algorithm)` with no separate edit state.
pub fn derive_graph(working: &Matrix, flags: &FlagMatrix, algorithm: Algorithm) -> Vec<Edge> {
	let mut links = decode(working, flags, algorithm);
	let n = working.size();
	for cause in 0..n {
		for effect in 0..n {
			if cause != effect && working[(cause, effect)] >= ASSERTED {
				links.retain(|edge| !covers_pair(edge, cause, effect));
				links.push(Edge {
					cause,
					effect,
					score: working[(cause, effect)],
					kind: EdgeKind::Directed,
				});
			}
		}
	}
	sort_by_score(&mut links);
	links
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scores_with(n: usize, cells: &[(usize, usize, f64)]) -> Matrix {
		let mut m = Matrix::zeros(n);
		for &(i, j, v) in cells {
			m.set(i, j, v);
		}
		m
	}

	#[test]
	fn pc_decodes_the_three_listed_flag_pairs() {
		let flags = FlagMatrix::from_rows(vec![
			vec![0, 1, -1, 1],
			vec![-1, 0, 0, 0],
			vec![-1, 0, 0, 0],
			vec![1, 0, 0, 0],
		]);
		let scores = scores_with(4, &[(0, 1, 0.4), (0, 2, -0.2), (0, 3, 0.9)]);
		let links = decode(&scores, &flags, Algorithm::Pc);
		assert_eq!(links.len(), 3);
		// sorted by descending magnitude
		assert_eq!(
			links[0],
			Edge {
				cause: 0,
				effect: 3,
				score: 0.9,
				kind: EdgeKind::Bidirected
			}
		);
		assert_eq!(
			links[1],
			Edge {
				cause: 0,
				effect: 1,
				score: 0.4,
				kind: EdgeKind::Directed
			}
		);
		assert_eq!(
			links[2],
			Edge {
				cause: 0,
				effect: 2,
				score: 0.2,
				kind: EdgeKind::Undirected
			}
		);
	}

	#[test]
	fn pc_drops_unlisted_flag_pairs() {
		// The worked example: only the (1, -1) pair at (0, 1) survives.
		// (-1, 1) at pair (0, 2) is outside the table even though its mirror
		// is listed.
		let flags = FlagMatrix::from_rows(vec![
			vec![0, 1, -1],
			vec![-1, 0, 0],
			vec![1, 0, 0],
		]);
		let scores = scores_with(3, &[(0, 1, 0.4)]);
		let links = decode(&scores, &flags, Algorithm::Pc);
		assert_eq!(
			links,
			vec![Edge {
				cause: 0,
				effect: 1,
				score: 0.4,
				kind: EdgeKind::Directed
			}]
		);
	}

	#[test]
	fn cd_nod_shares_the_pc_convention() {
		let flags = FlagMatrix::from_rows(vec![vec![0, 1], vec![-1, 0]]);
		let scores = scores_with(2, &[(0, 1, 0.5)]);
		assert_eq!(
			decode(&scores, &flags, Algorithm::CdNod),
			decode(&scores, &flags, Algorithm::Pc)
		);
	}

	#[test]
	fn fci_reads_the_circle_arrow_mark() {
		let flags = FlagMatrix::from_rows(vec![vec![0, 1], vec![2, 0]]);
		let scores = scores_with(2, &[(0, 1, -0.7)]);
		let links = decode(&scores, &flags, Algorithm::Fci);
		assert_eq!(
			links,
			vec![Edge {
				cause: 0,
				effect: 1,
				score: 0.7,
				kind: EdgeKind::WeakDirected
			}]
		);
		// PC has no such rule
		assert!(decode(&scores, &flags, Algorithm::Pc).is_empty());
	}

	#[test]
	fn ges_never_emits_bidirected() {
		let flags = FlagMatrix::from_rows(vec![vec![0, 1], vec![1, 0]]);
		let scores = scores_with(2, &[(0, 1, 0.8)]);
		assert!(decode(&scores, &flags, Algorithm::Ges).is_empty());
		assert_eq!(
			decode(&scores, &flags, Algorithm::Pc)[0].kind,
			EdgeKind::Bidirected
		);
	}

	#[test]
	fn generic_fallback_reads_sign_for_direction() {
		let scores = scores_with(3, &[(0, 1, -0.3), (0, 2, 0.6)]);
		let links = decode(&scores, &FlagMatrix::zeros(3), Algorithm::Generic);
		assert_eq!(links.len(), 2);
		assert_eq!(
			links[0],
			Edge {
				cause: 0,
				effect: 2,
				score: 0.6,
				kind: EdgeKind::Directed
			}
		);
		assert_eq!(
			links[1],
			Edge {
				cause: 1,
				effect: 0,
				score: 0.3,
				kind: EdgeKind::Directed
			}
		);
	}

	#[test]
	fn generic_fallback_skips_zero_weights() {
		let links = decode(&Matrix::zeros(4), &FlagMatrix::zeros(4), Algorithm::Generic);
		assert!(links.is_empty());
	}

	#[test]
	fn at_most_one_edge_per_unordered_pair() {
		// Flags dense with every listed combination; each pair may still
		// only surface once.
		let flags = FlagMatrix::from_rows(vec![
			vec![0, 1, -1, 1],
			vec![-1, 0, 1, 1],
			vec![-1, 1, 0, -1],
			vec![1, 2, -1, 0],
		]);
		let mut scores = Matrix::zeros(4);
		for i in 0..4 {
			for j in 0..4 {
				if i != j {
					scores.set(i, j, 0.1 + (i * 4 + j) as f64 / 100.0);
				}
			}
		}
		for algorithm in [Algorithm::Pc, Algorithm::Fci, Algorithm::Ges, Algorithm::CdNod] {
			let links = decode(&scores, &flags, algorithm);
			let mut pairs: Vec<(usize, usize)> = links
				.iter()
				.map(|e| (e.cause.min(e.effect), e.cause.max(e.effect)))
				.collect();
			pairs.sort();
			pairs.dedup();
			assert_eq!(pairs.len(), links.len(), "{algorithm:?} duplicated a pair");
		}
	}

	#[test]
	fn output_is_sorted_non_increasing() {
		let scores = scores_with(4, &[(0, 1, 0.2), (0, 2, -0.9), (1, 3, 0.5), (2, 3, -0.5)]);
		let links = decode(&scores, &FlagMatrix::zeros(4), Algorithm::Generic);
		assert!(links.windows(2).all(|w| w[0].score >= w[1].score));
	}

	#[test]
	fn asserted_cell_overrides_the_decoded_pair() {
		// Discovery said 0 → 1; the user asserted 1 → 0.
		let flags = FlagMatrix::from_rows(vec![vec![0, 1], vec![-1, 0]]);
		let mut working = scores_with(2, &[(0, 1, 0.4)]);
		working.set(1, 0, ASSERTED);
		working.set(0, 1, -ASSERTED);
		let links = derive_graph(&working, &flags, Algorithm::Pc);
		assert_eq!(
			links,
			vec![Edge {
				cause: 1,
				effect: 0,
				score: 1.0,
				kind: EdgeKind::Directed
			}]
		);
	}

	#[test]
	fn derive_graph_without_edits_matches_decode() {
		let flags = FlagMatrix::from_rows(vec![vec![0, 1], vec![-1, 0]]);
		let working = scores_with(2, &[(0, 1, -0.4)]);
		assert_eq!(
			derive_graph(&working, &flags, Algorithm::Pc),
			decode(&working, &flags, Algorithm::Pc)
		);
	}
}
