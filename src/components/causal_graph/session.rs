//! The interactive edit session: UI mode, the focused node, and the working
//! copy of the normalized score matrix, with click transitions as pure
//! functions so the whole machine tests without a rendering harness.

use super::decode::{ASSERTED, derive_graph};
use super::matrix::{FlagMatrix, Matrix};
use super::types::{Algorithm, Edge};

/// Click semantics: inspect relations, or rewrite them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
	/// Clicks focus a node to inspect its relations.
	#[default]
	Explore,
	/// Clicks run the two-click link protocol.
	Edit,
}

/// A directed link completed by a two-click sequence, by node index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	/// The anchor node, clicked first.
	pub cause: usize,
	/// The target node, clicked second.
	pub effect: usize,
}

/// One interactive session over one discovery result.
///
/// The working matrix is the single structural source of truth for edits;
/// the edge list is always derived from it, never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
	mode: Mode,
	focus: Option<usize>,
	working: Matrix,
}

impl Session {
	/// Start exploring, unfocused, with a fresh working copy of the
	/// normalized matrix.
	pub fn new(normalized: Matrix) -> Self {
		Self {
			mode: Mode::Explore,
			focus: None,
			working: normalized,
		}
	}

	/// The current click semantics.
	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// The focused node, if any: the inspected field or the link anchor.
	pub fn focus(&self) -> Option<usize> {
		self.focus
	}

	/// The working matrix, normalized scores plus any edit sentinels.
	pub fn matrix(&self) -> &Matrix {
		&self.working
	}

	/// Number of fields the session covers.
	pub fn node_count(&self) -> usize {
		self.working.size()
	}

	/// Switching modes keeps the focus; only click transitions clear it.
	pub fn set_mode(&mut self, mode: Mode) {
		self.mode = mode;
	}

	/// Discard every edit by restoring the normalized matrix. Mode is
	/// untouched; the focus survives unless it no longer indexes a field.
	pub fn reset(&mut self, normalized: &Matrix) {
		if self.focus.is_some_and(|f| f >= normalized.size()) {
			self.focus = None;
		}
		self.working = normalized.clone();
	}

	/// Apply a click on node `node`, returning the link if this click
	/// completed a two-click edit.
	///
	/// Explore mode toggles the focus. Edit mode anchors on the first click,
	/// cancels when the anchor is clicked again, and otherwise links
	/// anchor → node and clears the focus.
	pub fn click_node(&mut self, node: usize) -> Option<Link> {
		assert!(
			node < self.working.size(),
			"node {node} outside the field range"
		);
		match (self.mode, self.focus) {
			(Mode::Explore, focus) => {
				self.focus = if focus == Some(node) { None } else { Some(node) };
				None
			}
			(Mode::Edit, None) => {
				self.focus = Some(node);
				None
			}
			(Mode::Edit, Some(anchor)) if anchor == node => {
				self.focus = None;
				None
			}
			(Mode::Edit, Some(anchor)) => {
				self.focus = None;
				self.assert_link(anchor, node);
				Some(Link {
					cause: anchor,
					effect: node,
				})
			}
		}
	}

	/// A click outside every node clears the focus.
	pub fn click_background(&mut self) {
		self.focus = None;
	}

	/// Write the assertion into the working matrix: the forward cell carries
	/// the sentinel, the reverse cell its negation, so re-deriving the graph
	/// keeps `cause → effect` and drops any conflicting reverse edge.
	fn assert_link(&mut self, cause: usize, effect: usize) {
		self.working.set(cause, effect, ASSERTED);
		self.working.set(effect, cause, -ASSERTED);
	}

	/// Derive the current edge list from the working matrix.
	pub fn graph(&self, flags: &FlagMatrix, algorithm: Algorithm) -> Vec<Edge> {
		derive_graph(&self.working, flags, algorithm)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::causal_graph::normalize::normalize;
	use crate::components::causal_graph::types::EdgeKind;

	fn session(n: usize) -> Session {
		Session::new(Matrix::zeros(n))
	}

	fn directed(links: &[Edge], cause: usize, effect: usize) -> bool {
		links
			.iter()
			.any(|e| e.cause == cause && e.effect == effect && e.kind == EdgeKind::Directed)
	}

	#[test]
	fn explore_click_toggles_focus() {
		let mut s = session(3);
		assert_eq!(s.click_node(2), None);
		assert_eq!(s.focus(), Some(2));
		assert_eq!(s.click_node(1), None);
		assert_eq!(s.focus(), Some(1));
		assert_eq!(s.click_node(1), None);
		assert_eq!(s.focus(), None);
	}

	#[test]
	fn background_click_clears_focus() {
		let mut s = session(3);
		s.click_node(0);
		s.click_background();
		assert_eq!(s.focus(), None);
		// and is a no-op when already unfocused
		s.click_background();
		assert_eq!(s.focus(), None);
	}

	#[test]
	fn mode_switch_preserves_focus() {
		let mut s = session(3);
		s.click_node(2);
		s.set_mode(Mode::Edit);
		assert_eq!(s.focus(), Some(2));
		s.set_mode(Mode::Explore);
		assert_eq!(s.focus(), Some(2));
	}

	#[test]
	fn edit_anchor_then_same_node_cancels() {
		let mut s = session(3);
		s.set_mode(Mode::Edit);
		assert_eq!(s.click_node(0), None);
		assert_eq!(s.focus(), Some(0));
		assert_eq!(s.click_node(0), None);
		assert_eq!(s.focus(), None);
		// nothing was written
		assert_eq!(s.matrix(), &Matrix::zeros(3));
	}

	#[test]
	fn two_click_sequence_links_anchor_to_target() {
		let mut s = session(3);
		s.set_mode(Mode::Edit);
		s.click_node(0);
		assert_eq!(
			s.click_node(1),
			Some(Link {
				cause: 0,
				effect: 1
			})
		);
		assert_eq!(s.focus(), None);
		let links = s.graph(&FlagMatrix::zeros(3), Algorithm::Pc);
		assert!(directed(&links, 0, 1));
		assert!(!directed(&links, 1, 0));
		assert_eq!(links[0].score, 1.0);
	}

	#[test]
	fn relinking_the_same_pair_is_idempotent() {
		let mut s = session(2);
		s.set_mode(Mode::Edit);
		s.click_node(0);
		s.click_node(1);
		let before = s.matrix().clone();
		s.click_node(0);
		s.click_node(1);
		assert_eq!(s.matrix(), &before);
	}

	#[test]
	fn reverse_link_wins_over_the_earlier_assertion() {
		let mut s = session(2);
		s.set_mode(Mode::Edit);
		s.click_node(0);
		s.click_node(1);
		s.click_node(1);
		s.click_node(0);
		let links = s.graph(&FlagMatrix::zeros(2), Algorithm::Generic);
		assert!(directed(&links, 1, 0));
		assert!(!directed(&links, 0, 1));
		assert_eq!(links.len(), 1);
	}

	#[test]
	fn reset_restores_the_normalized_matrix_only() {
		let raw = Matrix::from_rows(vec![vec![0.0, 2.0], vec![-1.0, 0.0]]);
		let normalized = normalize(&raw, &raw);
		let mut s = Session::new(normalized.clone());
		s.set_mode(Mode::Edit);
		s.click_node(0);
		s.click_node(1);
		s.set_mode(Mode::Explore);
		s.click_node(1);
		assert_ne!(s.matrix(), &normalized);

		s.reset(&normalized);
		assert_eq!(s.matrix(), &normalized);
		assert_eq!(s.mode(), Mode::Explore);
		assert_eq!(s.focus(), Some(1));
	}

	#[test]
	fn reset_to_fewer_fields_drops_the_stale_anchor() {
		let mut s = session(5);
		s.set_mode(Mode::Edit);
		s.click_node(4);

		// upstream swaps in a smaller result; node 4 no longer exists
		s.reset(&Matrix::zeros(3));
		assert_eq!(s.focus(), None);

		// the next click anchors fresh instead of linking from the old node
		assert_eq!(s.click_node(1), None);
		assert_eq!(s.focus(), Some(1));
		assert_eq!(s.matrix(), &Matrix::zeros(3));
	}

	#[test]
	fn reset_to_the_same_size_keeps_the_focus() {
		let mut s = session(3);
		s.click_node(2);
		s.reset(&Matrix::zeros(3));
		assert_eq!(s.focus(), Some(2));
	}

	#[test]
	fn edits_survive_unrelated_clicks_until_reset() {
		let mut s = session(3);
		s.set_mode(Mode::Edit);
		s.click_node(0);
		s.click_node(2);
		s.set_mode(Mode::Explore);
		s.click_node(1);
		s.click_background();
		let links = s.graph(&FlagMatrix::zeros(3), Algorithm::Pc);
		assert!(directed(&links, 0, 2));
	}

	#[test]
	#[should_panic(expected = "outside the field range")]
	fn out_of_range_click_fails_fast() {
		session(2).click_node(5);
	}
}
