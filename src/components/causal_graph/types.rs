use super::matrix::{FlagMatrix, Matrix};

/// Metadata for one analyzed field, i.e. one matrix row/column.
///
/// `fid` is the stable identifier collaborators use for name-based linking;
/// `name` is an optional human-readable label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMeta {
	/// Stable field id.
	pub fid: String,
	/// Optional display name.
	pub name: Option<String>,
}

impl FieldMeta {
	/// Label to render: the display name when present, the fid otherwise.
	pub fn label(&self) -> &str {
		self.name.as_deref().unwrap_or(&self.fid)
	}
}

/// Discovery algorithm whose matrix conventions get decoded.
///
/// Anything but the four named algorithms falls back to [`Algorithm::Generic`],
/// which reads direction straight off the sign of the score matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Algorithm {
	/// Constraint-based PC search.
	#[default]
	Pc,
	/// Fast causal inference, allows latent confounders.
	Fci,
	/// Greedy equivalence search.
	Ges,
	/// Constraint-based discovery from nonstationary data.
	CdNod,
	/// Unknown algorithm; direction read off the score sign.
	Generic,
}

impl Algorithm {
	/// Map an upstream algorithm id string to a decoding convention.
	pub fn from_id(id: &str) -> Self {
		match id {
			"PC" => Self::Pc,
			"FCI" => Self::Fci,
			"GES" => Self::Ges,
			"CD-NOD" => Self::CdNod,
			_ => Self::Generic,
		}
	}
}

/// How a decoded relation between two fields is oriented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
	/// cause → effect
	Directed,
	/// i ↔ j, a latent common cause is possible
	Bidirected,
	/// i - j, orientation unresolved
	Undirected,
	/// i ∘→ j, directed but inferred with lower confidence
	WeakDirected,
}

/// One decoded causal relation. `score` is a non-negative confidence magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
	/// Cause field index.
	pub cause: usize,
	/// Effect field index.
	pub effect: usize,
	/// Non-negative confidence magnitude.
	pub score: f64,
	/// Orientation of the relation.
	pub kind: EdgeKind,
}

/// An immutable decoded graph: node indices plus a scored, deduplicated edge
/// list sorted by descending confidence. Never mutated; new values are derived.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CausalGraph {
	/// Field indices, one per matrix row.
	pub nodes: Vec<usize>,
	/// Decoded edges, sorted by descending score.
	pub links: Vec<Edge>,
}

/// Emitted when the user asserts a directed relation, carrying field ids
/// rather than indices so collaborators can propagate the constraint upstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRequest {
	/// Id of the asserted cause field.
	pub cause_fid: String,
	/// Id of the asserted effect field.
	pub effect_fid: String,
}

/// Emitted when the explore-mode focus changes. Neighborhood composition is
/// the flow-analysis collaborator's job; this carries only the focused field
/// and the graph it was focused in.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSelection {
	/// The focused field.
	pub field: FieldMeta,
	/// The graph it was focused in.
	pub graph: CausalGraph,
}

/// A background-knowledge constraint: `src` is asserted to cause `tgt`.
/// Opaque to the core; accumulated and consumed by collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BgKnowledge {
	/// Id of the constrained cause field.
	pub src_fid: String,
	/// Id of the constrained effect field.
	pub tgt_fid: String,
}

/// Everything one discovery run hands the canvas: field list, raw score and
/// flag matrices of matching shape, and the algorithm id that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscoveryResult {
	/// The analyzed fields, in matrix order.
	pub fields: Vec<FieldMeta>,
	/// Raw edge weights.
	pub scores: Matrix,
	/// Structural flags in the algorithm's convention.
	pub flags: FlagMatrix,
	/// The algorithm that produced the matrices.
	pub algorithm: Algorithm,
}
