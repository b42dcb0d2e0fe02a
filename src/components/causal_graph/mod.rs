mod component;
mod decode;
mod layout;
mod matrix;
mod normalize;
mod render;
mod session;
mod types;

pub use component::CausalGraphCanvas;
pub use decode::{ASSERTED, decode, derive_graph};
pub use matrix::{FlagMatrix, Matrix};
pub use normalize::{normalize, squash};
pub use session::{Link, Mode, Session};
pub use types::{
	Algorithm, BgKnowledge, CausalGraph, DiscoveryResult, Edge, EdgeKind, FieldMeta, LinkRequest,
	NodeSelection,
};
