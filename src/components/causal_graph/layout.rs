use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{Edge, FieldMeta};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub const NODE_RADIUS: f64 = 6.0;
pub const HIT_RADIUS: f64 = 12.0;
/// Mouse travel below this (screen px) still counts as a click, not a drag.
pub const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub label: String,
	pub color: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

/// In-flight mouse press: either a node drag or a background pan, resolved
/// into a click on release if the pointer never left the slop radius.
#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub active: bool,
	pub node: Option<usize>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Force simulation plus view/interaction state for one rendered graph.
///
/// Nodes are addressed by field index everywhere; the force_graph handles
/// stay internal.
pub struct LayoutState {
	graph: ForceGraph<NodeInfo, ()>,
	sim_idx: Vec<DefaultNodeIdx>,
	pub links: Vec<Edge>,
	pub focus: Option<usize>,
	pub hover: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub transform: ViewTransform,
	pub press: PressState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

fn build_sim(
	fields: &[FieldMeta],
	links: &[Edge],
	positions: Option<&[(f32, f32, bool)]>,
	width: f64,
	height: f64,
) -> (ForceGraph<NodeInfo, ()>, Vec<DefaultNodeIdx>) {
	let mut graph = ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});
	let mut sim_idx = Vec::with_capacity(fields.len());

	for (i, field) in fields.iter().enumerate() {
		let (x, y, is_anchor) = match positions.and_then(|p| p.get(i)) {
			Some(&saved) => saved,
			None => {
				let angle = (i as f64) * 2.0 * PI / fields.len().max(1) as f64;
				(
					(width / 2.0 + 100.0 * angle.cos()) as f32,
					(height / 2.0 + 100.0 * angle.sin()) as f32,
					false,
				)
			}
		};
		sim_idx.push(graph.add_node(NodeData {
			x,
			y,
			mass: 10.0,
			is_anchor,
			user_data: NodeInfo {
				label: field.label().to_string(),
				color: COLORS[i % COLORS.len()].into(),
			},
		}));
	}

	for link in links {
		graph.add_edge(sim_idx[link.cause], sim_idx[link.effect], EdgeData::default());
	}

	(graph, sim_idx)
}

impl LayoutState {
	pub fn new(fields: &[FieldMeta], links: &[Edge], width: f64, height: f64) -> Self {
		let (graph, sim_idx) = build_sim(fields, links, None, width, height);
		Self {
			graph,
			sim_idx,
			links: links.to_vec(),
			focus: None,
			hover: None,
			neighbors: HashSet::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			press: PressState::default(),
			width,
			height,
			flow_time: 0.0,
		}
	}

	/// Rebuild the simulation for a new field list or edge set, keeping node
	/// positions (and anchors) when the field list is unchanged.
	pub fn sync(&mut self, fields: &[FieldMeta], links: &[Edge]) {
		if self.links == links && fields.len() == self.sim_idx.len() {
			return;
		}
		let saved = if fields.len() == self.sim_idx.len() {
			let mut by_sim: HashMap<DefaultNodeIdx, (f32, f32, bool)> = HashMap::new();
			self.graph.visit_nodes(|node| {
				by_sim.insert(node.index(), (node.x(), node.y(), node.data.is_anchor));
			});
			Some(
				self.sim_idx
					.iter()
					.map(|idx| by_sim[idx])
					.collect::<Vec<_>>(),
			)
		} else {
			None
		};
		let (graph, sim_idx) = build_sim(fields, links, saved.as_deref(), self.width, self.height);
		self.graph = graph;
		self.sim_idx = sim_idx;
		self.links = links.to_vec();
		if self.hover.is_some_and(|h| h >= fields.len()) {
			self.hover = None;
		}
		self.recompute_neighbors();
	}

	/// Node positions in graph space, by field index.
	pub fn positions(&self) -> Vec<(f64, f64)> {
		let mut by_sim: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			by_sim.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		self.sim_idx.iter().map(|idx| by_sim[idx]).collect()
	}

	/// Position and display info per node, by field index, for one frame.
	pub fn render_nodes(&self) -> Vec<(f64, f64, NodeInfo)> {
		let mut by_sim: HashMap<DefaultNodeIdx, (f64, f64, NodeInfo)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			by_sim.insert(
				node.index(),
				(node.x() as f64, node.y() as f64, node.data.user_data.clone()),
			);
		});
		self.sim_idx.iter().map(|idx| by_sim[idx].clone()).collect()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.positions()
			.iter()
			.position(|&(x, y)| ((x - gx).powi(2) + (y - gy).powi(2)).sqrt() < HIT_RADIUS)
	}

	pub fn set_focus(&mut self, focus: Option<usize>) {
		if focus.is_some_and(|f| f >= self.sim_idx.len()) {
			self.focus = None;
			return;
		}
		self.focus = focus;
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover == node {
			return;
		}
		self.hover = node;
		self.recompute_neighbors();
	}

	fn recompute_neighbors(&mut self) {
		self.neighbors.clear();
		if let Some(h) = self.hover {
			for link in &self.links {
				if link.cause == h {
					self.neighbors.insert(link.effect);
				} else if link.effect == h {
					self.neighbors.insert(link.cause);
				}
			}
		}
	}

	pub fn is_highlighted(&self, node: usize) -> bool {
		self.hover == Some(node) || self.neighbors.contains(&node) || self.focus == Some(node)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.is_some() || self.focus.is_some()
	}

	pub fn begin_press(&mut self, x: f64, y: f64) {
		self.press = PressState {
			active: true,
			node: self.node_at_position(x, y),
			moved: false,
			start_x: x,
			start_y: y,
			node_start_x: 0.0,
			node_start_y: 0.0,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
		if let Some(node) = self.press.node {
			let idx = self.sim_idx[node];
			self.graph.visit_nodes(|n| {
				if n.index() == idx {
					self.press.node_start_x = n.x();
					self.press.node_start_y = n.y();
				}
			});
		}
	}

	/// Track pointer movement during a press: drags the pressed node or pans
	/// the view once the pointer leaves the click slop.
	pub fn move_press(&mut self, x: f64, y: f64) {
		if !self.press.active {
			return;
		}
		let (dx, dy) = (x - self.press.start_x, y - self.press.start_y);
		if !self.press.moved && (dx * dx + dy * dy).sqrt() < CLICK_SLOP {
			return;
		}
		self.press.moved = true;

		if let Some(node) = self.press.node {
			let idx = self.sim_idx[node];
			let (nx, ny) = (
				self.press.node_start_x + (dx / self.transform.k) as f32,
				self.press.node_start_y + (dy / self.transform.k) as f32,
			);
			self.graph.visit_nodes_mut(|n| {
				if n.index() == idx {
					n.data.x = nx;
					n.data.y = ny;
					n.data.is_anchor = true;
				}
			});
		} else {
			self.transform.x = self.press.transform_start_x + dx;
			self.transform.y = self.press.transform_start_y + dy;
		}
	}

	/// Release the press. Returns the node the press resolved to as a click,
	/// or `None` for drags/pans (with `true` marking a background click).
	pub fn end_press(&mut self) -> (Option<usize>, bool) {
		let press = std::mem::take(&mut self.press);
		if !press.active || press.moved {
			return (None, false);
		}
		(press.node, press.node.is_none())
	}

	pub fn cancel_press(&mut self) {
		self.press = PressState::default();
	}

	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
