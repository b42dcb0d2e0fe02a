use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::{LayoutState, NODE_RADIUS, NodeInfo};
use super::types::EdgeKind;

const EDGE_COLOR: (u8, u8, u8) = (100, 180, 255);
const WEAK_EDGE_COLOR: (u8, u8, u8) = (180, 160, 255);

fn rgba((r, g, b): (u8, u8, u8), a: f64) -> String {
	format!("rgba({r}, {g}, {b}, {a})")
}

pub fn render(state: &LayoutState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let nodes = state.render_nodes();
	draw_edges(state, &nodes, ctx);
	draw_nodes(state, &nodes, ctx);
	ctx.restore();
}

fn arrowhead(ctx: &CanvasRenderingContext2d, tip: (f64, f64), u: (f64, f64), size: f64) {
	let (back_x, back_y) = (tip.0 - u.0 * size, tip.1 - u.1 * size);
	let (px, py) = (-u.1 * size * 0.5, u.0 * size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip.0, tip.1);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_edges(
	state: &LayoutState,
	nodes: &[(f64, f64, NodeInfo)],
	ctx: &CanvasRenderingContext2d,
) {
	let k = state.transform.k;
	let (base_width, dash, gap, mark) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	for link in &state.links {
		let (x1, y1, _) = &nodes[link.cause];
		let (x2, y2, _) = &nodes[link.effect];
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let u = (dx / dist, dy / dist);

		let highlighted = state.is_highlighted(link.cause) && state.is_highlighted(link.effect);
		let dimmed = state.has_active_highlight() && !highlighted;
		// confidence drives both weight and opacity
		let strength = link.score.clamp(0.0, 1.0);
		let alpha = if dimmed {
			0.12
		} else {
			0.35 + 0.55 * strength
		};
		let color = match link.kind {
			EdgeKind::WeakDirected => WEAK_EDGE_COLOR,
			_ => EDGE_COLOR,
		};

		ctx.set_stroke_style_str(&rgba(color, alpha));
		ctx.set_line_width(base_width * (0.8 + 0.8 * strength));
		if matches!(link.kind, EdgeKind::Directed | EdgeKind::WeakDirected) {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		// pull the line back so arrow marks sit outside the node disc
		let head_inset = match link.kind {
			EdgeKind::Undirected => NODE_RADIUS,
			_ => NODE_RADIUS + mark,
		};
		let tail_inset = match link.kind {
			EdgeKind::Bidirected => NODE_RADIUS + mark,
			EdgeKind::WeakDirected => NODE_RADIUS + mark * 0.8,
			_ => NODE_RADIUS,
		};
		ctx.begin_path();
		ctx.move_to(x1 + u.0 * tail_inset, y1 + u.1 * tail_inset);
		ctx.line_to(x2 - u.0 * head_inset, y2 - u.1 * head_inset);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(&rgba(color, (alpha + 0.2).min(1.0)));
		let head_tip = (x2 - u.0 * NODE_RADIUS, y2 - u.1 * NODE_RADIUS);
		match link.kind {
			EdgeKind::Directed => arrowhead(ctx, head_tip, u, mark),
			EdgeKind::Bidirected => {
				arrowhead(ctx, head_tip, u, mark);
				let tail_tip = (x1 + u.0 * NODE_RADIUS, y1 + u.1 * NODE_RADIUS);
				arrowhead(ctx, tail_tip, (-u.0, -u.1), mark);
			}
			EdgeKind::WeakDirected => {
				// FCI circle mark at the cause end, arrow at the effect end
				arrowhead(ctx, head_tip, u, mark);
				let r = mark * 0.35;
				let (cx, cy) = (
					x1 + u.0 * (NODE_RADIUS + r),
					y1 + u.1 * (NODE_RADIUS + r),
				);
				ctx.set_stroke_style_str(&rgba(color, (alpha + 0.2).min(1.0)));
				ctx.set_line_width(base_width);
				ctx.begin_path();
				let _ = ctx.arc(cx, cy, r, 0.0, 2.0 * PI);
				ctx.stroke();
			}
			EdgeKind::Undirected => {}
		}
	}
}

fn draw_nodes(
	state: &LayoutState,
	nodes: &[(f64, f64, NodeInfo)],
	ctx: &CanvasRenderingContext2d,
) {
	let k = state.transform.k;
	let has_highlight = state.has_active_highlight();

	for (i, (x, y, info)) in nodes.iter().enumerate() {
		let highlighted = state.is_highlighted(i);
		let alpha = if has_highlight && !highlighted { 0.3 } else { 1.0 };
		let radius = if state.hover == Some(i) {
			NODE_RADIUS * 1.3
		} else {
			NODE_RADIUS
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(*x, *y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();

		// the focused node wears a ring: the in-progress link anchor or the
		// currently inspected field
		if state.focus == Some(i) {
			ctx.begin_path();
			let _ = ctx.arc(*x, *y, radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.9)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.85));
		ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
		let _ = ctx.fill_text(&info.label, x + radius + 3.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	}
}
