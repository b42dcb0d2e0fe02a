use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::decode::derive_graph;
use super::layout::LayoutState;
use super::normalize::normalize;
use super::render;
use super::session::{Mode, Session};
use super::types::{CausalGraph, DiscoveryResult, Edge, LinkRequest, NodeSelection};

/// Interactive canvas over one causal-discovery result.
///
/// Decodes the discovery matrices into a typed graph, renders it with a
/// force layout, and runs the explore/edit click protocol. Collaborators own
/// the controls: `mode`, `threshold` and `reset_epoch` come in as props, and
/// focus changes / asserted links go back out through `on_select` /
/// `on_link` (the latter by field id, for background-knowledge propagation).
#[component]
pub fn CausalGraphCanvas(
	#[prop(into)] data: Signal<DiscoveryResult>,
	#[prop(into)] mode: Signal<Mode>,
	#[prop(into)] threshold: Signal<f64>,
	/// Bump to discard all edits and restore the normalized matrix.
	#[prop(into)] reset_epoch: Signal<u32>,
	#[prop(optional, into)] on_select: Option<Callback<Option<NodeSelection>>>,
	#[prop(optional, into)] on_link: Option<Callback<LinkRequest>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	// Derived-value pipeline. Each step is memoized on its own inputs so a
	// threshold or focus change never re-runs normalization or the decoder.
	let normalized = Memo::new(move |_| data.with(|d| normalize(&d.scores, &d.scores)));
	let session = RwSignal::new(Session::new(normalized.get_untracked()));

	// New upstream matrices or an explicit reset discard every edit.
	Effect::new(move |_| {
		reset_epoch.track();
		let norm = normalized.get();
		debug!("resetting working matrix ({} fields)", norm.size());
		session.update(|s| s.reset(&norm));
	});
	Effect::new(move |_| {
		let m = mode.get();
		session.update(|s| s.set_mode(m));
	});

	// Focus-only session changes stop at this memo: the matrix compares equal.
	let working = Memo::new(move |_| session.with(|s| s.matrix().clone()));
	let graph = Memo::new(move |_| {
		data.with(|d| {
			let w = working.get();
			// a shape mismatch means an upstream swap is mid-flight; the
			// reset effect re-syncs the session right after
			let links = if w.size() == d.flags.size() {
				derive_graph(&w, &d.flags, d.algorithm)
			} else {
				Vec::new()
			};
			CausalGraph {
				nodes: (0..d.fields.len()).collect(),
				links,
			}
		})
	});
	// Prefix truncation of the score-sorted list.
	let visible = Memo::new(move |_| {
		let cut = threshold.get();
		graph.with(|g| {
			g.links
				.iter()
				.take_while(|e| e.score >= cut)
				.copied()
				.collect::<Vec<Edge>>()
		})
	});

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<LayoutState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*state_init.borrow_mut() = Some(data.with_untracked(|d| {
			LayoutState::new(&d.fields, &visible.get_untracked(), w, h)
		}));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Push graph and focus changes into the layout.
	let state_sync = state.clone();
	Effect::new(move |_| {
		let links = visible.get();
		let focus = session.with(|s| s.focus());
		data.with(|d| {
			if let Some(ref mut s) = *state_sync.borrow_mut() {
				s.sync(&d.fields, &links);
				s.set_focus(focus);
			}
		});
	});

	let cursor_position = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = cursor_position(&ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.begin_press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = cursor_position(&ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.press.active {
				s.move_press(x, y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let (clicked, background) = match *state_mu.borrow_mut() {
			Some(ref mut s) => s.end_press(),
			None => (None, false),
		};

		if let Some(node) = clicked {
			let completed = session.try_update(|s| s.click_node(node)).flatten();
			if let Some(link) = completed {
				let request = data.with_untracked(|d| LinkRequest {
					cause_fid: d.fields[link.cause].fid.clone(),
					effect_fid: d.fields[link.effect].fid.clone(),
				});
				info!(
					"link asserted: {} -> {}",
					request.cause_fid, request.effect_fid
				);
				if let Some(cb) = on_link {
					cb.run(request);
				}
			} else if mode.get_untracked() == Mode::Explore {
				if let Some(cb) = on_select {
					let selection = session.with_untracked(|s| s.focus()).map(|f| {
						data.with_untracked(|d| NodeSelection {
							field: d.fields[f].clone(),
							graph: graph.get_untracked(),
						})
					});
					cb.run(selection);
				}
			}
		} else if background {
			session.update(|s| s.click_background());
			if let Some(cb) = on_select {
				cb.run(None);
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel_press();
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = cursor_position(&ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="causal-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
