use leptos::prelude::*;

use crate::components::causal_graph::{
	Algorithm, BgKnowledge, CausalGraph, CausalGraphCanvas, DiscoveryResult, EdgeKind, FieldMeta,
	FlagMatrix, LinkRequest, Matrix, Mode, NodeSelection,
};

/// A canned PC run over a small weather dataset, standing in for the
/// causal-discovery service.
fn sample_discovery() -> DiscoveryResult {
	let fields = ["temperature", "humidity", "pressure", "rainfall", "visibility"]
		.into_iter()
		.map(|fid| FieldMeta {
			fid: fid.to_string(),
			name: None,
		})
		.collect();

	// PC convention: (1, -1) directed, (-1, -1) undirected, (1, 1) bidirected.
	let flags = FlagMatrix::from_rows(vec![
		vec![0, 1, -1, 0, 0],
		vec![-1, 0, 0, 1, 0],
		vec![-1, 0, 0, 1, 0],
		vec![0, 1, -1, 0, 1],
		vec![0, 0, 0, -1, 0],
	]);
	let scores = Matrix::from_rows(vec![
		vec![0.0, 2.1, 0.8, 0.0, 0.0],
		vec![2.1, 0.0, 0.0, 1.4, 0.0],
		vec![0.8, 0.0, 0.0, 1.9, 0.0],
		vec![0.0, 1.4, 1.9, 0.0, 1.1],
		vec![0.0, 0.0, 0.0, 1.1, 0.0],
	]);

	DiscoveryResult {
		fields,
		scores,
		flags,
		algorithm: Algorithm::Pc,
	}
}

/// Direct causes and effects of `node`, reading only the directed edge kinds.
fn direct_neighbors(graph: &CausalGraph, node: usize) -> (Vec<usize>, Vec<usize>) {
	let (mut causes, mut effects) = (Vec::new(), Vec::new());
	for link in &graph.links {
		if !matches!(link.kind, EdgeKind::Directed | EdgeKind::WeakDirected) {
			continue;
		}
		if link.effect == node {
			causes.push(link.cause);
		} else if link.cause == node {
			effects.push(link.effect);
		}
	}
	(causes, effects)
}

/// Nodes reachable from `node` along directed edges (upstream when
/// `upstream`, downstream otherwise), minus the direct neighbors themselves.
fn transitive_neighbors(graph: &CausalGraph, node: usize, upstream: bool) -> Vec<usize> {
	let mut seen = vec![node];
	let mut queue = vec![node];
	while let Some(current) = queue.pop() {
		for link in &graph.links {
			if !matches!(link.kind, EdgeKind::Directed | EdgeKind::WeakDirected) {
				continue;
			}
			let (from, to) = if upstream {
				(link.effect, link.cause)
			} else {
				(link.cause, link.effect)
			};
			if from == current && !seen.contains(&to) {
				seen.push(to);
				queue.push(to);
			}
		}
	}
	let (direct_causes, direct_effects) = direct_neighbors(graph, node);
	let direct = if upstream { direct_causes } else { direct_effects };
	seen.retain(|&v| v != node && !direct.contains(&v));
	seen
}

fn joined(labels: &[String], nodes: &[usize]) -> String {
	if nodes.is_empty() {
		return "none".to_string();
	}
	nodes
		.iter()
		.map(|&i| labels[i].clone())
		.collect::<Vec<_>>()
		.join(", ")
}

/// Default Home Page: the canvas plus the collaborator controls (mode
/// toggle, threshold slider, reset) and the flow/knowledge panels.
#[component]
pub fn Home() -> impl IntoView {
	let sample = sample_discovery();
	let labels: Vec<String> = sample
		.fields
		.iter()
		.map(|f| f.label().to_string())
		.collect();
	let fids: Vec<String> = sample.fields.iter().map(|f| f.fid.clone()).collect();
	let data = Signal::derive(move || sample.clone());

	let mode = RwSignal::new(Mode::Explore);
	let threshold = RwSignal::new(0.0_f64);
	let reset_epoch = RwSignal::new(0_u32);
	let selection = RwSignal::new(None::<NodeSelection>);
	// constraints from earlier sessions arrive pre-seeded; new assertions append
	let knowledge = RwSignal::new(vec![BgKnowledge {
		src_fid: "pressure".to_string(),
		tgt_fid: "rainfall".to_string(),
	}]);

	let on_select = Callback::new(move |sel: Option<NodeSelection>| selection.set(sel));
	let on_link = Callback::new(move |req: LinkRequest| {
		knowledge.update(|list| {
			list.retain(|k| !(k.src_fid == req.cause_fid && k.tgt_fid == req.effect_fid));
			list.push(BgKnowledge {
				src_fid: req.cause_fid,
				tgt_fid: req.effect_fid,
			});
		});
	});

	let flow_panel = move || {
		selection.get().and_then(|sel| {
			let node = fids.iter().position(|fid| *fid == sel.field.fid)?;
			let (causes, effects) = direct_neighbors(&sel.graph, node);
			let upstream = transitive_neighbors(&sel.graph, node, true);
			let downstream = transitive_neighbors(&sel.graph, node, false);
			Some(view! {
				<div class="flow-panel">
					<h2>{labels[node].clone()}</h2>
					<p>"Direct causes: " {joined(&labels, &causes)}</p>
					<p>"Direct effects: " {joined(&labels, &effects)}</p>
					<p>"Upstream: " {joined(&labels, &upstream)}</p>
					<p>"Downstream: " {joined(&labels, &downstream)}</p>
				</div>
			})
		})
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<CausalGraphCanvas
					data=data
					mode=mode
					threshold=threshold
					reset_epoch=reset_epoch
					on_select=on_select
					on_link=on_link
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Causal Graph Explorer"</h1>
					<p class="subtitle">
						"Click a node to inspect its flow. In edit mode, click a cause and then an effect to assert a link."
					</p>
					<div class="controls">
						<button on:click=move |_| {
							mode.update(|m| {
								*m = match m {
									Mode::Explore => Mode::Edit,
									Mode::Edit => Mode::Explore,
								}
							})
						}>
							{move || match mode.get() {
								Mode::Explore => "Switch to edit",
								Mode::Edit => "Switch to explore",
							}}
						</button>
						<label>
							"Confidence " {move || format!("{:.2}", threshold.get())}
							<input
								type="range"
								min="0"
								max="1"
								step="0.05"
								prop:value=move || threshold.get().to_string()
								on:input=move |ev| {
									if let Ok(v) = event_target_value(&ev).parse::<f64>() {
										threshold.set(v);
									}
								}
							/>
						</label>
						<button on:click=move |_| {
							reset_epoch.update(|e| *e += 1)
						}>"Reset edits"</button>
					</div>
					{flow_panel}
					<div class="knowledge-panel">
						<h2>"Background knowledge"</h2>
						<ul>
							{move || {
								knowledge
									.get()
									.into_iter()
									.map(|k| {
										view! {
											<li>{format!("{} causes {}", k.src_fid, k.tgt_fid)}</li>
										}
									})
									.collect_view()
							}}
						</ul>
					</div>
				</div>
			</div>
		</ErrorBoundary>
	}
}
