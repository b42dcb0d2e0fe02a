use causal_graph_canvas::{App, init_logging};
use leptos::mount::mount_to_body;

fn main() {
	init_logging();
	mount_to_body(App);
}
