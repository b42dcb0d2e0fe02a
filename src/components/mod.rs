pub mod causal_graph;
