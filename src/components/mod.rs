//! UI components.

/// Company relationship graph.
pub mod company_graph;
