//! Path queries that decide which nodes light up when a node is selected.

use std::collections::VecDeque;

use indexmap::IndexSet;

use super::builder::CompanyGraph;

/// Which directional subgraph counts as "active" around a selected node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PathSelectionType {
	/// Nodes with a path into the focus node.
	#[default]
	In,
	/// Nodes reachable from the focus node.
	Out,
	/// Union of `In` and `Out`.
	All,
}

impl PathSelectionType {
	/// Every mode, in toggle order.
	pub const ALL_MODES: [PathSelectionType; 3] = [
		PathSelectionType::In,
		PathSelectionType::Out,
		PathSelectionType::All,
	];

	/// Button label.
	pub fn label(self) -> &'static str {
		match self {
			PathSelectionType::In => "IN",
			PathSelectionType::Out => "OUT",
			PathSelectionType::All => "ALL",
		}
	}
}

/// Given a graph, a focus node and a mode, returns the node ids considered active.
pub trait PathQuery {
	/// Active node ids around `focus`, focus included. Unknown focus yields an empty set.
	fn active_nodes(
		&self,
		graph: &CompanyGraph,
		focus: &str,
		mode: PathSelectionType,
	) -> IndexSet<String>;
}

/// Breadth-first reachability along edge direction.
///
/// Transitive: every node on a directed path to or from the focus lights up,
/// not only its direct neighbours.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectedPaths;

impl DirectedPaths {
	fn walk<'a>(
		graph: &'a CompanyGraph,
		focus: &'a str,
		forward: bool,
		into: &mut IndexSet<String>,
	) {
		let mut seen: IndexSet<&'a str> = IndexSet::new();
		let mut queue = VecDeque::from([focus]);
		seen.insert(focus);

		while let Some(current) = queue.pop_front() {
			for edge in &graph.edges {
				let (from, to) = if forward {
					(edge.source.as_str(), edge.target.as_str())
				} else {
					(edge.target.as_str(), edge.source.as_str())
				};
				if from == current && seen.insert(to) {
					queue.push_back(to);
				}
			}
		}

		into.extend(seen.into_iter().map(str::to_string));
	}
}

impl PathQuery for DirectedPaths {
	fn active_nodes(
		&self,
		graph: &CompanyGraph,
		focus: &str,
		mode: PathSelectionType,
	) -> IndexSet<String> {
		let mut active = IndexSet::new();
		if graph.node(focus).is_none() {
			return active;
		}
		if matches!(mode, PathSelectionType::In | PathSelectionType::All) {
			Self::walk(graph, focus, false, &mut active);
		}
		if matches!(mode, PathSelectionType::Out | PathSelectionType::All) {
			Self::walk(graph, focus, true, &mut active);
		}
		active
	}
}
