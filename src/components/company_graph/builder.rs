//! Builds the canonical node/edge set for a center company and its related companies.
//!
//! Nodes are deduplicated by company identity and edges are aggregated per
//! resolved `(source, target)` pair. Both tables keep insertion order so the
//! output is stable for a given input.

use indexmap::IndexMap;
use indexmap::map::Entry;
use log::debug;

use super::config::GraphConfig;
use super::signal::{DirectionCounts, NodeCategory};
use super::types::{Company, CompanyDetail, Direction, GraphEdge, GraphNode, RelationTag};

/// Nodes and edges for one center company, plus the tags merged per node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompanyGraph {
	/// Identity of the center company.
	pub center_id: String,
	/// Center first, then related companies in first-seen order.
	pub nodes: Vec<GraphNode>,
	/// One edge per resolved `(source, target)` pair.
	pub edges: Vec<GraphEdge>,
	merged_tags: IndexMap<String, Vec<RelationTag>>,
}

impl CompanyGraph {
	/// Builds the graph for a company detail payload.
	pub fn build(detail: &CompanyDetail, config: &GraphConfig) -> Self {
		build_graph(&detail.company, &detail.related, config)
	}

	/// Looks up a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|node| node.id == id)
	}

	/// Whether `id` is the center company.
	pub fn is_center(&self, id: &str) -> bool {
		self.center_id == id
	}

	/// Every tag carried by related entries with this id, in input order.
	pub fn merged_tags(&self, id: &str) -> &[RelationTag] {
		self.merged_tags.get(id).map(Vec::as_slice).unwrap_or(&[])
	}
}

/// Converts a center company and its related list into a [`CompanyGraph`].
pub fn build_graph(center: &Company, related: &[Company], config: &GraphConfig) -> CompanyGraph {
	let palette = &config.palette;
	let center_id = center.identity().to_string();

	let mut nodes: IndexMap<String, GraphNode> = IndexMap::new();
	nodes.insert(
		center_id.clone(),
		GraphNode {
			id: center_id.clone(),
			label: center.name.clone(),
			fill: palette.center.clone(),
			size: config.center_size,
			opacity: 1.0,
			data: Some(center.clone()),
		},
	);

	let mut edges: IndexMap<(String, String), GraphEdge> = IndexMap::new();
	let mut merged_tags: IndexMap<String, Vec<RelationTag>> = IndexMap::new();

	for company in related {
		let related_id = company.identity();

		nodes
			.entry(related_id.to_string())
			.or_insert_with(|| GraphNode {
				id: related_id.to_string(),
				label: company.name.clone(),
				fill: palette.fill(NodeCategory::of(&company.tags)).to_string(),
				size: config.related_size,
				opacity: 1.0,
				data: Some(company.clone()),
			});

		if related_id == center_id {
			debug!("company-graph: skipping self relation for {}", related_id);
			continue;
		}

		merged_tags
			.entry(related_id.to_string())
			.or_default()
			.extend(company.tags.iter().cloned());

		let counts = DirectionCounts::of(&company.tags);
		let (source, target) = match counts.resolve() {
			Direction::In => (related_id, center_id.as_str()),
			Direction::Out => (center_id.as_str(), related_id),
		};
		match edges.entry((source.to_string(), target.to_string())) {
			Entry::Occupied(mut entry) => {
				let edge = entry.get_mut();
				edge.weight += 1;
				edge.in_count += counts.inbound;
				edge.out_count += counts.outbound;
			}
			Entry::Vacant(entry) => {
				entry.insert(GraphEdge {
					id: format!("{}-{}", source, target),
					source: source.to_string(),
					target: target.to_string(),
					weight: 1,
					in_count: counts.inbound,
					out_count: counts.outbound,
					label: String::new(),
					fill: palette.edge.clone(),
				});
			}
		}
	}

	let edges: Vec<GraphEdge> = edges
		.into_values()
		.map(|mut edge| {
			if edge.weight > 1 {
				edge.label = edge.weight.to_string();
			}
			edge
		})
		.collect();

	CompanyGraph {
		center_id,
		nodes: nodes.into_values().collect(),
		edges,
		merged_tags,
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::company_graph::signal::INVESTOR_LABEL;

	fn company(id: &str, name: &str, tags: Vec<RelationTag>) -> Company {
		Company {
			company_id: Some(id.into()),
			name: name.into(),
			tags,
			..Default::default()
		}
	}

	fn tag(direction: Option<Direction>, reason: &str) -> RelationTag {
		RelationTag {
			direction,
			rel_reason: Some(reason.into()),
			..Default::default()
		}
	}

	fn edge_summary(graph: &CompanyGraph) -> Vec<(&str, &str, &str, u32, &str)> {
		graph
			.edges
			.iter()
			.map(|e| {
				(
					e.id.as_str(),
					e.source.as_str(),
					e.target.as_str(),
					e.weight,
					e.label.as_str(),
				)
			})
			.collect()
	}

	fn example() -> (Company, Vec<Company>) {
		let center = company("A", "Alpha", vec![]);
		let related = vec![
			company("B", "Beta", vec![tag(Some(Direction::In), "invested")]),
			company("B", "Beta", vec![tag(Some(Direction::In), "board seat")]),
			company("C", "Gamma", vec![tag(Some(Direction::Out), "acquired")]),
		];
		(center, related)
	}

	#[test]
	fn end_to_end_example() {
		let (center, related) = example();
		let graph = build_graph(&center, &related, &GraphConfig::default());

		let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["A", "B", "C"]);
		assert_eq!(
			edge_summary(&graph),
			vec![("B-A", "B", "A", 2, "2"), ("A-C", "A", "C", 1, "")]
		);
		assert_eq!(graph.edges[0].in_count, 2);
		assert_eq!(graph.edges[0].out_count, 0);
		assert_eq!(graph.merged_tags("B").len(), 2);
	}

	#[test]
	fn duplicate_related_does_not_overwrite_first() {
		let center = company("A", "Alpha", vec![]);
		let first = company(
			"B",
			"Beta",
			vec![RelationTag {
				label: INVESTOR_LABEL.into(),
				..Default::default()
			}],
		);
		let second = company("B", "Beta Renamed", vec![]);
		let graph = build_graph(&center, &[first.clone(), second], &GraphConfig::default());

		assert_eq!(graph.nodes.len(), 2);
		let node = graph.node("B").unwrap();
		assert_eq!(node.label, "Beta");
		assert_eq!(node.fill, GraphConfig::default().palette.investor);
		assert_eq!(node.data.as_ref(), Some(&first));
	}

	#[test]
	fn center_is_never_overwritten() {
		let config = GraphConfig::default();
		let center = company("A", "Alpha", vec![]);
		let impostor = company("A", "Alpha Again", vec![tag(Some(Direction::In), "x")]);
		let graph = build_graph(&center, &[impostor], &config);

		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].label, "Alpha");
		assert_eq!(graph.nodes[0].fill, config.palette.center);
		assert_eq!(graph.nodes[0].size, config.center_size);
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn ties_resolve_outward() {
		let center = company("A", "Alpha", vec![]);
		let tied = company(
			"B",
			"Beta",
			vec![tag(Some(Direction::In), "x"), tag(Some(Direction::Out), "y")],
		);
		let untagged = company("C", "Gamma", vec![]);
		let graph = build_graph(&center, &[tied, untagged], &GraphConfig::default());

		assert_eq!(
			edge_summary(&graph),
			vec![("A-B", "A", "B", 1, ""), ("A-C", "A", "C", 1, "")]
		);
	}

	#[test]
	fn opposite_orientations_stay_separate() {
		let center = company("A", "Alpha", vec![]);
		let related = vec![
			company("B", "Beta", vec![tag(Some(Direction::In), "x")]),
			company("B", "Beta", vec![tag(Some(Direction::Out), "y")]),
		];
		let graph = build_graph(&center, &related, &GraphConfig::default());

		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(
			edge_summary(&graph),
			vec![("B-A", "B", "A", 1, ""), ("A-B", "A", "B", 1, "")]
		);
	}

	#[test]
	fn hyphenated_ids_do_not_merge_edges() {
		let center = company("c", "Center", vec![]);
		let related = vec![
			company("x-c", "Left", vec![tag(Some(Direction::Out), "x")]),
			company("c-x", "Right", vec![tag(Some(Direction::In), "y")]),
		];
		let graph = build_graph(&center, &related, &GraphConfig::default());

		let pairs: Vec<(&str, &str, u32)> = graph
			.edges
			.iter()
			.map(|e| (e.source.as_str(), e.target.as_str(), e.weight))
			.collect();
		assert_eq!(pairs, vec![("c", "x-c", 1), ("c-x", "c", 1)]);
	}

	#[test]
	fn nameless_identity_falls_back_to_name() {
		let center = company("A", "Alpha", vec![]);
		let unlisted = Company {
			name: "Private Co".into(),
			..Default::default()
		};
		let graph = build_graph(&center, &[unlisted], &GraphConfig::default());

		assert_eq!(graph.nodes[1].id, "Private Co");
		assert_eq!(graph.nodes[1].fill, GraphConfig::default().palette.other);
		assert_eq!(graph.edges[0].id, "A-Private Co");
	}

	#[test]
	fn building_twice_is_identical() {
		let (center, related) = example();
		let config = GraphConfig::default();
		let first = build_graph(&center, &related, &config);
		let second = build_graph(&center.clone(), &related.clone(), &config);
		assert_eq!(first, second);
	}

	#[test]
	fn related_nodes_are_smaller_than_center() {
		let (center, related) = example();
		let graph = build_graph(&center, &related, &GraphConfig::default());
		let center_size = graph.nodes[0].size;
		assert!(graph.nodes[1..].iter().all(|n| n.size < center_size));
	}
}
