//! Interaction state for one graph view: hover, selection, path mode and the
//! derived per-node color table.
//!
//! Pointer devices use the hover path, touch devices the selection path. The
//! host decides which via [`DeviceClass`] and never mixes the two. Every
//! mutation is synchronous; callers re-read [`InteractionState::styled_nodes`]
//! afterwards and hand the result to the renderer.

use indexmap::IndexSet;
use log::debug;

use super::builder::CompanyGraph;
use super::config::GraphConfig;
use super::paths::{DirectedPaths, PathQuery, PathSelectionType};
use super::relations::{RelationSummary, summarize};
use super::signal::NodeCategory;
use super::types::GraphNode;

/// Input device class, derived from viewport width by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceClass {
	/// Wide viewport: hover shows a popover.
	#[default]
	Pointer,
	/// Narrow viewport: tap opens a bottom sheet.
	Touch,
}

impl DeviceClass {
	/// `Touch` below `breakpoint`, `Pointer` at or above it.
	pub fn from_viewport_width(width: f64, breakpoint: f64) -> Self {
		if width < breakpoint {
			DeviceClass::Touch
		} else {
			DeviceClass::Pointer
		}
	}
}

/// The node under the pointer and where the pointer is (client coordinates).
#[derive(Clone, Debug, PartialEq)]
pub struct HoveredNode {
	/// Hovered node id.
	pub node_id: String,
	/// Pointer x in client coordinates.
	pub pointer_x: f64,
	/// Pointer y in client coordinates.
	pub pointer_y: f64,
}

/// Hover, selection and path-mode state for one graph view.
///
/// `Q` computes the active set around the selection; [`DirectedPaths`] by default.
pub struct InteractionState<Q = DirectedPaths> {
	device: DeviceClass,
	path_mode: PathSelectionType,
	hovered: Option<HoveredNode>,
	/// Touch-only detail target.
	selected: Option<String>,
	/// Selection as tracked by the path query layer, independent of device.
	selections: Vec<String>,
	actives: IndexSet<String>,
	query: Q,
}

impl InteractionState<DirectedPaths> {
	/// Empty state for `device` with the default path query.
	pub fn new(device: DeviceClass) -> Self {
		Self::with_query(device, DirectedPaths)
	}
}

impl<Q: PathQuery> InteractionState<Q> {
	/// Empty state for `device` using a custom path query.
	pub fn with_query(device: DeviceClass, query: Q) -> Self {
		Self {
			device,
			path_mode: PathSelectionType::default(),
			hovered: None,
			selected: None,
			selections: Vec::new(),
			actives: IndexSet::new(),
			query,
		}
	}

	/// Current device class.
	pub fn device(&self) -> DeviceClass {
		self.device
	}

	/// Current path mode.
	pub fn path_mode(&self) -> PathSelectionType {
		self.path_mode
	}

	/// Hovered node, pointer devices only.
	pub fn hovered(&self) -> Option<&HoveredNode> {
		self.hovered.as_ref()
	}

	/// Node whose bottom sheet is open, touch devices only.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Drops hover, selection and actives. Path mode and device class survive.
	pub fn reset(&mut self) {
		self.hovered = None;
		self.selected = None;
		self.selections.clear();
		self.actives.clear();
	}

	/// Switches device class, clearing whatever belonged to the other path.
	/// Returns whether the class changed.
	pub fn set_device(&mut self, device: DeviceClass) -> bool {
		if self.device == device {
			return false;
		}
		debug!("company-graph: device class {:?} -> {:?}", self.device, device);
		self.device = device;
		match device {
			DeviceClass::Pointer => self.selected = None,
			DeviceClass::Touch => self.hovered = None,
		}
		true
	}

	/// Changes the path mode and recomputes actives from the current selection.
	pub fn set_path_mode(&mut self, graph: &CompanyGraph, mode: PathSelectionType) {
		self.path_mode = mode;
		self.refresh_actives(graph);
	}

	/// Pointer entered (or moved within) a node. Ignored on touch devices, for
	/// the center node and for nodes without company data.
	pub fn pointer_over(&mut self, graph: &CompanyGraph, node_id: &str, x: f64, y: f64) {
		if self.device != DeviceClass::Pointer || !has_detail(graph, node_id) {
			return;
		}
		self.hovered = Some(HoveredNode {
			node_id: node_id.to_string(),
			pointer_x: x,
			pointer_y: y,
		});
	}

	/// Pointer left the hovered node. No-op on touch devices.
	pub fn pointer_out(&mut self) {
		if self.device == DeviceClass::Pointer {
			self.hovered = None;
		}
	}

	/// Node click/tap: always moves the selection; on touch devices also opens
	/// the detail sheet for nodes that have one.
	pub fn node_click(&mut self, graph: &CompanyGraph, node_id: &str) {
		if graph.node(node_id).is_none() {
			return;
		}
		self.selections = vec![node_id.to_string()];
		self.refresh_actives(graph);

		if self.device == DeviceClass::Touch && has_detail(graph, node_id) {
			self.selected = Some(node_id.to_string());
		} else {
			self.selected = None;
		}
	}

	/// Click on empty canvas clears the selection.
	pub fn canvas_click(&mut self) {
		self.selections.clear();
		self.actives.clear();
		if self.device == DeviceClass::Touch {
			self.selected = None;
		}
	}

	/// The bottom sheet was dismissed.
	pub fn close_sheet(&mut self) {
		self.selected = None;
	}

	/// Union of path actives, selections and the hovered node.
	pub fn active_node_ids(&self) -> IndexSet<String> {
		let mut ids = self.actives.clone();
		ids.extend(self.selections.iter().cloned());
		if let Some(hovered) = &self.hovered {
			ids.insert(hovered.node_id.clone());
		}
		ids
	}

	/// Node values with fill and opacity resolved for the current state.
	///
	/// The center node is returned unchanged. Other nodes take their category
	/// color and are dimmed unless active.
	pub fn styled_nodes(&self, graph: &CompanyGraph, config: &GraphConfig) -> Vec<GraphNode> {
		let active = self.active_node_ids();
		graph
			.nodes
			.iter()
			.map(|node| {
				if graph.is_center(&node.id) {
					return node.clone();
				}
				let tags = node.data.as_ref().map(|c| c.tags.as_slice()).unwrap_or(&[]);
				let fill = config.palette.fill(NodeCategory::of(tags)).to_string();
				let opacity = if active.contains(&node.id) {
					1.0
				} else {
					config.dim_opacity
				};
				GraphNode {
					fill,
					opacity,
					..node.clone()
				}
			})
			.collect()
	}

	/// Id of the node whose relations should be shown, for the current device.
	pub fn detail_target(&self) -> Option<&str> {
		match self.device {
			DeviceClass::Pointer => self.hovered.as_ref().map(|h| h.node_id.as_str()),
			DeviceClass::Touch => self.selected.as_deref(),
		}
	}

	/// Relation reasons for the hovered/selected node, if it has any data.
	pub fn relation_detail(&self, graph: &CompanyGraph) -> Option<RelationSummary> {
		let id = self.detail_target()?;
		let company = graph.node(id)?.data.as_ref()?;
		Some(summarize(&company.name, graph.merged_tags(id)))
	}

	fn refresh_actives(&mut self, graph: &CompanyGraph) {
		self.actives = match self.selections.first() {
			Some(focus) => self.query.active_nodes(graph, focus, self.path_mode),
			None => IndexSet::new(),
		};
	}
}

fn has_detail(graph: &CompanyGraph, node_id: &str) -> bool {
	!graph.is_center(node_id) && graph.node(node_id).is_some_and(|n| n.data.is_some())
}
