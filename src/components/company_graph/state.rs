//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation around a built [`CompanyGraph`],
//! together with the pan/zoom transform, drag/pan gestures, the interaction
//! state and the resolved per-node appearance. Opacity changes fade smoothly
//! towards the target computed by the interaction state.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info};

use super::builder::CompanyGraph;
use super::config::GraphConfig;
use super::interaction::{DeviceClass, InteractionState};
use super::paths::PathSelectionType;
use super::relations::RelationSummary;
use super::scale::{ScaleConfig, ScaledValues, WeightScale};
use super::theme::Color;
use super::types::{CompanyDetail, GraphEdge};

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	/// Size multiplier (1.0 = related node).
	pub size: f64,
	pub is_center: bool,
}

/// Resolved color and opacity for one node.
#[derive(Clone, Copy, Debug)]
pub struct Appearance {
	pub fill: Color,
	/// Target opacity from the interaction state.
	pub opacity: f64,
	/// Opacity currently drawn, eased towards `opacity`.
	pub shown: f64,
}

/// Display metadata for an edge, keyed by its simulation endpoints.
#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub label: String,
	pub color: Color,
	/// Stroke width in screen pixels.
	pub width: f64,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	/// Set once the pointer moved far enough for this to count as a drag, not a click.
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

/// Pointer travel (screen pixels) beyond which a press becomes a drag.
pub const CLICK_SLOP: f64 = 4.0;

/// Largest per-tick node travel (world units) that still counts as at rest.
const SETTLE_EPSILON: f32 = 0.05;
/// Consecutive quiet ticks before the simulation is paused.
const SETTLE_TICKS: u32 = 60;

/// Core graph state: physics simulation plus interaction and appearance.
///
/// Rebuilt whenever the company data changes; mutated by pointer events and
/// the animation loop otherwise.
pub struct GraphViewState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub company_graph: CompanyGraph,
	pub interaction: InteractionState,
	pub config: GraphConfig,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	/// Cleared once the layout and fades have settled; set again by [`Self::wake`].
	pub animation_running: bool,
	quiet_ticks: u32,
	appearance: HashMap<DefaultNodeIdx, Appearance>,
	edge_info: HashMap<(DefaultNodeIdx, DefaultNodeIdx), EdgeInfo>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	idx_to_id: HashMap<DefaultNodeIdx, String>,
}

impl GraphViewState {
	pub fn new(
		detail: &CompanyDetail,
		config: &GraphConfig,
		scale: &ScaleConfig,
		width: f64,
		height: f64,
		device: DeviceClass,
	) -> Self {
		let company_graph = CompanyGraph::build(detail, config);
		info!(
			"company-graph: built {} nodes, {} edges for {}",
			company_graph.nodes.len(),
			company_graph.edges.len(),
			company_graph.center_id
		);

		let sim = &config.simulation;
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: sim.force_charge,
			force_spring: sim.force_spring,
			force_max: sim.force_max,
			node_speed: sim.node_speed,
			damping_factor: sim.damping_factor,
		});
		let mut id_to_idx = HashMap::new();
		let mut idx_to_id = HashMap::new();

		let related_count = company_graph.nodes.len().saturating_sub(1).max(1);
		for (i, node) in company_graph.nodes.iter().enumerate() {
			let is_center = company_graph.is_center(&node.id);
			// Center pinned at the origin, related nodes seeded on a ring around it.
			let (x, y) = if is_center {
				(0.0, 0.0)
			} else {
				let angle = (i as f64) * 2.0 * PI / related_count as f64;
				((120.0 * angle.cos()) as f32, (120.0 * angle.sin()) as f32)
			};
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: if is_center { 20.0 } else { 10.0 },
				is_anchor: is_center,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					size: node.size,
					is_center,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			idx_to_id.insert(idx, node.id.clone());
		}

		let weights = WeightScale::new(
			company_graph.edges.iter().map(|e| e.weight as f64),
			scale.edge_width,
		);
		let mut edge_info = HashMap::new();
		for edge in &company_graph.edges {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&edge.source), id_to_idx.get(&edge.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				edge_info.insert((src, tgt), edge_display(edge, &weights));
			}
		}

		let mut state = Self {
			graph,
			company_graph,
			interaction: InteractionState::new(device),
			config: config.clone(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			animation_running: true,
			quiet_ticks: 0,
			appearance: HashMap::new(),
			edge_info,
			id_to_idx,
			idx_to_id,
		};
		state.restyle();
		for appearance in state.appearance.values_mut() {
			appearance.shown = appearance.opacity;
		}
		state
	}

	/// Rebuilds the graph for new company data. Hover and selection are reset;
	/// path mode, device class and the view transform carry over.
	pub fn rebuild(&mut self, detail: &CompanyDetail, scale: &ScaleConfig) {
		let mut next = Self::new(
			detail,
			&self.config,
			scale,
			self.width,
			self.height,
			self.interaction.device(),
		);
		std::mem::swap(&mut next.interaction, &mut self.interaction);
		next.interaction.reset();
		next.transform = self.transform.clone();
		*self = next;
		self.restyle();
	}

	/// Resumes ticking after a pause.
	pub fn wake(&mut self) {
		self.animation_running = true;
		self.quiet_ticks = 0;
	}

	/// Re-derives node colors/opacity from the interaction state.
	pub fn restyle(&mut self) {
		self.wake();
		let styled = self
			.interaction
			.styled_nodes(&self.company_graph, &self.config);
		for node in styled {
			let Some(&idx) = self.id_to_idx.get(&node.id) else {
				continue;
			};
			let shown = self
				.appearance
				.get(&idx)
				.map(|a| a.shown)
				.unwrap_or(node.opacity);
			self.appearance.insert(
				idx,
				Appearance {
					fill: Color::parse(&node.fill),
					opacity: node.opacity,
					shown,
				},
			);
		}
	}

	pub fn appearance(&self, idx: DefaultNodeIdx) -> Option<&Appearance> {
		self.appearance.get(&idx)
	}

	pub fn edge_info(&self, src: DefaultNodeIdx, tgt: DefaultNodeIdx) -> Option<&EdgeInfo> {
		self.edge_info.get(&(src, tgt))
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&str> {
		self.idx_to_id.get(&idx).map(String::as_str)
	}

	pub fn is_hovered(&self, id: &str) -> bool {
		self.interaction
			.hovered()
			.is_some_and(|hovered| hovered.node_id == id)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let node_hit_radius = scale.hit_radius * node.data.user_data.size;
			if (dx * dx + dy * dy).sqrt() < node_hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// Pointer moved over `node` (or over empty canvas when `None`).
	pub fn pointer_at(&mut self, node: Option<DefaultNodeIdx>, client_x: f64, client_y: f64) {
		let id = node.and_then(|idx| self.node_id(idx)).map(str::to_string);
		match id {
			Some(id) => {
				self.interaction
					.pointer_over(&self.company_graph, &id, client_x, client_y);
				if !self.is_hovered(&id) {
					self.interaction.pointer_out();
				}
			}
			None => self.interaction.pointer_out(),
		}
		self.restyle();
	}

	pub fn pointer_left(&mut self) {
		self.interaction.pointer_out();
		self.restyle();
	}

	/// Click or tap that was not a drag.
	pub fn click(&mut self, node: Option<DefaultNodeIdx>) {
		let id = node.and_then(|idx| self.node_id(idx)).map(str::to_string);
		match id {
			Some(id) => self.interaction.node_click(&self.company_graph, &id),
			None => self.interaction.canvas_click(),
		}
		self.restyle();
	}

	pub fn set_path_mode(&mut self, mode: PathSelectionType) {
		self.interaction.set_path_mode(&self.company_graph, mode);
		self.restyle();
	}

	pub fn set_device(&mut self, device: DeviceClass) {
		if self.interaction.set_device(device) {
			self.restyle();
		}
	}

	pub fn close_sheet(&mut self) {
		self.interaction.close_sheet();
		self.restyle();
	}

	pub fn relation_detail(&self) -> Option<RelationSummary> {
		self.interaction.relation_detail(&self.company_graph)
	}

	/// Advances the simulation and fades one frame. Pauses itself once nothing
	/// has moved for [`SETTLE_TICKS`] frames.
	pub fn tick(&mut self, dt: f32) {
		let mut before = HashMap::new();
		self.graph.visit_nodes(|node| {
			before.insert(node.index(), (node.x(), node.y()));
		});
		self.graph.update(dt);
		let mut travel = 0.0_f32;
		self.graph.visit_nodes(|node| {
			if let Some(&(x, y)) = before.get(&node.index()) {
				travel = travel.max((node.x() - x).hypot(node.y() - y));
			}
		});
		self.ease_opacity(dt as f64);

		let fading = self
			.appearance
			.values()
			.any(|a| (a.opacity - a.shown).abs() > 0.001);
		if travel < SETTLE_EPSILON && !fading {
			self.quiet_ticks += 1;
		} else {
			self.quiet_ticks = 0;
		}
		if self.quiet_ticks >= SETTLE_TICKS {
			debug!("company-graph: layout settled, pausing simulation");
			self.animation_running = false;
		}
	}

	/// Exponential smoothing of drawn opacity towards its target.
	fn ease_opacity(&mut self, dt: f64) {
		const FADE_SPEED: f64 = 8.0;
		let factor = 1.0 - (-FADE_SPEED * dt).exp();
		for appearance in self.appearance.values_mut() {
			appearance.shown += (appearance.opacity - appearance.shown) * factor;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.wake();
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

fn edge_display(edge: &GraphEdge, weights: &WeightScale) -> EdgeInfo {
	EdgeInfo {
		label: edge.label.clone(),
		color: Color::parse(&edge.fill),
		width: weights.apply(edge.weight as f64),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::company_graph::types::{Company, Direction, RelationTag};

	fn detail() -> CompanyDetail {
		let related = |id: &str, direction: Direction| Company {
			company_id: Some(id.into()),
			name: id.into(),
			tags: vec![RelationTag {
				direction: Some(direction),
				rel_reason: Some(format!("{} reason", id)),
				..Default::default()
			}],
			..Default::default()
		};
		CompanyDetail {
			company: Company {
				company_id: Some("A".into()),
				name: "Alpha".into(),
				..Default::default()
			},
			related: vec![
				related("B", Direction::In),
				related("B", Direction::In),
				related("C", Direction::Out),
			],
		}
	}

	fn state(device: DeviceClass) -> GraphViewState {
		GraphViewState::new(
			&detail(),
			&GraphConfig::default(),
			&ScaleConfig::default(),
			800.0,
			600.0,
			device,
		)
	}

	fn idx_of(state: &GraphViewState, id: &str) -> DefaultNodeIdx {
		state.id_to_idx[id]
	}

	#[test]
	fn center_sits_at_view_origin() {
		let state = state(DeviceClass::Pointer);
		let center = idx_of(&state, "A");
		assert_eq!(state.node_at_position(400.0, 300.0, &ScaleConfig::default()), Some(center));
		assert_eq!(state.node_id(center), Some("A"));
	}

	#[test]
	fn edges_carry_labels_and_weight_widths() {
		let state = state(DeviceClass::Pointer);
		let (a, b, c) = (idx_of(&state, "A"), idx_of(&state, "B"), idx_of(&state, "C"));
		let heavy = state.edge_info(b, a).unwrap();
		let light = state.edge_info(a, c).unwrap();
		assert_eq!(heavy.label, "2");
		assert_eq!(light.label, "");
		assert!(heavy.width > light.width);
	}

	#[test]
	fn initial_opacity_is_settled() {
		let state = state(DeviceClass::Pointer);
		let b = state.appearance(idx_of(&state, "B")).unwrap();
		assert_eq!(b.opacity, 0.3);
		assert_eq!(b.shown, 0.3);
		let a = state.appearance(idx_of(&state, "A")).unwrap();
		assert_eq!(a.opacity, 1.0);
	}

	#[test]
	fn hover_restyles_and_fades_in() {
		let mut state = state(DeviceClass::Pointer);
		let b = idx_of(&state, "B");
		state.pointer_at(Some(b), 5.0, 6.0);
		assert!(state.is_hovered("B"));
		assert_eq!(state.appearance(b).unwrap().opacity, 1.0);

		let before = state.appearance(b).unwrap().shown;
		state.tick(0.016);
		assert!(state.appearance(b).unwrap().shown > before);

		// Moving onto the center drops the hover.
		state.pointer_at(Some(idx_of(&state, "A")), 0.0, 0.0);
		assert!(!state.is_hovered("B"));
		assert!(state.relation_detail().is_none());
	}

	#[test]
	fn tap_then_close_sheet() {
		let mut state = state(DeviceClass::Touch);
		state.click(Some(idx_of(&state, "C")));
		let detail = state.relation_detail().unwrap();
		assert_eq!(detail.name, "C");
		assert_eq!(detail.out_reasons.len(), 1);

		state.close_sheet();
		assert!(state.relation_detail().is_none());
	}

	#[test]
	fn canvas_click_clears_highlight() {
		let mut state = state(DeviceClass::Touch);
		let c = idx_of(&state, "C");
		state.click(Some(c));
		assert_eq!(state.appearance(c).unwrap().opacity, 1.0);
		state.click(None);
		assert_eq!(state.appearance(c).unwrap().opacity, 0.3);
	}

	#[test]
	fn rebuild_resets_interaction_but_keeps_mode() {
		let mut state = state(DeviceClass::Touch);
		state.set_path_mode(PathSelectionType::Out);
		state.click(Some(idx_of(&state, "C")));
		assert!(state.relation_detail().is_some());

		let mut next = detail();
		next.related.truncate(1);
		state.rebuild(&next, &ScaleConfig::default());

		assert_eq!(state.company_graph.nodes.len(), 2);
		assert!(state.relation_detail().is_none());
		assert!(state.interaction.active_node_ids().is_empty());
		assert_eq!(state.interaction.path_mode(), PathSelectionType::Out);
		assert_eq!(state.interaction.device(), DeviceClass::Touch);
	}

	#[test]
	fn settled_layout_pauses_until_woken() {
		let lone = CompanyDetail {
			company: detail().company,
			related: Vec::new(),
		};
		let mut state = GraphViewState::new(
			&lone,
			&GraphConfig::default(),
			&ScaleConfig::default(),
			800.0,
			600.0,
			DeviceClass::Pointer,
		);
		for _ in 0..SETTLE_TICKS {
			assert!(state.animation_running);
			state.tick(0.016);
		}
		assert!(!state.animation_running);

		state.pointer_at(None, 0.0, 0.0);
		assert!(state.animation_running);
	}

	#[test]
	fn resize_keeps_view_centered() {
		let mut state = state(DeviceClass::Pointer);
		state.resize(1000.0, 800.0);
		assert_eq!((state.transform.x, state.transform.y), (500.0, 400.0));
	}
}
