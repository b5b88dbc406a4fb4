//! Topology simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node metadata, view
//! transforms for pan/zoom, gesture tracking, and highlight state that dims
//! everything unrelated to the hovered or selected node with smooth
//! intensity transitions.

use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use log::warn;

use super::layout::{self, BodySnapshot, LayoutParams, LinkRef};
use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Theme, default_role_colors};
use super::types::TopologyData;

/// Nodes quiet for longer than this many seconds render dimmed.
const STALE_AFTER_SECS: f64 = 900.0;

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	/// Short name shown next to the node, when the device reported one.
	pub label: Option<String>,
	/// Resolved CSS color.
	pub color: String,
	/// Size multiplier (1.0 = normal, >1.0 = larger/more important)
	pub size: f64,
	/// Hop depth from the local node, if known.
	pub hops: Option<u32>,
	/// Whether the node has gone quiet.
	pub stale: bool,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	/// Screen-space x offset.
	pub x: f64,
	/// Screen-space y offset.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0 by the interaction layer).
	pub k: f64,
}

impl ViewTransform {
	/// Convert a screen-space point to graph space.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Convert a graph-space point to screen space.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Whether a drag is in progress.
	pub active: bool,
	/// The node being dragged.
	pub node_idx: Option<DefaultNodeIdx>,
	/// Screen x where the gesture started.
	pub start_x: f64,
	/// Screen y where the gesture started.
	pub start_y: f64,
	/// Node x when the gesture started.
	pub node_start_x: f32,
	/// Node y when the gesture started.
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether a pan is in progress.
	pub active: bool,
	/// Screen x where the gesture started.
	pub start_x: f64,
	/// Screen y where the gesture started.
	pub start_y: f64,
	/// Transform x when the gesture started.
	pub transform_start_x: f64,
	/// Transform y when the gesture started.
	pub transform_start_y: f64,
}

/// Manages smooth highlight transitions with per-node intensity tracking.
///
/// The focus node is the selected node when one is pinned, else the hovered
/// node. The focus and its radio neighbors form the target set; each node
/// carries its own intensity value (0.0 to 1.0) that animates toward
/// membership in that set, so unrelated nodes dim smoothly rather than
/// snapping.
///
/// Uses exponential smoothing for natural-feeling transitions that slow down
/// as they approach their target, plus a minimum hold time to prevent
/// flashing when the mouse briefly skirts the edge of a node's hover zone.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	/// Currently hovered node (if any)
	pub hovered_node: Option<DefaultNodeIdx>,
	/// Selected node, pinned until the background is clicked.
	selected_node: Option<DefaultNodeIdx>,
	/// Set of nodes that should be highlighted (focus + neighbors)
	target_set: HashSet<DefaultNodeIdx>,
	/// Per-node highlight intensity (0.0 = not highlighted, 1.0 = fully highlighted)
	/// Nodes not in this map have intensity 0.
	node_intensity: HashMap<DefaultNodeIdx, f64>,
	/// Smoothed ring intensity (tracks the focus node with hold time)
	focus_ring_intensity: HashMap<DefaultNodeIdx, f64>,
	/// Per-node hold timer - time remaining before fade-out can begin
	hold_timer: HashMap<DefaultNodeIdx, f64>,
	/// Cached max intensity (updated each tick)
	cached_max: f64,
}

/// Minimum time (seconds) a highlight must be held before it can fade out.
/// This prevents flashing when the mouse briefly touches a hover zone.
const MIN_HOLD_TIME: f64 = 0.12;

impl HighlightState {
	/// The node driving the highlight: the selection if pinned, else the hover.
	pub fn focus(&self) -> Option<DefaultNodeIdx> {
		self.selected_node.or(self.hovered_node)
	}

	/// The pinned selection, if any.
	pub fn selected(&self) -> Option<DefaultNodeIdx> {
		self.selected_node
	}

	/// Update the hovered node. While a selection is pinned, hovering does
	/// not steal the highlight.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>, links: &[LinkRef]) {
		if self.hovered_node == node {
			return;
		}
		self.hovered_node = node;
		if self.selected_node.is_none() {
			self.retarget(links);
		}
	}

	/// Pin or clear the selection and recompute the target highlight set.
	pub fn set_selected(&mut self, node: Option<DefaultNodeIdx>, links: &[LinkRef]) {
		if self.selected_node == node {
			return;
		}
		self.selected_node = node;
		self.retarget(links);
	}

	fn retarget(&mut self, links: &[LinkRef]) {
		self.target_set.clear();

		let Some(focus) = self.focus() else {
			return;
		};

		self.target_set.insert(focus);
		for link in links {
			if link.source == focus {
				self.target_set.insert(link.target);
			} else if link.target == focus {
				self.target_set.insert(link.source);
			}
		}

		// Reset hold timers for newly highlighted nodes
		for &idx in &self.target_set {
			self.hold_timer.insert(idx, MIN_HOLD_TIME);
		}
	}

	/// Animate all node intensities towards their targets using exponential smoothing.
	///
	/// Exponential smoothing: value += (target - value) * (1 - e^(-speed * dt))
	/// This creates natural ease-out behavior where animation slows as it approaches target.
	pub fn tick(&mut self, dt: f64) {
		// Smoothing factors - higher = faster response
		// At 60fps with speed=6: reaches ~95% in ~100-150ms
		const FADE_IN_SPEED: f64 = 6.0;
		const FADE_OUT_SPEED: f64 = 4.0;

		let fade_in_factor = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out_decay = (-FADE_OUT_SPEED * dt).exp();

		// Animate nodes in target set (fade in)
		for &idx in &self.target_set {
			let intensity = self.node_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in_factor;
		}

		// Animate ring intensity (only for the focus node)
		if let Some(idx) = self.focus() {
			let intensity = self.focus_ring_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in_factor;
		}

		// Track max for caching
		let mut new_max: f64 = 0.0;

		// Update hold timers
		self.hold_timer.retain(|idx, timer| {
			if self.target_set.contains(idx) {
				// Node is still highlighted, keep the timer
				true
			} else {
				// Node is no longer in target set, count down
				*timer -= dt;
				*timer > 0.0
			}
		});

		// Animate nodes not in target set (fade out) and remove when done
		self.node_intensity.retain(|idx, intensity| {
			if self.target_set.contains(idx) {
				new_max = new_max.max(*intensity);
				true
			} else {
				// Only fade out if hold timer has expired
				let hold_remaining = self.hold_timer.get(idx).copied().unwrap_or(0.0);
				if hold_remaining <= 0.0 {
					*intensity *= fade_out_decay;
				}
				new_max = new_max.max(*intensity);
				*intensity > 0.005 // Keep only if still visible
			}
		});

		// Animate ring fade-out (respects hold timer)
		let focus = self.focus();
		self.focus_ring_intensity.retain(|idx, intensity| {
			if focus == Some(*idx) {
				true // Still focused, keep at current intensity
			} else {
				let hold_remaining = self.hold_timer.get(idx).copied().unwrap_or(0.0);
				if hold_remaining <= 0.0 {
					*intensity *= fade_out_decay;
				}
				*intensity > 0.005
			}
		});

		self.cached_max = new_max;
	}

	/// Get the highlight intensity for a specific node (already smoothed).
	pub fn node_intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.node_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Get the ring intensity for a specific node (smoothed, with hold time).
	pub fn focus_ring_intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.focus_ring_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Get the highlight intensity for a link.
	/// Uses geometric mean for smoother transitions that don't lag behind nodes.
	pub fn link_intensity(&self, idx1: DefaultNodeIdx, idx2: DefaultNodeIdx) -> f64 {
		let i1 = self.node_intensity(idx1);
		let i2 = self.node_intensity(idx2);
		(i1 * i2).sqrt()
	}

	/// Get the maximum intensity of any node (drives dimming of unrelated elements).
	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}
}

/// Core topology state combining the physics simulation with interaction and
/// highlight tracking.
///
/// Created once when the component mounts, then mutated each frame by the
/// animation loop. The `tick` method advances the physics simulation, applies
/// the mesh layout passes, and animates highlight intensities.
pub struct TopologyState {
	/// The physics simulation.
	pub graph: ForceGraph<NodeInfo, ()>,
	/// Pan/zoom transform.
	pub transform: ViewTransform,
	/// In-progress node drag.
	pub drag: DragState,
	/// In-progress pan.
	pub pan: PanState,
	/// Hover/selection highlight tracking.
	pub highlight: HighlightState,
	/// Layout tuning for the constraint and collision passes.
	pub params: LayoutParams,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Whether the simulation advances each frame.
	pub animation_running: bool,
	/// Clock driving the heard-link flow animation.
	pub flow_time: f64,
	links: Vec<LinkRef>,
}

impl TopologyState {
	/// Build the simulation with the default role color table.
	pub fn new(data: &TopologyData, width: f64, height: f64, theme: &Theme) -> Self {
		Self::new_with_colors(data, width, height, theme, &default_role_colors())
	}

	/// Build the simulation from topology data.
	///
	/// Nodes seed onto rings by hop depth, sized by importance; links resolve
	/// to simulation indices and get their rest length from the distance
	/// function. Links naming unknown nodes are skipped.
	pub fn new_with_colors(
		data: &TopologyData,
		width: f64,
		height: f64,
		theme: &Theme,
		role_colors: &HashMap<String, String>,
	) -> Self {
		let params = LayoutParams::default();
		let mut graph = ForceGraph::new(params.simulation_parameters());
		let mut id_to_idx = HashMap::new();
		let mut links = Vec::new();

		// Count links per node for importance calculation
		let mut link_counts: HashMap<&String, usize> = HashMap::new();
		for link in &data.links {
			*link_counts.entry(&link.source).or_insert(0) += 1;
			*link_counts.entry(&link.target).or_insert(0) += 1;
		}
		let max_links = link_counts.values().copied().max().unwrap_or(1).max(1);
		let max_depth = data.nodes.iter().filter_map(|n| n.hops).max().unwrap_or(0);

		for (i, node) in data.nodes.iter().enumerate() {
			// Color precedence: explicit override > role table > palette fallback
			let color = node.color.clone().unwrap_or_else(|| {
				node.role
					.as_ref()
					.and_then(|r| role_colors.get(&r.to_lowercase()).cloned())
					.unwrap_or_else(|| theme.palette.get(i).to_css_rgb())
			});

			let (x, y) = params.ring_position(node.hops, max_depth, i, data.nodes.len());
			let is_local = node.hops == Some(0);
			let link_count = link_counts.get(&node.id).copied().unwrap_or(0);
			let size = layout::node_size(is_local, node.label.is_some(), link_count, max_links);
			let stale = node.last_heard.is_some_and(|secs| secs > STALE_AFTER_SECS);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					label: node.label.clone(),
					color,
					size,
					hops: node.hops,
					stale,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			else {
				warn!(
					"mesh-graph: dropping link {} -> {}: unknown endpoint",
					link.source, link.target
				);
				continue;
			};
			graph.add_edge(src, tgt, EdgeData::default());
			links.push(LinkRef {
				source: src,
				target: tgt,
				kind: link.kind,
				rest_length: layout::link_distance(link.kind, link.depth),
				snr: link.snr,
			});
		}

		Self {
			graph,
			links,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			params,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	/// Resolved links with their kinds, rest lengths, and SNR.
	pub fn links(&self) -> &[LinkRef] {
		&self.links
	}

	/// Convert a screen-space point to graph space under the current transform.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.transform.screen_to_graph(sx, sy)
	}

	/// Current world position of every node, for passes that iterate links.
	pub fn node_positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	/// Topmost node under a screen position, honoring zoom-scaled hit radii.
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

	/// Update the hovered node.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.highlight.set_hover(node, &self.links);
	}

	/// Pin or clear the selected node.
	pub fn set_selected(&mut self, node: Option<DefaultNodeIdx>) {
		self.highlight.set_selected(node, &self.links);
	}

	/// Advance one frame: physics step, mesh layout passes, highlight animation.
	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.apply_layout_passes(f64::from(dt));
		self.flow_time += f64::from(dt);
		self.highlight.tick(f64::from(dt));
	}

	/// Layer the per-link distance constraint and the collision pass on top
	/// of the engine step.
	fn apply_layout_passes(&mut self, dt: f64) {
		let mut bodies = HashMap::new();
		self.graph.visit_nodes(|node| {
			bodies.insert(
				node.index(),
				BodySnapshot {
					x: node.x() as f64,
					y: node.y() as f64,
					size: node.data.user_data.size,
					anchored: node.data.is_anchor,
				},
			);
		});

		let mut shifts = layout::apply_link_constraints(&self.params, &self.links, &bodies, dt);
		let ordered: Vec<_> = bodies.iter().map(|(idx, body)| (*idx, *body)).collect();
		for (idx, (dx, dy)) in layout::apply_collisions(&self.params, &ordered, dt) {
			let shift = shifts.entry(idx).or_insert((0.0, 0.0));
			shift.0 += dx;
			shift.1 += dy;
		}

		if shifts.is_empty() {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if let Some(&(dx, dy)) = shifts.get(&node.index()) {
				node.data.x += dx as f32;
				node.data.y += dy as f32;
			}
		});
	}

	/// Track a canvas resize.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::topology::types::{LinkKind, MeshLink, MeshNode};

	fn node(id: &str, hops: Option<u32>) -> MeshNode {
		MeshNode {
			id: id.to_string(),
			label: None,
			role: None,
			color: None,
			hops,
			last_heard: None,
		}
	}

	fn link(source: &str, target: &str, kind: LinkKind) -> MeshLink {
		MeshLink {
			source: source.to_string(),
			target: target.to_string(),
			kind,
			depth: 0,
			snr: None,
		}
	}

	fn three_node_state() -> TopologyState {
		let data = TopologyData {
			nodes: vec![node("a", Some(0)), node("b", Some(1)), node("c", Some(2))],
			links: vec![
				link("a", "b", LinkKind::Direct),
				link("b", "c", LinkKind::Heard),
			],
		};
		TopologyState::new(&data, 800.0, 600.0, &Theme::default())
	}

	#[test]
	fn transform_roundtrip() {
		let transform = ViewTransform {
			x: 400.0,
			y: 300.0,
			k: 2.0,
		};
		let (gx, gy) = transform.screen_to_graph(500.0, 260.0);
		let (sx, sy) = transform.graph_to_screen(gx, gy);
		assert!((sx - 500.0).abs() < 1e-9);
		assert!((sy - 260.0).abs() < 1e-9);
		assert_eq!((gx, gy), (50.0, -20.0));
	}

	#[test]
	fn builds_links_with_rest_lengths() {
		let state = three_node_state();
		let links = state.links();
		assert_eq!(links.len(), 2);
		assert_eq!(
			links[0].rest_length,
			layout::link_distance(LinkKind::Direct, 0)
		);
		assert_eq!(
			links[1].rest_length,
			layout::link_distance(LinkKind::Heard, 0)
		);
		assert_eq!(state.node_positions().len(), 3);
	}

	#[test]
	fn drops_links_with_unknown_endpoints() {
		let data = TopologyData {
			nodes: vec![node("a", Some(0))],
			links: vec![link("a", "ghost", LinkKind::Direct)],
		};
		let state = TopologyState::new(&data, 800.0, 600.0, &Theme::default());
		assert!(state.links().is_empty());
	}

	#[test]
	fn explicit_color_beats_role_color() {
		let mut custom = node("a", Some(0));
		custom.color = Some("#ff0000".to_string());
		custom.role = Some("router".to_string());
		let data = TopologyData {
			nodes: vec![custom],
			links: vec![],
		};
		let state = TopologyState::new(&data, 800.0, 600.0, &Theme::default());
		let mut color = String::new();
		state.graph.visit_nodes(|n| color = n.data.user_data.color.clone());
		assert_eq!(color, "#ff0000");
	}

	#[test]
	fn role_lookup_is_case_insensitive() {
		let mut routed = node("a", Some(0));
		routed.role = Some("ROUTER".to_string());
		let data = TopologyData {
			nodes: vec![routed],
			links: vec![],
		};
		let state = TopologyState::new(&data, 800.0, 600.0, &Theme::default());
		let mut color = String::new();
		state.graph.visit_nodes(|n| color = n.data.user_data.color.clone());
		assert_eq!(color, default_role_colors()["router"]);
	}

	#[test]
	fn local_node_hit_at_screen_center() {
		let state = three_node_state();
		let config = ScaleConfig::default();
		// The local node seeds at the graph origin, which the initial
		// transform maps to the canvas center.
		let hit = state.node_at_position(400.0, 300.0, &config);
		assert!(hit.is_some());
		assert_eq!(state.node_at_position(10.0, 10.0, &config), None);
	}

	#[test]
	fn hover_highlights_neighbors_only() {
		let mut state = three_node_state();
		let links = state.links().to_vec();
		let (a, b, c) = (links[0].source, links[0].target, links[1].target);

		state.set_hover(Some(a));
		state.highlight.tick(0.1);
		assert!(state.highlight.node_intensity(a) > 0.0);
		assert!(state.highlight.node_intensity(b) > 0.0);
		assert_eq!(state.highlight.node_intensity(c), 0.0);
		assert!(state.highlight.max_intensity() > 0.0);
	}

	#[test]
	fn selection_pins_highlight_against_hover() {
		let mut state = three_node_state();
		let links = state.links().to_vec();
		let (a, c) = (links[0].source, links[1].target);

		state.set_selected(Some(a));
		state.highlight.tick(0.1);
		let before = state.highlight.node_intensity(a);
		assert!(before > 0.0);

		// Hovering elsewhere must not retarget while the selection is pinned.
		state.set_hover(Some(c));
		state.highlight.tick(0.1);
		assert_eq!(state.highlight.focus(), Some(a));
		assert!(state.highlight.node_intensity(a) > before);

		// Clearing the selection hands the highlight back to the hover.
		state.set_selected(None);
		assert_eq!(state.highlight.focus(), Some(c));
	}

	#[test]
	fn highlight_fades_out_after_hold_time() {
		let mut state = three_node_state();
		let a = state.links()[0].source;

		state.set_hover(Some(a));
		state.highlight.tick(0.1);
		let peak = state.highlight.node_intensity(a);

		state.set_hover(None);
		// First tick consumes the hold timer, later ticks decay.
		for _ in 0..4 {
			state.highlight.tick(0.2);
		}
		assert!(state.highlight.node_intensity(a) < peak);
		for _ in 0..40 {
			state.highlight.tick(0.2);
		}
		assert_eq!(state.highlight.node_intensity(a), 0.0);
		assert_eq!(state.highlight.max_intensity(), 0.0);
	}

	#[test]
	fn link_intensity_is_geometric_mean() {
		let mut state = three_node_state();
		let links = state.links().to_vec();
		let (a, b) = (links[0].source, links[0].target);

		state.set_hover(Some(a));
		state.highlight.tick(10.0); // long tick saturates intensities
		let link_t = state.highlight.link_intensity(a, b);
		let expected = (state.highlight.node_intensity(a) * state.highlight.node_intensity(b))
			.sqrt();
		assert!((link_t - expected).abs() < 1e-12);
		assert!(link_t > 0.9);
	}

	#[test]
	fn tick_advances_flow_clock_and_keeps_positions_finite() {
		let mut state = three_node_state();
		for _ in 0..30 {
			state.tick(0.016);
		}
		assert!(state.flow_time > 0.4);
		for (_, (x, y)) in state.node_positions() {
			assert!(x.is_finite() && y.is_finite());
		}
	}

	#[test]
	fn anchored_node_survives_layout_passes() {
		let mut state = three_node_state();
		let local = state.links()[0].source;
		state.graph.visit_nodes_mut(|node| {
			if node.index() == local {
				node.data.is_anchor = true;
				node.data.x = 123.0;
				node.data.y = -45.0;
			}
		});
		for _ in 0..10 {
			state.tick(0.016);
		}
		let (x, y) = state.node_positions()[&local];
		assert_eq!((x, y), (123.0, -45.0));
	}
}
