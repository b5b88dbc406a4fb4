//! Force-layout parameterization for the mesh topology.
//!
//! The physics engine integrates charge repulsion, a global spring force,
//! and damping. Everything mesh-specific lives here: the per-link
//! rest-length function, the constraint and collision passes layered on
//! top of each engine step, and the placement/mass/size rules used when
//! the simulation is built.

use std::collections::HashMap;
use std::f64::consts::TAU;

use force_graph::{DefaultNodeIdx, SimulationParameters};

use super::types::LinkKind;

/// Rest length ceiling for any link, in world units.
const MAX_LINK_DISTANCE: f64 = 320.0;

/// Target rest length for a link, from its relationship kind and hop depth.
///
/// Direct neighbors sit closest, one-way receptions further out, routed
/// relationships furthest. Length grows with depth so deep branches spread
/// outward instead of collapsing onto the local node.
pub fn link_distance(kind: LinkKind, depth: u32) -> f64 {
	let base = match kind {
		LinkKind::Direct => 60.0,
		LinkKind::Heard => 95.0,
		LinkKind::Routed => 130.0,
	};
	(base * (1.0 + 0.35 * f64::from(depth))).min(MAX_LINK_DISTANCE)
}

/// A link resolved to simulation indices, carrying everything the
/// constraint, highlight, and render passes need per frame.
#[derive(Clone, Debug)]
pub struct LinkRef {
	/// Source endpoint in the simulation.
	pub source: DefaultNodeIdx,
	/// Target endpoint in the simulation.
	pub target: DefaultNodeIdx,
	/// Radio relationship kind.
	pub kind: LinkKind,
	/// Rest length from [`link_distance`].
	pub rest_length: f64,
	/// Reported signal-to-noise ratio, if any.
	pub snr: Option<f64>,
}

/// Position snapshot consumed by the relaxation passes.
#[derive(Clone, Copy, Debug)]
pub struct BodySnapshot {
	/// World-space x.
	pub x: f64,
	/// World-space y.
	pub y: f64,
	/// Display-size multiplier, scales the collision footprint.
	pub size: f64,
	/// Anchored bodies (dragged or pinned) never move.
	pub anchored: bool,
}

/// Layout tuning applied on top of the physics engine.
#[derive(Clone, Debug)]
pub struct LayoutParams {
	/// Charge repulsion strength between all node pairs.
	pub force_charge: f32,
	/// Global spring constant for linked nodes.
	pub force_spring: f32,
	/// Per-axis force cap.
	pub force_max: f32,
	/// Velocity scale of the integrator.
	pub node_speed: f32,
	/// Velocity damping per step.
	pub damping_factor: f32,
	/// Fraction of a link's rest-length error corrected per second.
	pub link_strength: f64,
	/// Minimum separation per unit of combined node size, world units.
	pub collision_radius: f64,
	/// Fraction of a collision overlap corrected per second.
	pub collision_strength: f64,
	/// Ring radius step per hop depth for initial placement.
	pub ring_step: f64,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			link_strength: 2.5,
			collision_radius: 9.0,
			collision_strength: 4.0,
			ring_step: 90.0,
		}
	}
}

impl LayoutParams {
	/// The subset of tuning handed to the physics engine.
	pub fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}

	/// Initial world position for node `index` of `count`, ringed by hop depth
	/// around the graph origin.
	///
	/// The local node (depth 0) starts at the origin; unknown depth lands one
	/// ring past the deepest known hop. Overlaps on dense rings are resolved
	/// by the collision pass within a few frames.
	pub fn ring_position(
		&self,
		depth: Option<u32>,
		max_depth: u32,
		index: usize,
		count: usize,
	) -> (f32, f32) {
		let ring = f64::from(depth.unwrap_or(max_depth + 1));
		let radius = self.ring_step * ring;
		let angle = index as f64 * TAU / count.max(1) as f64;
		((radius * angle.cos()) as f32, (radius * angle.sin()) as f32)
	}
}

/// Display-size multiplier for a node.
///
/// The local node dominates, labeled nodes sit above unlabeled ones, and
/// link count nudges size within each band (square-root scaled so hubs
/// don't swamp the view).
pub fn node_size(is_local: bool, has_label: bool, link_count: usize, max_links: usize) -> f64 {
	let link_factor = (link_count as f64 / max_links.max(1) as f64).sqrt();
	if is_local {
		1.8 + 0.4 * link_factor
	} else if has_label {
		1.2 + 0.6 * link_factor
	} else {
		0.7 + 0.5 * link_factor
	}
}

/// One relaxation step nudging link endpoints toward their rest lengths.
///
/// Returns per-node displacements to add to the engine's positions.
/// Anchored endpoints stay put; the free endpoint absorbs its half of the
/// correction only.
pub fn apply_link_constraints(
	params: &LayoutParams,
	links: &[LinkRef],
	bodies: &HashMap<DefaultNodeIdx, BodySnapshot>,
	dt: f64,
) -> HashMap<DefaultNodeIdx, (f64, f64)> {
	let gain = (params.link_strength * dt).min(0.5);
	let mut shifts: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();

	for link in links {
		let (Some(a), Some(b)) = (bodies.get(&link.source), bodies.get(&link.target)) else {
			continue;
		};
		let (dx, dy) = (b.x - a.x, b.y - a.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 1e-3 {
			continue;
		}
		let step = (dist - link.rest_length) * gain * 0.5;
		let (ux, uy) = (dx / dist, dy / dist);

		if !a.anchored {
			let shift = shifts.entry(link.source).or_insert((0.0, 0.0));
			shift.0 += ux * step;
			shift.1 += uy * step;
		}
		if !b.anchored {
			let shift = shifts.entry(link.target).or_insert((0.0, 0.0));
			shift.0 -= ux * step;
			shift.1 -= uy * step;
		}
	}

	shifts
}

/// One separation step pushing overlapping nodes apart.
///
/// Pairs closer than their combined collision footprint receive equal and
/// opposite displacements. Pairwise is fine at mesh scale (tens to a few
/// hundred nodes).
pub fn apply_collisions(
	params: &LayoutParams,
	bodies: &[(DefaultNodeIdx, BodySnapshot)],
	dt: f64,
) -> HashMap<DefaultNodeIdx, (f64, f64)> {
	let gain = (params.collision_strength * dt).min(1.0);
	let mut shifts: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();

	for i in 0..bodies.len() {
		for j in (i + 1)..bodies.len() {
			let (idx_a, a) = bodies[i];
			let (idx_b, b) = bodies[j];
			let min_sep = params.collision_radius * (a.size + b.size);
			let (dx, dy) = (b.x - a.x, b.y - a.y);
			let dist_sq = dx * dx + dy * dy;
			if dist_sq >= min_sep * min_sep {
				continue;
			}

			let dist = dist_sq.sqrt().max(1e-3);
			let step = (min_sep - dist) * gain * 0.5;
			// Coincident nodes separate along a fixed axis.
			let (ux, uy) = if dist_sq > 1e-6 {
				(dx / dist, dy / dist)
			} else {
				(1.0, 0.0)
			};

			if !a.anchored {
				let shift = shifts.entry(idx_a).or_insert((0.0, 0.0));
				shift.0 -= ux * step;
				shift.1 -= uy * step;
			}
			if !b.anchored {
				let shift = shifts.entry(idx_b).or_insert((0.0, 0.0));
				shift.0 += ux * step;
				shift.1 += uy * step;
			}
		}
	}

	shifts
}

#[cfg(test)]
mod tests {
	use force_graph::{ForceGraph, NodeData};

	use super::*;

	fn indices(n: usize) -> Vec<DefaultNodeIdx> {
		// DefaultNodeIdx is opaque; mint real ones from a scratch graph.
		let mut graph: ForceGraph<(), ()> =
			ForceGraph::new(LayoutParams::default().simulation_parameters());
		(0..n)
			.map(|_| graph.add_node(NodeData::default()))
			.collect()
	}

	fn body(x: f64, y: f64) -> BodySnapshot {
		BodySnapshot {
			x,
			y,
			size: 1.0,
			anchored: false,
		}
	}

	#[test]
	fn distance_orders_kinds() {
		for depth in [0, 1, 3] {
			let direct = link_distance(LinkKind::Direct, depth);
			let heard = link_distance(LinkKind::Heard, depth);
			let routed = link_distance(LinkKind::Routed, depth);
			assert!(direct < heard && heard < routed, "depth {depth}");
		}
	}

	#[test]
	fn distance_grows_with_depth_until_clamped() {
		let mut previous = 0.0;
		for depth in 0..6 {
			let d = link_distance(LinkKind::Direct, depth);
			assert!(d > previous);
			previous = d;
		}
		assert_eq!(link_distance(LinkKind::Routed, 1000), 320.0);
	}

	#[test]
	fn link_constraint_pulls_stretched_link_together() {
		let idx = indices(2);
		let links = vec![LinkRef {
			source: idx[0],
			target: idx[1],
			kind: LinkKind::Direct,
			rest_length: 60.0,
			snr: None,
		}];
		let bodies: HashMap<_, _> =
			[(idx[0], body(0.0, 0.0)), (idx[1], body(200.0, 0.0))].into();

		let shifts = apply_link_constraints(&LayoutParams::default(), &links, &bodies, 0.016);
		let a = shifts[&idx[0]];
		let b = shifts[&idx[1]];
		// Endpoints converge: a moves right, b moves left, symmetrically.
		assert!(a.0 > 0.0);
		assert!(b.0 < 0.0);
		assert!((a.0 + b.0).abs() < 1e-9);
		assert_eq!(a.1, 0.0);
	}

	#[test]
	fn link_constraint_pushes_compressed_link_apart() {
		let idx = indices(2);
		let links = vec![LinkRef {
			source: idx[0],
			target: idx[1],
			kind: LinkKind::Direct,
			rest_length: 60.0,
			snr: None,
		}];
		let bodies: HashMap<_, _> = [(idx[0], body(0.0, 0.0)), (idx[1], body(10.0, 0.0))].into();

		let shifts = apply_link_constraints(&LayoutParams::default(), &links, &bodies, 0.016);
		assert!(shifts[&idx[0]].0 < 0.0);
		assert!(shifts[&idx[1]].0 > 0.0);
	}

	#[test]
	fn link_constraint_skips_anchored_endpoint() {
		let idx = indices(2);
		let links = vec![LinkRef {
			source: idx[0],
			target: idx[1],
			kind: LinkKind::Direct,
			rest_length: 60.0,
			snr: None,
		}];
		let mut anchored = body(0.0, 0.0);
		anchored.anchored = true;
		let bodies: HashMap<_, _> = [(idx[0], anchored), (idx[1], body(200.0, 0.0))].into();

		let shifts = apply_link_constraints(&LayoutParams::default(), &links, &bodies, 0.016);
		assert!(!shifts.contains_key(&idx[0]));
		assert!(shifts.contains_key(&idx[1]));
	}

	#[test]
	fn collision_separates_overlapping_pair() {
		let idx = indices(2);
		let bodies = vec![(idx[0], body(0.0, 0.0)), (idx[1], body(4.0, 0.0))];

		let shifts = apply_collisions(&LayoutParams::default(), &bodies, 0.016);
		let a = shifts[&idx[0]];
		let b = shifts[&idx[1]];
		assert!(a.0 < 0.0);
		assert!(b.0 > 0.0);
		assert!((a.0 + b.0).abs() < 1e-9);
	}

	#[test]
	fn collision_ignores_separated_pair() {
		let idx = indices(2);
		let bodies = vec![(idx[0], body(0.0, 0.0)), (idx[1], body(500.0, 0.0))];

		let shifts = apply_collisions(&LayoutParams::default(), &bodies, 0.016);
		assert!(shifts.is_empty());
	}

	#[test]
	fn coincident_nodes_still_separate() {
		let idx = indices(2);
		let bodies = vec![(idx[0], body(50.0, 50.0)), (idx[1], body(50.0, 50.0))];

		let shifts = apply_collisions(&LayoutParams::default(), &bodies, 0.016);
		assert!(shifts[&idx[0]].0 < 0.0);
		assert!(shifts[&idx[1]].0 > 0.0);
	}

	#[test]
	fn ring_position_centers_local_node() {
		let params = LayoutParams::default();
		let (x, y) = params.ring_position(Some(0), 3, 0, 10);
		assert_eq!((x, y), (0.0, 0.0));
	}

	#[test]
	fn ring_position_places_unknown_depth_outermost() {
		let params = LayoutParams::default();
		let (x, _) = params.ring_position(None, 2, 0, 4);
		// Ring 3 at angle 0: 3 * ring_step out on the x axis.
		assert_eq!(x, (3.0 * params.ring_step) as f32);
	}

	#[test]
	fn node_size_bands() {
		let local = node_size(true, true, 4, 8);
		let labeled = node_size(false, true, 4, 8);
		let plain = node_size(false, false, 4, 8);
		assert!(local > labeled && labeled > plain);
		// More links, bigger node, same band.
		assert!(node_size(false, false, 8, 8) > node_size(false, false, 1, 8));
	}
}
