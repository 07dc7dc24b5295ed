use std::collections::HashMap;

use super::model::{CANVAS_MARGIN, GraphModel, Motion, NODE_RADIUS};

/// Target rest length of the edge springs.
pub const LINK_DISTANCE: f64 = 150.0;
/// Many-body charge; negative values repel.
pub const CHARGE_STRENGTH: f64 = -300.0;
/// Extra clearance added to the node radius for collision resolution.
pub const COLLIDE_PADDING: f64 = 10.0;
/// Kinetic energy floor below which the relaxation stops.
pub const ALPHA_MIN: f64 = 0.001;

const LINK_STRENGTH: f64 = 0.5;
// alpha reaches ALPHA_MIN after roughly 300 unforced ticks
const ALPHA_DECAY: f64 = 0.0228;
const VELOCITY_DECAY: f64 = 0.6;
const BOUNCE_DAMPING: f64 = 0.5;
const REHEAT_ALPHA: f64 = 0.3;

/// Discrete-time position relaxation over the model's nodes and edges.
///
/// Combines edge-length springs, pairwise charge repulsion, centroid
/// centering, circle collision and a hard bounding box. Pinned nodes are
/// treated as anchors: the simulation never writes to their position.
pub struct Simulation {
	width: f64,
	height: f64,
	alpha: f64,
	alpha_target: f64,
}

impl Simulation {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height, alpha: 1.0, alpha_target: 0.0 }
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// True once the energy decayed below the stopping threshold.
	pub fn is_settled(&self) -> bool {
		self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN
	}

	/// Full restart after a structural reseed.
	pub fn restart(&mut self) {
		self.alpha = 1.0;
	}

	/// Elevated-energy restart while a drag is in progress.
	pub fn reheat(&mut self) {
		self.alpha_target = REHEAT_ALPHA;
		if self.alpha < REHEAT_ALPHA {
			self.alpha = REHEAT_ALPHA;
		}
	}

	/// Let the energy decay again after a drag ends.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Cancel the simulation outright, e.g. before the model is replaced
	/// wholesale.
	pub fn stop(&mut self) {
		self.alpha = 0.0;
		self.alpha_target = 0.0;
	}

	/// One relaxation tick. A no-op once settled.
	pub fn step(&mut self, model: &mut GraphModel) {
		if self.is_settled() {
			return;
		}
		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
		let alpha = self.alpha;

		let (width, height) = (self.width, self.height);
		let (nodes, edges) = model.parts_mut();
		let n = nodes.len();
		if n == 0 {
			return;
		}

		let index: HashMap<&str, usize> =
			nodes.iter().enumerate().map(|(i, node)| (node.id.as_str(), i)).collect();
		let springs: Vec<(usize, usize)> = edges
			.iter()
			.filter_map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
			.filter(|(s, t)| s != t)
			.collect();
		drop(index);

		let pinned: Vec<bool> = nodes.iter().map(|node| node.motion.is_pinned()).collect();
		let mut vx = vec![0.0; n];
		let mut vy = vec![0.0; n];
		for (i, node) in nodes.iter().enumerate() {
			if let Motion::Free { vx: x, vy: y } = node.motion {
				vx[i] = x;
				vy[i] = y;
			}
		}

		// Spring force along each edge toward the rest length. When one end
		// is anchored the free end absorbs the whole correction.
		for &(s, t) in &springs {
			if pinned[s] && pinned[t] {
				continue;
			}
			let (dx, dy) = (nodes[t].x - nodes[s].x, nodes[t].y - nodes[s].y);
			let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
			let pull = (dist - LINK_DISTANCE) / dist * alpha * LINK_STRENGTH;
			let (ws, wt) = match (pinned[s], pinned[t]) {
				(false, false) => (0.5, 0.5),
				(true, false) => (0.0, 1.0),
				(false, true) => (1.0, 0.0),
				(true, true) => unreachable!(),
			};
			vx[t] -= dx * pull * wt;
			vy[t] -= dy * pull * wt;
			vx[s] += dx * pull * ws;
			vy[s] += dy * pull * ws;
		}

		// Inverse-distance charge between every pair spreads unconnected
		// nodes apart.
		for i in 0..n {
			for j in (i + 1)..n {
				let (dx, dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
				let d2 = (dx * dx + dy * dy).max(1.0);
				let w = CHARGE_STRENGTH * alpha / d2;
				if !pinned[i] {
					vx[i] += dx * w;
					vy[i] += dy * w;
				}
				if !pinned[j] {
					vx[j] -= dx * w;
					vy[j] -= dy * w;
				}
			}
		}

		// Integrate with velocity decay; pinned coordinates stay
		// authoritative.
		for (i, node) in nodes.iter_mut().enumerate() {
			match node.motion {
				Motion::Pinned { x, y } => {
					node.x = x;
					node.y = y;
				}
				Motion::Free { .. } => {
					vx[i] *= VELOCITY_DECAY;
					vy[i] *= VELOCITY_DECAY;
					node.x += vx[i];
					node.y += vy[i];
				}
			}
		}

		// Centering: translate free nodes so the centroid sits on the
		// canvas center.
		let (mut cx, mut cy) = (0.0, 0.0);
		for node in nodes.iter() {
			cx += node.x;
			cy += node.y;
		}
		let (ox, oy) = (width / 2.0 - cx / n as f64, height / 2.0 - cy / n as f64);
		for (i, node) in nodes.iter_mut().enumerate() {
			if !pinned[i] {
				node.x += ox;
				node.y += oy;
			}
		}

		// Collision: separate overlapping node circles.
		let min_dist = 2.0 * (NODE_RADIUS + COLLIDE_PADDING);
		for i in 0..n {
			for j in (i + 1)..n {
				let (mut dx, mut dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist >= min_dist {
					continue;
				}
				if dist < 1e-6 {
					// coincident nodes get a deterministic nudge apart
					dx = 1.0;
					dy = 0.0;
					dist = 1.0;
				}
				let overlap = min_dist - dist;
				let (ux, uy) = (dx / dist, dy / dist);
				match (pinned[i], pinned[j]) {
					(false, false) => {
						nodes[i].x -= ux * overlap * 0.5;
						nodes[i].y -= uy * overlap * 0.5;
						nodes[j].x += ux * overlap * 0.5;
						nodes[j].y += uy * overlap * 0.5;
					}
					(true, false) => {
						nodes[j].x += ux * overlap;
						nodes[j].y += uy * overlap;
					}
					(false, true) => {
						nodes[i].x -= ux * overlap;
						nodes[i].y -= uy * overlap;
					}
					(true, true) => {}
				}
			}
		}

		// Hard bounding box, applied last: clamp and bounce with damped,
		// inverted velocity so walls look springy instead of frozen.
		let (min_x, max_x) = (CANVAS_MARGIN + NODE_RADIUS, width - CANVAS_MARGIN - NODE_RADIUS);
		let (min_y, max_y) = (CANVAS_MARGIN + NODE_RADIUS, height - CANVAS_MARGIN - NODE_RADIUS);
		for (i, node) in nodes.iter_mut().enumerate() {
			if pinned[i] {
				continue;
			}
			if node.x < min_x {
				node.x = min_x;
				vx[i] = -vx[i] * BOUNCE_DAMPING;
			} else if node.x > max_x {
				node.x = max_x;
				vx[i] = -vx[i] * BOUNCE_DAMPING;
			}
			if node.y < min_y {
				node.y = min_y;
				vy[i] = -vy[i] * BOUNCE_DAMPING;
			} else if node.y > max_y {
				node.y = max_y;
				vy[i] = -vy[i] * BOUNCE_DAMPING;
			}
			node.motion = Motion::Free { vx: vx[i], vy: vy[i] };
		}
	}

	/// One-shot recentering after a full re-layout: translate the bounding
	/// box of all nodes (pinned coordinates included) onto the canvas
	/// center, then reheat lightly so the move settles visually.
	pub fn recenter(&mut self, model: &mut GraphModel) {
		let (nodes, _) = model.parts_mut();
		if nodes.is_empty() {
			return;
		}
		let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
		let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
		for node in nodes.iter() {
			min_x = min_x.min(node.x);
			max_x = max_x.max(node.x);
			min_y = min_y.min(node.y);
			max_y = max_y.max(node.y);
		}
		let ox = self.width / 2.0 - (min_x + max_x) / 2.0;
		let oy = self.height / 2.0 - (min_y + max_y) / 2.0;
		for node in nodes.iter_mut() {
			node.x += ox;
			node.y += oy;
			if let Motion::Pinned { x, y } = node.motion {
				node.motion = Motion::Pinned { x: x + ox, y: y + oy };
			}
		}
		if self.alpha < REHEAT_ALPHA {
			self.alpha = REHEAT_ALPHA;
		}
	}
}
