use super::model::{Edge, GraphModel, NODE_RADIUS};
use super::selection::{Algorithm, EndpointDemand, Selection};

/// Perpendicular distance between an edge line and its weight label.
pub const LABEL_OFFSET: f64 = 15.0;
/// Radius of the disc drawn behind a weight label.
pub const LABEL_RADIUS: f64 = 14.0;
/// Horizontal reach of a self-loop's control points.
pub const LOOP_SPAN: f64 = 50.0;
/// How far a self-loop's control points rise above the node rim.
pub const LOOP_RISE: f64 = 20.0;
/// Maximum distance from an edge line at which a click still selects it.
pub const EDGE_HIT_DISTANCE: f64 = 8.0;
/// Perpendicular separation applied to each member of a reverse pair so the
/// two lines do not overdraw each other.
pub const PAIR_OFFSET: f64 = 6.0;

/// Cubic bezier describing a loop edge anchored at the top of its node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelfLoop {
	pub start: (f64, f64),
	pub control1: (f64, f64),
	pub control2: (f64, f64),
	pub end: (f64, f64),
	pub label: (f64, f64),
}

/// Build the loop curve for a node centered at `(x, y)`.
pub fn self_loop(x: f64, y: f64) -> SelfLoop {
	let rim = y - NODE_RADIUS;
	SelfLoop {
		start: (x, rim),
		control1: (x - LOOP_SPAN, rim - LOOP_RISE),
		control2: (x + LOOP_SPAN, rim - LOOP_RISE),
		end: (x, rim),
		label: (x, rim - LOOP_RISE - LABEL_OFFSET),
	}
}

/// Trim a center-to-center segment to the node rims so arrowheads land on
/// the circle boundary. `None` when the circles overlap and no visible
/// segment remains.
pub fn edge_endpoints(
	from: (f64, f64),
	to: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
	let dx = to.0 - from.0;
	let dy = to.1 - from.1;
	let dist = (dx * dx + dy * dy).sqrt();
	if dist <= 2.0 * NODE_RADIUS {
		return None;
	}
	let ux = dx / dist;
	let uy = dy / dist;
	Some((
		(from.0 + ux * NODE_RADIUS, from.1 + uy * NODE_RADIUS),
		(to.0 - ux * NODE_RADIUS, to.1 - uy * NODE_RADIUS),
	))
}

/// Weight label position: the segment midpoint pushed off the line.
pub fn label_position(from: (f64, f64), to: (f64, f64)) -> (f64, f64) {
	let mx = (from.0 + to.0) / 2.0;
	let my = (from.1 + to.1) / 2.0;
	let dx = to.0 - from.0;
	let dy = to.1 - from.1;
	let dist = (dx * dx + dy * dy).sqrt();
	if dist == 0.0 {
		return (mx, my - LABEL_OFFSET);
	}
	(mx - dy / dist * LABEL_OFFSET, my + dx / dist * LABEL_OFFSET)
}

/// Distance from a point to a segment, clamped to the segment's extent.
pub fn point_segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let abx = b.0 - a.0;
	let aby = b.1 - a.1;
	let len_sq = abx * abx + aby * aby;
	let t = if len_sq == 0.0 {
		0.0
	} else {
		(((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0)
	};
	let cx = a.0 + t * abx;
	let cy = a.1 + t * aby;
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

/// Whether another edge runs between the same nodes in the opposite
/// direction. Self-loops never pair.
pub fn has_reverse_edge(edges: &[Edge], edge: &Edge) -> bool {
	edge.source != edge.target
		&& edges
			.iter()
			.any(|other| other.source == edge.target && other.target == edge.source)
}

/// Topmost node under the cursor. Later nodes draw on top, so the scan runs
/// back to front.
pub fn node_at(model: &GraphModel, x: f64, y: f64) -> Option<&str> {
	model
		.nodes()
		.iter()
		.rev()
		.find(|n| {
			let dx = n.x - x;
			let dy = n.y - y;
			dx * dx + dy * dy <= NODE_RADIUS * NODE_RADIUS
		})
		.map(|n| n.id.as_str())
}

/// First edge whose line passes close enough to the cursor. Self-loops are
/// hit through their label disc.
pub fn edge_at(model: &GraphModel, x: f64, y: f64) -> Option<&str> {
	model
		.edges()
		.iter()
		.find(|edge| {
			let Some(from) = model.position(&edge.source) else {
				return false;
			};
			if edge.source == edge.target {
				let (lx, ly) = self_loop(from.0, from.1).label;
				let dx = lx - x;
				let dy = ly - y;
				return dx * dx + dy * dy <= LABEL_RADIUS * LABEL_RADIUS;
			}
			let Some(to) = model.position(&edge.target) else {
				return false;
			};
			point_segment_distance((x, y), from, to) <= EDGE_HIT_DISTANCE
		})
		.map(|edge| edge.id.as_str())
}

/// Visual role of a node, in ascending precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
	Normal,
	Selected,
	Start,
	End,
}

/// Visual weight of an edge. Selection wins over a playback highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	Normal,
	Highlighted,
	Selected,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeScene {
	pub id: String,
	pub label: String,
	pub x: f64,
	pub y: f64,
	pub role: NodeRole,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgePath {
	Line { from: (f64, f64), to: (f64, f64) },
	Loop(SelfLoop),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeScene {
	pub id: String,
	pub path: EdgePath,
	pub directed: bool,
	pub emphasis: Emphasis,
	pub label: String,
	pub label_pos: (f64, f64),
}

/// A resolved drawing of the whole editor: every position, role and label
/// the painter needs, with no references back into live state.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	pub nodes: Vec<NodeScene>,
	pub edges: Vec<EdgeScene>,
	/// Endpoint badges read "Source"/"Sink" instead of "Start" when the
	/// active algorithm takes a pair.
	pub endpoint_pair: bool,
}

/// Project the model plus the selection overlay into a [`Scene`].
pub fn build_scene(model: &GraphModel, selection: &Selection, algorithm: Algorithm) -> Scene {
	let nodes = model
		.nodes()
		.iter()
		.map(|n| {
			let role = if selection.start() == Some(n.id.as_str()) {
				NodeRole::Start
			} else if selection.end() == Some(n.id.as_str()) {
				NodeRole::End
			} else if selection.contains_node(&n.id) {
				NodeRole::Selected
			} else {
				NodeRole::Normal
			};
			NodeScene { id: n.id.clone(), label: n.label.clone(), x: n.x, y: n.y, role }
		})
		.collect();

	let edges = model
		.edges()
		.iter()
		.filter_map(|edge| {
			let from = model.position(&edge.source)?;
			let emphasis = if selection.link() == Some(edge.id.as_str()) {
				Emphasis::Selected
			} else if edge.highlighted {
				Emphasis::Highlighted
			} else {
				Emphasis::Normal
			};
			let (path, label_pos) = if edge.source == edge.target {
				let curve = self_loop(from.0, from.1);
				(EdgePath::Loop(curve), curve.label)
			} else {
				let to = model.position(&edge.target)?;
				let (mut a, mut b) = (from, to);
				if has_reverse_edge(model.edges(), edge) {
					// shift each member of the pair towards its own left so
					// the two lines separate symmetrically
					let dx = b.0 - a.0;
					let dy = b.1 - a.1;
					let dist = (dx * dx + dy * dy).sqrt().max(1.0);
					let ox = -dy / dist * PAIR_OFFSET;
					let oy = dx / dist * PAIR_OFFSET;
					a = (a.0 + ox, a.1 + oy);
					b = (b.0 + ox, b.1 + oy);
				}
				let (from, to) = edge_endpoints(a, b).unwrap_or((a, b));
				(EdgePath::Line { from, to }, label_position(a, b))
			};
			Some(EdgeScene {
				id: edge.id.clone(),
				path,
				directed: edge.directed,
				emphasis,
				label: edge.weight.to_string(),
				label_pos,
			})
		})
		.collect();

	Scene {
		nodes,
		edges,
		endpoint_pair: algorithm.endpoint_demand() == EndpointDemand::StartAndEnd,
	}
}
