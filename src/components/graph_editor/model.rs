use super::error::GraphError;

/// Node circle radius in canvas units.
pub const NODE_RADIUS: f64 = 25.0;
/// Empty border kept between the layout area and the canvas edge.
pub const CANVAS_MARGIN: f64 = 50.0;

/// Motion state of a node. A node is either simulated freely or pinned to an
/// authoritative position while the user drags it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
	Free { vx: f64, vy: f64 },
	Pinned { x: f64, y: f64 },
}

impl Motion {
	pub fn at_rest() -> Self {
		Motion::Free { vx: 0.0, vy: 0.0 }
	}

	pub fn is_pinned(&self) -> bool {
		matches!(self, Motion::Pinned { .. })
	}
}

/// A vertex with identity, label and 2D position.
#[derive(Clone, Debug)]
pub struct Node {
	pub id: String,
	pub label: String,
	pub x: f64,
	pub y: f64,
	pub motion: Motion,
}

/// A weighted, optionally directed connection between two nodes, held by id.
/// `highlighted` is a derived overlay flag owned by result playback.
#[derive(Clone, Debug)]
pub struct Edge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub weight: u32,
	pub directed: bool,
	pub highlighted: bool,
}

/// The mutable node/edge collections plus their structural mutation rules.
///
/// Invariant: every edge's source/target id resolves to a present node.
/// Mutations that would break this are rejected or cascade-delete.
pub struct GraphModel {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	width: f64,
	height: f64,
	next_id: u64,
	rand_state: u64,
	revision: u64,
}

impl GraphModel {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			width,
			height,
			next_id: 1,
			rand_state: 7,
			revision: 0,
		}
	}

	/// The session-start graph: three chained nodes, matching the default the
	/// editor always opens with.
	pub fn demo(width: f64, height: f64) -> Self {
		let mut model = Self::new(width, height);
		model.insert_node("1", "1", (200.0, 300.0));
		model.insert_node("2", "2", (400.0, 300.0));
		model.insert_node("3", "3", (600.0, 300.0));
		let _ = model.insert_edge("e1", "1", "2", 3, true);
		let _ = model.insert_edge("e2", "2", "3", 7, true);
		// keep the id counter clear of the seeded "e1"/"e2"
		model.next_id = 3;
		model
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Split borrow for the layout engine: node positions are mutated in
	/// place while edges are only read.
	pub fn parts_mut(&mut self) -> (&mut [Node], &[Edge]) {
		(&mut self.nodes, &self.edges)
	}

	pub fn edges_mut(&mut self) -> &mut [Edge] {
		&mut self.edges
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.edges.iter().find(|e| e.id == id)
	}

	pub fn position(&self, id: &str) -> Option<(f64, f64)> {
		self.node(id).map(|n| (n.x, n.y))
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.node(id).is_some()
	}

	pub fn has_edge(&self, source: &str, target: &str) -> bool {
		self.edges.iter().any(|e| e.source == source && e.target == target)
	}

	/// Bumped on every change to the node/edge set's shape. The layout engine
	/// is reseeded whenever this moves.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Add a node at the given position, or at a pseudo-random spot inside
	/// the bounded canvas (inset by radius + margin). Always succeeds.
	pub fn add_node(&mut self, at: Option<(f64, f64)>) -> &Node {
		let (x, y) = at.unwrap_or_else(|| {
			let inset = CANVAS_MARGIN + NODE_RADIUS;
			(
				inset + self.next_rand() * (self.width - 2.0 * inset),
				inset + self.next_rand() * (self.height - 2.0 * inset),
			)
		});
		let id = format!("n{}", self.take_id());
		let label = (self.nodes.len() + 1).to_string();
		self.insert_node(&id, &label, (x, y));
		self.nodes.last().expect("node just inserted")
	}

	/// Add an edge between two present nodes. Rejects a duplicate ordered
	/// (source, target) pair; the reverse pair and self-loops are allowed.
	pub fn add_edge(
		&mut self,
		source: &str,
		target: &str,
		weight: u32,
		directed: bool,
	) -> Result<&Edge, GraphError> {
		let id = format!("e{}", self.take_id());
		self.insert_edge(&id, source, target, weight, directed)?;
		Ok(self.edges.last().expect("edge just inserted"))
	}

	/// Remove a node and every edge incident to it. No-op on an unknown id.
	pub fn delete_node(&mut self, id: &str) -> bool {
		let before = self.nodes.len();
		self.nodes.retain(|n| n.id != id);
		if self.nodes.len() == before {
			return false;
		}
		self.edges.retain(|e| e.source != id && e.target != id);
		self.touch();
		true
	}

	pub fn delete_edge(&mut self, id: &str) -> bool {
		let before = self.edges.len();
		self.edges.retain(|e| e.id != id);
		let removed = self.edges.len() != before;
		if removed {
			self.touch();
		}
		removed
	}

	/// Set the weight of an edge. Validation of raw user input happens in
	/// [`parse_weight`]; a weight is non-negative by construction here.
	pub fn set_edge_weight(&mut self, id: &str, weight: u32) -> bool {
		match self.edges.iter_mut().find(|e| e.id == id) {
			Some(edge) => {
				edge.weight = weight;
				true
			}
			None => false,
		}
	}

	pub fn toggle_edge_direction(&mut self, id: &str) -> bool {
		match self.edges.iter_mut().find(|e| e.id == id) {
			Some(edge) => {
				edge.directed = !edge.directed;
				true
			}
			None => false,
		}
	}

	/// Empty both collections. Dependent state (selection, playback) is the
	/// coordinator's job to reset.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
		self.touch();
	}

	/// Reset every edge's highlight overlay.
	pub fn clear_highlights(&mut self) {
		for edge in &mut self.edges {
			edge.highlighted = false;
		}
	}

	fn insert_node(&mut self, id: &str, label: &str, (x, y): (f64, f64)) {
		self.nodes.push(Node {
			id: id.to_string(),
			label: label.to_string(),
			x,
			y,
			motion: Motion::at_rest(),
		});
		self.touch();
	}

	fn insert_edge(
		&mut self,
		id: &str,
		source: &str,
		target: &str,
		weight: u32,
		directed: bool,
	) -> Result<(), GraphError> {
		if !self.contains_node(source) || !self.contains_node(target) {
			return Err(GraphError::MissingSelection(
				"Both endpoints must be existing nodes".to_string(),
			));
		}
		if self.has_edge(source, target) {
			return Err(GraphError::DuplicateEdge);
		}
		self.edges.push(Edge {
			id: id.to_string(),
			source: source.to_string(),
			target: target.to_string(),
			weight,
			directed,
			highlighted: false,
		});
		self.touch();
		Ok(())
	}

	fn touch(&mut self) {
		self.revision += 1;
	}

	fn take_id(&mut self) -> u64 {
		let id = self.next_id;
		self.next_id += 1;
		id
	}

	/// Deterministic placement jitter (same LCG family as the demo data
	/// generator uses for sample graphs).
	fn next_rand(&mut self) -> f64 {
		self.rand_state = (self.rand_state.wrapping_mul(9301).wrapping_add(49297)) % 233280;
		self.rand_state as f64 / 233280.0
	}
}

/// Parse free-text weight input. Only non-negative integers are accepted;
/// there is deliberately no upper bound.
pub fn parse_weight(raw: &str) -> Result<u32, GraphError> {
	raw.trim()
		.parse::<i64>()
		.ok()
		.filter(|w| (0..=u32::MAX as i64).contains(w))
		.map(|w| w as u32)
		.ok_or(GraphError::InvalidWeight)
}
