use log::info;

use super::error::GraphError;
use super::geometry::{self, Scene};
use super::model::{GraphModel, Motion, parse_weight};
use super::playback::Playback;
use super::selection::{Algorithm, Selection};
use super::simulation::Simulation;
use super::solve::{SolveRequest, SolveResponse, build_request};

/// Fixed drawing surface size.
pub const CANVAS_WIDTH: f64 = 1400.0;
pub const CANVAS_HEIGHT: f64 = 800.0;

/// Pointer travel below this is a click, not a drag.
const DRAG_THRESHOLD: f64 = 4.0;

#[derive(Debug, Default)]
struct DragState {
	node: Option<String>,
	start: (f64, f64),
	moved: bool,
}

/// Everything the editor tracks between frames: the model, the layout
/// relaxation, the selection machine, result playback and the transient
/// UI inputs. All mutations funnel through here so the dependent pieces
/// stay consistent with each other.
pub struct EditorState {
	model: GraphModel,
	simulation: Simulation,
	selection: Selection,
	playback: Playback,
	algorithm: Algorithm,
	pending_weight: String,
	pending_directed: bool,
	loading: bool,
	status: Option<String>,
	drag: DragState,
	flow_time: f64,
}

impl EditorState {
	pub fn new() -> Self {
		Self {
			model: GraphModel::demo(CANVAS_WIDTH, CANVAS_HEIGHT),
			simulation: Simulation::new(CANVAS_WIDTH, CANVAS_HEIGHT),
			selection: Selection::new(),
			playback: Playback::new(),
			algorithm: Algorithm::Bfs,
			pending_weight: "1".to_string(),
			pending_directed: true,
			loading: false,
			status: None,
			drag: DragState::default(),
			flow_time: 0.0,
		}
	}

	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	pub fn playback(&self) -> &Playback {
		&self.playback
	}

	pub fn algorithm(&self) -> Algorithm {
		self.algorithm
	}

	pub fn pending_weight(&self) -> &str {
		&self.pending_weight
	}

	pub fn pending_directed(&self) -> bool {
		self.pending_directed
	}

	pub fn is_loading(&self) -> bool {
		self.loading
	}

	pub fn status(&self) -> Option<&str> {
		self.status.as_deref()
	}

	/// Phase driving the marching-dash animation on highlighted edges.
	pub fn flow_time(&self) -> f64 {
		self.flow_time
	}

	/// Advance one animation frame.
	pub fn tick(&mut self) {
		self.simulation.step(&mut self.model);
		self.flow_time += 1.0;
	}

	pub fn scene(&self) -> Scene {
		geometry::build_scene(&self.model, &self.selection, self.algorithm)
	}

	/// Re-layout bookkeeping after the node/edge set changed shape: stale
	/// selection and playback state is dropped, the relaxation restarts and
	/// the layout is recentered in one shot.
	fn after_structural_change(&mut self) {
		self.selection.reset();
		self.playback.clear(&mut self.model);
		self.simulation.restart();
		self.simulation.recenter(&mut self.model);
		self.status = None;
	}

	fn report(&mut self, err: GraphError) {
		self.status = Some(err.to_string());
	}

	pub fn set_pending_weight(&mut self, raw: &str) {
		self.pending_weight = raw.to_string();
	}

	pub fn set_pending_directed(&mut self, directed: bool) {
		self.pending_directed = directed;
	}

	pub fn add_node(&mut self) {
		self.model.add_node(None);
		self.after_structural_change();
	}

	/// Connect the two free-selected nodes, oldest as source.
	pub fn add_edge(&mut self) {
		let Some((source, target)) = self.selection.pair().map(|(s, t)| (s.to_string(), t.to_string()))
		else {
			self.report(GraphError::MissingSelection(
				"Select two nodes to connect".to_string(),
			));
			return;
		};
		let weight = match parse_weight(&self.pending_weight) {
			Ok(weight) => weight,
			Err(err) => {
				self.report(err);
				return;
			}
		};
		match self.model.add_edge(&source, &target, weight, self.pending_directed) {
			Ok(_) => self.after_structural_change(),
			Err(err) => self.report(err),
		}
	}

	pub fn delete_node(&mut self) {
		let [id] = self.selection.nodes() else {
			self.report(GraphError::MissingSelection(
				"Select exactly one node to delete".to_string(),
			));
			return;
		};
		let id = id.clone();
		if self.model.delete_node(&id) {
			self.after_structural_change();
		}
	}

	pub fn delete_edge(&mut self) {
		let Some(id) = self.selection.link().map(str::to_string) else {
			self.report(GraphError::MissingSelection(
				"Select an edge to delete".to_string(),
			));
			return;
		};
		if self.model.delete_edge(&id) {
			self.after_structural_change();
		}
	}

	/// Apply the pending weight to the selected edge. Weight edits keep the
	/// layout but invalidate any solver result.
	pub fn apply_weight(&mut self) {
		let Some(id) = self.selection.link().map(str::to_string) else {
			self.report(GraphError::MissingSelection(
				"Select an edge to change its weight".to_string(),
			));
			return;
		};
		match parse_weight(&self.pending_weight) {
			Ok(weight) => {
				self.model.set_edge_weight(&id, weight);
				self.playback.clear(&mut self.model);
				self.status = None;
			}
			Err(err) => self.report(err),
		}
	}

	pub fn toggle_direction(&mut self) {
		let Some(id) = self.selection.link().map(str::to_string) else {
			self.report(GraphError::MissingSelection(
				"Select an edge to toggle its direction".to_string(),
			));
			return;
		};
		self.model.toggle_edge_direction(&id);
		self.playback.clear(&mut self.model);
		self.status = None;
	}

	pub fn clear_graph(&mut self) {
		self.model.clear();
		self.selection.reset();
		self.playback.clear(&mut self.model);
		self.simulation.stop();
		self.status = None;
	}

	pub fn clear_selection(&mut self) {
		self.selection.clear_free();
	}

	pub fn clear_endpoints(&mut self) {
		self.selection.clear_endpoints();
	}

	pub fn recenter(&mut self) {
		self.simulation.recenter(&mut self.model);
	}

	pub fn set_algorithm(&mut self, id: &str) {
		let Some(algorithm) = Algorithm::from_id(id) else {
			return;
		};
		self.algorithm = algorithm;
		self.selection.on_algorithm_change(algorithm.endpoint_demand());
		self.status = None;
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		let Some(id) = geometry::node_at(&self.model, x, y).map(str::to_string) else {
			return;
		};
		if let Some(node) = self.model.node_mut(&id) {
			node.motion = Motion::Pinned { x: node.x, y: node.y };
		}
		self.drag = DragState { node: Some(id), start: (x, y), moved: false };
		self.simulation.reheat();
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		let Some(id) = self.drag.node.clone() else {
			return;
		};
		let (sx, sy) = self.drag.start;
		if (x - sx).hypot(y - sy) > DRAG_THRESHOLD {
			self.drag.moved = true;
		}
		if let Some(node) = self.model.node_mut(&id) {
			node.x = x;
			node.y = y;
			node.motion = Motion::Pinned { x, y };
		}
	}

	/// End a drag, or interpret the gesture as a click when the pointer
	/// never left the threshold.
	pub fn pointer_up(&mut self, x: f64, y: f64) {
		if let Some(id) = self.drag.node.take() {
			if let Some(node) = self.model.node_mut(&id) {
				node.motion = Motion::at_rest();
			}
			self.simulation.cool();
			if !self.drag.moved {
				self.selection.click_node(&id, self.algorithm.endpoint_demand());
			}
			self.drag.moved = false;
			return;
		}
		if let Some(id) = geometry::edge_at(&self.model, x, y).map(str::to_string) {
			self.selection.click_link(&id);
		}
	}

	/// Validate and stage a solve. On success the request is handed back for
	/// the async transport; on failure the reason lands in the status line.
	pub fn begin_solve(&mut self) -> Option<SolveRequest> {
		match self.try_begin_solve() {
			Ok(request) => Some(request),
			Err(err) => {
				self.report(err);
				None
			}
		}
	}

	fn try_begin_solve(&mut self) -> Result<SolveRequest, GraphError> {
		if self.loading {
			return Err(GraphError::SolveInFlight);
		}
		if self.model.nodes().is_empty() {
			return Err(GraphError::MissingSelection(
				"Add some nodes before solving".to_string(),
			));
		}
		self.selection.validate_for_solve(self.algorithm.endpoint_demand())?;
		self.playback.clear(&mut self.model);
		self.loading = true;
		self.status = None;
		info!("solving with {}", self.algorithm.id());
		Ok(build_request(&self.model, &self.selection, self.algorithm))
	}

	/// Land the solver's answer (or the transport failure) back in the state.
	pub fn finish_solve(&mut self, outcome: Result<SolveResponse, GraphError>) {
		self.loading = false;
		let ingested =
			outcome.and_then(|response| self.playback.ingest(response, &mut self.model));
		match ingested {
			Ok(()) => self.status = self.playback.description(),
			Err(err) => self.report(err),
		}
	}

	pub fn next_result(&mut self) {
		self.playback.next(&mut self.model);
		self.status = self.playback.description();
	}

	pub fn previous_result(&mut self) {
		self.playback.previous(&mut self.model);
		self.status = self.playback.description();
	}

	pub fn clear_results(&mut self) {
		self.playback.clear(&mut self.model);
		self.status = None;
	}
}

impl Default for EditorState {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn select_pair(state: &mut EditorState, a: &str, b: &str) {
		let (ax, ay) = state.model().position(a).unwrap();
		state.pointer_down(ax, ay);
		state.pointer_up(ax, ay);
		let (bx, by) = state.model().position(b).unwrap();
		state.pointer_down(bx, by);
		state.pointer_up(bx, by);
	}

	#[test]
	fn starts_with_the_demo_graph() {
		let state = EditorState::new();
		assert_eq!(state.model().nodes().len(), 3);
		assert_eq!(state.model().edges().len(), 2);
		assert_eq!(state.algorithm(), Algorithm::Bfs);
	}

	#[test]
	fn add_edge_connects_the_selected_pair() {
		let mut state = EditorState::new();
		state.set_algorithm("prim");
		select_pair(&mut state, "3", "1");
		state.set_pending_weight("5");
		state.add_edge();
		assert!(state.model().has_edge("3", "1"));
		assert_eq!(state.model().edge("e3").map(|e| e.weight), Some(5));
		// structural change drops the selection
		assert!(state.selection().nodes().is_empty());
		assert_eq!(state.status(), None);
	}

	#[test]
	fn add_edge_without_a_pair_reports() {
		let mut state = EditorState::new();
		state.add_edge();
		assert_eq!(state.status(), Some("Select two nodes to connect"));
		assert_eq!(state.model().edges().len(), 2);
	}

	#[test]
	fn add_edge_with_bad_weight_reports() {
		let mut state = EditorState::new();
		state.set_algorithm("prim");
		select_pair(&mut state, "3", "1");
		state.set_pending_weight("-2");
		state.add_edge();
		assert!(state.status().is_some());
		assert!(!state.model().has_edge("3", "1"));
	}

	#[test]
	fn delete_node_needs_exactly_one_selected() {
		let mut state = EditorState::new();
		state.set_algorithm("prim");
		state.delete_node();
		assert!(state.status().unwrap().contains("exactly one"));

		let (x, y) = state.model().position("2").unwrap();
		state.pointer_down(x, y);
		state.pointer_up(x, y);
		state.delete_node();
		assert!(!state.model().contains_node("2"));
		assert!(state.model().edges().is_empty());
	}

	#[test]
	fn delete_edge_follows_link_selection() {
		let mut state = EditorState::new();
		state.delete_edge();
		assert!(state.status().is_some());

		// click the midpoint of edge e1 (no node there)
		let (ax, ay) = state.model().position("1").unwrap();
		let (bx, by) = state.model().position("2").unwrap();
		state.pointer_up((ax + bx) / 2.0, (ay + by) / 2.0);
		assert_eq!(state.selection().link(), Some("e1"));
		state.delete_edge();
		assert!(state.model().edge("e1").is_none());
	}

	#[test]
	fn apply_weight_edits_the_selected_edge() {
		let mut state = EditorState::new();
		let (ax, ay) = state.model().position("1").unwrap();
		let (bx, by) = state.model().position("2").unwrap();
		state.pointer_up((ax + bx) / 2.0, (ay + by) / 2.0);
		state.set_pending_weight("42");
		state.apply_weight();
		assert_eq!(state.model().edge("e1").map(|e| e.weight), Some(42));
		// the edit keeps the selection
		assert_eq!(state.selection().link(), Some("e1"));
	}

	#[test]
	fn weight_edit_invalidates_playback() {
		let mut state = EditorState::new();
		state.finish_solve(Ok(serde_json::from_value(json!({
			"resultGraphs": [{ "nodes": [], "edges": [
				{ "id": "e1", "source": "1", "target": "2", "weight": 3,
				  "directed": true, "highlighted": true }
			], "description": "step" }]
		}))
		.unwrap()));
		assert!(state.model().edge("e1").unwrap().highlighted);

		let (ax, ay) = state.model().position("1").unwrap();
		let (bx, by) = state.model().position("2").unwrap();
		state.pointer_up((ax + bx) / 2.0, (ay + by) / 2.0);
		state.apply_weight();
		assert!(!state.model().edge("e1").unwrap().highlighted);
		assert!(state.playback().is_empty());
	}

	#[test]
	fn short_gesture_is_a_click_long_gesture_is_a_drag() {
		let mut state = EditorState::new();
		state.set_algorithm("prim");
		let (x, y) = state.model().position("1").unwrap();
		state.pointer_down(x, y);
		state.pointer_move(x + 1.0, y + 1.0);
		state.pointer_up(x + 1.0, y + 1.0);
		assert!(state.selection().contains_node("1"));

		let (x, y) = state.model().position("2").unwrap();
		state.pointer_down(x, y);
		state.pointer_move(x + 120.0, y + 80.0);
		state.pointer_up(x + 120.0, y + 80.0);
		assert!(!state.selection().contains_node("2"));
		assert_eq!(state.model().position("2"), Some((x + 120.0, y + 80.0)));
		assert!(!state.model().node("2").unwrap().motion.is_pinned());
	}

	#[test]
	fn dragged_node_is_pinned_while_held() {
		let mut state = EditorState::new();
		let (x, y) = state.model().position("1").unwrap();
		state.pointer_down(x, y);
		state.pointer_move(500.0, 500.0);
		assert!(state.model().node("1").unwrap().motion.is_pinned());
		for _ in 0..30 {
			state.tick();
		}
		assert_eq!(state.model().position("1"), Some((500.0, 500.0)));
		state.pointer_up(500.0, 500.0);
		assert!(!state.model().node("1").unwrap().motion.is_pinned());
	}

	#[test]
	fn node_clicks_route_to_endpoints_under_bfs() {
		let mut state = EditorState::new();
		let (x, y) = state.model().position("1").unwrap();
		state.pointer_down(x, y);
		state.pointer_up(x, y);
		assert_eq!(state.selection().start(), Some("1"));
		assert!(state.selection().nodes().is_empty());
	}

	#[test]
	fn begin_solve_demands_endpoints() {
		let mut state = EditorState::new();
		assert!(state.begin_solve().is_none());
		assert!(!state.is_loading());
		assert_eq!(state.status(), Some("Pick a start node for this algorithm"));
	}

	#[test]
	fn begin_solve_builds_the_request() {
		let mut state = EditorState::new();
		let (x, y) = state.model().position("1").unwrap();
		state.pointer_down(x, y);
		state.pointer_up(x, y);
		let request = state.begin_solve().expect("valid solve");
		assert!(state.is_loading());
		assert_eq!(request.algorithm, "bfs");
		assert_eq!(request.start_node_id.as_deref(), Some("1"));
		assert_eq!(request.nodes.len(), 3);
	}

	#[test]
	fn begin_solve_rejects_an_empty_graph() {
		let mut state = EditorState::new();
		state.set_algorithm("prim");
		state.clear_graph();
		assert!(state.begin_solve().is_none());
		assert_eq!(state.status(), Some("Add some nodes before solving"));
	}

	#[test]
	fn finish_solve_applies_results_and_reports_progress() {
		let mut state = EditorState::new();
		state.finish_solve(Ok(serde_json::from_value(json!({
			"resultGraphs": [
				{ "nodes": [], "edges": [
					{ "id": "e1", "source": "1", "target": "2", "weight": 3,
					  "directed": true, "highlighted": true }
				], "description": "visit 2" },
				{ "nodes": [], "edges": [], "description": "done" }
			]
		}))
		.unwrap()));
		assert!(!state.is_loading());
		assert_eq!(state.status(), Some("visit 2"));
		assert!(state.model().edge("e1").unwrap().highlighted);

		state.next_result();
		assert_eq!(state.status(), Some("done"));
		assert!(!state.model().edge("e1").unwrap().highlighted);
		state.previous_result();
		assert_eq!(state.status(), Some("visit 2"));
	}

	#[test]
	fn finish_solve_surfaces_failures() {
		let mut state = EditorState::new();
		state.finish_solve(Ok(serde_json::from_value(json!({
			"message": "no path exists"
		}))
		.unwrap()));
		assert_eq!(state.status(), Some("no path exists"));

		state.finish_solve(Err(GraphError::SolveTransportFailure(
			"server returned 502".to_string(),
		)));
		assert_eq!(state.status(), Some("Solve request failed: server returned 502"));
	}

	#[test]
	fn clear_results_drops_highlights_and_status() {
		let mut state = EditorState::new();
		state.finish_solve(Ok(serde_json::from_value(json!({
			"resultGraphs": [{ "nodes": [], "edges": [
				{ "id": "e2", "source": "2", "target": "3", "weight": 7,
				  "directed": true, "highlighted": true }
			], "description": "" }]
		}))
		.unwrap()));
		state.clear_results();
		assert!(state.model().edges().iter().all(|e| !e.highlighted));
		assert_eq!(state.status(), None);
	}

	#[test]
	fn structural_change_recenters_the_layout() {
		let mut state = EditorState::new();
		// demo bounding box is centered on (400, 300), well off the canvas
		// center, so the translation is observable
		state.add_node();
		let xs: Vec<f64> = state.model().nodes().iter().map(|n| n.x).collect();
		let ys: Vec<f64> = state.model().nodes().iter().map(|n| n.y).collect();
		let cx = (xs.iter().cloned().fold(f64::INFINITY, f64::min)
			+ xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
			/ 2.0;
		let cy = (ys.iter().cloned().fold(f64::INFINITY, f64::min)
			+ ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
			/ 2.0;
		assert!((cx - CANVAS_WIDTH / 2.0).abs() < 1e-6, "bbox center x, got {cx}");
		assert!((cy - CANVAS_HEIGHT / 2.0).abs() < 1e-6, "bbox center y, got {cy}");
	}

	#[test]
	fn solve_gate_blocks_resubmission() {
		let mut state = EditorState::new();
		let (x, y) = state.model().position("1").unwrap();
		state.pointer_down(x, y);
		state.pointer_up(x, y);
		assert!(state.begin_solve().is_some());
		assert!(state.is_loading());
		assert!(state.begin_solve().is_none());
		assert_eq!(state.status(), Some("A solve request is already in flight"));
	}

	#[test]
	fn structural_change_resets_dependents() {
		let mut state = EditorState::new();
		state.set_algorithm("prim");
		let (x, y) = state.model().position("1").unwrap();
		state.pointer_down(x, y);
		state.pointer_up(x, y);
		state.finish_solve(Ok(serde_json::from_value(json!({
			"resultGraphs": [{ "nodes": [], "edges": [
				{ "id": "e1", "source": "1", "target": "2", "weight": 3,
				  "directed": true, "highlighted": true }
			], "description": "step" }]
		}))
		.unwrap()));

		state.add_node();
		assert!(state.selection().nodes().is_empty());
		assert!(state.playback().is_empty());
		assert!(state.model().edges().iter().all(|e| !e.highlighted));
		assert_eq!(state.model().nodes().len(), 4);
	}
}
