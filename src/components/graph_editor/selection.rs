use super::error::GraphError;

/// The algorithms the remote solver understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
	Bfs,
	Prim,
	Dijkstra,
	FordFulkerson,
	Bridges,
}

/// Whether an algorithm needs designated endpoint nodes before it can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointDemand {
	/// No endpoints; node clicks drive free selection.
	Free,
	/// A single start node.
	StartOnly,
	/// A source/sink pair.
	StartAndEnd,
}

impl Algorithm {
	pub const ALL: [Algorithm; 5] = [
		Algorithm::Bfs,
		Algorithm::Prim,
		Algorithm::Dijkstra,
		Algorithm::FordFulkerson,
		Algorithm::Bridges,
	];

	/// Wire identifier used in the solve request.
	pub fn id(self) -> &'static str {
		match self {
			Algorithm::Bfs => "bfs",
			Algorithm::Prim => "prim",
			Algorithm::Dijkstra => "dijkstra",
			Algorithm::FordFulkerson => "ford-fulkerson",
			Algorithm::Bridges => "bridges",
		}
	}

	pub fn from_id(id: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|a| a.id() == id)
	}

	pub fn name(self) -> &'static str {
		match self {
			Algorithm::Bfs => "Breadth-first search (BFS)",
			Algorithm::Prim => "Prim's algorithm",
			Algorithm::Dijkstra => "Dijkstra's algorithm",
			Algorithm::FordFulkerson => "Ford-Fulkerson algorithm",
			Algorithm::Bridges => "Blocks, bridges, articulation points",
		}
	}

	pub fn description(self) -> &'static str {
		match self {
			Algorithm::Bfs => "Traverse the graph breadth-first from a start node",
			Algorithm::Prim => "Build a minimum spanning tree",
			Algorithm::Dijkstra => "Shortest paths from one node to all others",
			Algorithm::FordFulkerson => "Maximum flow between a source and a sink",
			Algorithm::Bridges => "Find bridges, blocks and articulation points",
		}
	}

	pub fn endpoint_demand(self) -> EndpointDemand {
		match self {
			Algorithm::Bfs | Algorithm::Dijkstra => EndpointDemand::StartOnly,
			Algorithm::FordFulkerson => EndpointDemand::StartAndEnd,
			Algorithm::Prim | Algorithm::Bridges => EndpointDemand::Free,
		}
	}
}

/// Selection state: free node/link selection for editing, and the orthogonal
/// algorithm endpoint designation. The two are mutually exclusive: when the
/// active algorithm demands endpoints, node clicks are routed there instead
/// of the free set.
#[derive(Debug, Default)]
pub struct Selection {
	nodes: Vec<String>,
	link: Option<String>,
	start: Option<String>,
	end: Option<String>,
}

impl Selection {
	pub fn new() -> Self {
		Self::default()
	}

	/// The free-selected node ids, oldest first, never more than two.
	pub fn nodes(&self) -> &[String] {
		&self.nodes
	}

	pub fn link(&self) -> Option<&str> {
		self.link.as_deref()
	}

	pub fn start(&self) -> Option<&str> {
		self.start.as_deref()
	}

	pub fn end(&self) -> Option<&str> {
		self.end.as_deref()
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.nodes.iter().any(|n| n == id)
	}

	/// The ordered pair for "connect the two selected nodes", if both are set.
	pub fn pair(&self) -> Option<(&str, &str)> {
		match self.nodes.as_slice() {
			[a, b] => Some((a.as_str(), b.as_str())),
			_ => None,
		}
	}

	/// Route a node click. Endpoint-demanding algorithms intercept the click;
	/// otherwise it toggles free membership with FIFO eviction at two.
	pub fn click_node(&mut self, id: &str, demand: EndpointDemand) {
		match demand {
			EndpointDemand::Free => self.click_node_free(id),
			EndpointDemand::StartOnly => self.click_node_start_only(id),
			EndpointDemand::StartAndEnd => self.click_node_pair(id),
		}
	}

	fn click_node_free(&mut self, id: &str) {
		if let Some(pos) = self.nodes.iter().position(|n| n == id) {
			self.nodes.remove(pos);
		} else if self.nodes.len() < 2 {
			self.nodes.push(id.to_string());
		} else {
			// evict the oldest of the two
			self.nodes = vec![self.nodes[1].clone(), id.to_string()];
		}
		self.link = None;
	}

	fn click_node_start_only(&mut self, id: &str) {
		if self.start.as_deref() == Some(id) {
			self.start = None;
		} else {
			self.start = Some(id.to_string());
			self.end = None;
		}
	}

	fn click_node_pair(&mut self, id: &str) {
		if self.start.is_none() {
			self.start = Some(id.to_string());
		} else if self.end.is_none() && self.start.as_deref() != Some(id) {
			self.end = Some(id.to_string());
		} else if self.start.as_deref() == Some(id) {
			self.start = None;
		} else if self.end.as_deref() == Some(id) {
			self.end = None;
		}
	}

	/// Toggle single link selection; clears any node selection.
	pub fn click_link(&mut self, id: &str) {
		if self.link.as_deref() == Some(id) {
			self.link = None;
		} else {
			self.link = Some(id.to_string());
		}
		self.nodes.clear();
	}

	/// Keep endpoint choices across endpoint-category switches, but reset
	/// whichever selection state no longer applies to the new category.
	pub fn on_algorithm_change(&mut self, demand: EndpointDemand) {
		match demand {
			EndpointDemand::Free => {
				self.start = None;
				self.end = None;
			}
			EndpointDemand::StartOnly => {
				self.end = None;
				self.clear_free();
			}
			EndpointDemand::StartAndEnd => {
				self.clear_free();
			}
		}
	}

	pub fn clear_free(&mut self) {
		self.nodes.clear();
		self.link = None;
	}

	pub fn clear_endpoints(&mut self) {
		self.start = None;
		self.end = None;
	}

	/// Full reset, used whenever the model changes shape.
	pub fn reset(&mut self) {
		self.clear_free();
		self.clear_endpoints();
	}

	/// Check that the endpoints an algorithm demands are present and
	/// distinct. Equality is enforced here, at submission time.
	pub fn validate_for_solve(&self, demand: EndpointDemand) -> Result<(), GraphError> {
		match demand {
			EndpointDemand::Free => Ok(()),
			EndpointDemand::StartOnly => {
				if self.start.is_none() {
					Err(GraphError::MissingSelection(
						"Pick a start node for this algorithm".to_string(),
					))
				} else {
					Ok(())
				}
			}
			EndpointDemand::StartAndEnd => {
				if self.start.is_none() || self.end.is_none() {
					Err(GraphError::MissingSelection(
						"Pick both a source and a sink node".to_string(),
					))
				} else if self.start == self.end {
					Err(GraphError::EndpointConflict)
				} else {
					Ok(())
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn algorithm_ids_round_trip() {
		for algorithm in Algorithm::ALL {
			assert_eq!(Algorithm::from_id(algorithm.id()), Some(algorithm));
		}
		assert_eq!(Algorithm::from_id("kruskal"), None);
	}

	#[test]
	fn endpoint_demands_per_algorithm() {
		assert_eq!(Algorithm::Bfs.endpoint_demand(), EndpointDemand::StartOnly);
		assert_eq!(Algorithm::Dijkstra.endpoint_demand(), EndpointDemand::StartOnly);
		assert_eq!(Algorithm::FordFulkerson.endpoint_demand(), EndpointDemand::StartAndEnd);
		assert_eq!(Algorithm::Prim.endpoint_demand(), EndpointDemand::Free);
		assert_eq!(Algorithm::Bridges.endpoint_demand(), EndpointDemand::Free);
	}

	#[test]
	fn free_click_toggles_membership() {
		let mut sel = Selection::new();
		sel.click_node("1", EndpointDemand::Free);
		assert!(sel.contains_node("1"));
		sel.click_node("1", EndpointDemand::Free);
		assert!(!sel.contains_node("1"));
	}

	#[test]
	fn third_node_evicts_the_oldest() {
		let mut sel = Selection::new();
		sel.click_node("1", EndpointDemand::Free);
		sel.click_node("2", EndpointDemand::Free);
		sel.click_node("3", EndpointDemand::Free);
		assert_eq!(sel.nodes(), ["2", "3"]);
	}

	#[test]
	fn free_set_never_exceeds_two() {
		let mut sel = Selection::new();
		for id in ["a", "b", "c", "d", "e"] {
			sel.click_node(id, EndpointDemand::Free);
			assert!(sel.nodes().len() <= 2);
		}
	}

	#[test]
	fn node_click_clears_link_and_vice_versa() {
		let mut sel = Selection::new();
		sel.click_link("e1");
		assert_eq!(sel.link(), Some("e1"));
		sel.click_node("1", EndpointDemand::Free);
		assert_eq!(sel.link(), None);
		sel.click_link("e1");
		assert!(sel.nodes().is_empty());
	}

	#[test]
	fn link_click_toggles() {
		let mut sel = Selection::new();
		sel.click_link("e1");
		sel.click_link("e1");
		assert_eq!(sel.link(), None);
		sel.click_link("e1");
		sel.click_link("e2");
		assert_eq!(sel.link(), Some("e2"));
	}

	#[test]
	fn start_only_click_replaces_and_toggles() {
		let mut sel = Selection::new();
		sel.click_node("1", EndpointDemand::StartOnly);
		assert_eq!(sel.start(), Some("1"));
		sel.click_node("2", EndpointDemand::StartOnly);
		assert_eq!(sel.start(), Some("2"));
		sel.click_node("2", EndpointDemand::StartOnly);
		assert_eq!(sel.start(), None);
	}

	#[test]
	fn pair_clicks_fill_start_then_end() {
		let mut sel = Selection::new();
		sel.click_node("1", EndpointDemand::StartAndEnd);
		sel.click_node("2", EndpointDemand::StartAndEnd);
		assert_eq!(sel.start(), Some("1"));
		assert_eq!(sel.end(), Some("2"));
	}

	#[test]
	fn pair_second_click_on_start_is_not_an_end() {
		let mut sel = Selection::new();
		sel.click_node("1", EndpointDemand::StartAndEnd);
		sel.click_node("1", EndpointDemand::StartAndEnd);
		// re-clicking the start clears it instead of becoming the end
		assert_eq!(sel.start(), None);
		assert_eq!(sel.end(), None);
	}

	#[test]
	fn pair_reclick_clears_the_respective_slot() {
		let mut sel = Selection::new();
		sel.click_node("1", EndpointDemand::StartAndEnd);
		sel.click_node("2", EndpointDemand::StartAndEnd);
		sel.click_node("2", EndpointDemand::StartAndEnd);
		assert_eq!(sel.start(), Some("1"));
		assert_eq!(sel.end(), None);
		sel.click_node("2", EndpointDemand::StartAndEnd);
		sel.click_node("1", EndpointDemand::StartAndEnd);
		assert_eq!(sel.start(), None);
		assert_eq!(sel.end(), Some("2"));
	}

	#[test]
	fn endpoints_never_equal_and_non_null() {
		let mut sel = Selection::new();
		for id in ["1", "2", "1", "3", "2", "3"] {
			sel.click_node(id, EndpointDemand::StartAndEnd);
			if let (Some(s), Some(e)) = (sel.start(), sel.end()) {
				assert_ne!(s, e);
			}
		}
	}

	#[test]
	fn switching_to_free_category_drops_endpoints() {
		let mut sel = Selection::new();
		sel.click_node("1", EndpointDemand::StartAndEnd);
		sel.click_node("2", EndpointDemand::StartAndEnd);
		sel.on_algorithm_change(EndpointDemand::Free);
		assert_eq!(sel.start(), None);
		assert_eq!(sel.end(), None);
	}

	#[test]
	fn switching_between_endpoint_algorithms_keeps_start() {
		let mut sel = Selection::new();
		sel.click_node("1", EndpointDemand::StartAndEnd);
		sel.click_node("2", EndpointDemand::StartAndEnd);
		sel.on_algorithm_change(EndpointDemand::StartOnly);
		assert_eq!(sel.start(), Some("1"));
		// a pair's sink has no meaning for a single-endpoint algorithm
		assert_eq!(sel.end(), None);
	}

	#[test]
	fn entering_endpoint_mode_clears_free_selection() {
		let mut sel = Selection::new();
		sel.click_node("1", EndpointDemand::Free);
		sel.click_link("e1");
		sel.on_algorithm_change(EndpointDemand::StartOnly);
		assert!(sel.nodes().is_empty());
		assert_eq!(sel.link(), None);
	}

	#[test]
	fn validate_demands_endpoints() {
		let mut sel = Selection::new();
		assert!(sel.validate_for_solve(EndpointDemand::Free).is_ok());
		assert!(matches!(
			sel.validate_for_solve(EndpointDemand::StartOnly),
			Err(GraphError::MissingSelection(_))
		));
		sel.click_node("1", EndpointDemand::StartOnly);
		assert!(sel.validate_for_solve(EndpointDemand::StartOnly).is_ok());
		assert!(matches!(
			sel.validate_for_solve(EndpointDemand::StartAndEnd),
			Err(GraphError::MissingSelection(_))
		));
	}

	#[test]
	fn validate_rejects_equal_endpoints() {
		// the click machine avoids equal endpoints, so force the state
		let sel = Selection {
			nodes: Vec::new(),
			link: None,
			start: Some("1".to_string()),
			end: Some("1".to_string()),
		};
		assert_eq!(
			sel.validate_for_solve(EndpointDemand::StartAndEnd),
			Err(GraphError::EndpointConflict)
		);
	}

	#[test]
	fn reset_clears_everything() {
		let mut sel = Selection::new();
		sel.click_node("1", EndpointDemand::Free);
		sel.click_node("2", EndpointDemand::StartOnly);
		sel.reset();
		assert!(sel.nodes().is_empty());
		assert_eq!(sel.link(), None);
		assert_eq!(sel.start(), None);
		assert_eq!(sel.end(), None);
	}
}
