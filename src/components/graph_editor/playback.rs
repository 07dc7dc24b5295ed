use std::collections::HashSet;

use log::debug;

use super::error::GraphError;
use super::model::GraphModel;
use super::solve::{ResultGraph, SolveResponse};

/// One step of a solver result: the set of edges to highlight plus a
/// human-readable description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
	pub description: String,
	pub highlights: HashSet<String>,
}

impl From<ResultGraph> for Snapshot {
	fn from(graph: ResultGraph) -> Self {
		Snapshot {
			description: graph.description,
			highlights: graph
				.edges
				.into_iter()
				.filter(|e| e.highlighted)
				.map(|e| e.id)
				.collect(),
		}
	}
}

/// Ordered sequence of solver snapshots with cyclic navigation. Applying a
/// snapshot only flips highlight flags on the live edge set; topology is
/// never touched.
#[derive(Debug, Default)]
pub struct Playback {
	snapshots: Vec<Snapshot>,
	index: usize,
}

impl Playback {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.snapshots.is_empty()
	}

	pub fn len(&self) -> usize {
		self.snapshots.len()
	}

	/// Current position; only meaningful while non-empty.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Description line for the current snapshot, or a positional fallback.
	pub fn description(&self) -> Option<String> {
		let snapshot = self.snapshots.get(self.index)?;
		if snapshot.description.is_empty() {
			Some(format!("Result {} of {}", self.index + 1, self.snapshots.len()))
		} else {
			Some(snapshot.description.clone())
		}
	}

	/// Digest a solver response. Steps are stored and the first one is
	/// applied; a bare summary becomes a single snapshot; a bare message is
	/// surfaced as an error; an answer with neither is an error of its own.
	pub fn ingest(
		&mut self,
		response: SolveResponse,
		model: &mut GraphModel,
	) -> Result<(), GraphError> {
		match response.result_graphs {
			Some(graphs) if !graphs.is_empty() => {
				self.load(graphs.into_iter().map(Snapshot::from).collect(), model);
				Ok(())
			}
			_ => {
				if response.algorithm_result.is_some() {
					let description = response
						.message
						.unwrap_or_else(|| "Algorithm finished".to_string());
					self.load(
						vec![Snapshot { description, highlights: HashSet::new() }],
						model,
					);
					Ok(())
				} else if let Some(message) = response.message {
					Err(GraphError::SolverRejected(message))
				} else {
					Err(GraphError::EmptySolveResult)
				}
			}
		}
	}

	/// Replace the sequence and apply its first snapshot.
	pub fn load(&mut self, snapshots: Vec<Snapshot>, model: &mut GraphModel) {
		self.snapshots = snapshots;
		self.index = 0;
		self.apply_current(model);
	}

	/// Cyclic forward step; no-op while empty.
	pub fn next(&mut self, model: &mut GraphModel) {
		if self.snapshots.is_empty() {
			return;
		}
		self.index = (self.index + 1) % self.snapshots.len();
		self.apply_current(model);
	}

	/// Cyclic backward step; no-op while empty.
	pub fn previous(&mut self, model: &mut GraphModel) {
		if self.snapshots.is_empty() {
			return;
		}
		self.index = if self.index == 0 { self.snapshots.len() - 1 } else { self.index - 1 };
		self.apply_current(model);
	}

	/// Drop the sequence and unset every highlight.
	pub fn clear(&mut self, model: &mut GraphModel) {
		self.snapshots.clear();
		self.index = 0;
		model.clear_highlights();
	}

	/// Re-apply the current snapshot onto the live edges by id. Ids the
	/// model no longer knows are skipped; it may have been edited since
	/// the request was submitted.
	pub fn apply_current(&self, model: &mut GraphModel) {
		let Some(snapshot) = self.snapshots.get(self.index) else {
			return;
		};
		let mut matched = 0usize;
		for edge in model.edges_mut() {
			edge.highlighted = snapshot.highlights.contains(&edge.id);
			if edge.highlighted {
				matched += 1;
			}
		}
		if matched < snapshot.highlights.len() {
			debug!(
				"snapshot references {} edge(s) missing from the model",
				snapshot.highlights.len() - matched
			);
		}
	}
}
