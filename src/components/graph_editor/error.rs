use thiserror::Error;

/// Error kinds surfaced to the user. All of them are recoverable: the graph
/// and the layout stay usable after any of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
	/// An edge with the same ordered (source, target) pair already exists.
	#[error("An edge between these nodes already exists")]
	DuplicateEdge,
	/// Weight input that is not a non-negative integer.
	#[error("Edge weight must be a non-negative integer")]
	InvalidWeight,
	/// An operation needed a selected node/edge/endpoint that is not set.
	#[error("{0}")]
	MissingSelection(String),
	/// Start and end endpoints refer to the same node.
	#[error("Start and end nodes must not be the same")]
	EndpointConflict,
	/// A solve was requested while a previous one is still pending.
	#[error("A solve request is already in flight")]
	SolveInFlight,
	/// The solve request never produced a usable response.
	#[error("Solve request failed: {0}")]
	SolveTransportFailure(String),
	/// The solver answered with a message instead of results.
	#[error("{0}")]
	SolverRejected(String),
	/// The solver response carried neither results nor a message.
	#[error("No results to display")]
	EmptySolveResult,
}
