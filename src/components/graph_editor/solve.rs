use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::error::GraphError;
use super::model::GraphModel;
use super::selection::{Algorithm, Selection};

/// Path the solver is mounted on, relative to the app origin.
pub const SOLVE_ENDPOINT: &str = "/graph/solve";

/// A node as it travels over the wire.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WireNode {
	pub id: String,
	pub label: String,
}

/// An edge in the outgoing request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RequestEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub weight: u32,
	pub directed: bool,
}

/// An edge in a result snapshot; `highlighted` marks membership in the step.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ResultEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub weight: u32,
	pub directed: bool,
	#[serde(default)]
	pub highlighted: bool,
}

/// The payload submitted to the solver.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
	pub nodes: Vec<WireNode>,
	pub edges: Vec<RequestEdge>,
	pub algorithm: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub start_node_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub end_node_id: Option<String>,
}

/// One intermediate result returned by the solver.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ResultGraph {
	pub nodes: Vec<WireNode>,
	pub edges: Vec<ResultEdge>,
	#[serde(default)]
	pub description: String,
}

/// The solver's answer. Exactly which fields are present varies by
/// algorithm and by outcome; ingestion decides what to do with each shape.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SolveResponse {
	#[serde(default)]
	pub result_graphs: Option<Vec<ResultGraph>>,
	#[serde(default)]
	pub algorithm_result: Option<serde_json::Value>,
	#[serde(default)]
	pub message: Option<String>,
}

/// Serialize the current model and endpoint choices into a request.
pub fn build_request(
	model: &GraphModel,
	selection: &Selection,
	algorithm: Algorithm,
) -> SolveRequest {
	SolveRequest {
		nodes: model
			.nodes()
			.iter()
			.map(|n| WireNode { id: n.id.clone(), label: n.label.clone() })
			.collect(),
		edges: model
			.edges()
			.iter()
			.map(|e| RequestEdge {
				id: e.id.clone(),
				source: e.source.clone(),
				target: e.target.clone(),
				weight: e.weight,
				directed: e.directed,
			})
			.collect(),
		algorithm: algorithm.id().to_string(),
		start_node_id: selection.start().map(str::to_string),
		end_node_id: selection.end().map(str::to_string),
	}
}

/// POST the request to the solver and decode its response. Every failure
/// mode along the way collapses into `SolveTransportFailure`.
pub async fn post_solve(url: &str, request: &SolveRequest) -> Result<SolveResponse, GraphError> {
	let body = serde_json::to_string(request)
		.map_err(|e| GraphError::SolveTransportFailure(e.to_string()))?;

	let opts = RequestInit::new();
	opts.set_method("POST");
	opts.set_body(&JsValue::from_str(&body));

	let req = Request::new_with_str_and_init(url, &opts).map_err(transport)?;
	req.headers().set("Content-Type", "application/json").map_err(transport)?;

	let window = web_sys::window()
		.ok_or_else(|| GraphError::SolveTransportFailure("no window".to_string()))?;
	let resp_value = JsFuture::from(window.fetch_with_request(&req)).await.map_err(transport)?;
	let resp: Response = resp_value
		.dyn_into()
		.map_err(|_| GraphError::SolveTransportFailure("fetch returned no response".to_string()))?;
	if !resp.ok() {
		return Err(GraphError::SolveTransportFailure(format!(
			"server returned {}",
			resp.status()
		)));
	}

	let text = JsFuture::from(resp.text().map_err(transport)?).await.map_err(transport)?;
	let text = text.as_string().unwrap_or_default();
	serde_json::from_str(&text).map_err(|e| GraphError::SolveTransportFailure(e.to_string()))
}

fn transport(err: JsValue) -> GraphError {
	let detail = err
		.as_string()
		.or_else(|| err.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
		.unwrap_or_else(|| "network error".to_string());
	GraphError::SolveTransportFailure(detail)
}
