use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::selection::Algorithm;
use super::solve::{SOLVE_ENDPOINT, post_solve};
use super::state::{CANVAS_HEIGHT, CANVAS_WIDTH, EditorState};

fn canvas_coords(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> (f64, f64) {
	let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Copy the view-facing bits of the state into plain signals. The
/// `EditorState` lives in an `Rc<RefCell>` shared with the frame loop, so
/// the reactive text around the canvas reads these mirrors instead.
fn sync_view(
	state: &EditorState,
	set_status: WriteSignal<String>,
	set_loading: WriteSignal<bool>,
	set_has_results: WriteSignal<bool>,
) {
	set_status.set(state.status().unwrap_or_default().to_string());
	set_loading.set(state.is_loading());
	set_has_results.set(!state.playback().is_empty());
}

/// The interactive editor: a canvas driven by a requestAnimationFrame loop
/// plus the toolbar around it.
#[component]
pub fn GraphEditorCanvas() -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<EditorState>> = Rc::new(RefCell::new(EditorState::new()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let (status_text, set_status) = signal(String::new());
	let (is_loading, set_loading) = signal(false);
	let (has_results, set_has_results) = signal(false);
	let (algorithm_hint, set_hint) = signal(Algorithm::Bfs.description());

	let (state_init, animate_init) = (state.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(CANVAS_WIDTH as u32);
		canvas.set_height(CANVAS_HEIGHT as u32);
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let mut s = state_anim.borrow_mut();
				s.tick();
				render::render(&s.scene(), &ctx, CANVAS_WIDTH, CANVAS_HEIGHT, s.flow_time());
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = web_sys::window()
				.unwrap()
				.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = canvas_coords(canvas_ref, &ev);
		state_md.borrow_mut().pointer_down(x, y);
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = canvas_coords(canvas_ref, &ev);
		state_mm.borrow_mut().pointer_move(x, y);
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let (x, y) = canvas_coords(canvas_ref, &ev);
		let mut s = state_mu.borrow_mut();
		s.pointer_up(x, y);
		sync_view(&s, set_status, set_loading, set_has_results);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		// treat leaving the canvas as dropping the node in place
		state_ml.borrow_mut().pointer_up(-1.0, -1.0);
	};

	let state_alg = state.clone();
	let on_algorithm = move |ev: web_sys::Event| {
		let mut s = state_alg.borrow_mut();
		s.set_algorithm(&event_target_value(&ev));
		set_hint.set(s.algorithm().description());
		sync_view(&s, set_status, set_loading, set_has_results);
	};

	let state_weight = state.clone();
	let on_weight = move |ev: web_sys::Event| {
		state_weight.borrow_mut().set_pending_weight(&event_target_value(&ev));
	};

	let state_dir = state.clone();
	let on_directed = move |ev: web_sys::Event| {
		state_dir.borrow_mut().set_pending_directed(event_target_checked(&ev));
	};

	let state_solve = state.clone();
	let on_solve = move |_: MouseEvent| {
		let request = {
			let mut s = state_solve.borrow_mut();
			let request = s.begin_solve();
			sync_view(&s, set_status, set_loading, set_has_results);
			request
		};
		let Some(request) = request else {
			return;
		};
		let state = state_solve.clone();
		spawn_local(async move {
			let outcome = post_solve(SOLVE_ENDPOINT, &request).await;
			let mut s = state.borrow_mut();
			s.finish_solve(outcome);
			sync_view(&s, set_status, set_loading, set_has_results);
		});
	};

	// one toolbar button per state method
	macro_rules! action {
		($method:ident) => {{
			let state = state.clone();
			move |_: MouseEvent| {
				let mut s = state.borrow_mut();
				s.$method();
				sync_view(&s, set_status, set_loading, set_has_results);
			}
		}};
	}

	view! {
		<div class="graph-editor">
			<div class="graph-editor-toolbar">
				<select on:change=on_algorithm>
					{Algorithm::ALL
						.into_iter()
						.map(|a| view! { <option value=a.id()>{a.name()}</option> })
						.collect_view()}
				</select>
				<span class="graph-editor-hint">{move || algorithm_hint.get()}</span>
				<button on:click=action!(add_node)>"Add node"</button>
				<button on:click=action!(add_edge)>"Add edge"</button>
				<button on:click=action!(delete_node)>"Delete node"</button>
				<button on:click=action!(delete_edge)>"Delete edge"</button>
				<label>
					"Weight"
					<input type="number" min="0" value="1" on:input=on_weight />
				</label>
				<label>
					<input type="checkbox" checked=true on:change=on_directed />
					"Directed"
				</label>
				<button on:click=action!(apply_weight)>"Apply weight"</button>
				<button on:click=action!(toggle_direction)>"Toggle direction"</button>
			</div>
			<div class="graph-editor-toolbar">
				<button on:click=action!(recenter)>"Center graph"</button>
				<button on:click=action!(clear_selection)>"Clear selection"</button>
				<button on:click=action!(clear_endpoints)>"Clear endpoints"</button>
				<button on:click=action!(clear_graph)>"Clear graph"</button>
				<button on:click=on_solve disabled=move || is_loading.get()>
					{move || if is_loading.get() { "Solving..." } else { "Solve" }}
				</button>
				<button on:click=action!(previous_result) disabled=move || !has_results.get()>
					"Previous"
				</button>
				<button on:click=action!(next_result) disabled=move || !has_results.get()>
					"Next"
				</button>
				<button on:click=action!(clear_results) disabled=move || !has_results.get()>
					"Clear results"
				</button>
			</div>
			<p class="graph-editor-status">{move || status_text.get()}</p>
			<canvas
				node_ref=canvas_ref
				class="graph-editor-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style="display: block; cursor: pointer; border: 1px solid #ccc;"
			/>
		</div>
	}
}
