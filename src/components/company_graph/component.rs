//! Leptos component wrapping the company graph canvas.
//!
//! The component owns an HTML canvas plus the overlays around it: the
//! IN/OUT/ALL path-mode toggle and the relation detail (a popover that
//! follows the pointer on wide viewports, a bottom sheet on narrow ones).
//! Mouse and touch handlers feed the shared [`GraphViewState`]; an animation
//! loop runs via `requestAnimationFrame`, ticking the simulation and redrawing.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent, Window,
};

use super::config::GraphConfig;
use super::interaction::DeviceClass;
use super::paths::PathSelectionType;
use super::relations::{ReasonRecord, RelationSummary};
use super::render;
use super::scale::ScaleConfig;
use super::state::{CLICK_SLOP, GraphViewState};
use super::theme::Theme;
use super::types::CompanyDetail;

/// Bundles graph state with visual configuration.
struct GraphContext {
	state: GraphViewState,
	scale: ScaleConfig,
	theme: Theme,
}

impl GraphContext {
	fn press(&mut self, x: f64, y: f64) {
		let state = &mut self.state;
		if let Some(idx) = state.node_at_position(x, y, &self.scale) {
			state.drag.active = true;
			state.drag.moved = false;
			state.drag.node_idx = Some(idx);
			state.drag.start_x = x;
			state.drag.start_y = y;
			let (mut nx, mut ny) = (0.0, 0.0);
			state.graph.visit_nodes(|node| {
				if node.index() == idx {
					(nx, ny) = (node.x(), node.y());
				}
			});
			state.drag.node_start_x = nx;
			state.drag.node_start_y = ny;
		} else {
			state.pan.active = true;
			state.pan.moved = false;
			state.pan.start_x = x;
			state.pan.start_y = y;
			state.pan.transform_start_x = state.transform.x;
			state.pan.transform_start_y = state.transform.y;
		}
	}

	/// Continues a drag or pan. Returns false when no gesture is in progress.
	fn drag_to(&mut self, x: f64, y: f64) -> bool {
		let state = &mut self.state;
		if state.drag.active {
			if (x - state.drag.start_x).hypot(y - state.drag.start_y) > CLICK_SLOP {
				state.drag.moved = true;
			}
			if let (true, Some(idx)) = (state.drag.moved, state.drag.node_idx) {
				let (dx, dy) = (
					(x - state.drag.start_x) / state.transform.k,
					(y - state.drag.start_y) / state.transform.k,
				);
				let (nx, ny) = (
					state.drag.node_start_x + dx as f32,
					state.drag.node_start_y + dy as f32,
				);
				state.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
				state.wake();
			}
			true
		} else if state.pan.active {
			if (x - state.pan.start_x).hypot(y - state.pan.start_y) > CLICK_SLOP {
				state.pan.moved = true;
			}
			state.transform.x = state.pan.transform_start_x + (x - state.pan.start_x);
			state.transform.y = state.pan.transform_start_y + (y - state.pan.start_y);
			true
		} else {
			false
		}
	}

	/// Ends the gesture; a press that never moved counts as a click.
	fn release(&mut self, x: f64, y: f64) {
		let gesture = self.state.drag.active || self.state.pan.active;
		let moved = self.state.drag.moved || self.state.pan.moved;
		if gesture && !moved {
			let node = self.state.node_at_position(x, y, &self.scale);
			self.state.click(node);
		}
		self.cancel();
	}

	fn cancel(&mut self) {
		self.state.drag.active = false;
		self.state.drag.moved = false;
		self.state.drag.node_idx = None;
		self.state.pan.active = false;
		self.state.pan.moved = false;
	}
}

/// What the relation overlay should show.
#[derive(Clone, Debug, PartialEq)]
struct DetailPanel {
	summary: RelationSummary,
	device: DeviceClass,
	/// Pointer position (client coordinates), for the popover.
	anchor: Option<(f64, f64)>,
}

fn detail_panel(state: &GraphViewState) -> Option<DetailPanel> {
	let summary = state.relation_detail()?;
	Some(DetailPanel {
		summary,
		device: state.interaction.device(),
		anchor: state
			.interaction
			.hovered()
			.map(|h| (h.pointer_x, h.pointer_y)),
	})
}

fn sync_panel(state: &GraphViewState, panel: RwSignal<Option<DetailPanel>>) {
	let next = detail_panel(state);
	if panel.get_untracked() != next {
		panel.set(next);
	}
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, h))
}

fn canvas_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x - rect.left(), client_y - rect.top())
}

fn first_touch(ev: &TouchEvent) -> Option<(f64, f64)> {
	let touch = ev.changed_touches().get(0)?;
	Some((touch.client_x() as f64, touch.client_y() as f64))
}

/// Renders the relationship graph of a company on a canvas element.
///
/// Pass company data via the reactive `data` signal; the graph is rebuilt and
/// the interaction state reset whenever it changes. The component sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport. Explicit `width`/`height` override automatic sizing.
#[component]
pub fn CompanyGraphCanvas(
	#[prop(into)] data: Signal<CompanyDetail>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let path_mode = RwSignal::new(PathSelectionType::default());
	let panel: RwSignal<Option<DetailPanel>> = RwSignal::new(None);
	let close_requests = RwSignal::new(0u32);
	let breakpoint = config.breakpoint;

	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let detail = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(c) = context_init.borrow_mut().as_mut() {
			c.state.rebuild(&detail, &c.scale);
			panel.set(None);
			return;
		}

		let Some(window) = web_sys::window() else {
			warn!("company-graph: no window, canvas not initialized");
			return;
		};
		let viewport = viewport_size(&window).unwrap_or((800.0, 600.0));
		let (w, h) = if fullscreen {
			viewport
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("company-graph: 2d context has unexpected type");
					return;
				}
			},
			_ => {
				warn!("company-graph: canvas 2d context unavailable");
				return;
			}
		};

		let device = DeviceClass::from_viewport_width(viewport.0, breakpoint);
		let scale = ScaleConfig::default();
		let mut state = GraphViewState::new(&detail, &config, &scale, w, h, device);
		state.set_path_mode(path_mode.get_untracked());
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale,
			theme: Theme::default(),
		});

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some((vw, vh)) = web_sys::window().and_then(|win| viewport_size(&win)) else {
				return;
			};
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state
					.set_device(DeviceClass::from_viewport_width(vw, breakpoint));
				if fullscreen {
					canvas_resize.set_width(vw as u32);
					canvas_resize.set_height(vh as u32);
					c.state.resize(vw, vh);
				}
				sync_panel(&c.state, panel);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let dt = 0.016;
				if c.state.animation_running {
					c.state.tick(dt);
				}
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_mode = context.clone();
	Effect::new(move |_| {
		let mode = path_mode.get();
		if let Some(ref mut c) = *context_mode.borrow_mut() {
			c.state.set_path_mode(mode);
			sync_panel(&c.state, panel);
		}
	});

	let context_close = context.clone();
	Effect::new(move |prev: Option<u32>| {
		let requests = close_requests.get();
		if prev.is_some() {
			if let Some(ref mut c) = *context_close.borrow_mut() {
				c.state.close_sheet();
				sync_panel(&c.state, panel);
			}
		}
		requests
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, ev.client_x() as f64, ev.client_y() as f64);
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.press(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (cx, cy) = (ev.client_x() as f64, ev.client_y() as f64);
		let (x, y) = canvas_point(&canvas, cx, cy);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if !c.drag_to(x, y) {
				let hovered = c.state.node_at_position(x, y, &c.scale);
				c.state.pointer_at(hovered, cx, cy);
			}
			sync_panel(&c.state, panel);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, ev.client_x() as f64, ev.client_y() as f64);
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.release(x, y);
			sync_panel(&c.state, panel);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.cancel();
			c.state.pointer_left();
			sync_panel(&c.state, panel);
		}
	};

	let context_ts = context.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let (Some(canvas), Some((cx, cy))) = (canvas_ref.get(), first_touch(&ev)) else {
			return;
		};
		let (x, y) = canvas_point(&canvas, cx, cy);
		if let Some(ref mut c) = *context_ts.borrow_mut() {
			c.press(x, y);
		}
	};

	let context_tm = context.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let (Some(canvas), Some((cx, cy))) = (canvas_ref.get(), first_touch(&ev)) else {
			return;
		};
		let (x, y) = canvas_point(&canvas, cx, cy);
		if let Some(ref mut c) = *context_tm.borrow_mut() {
			c.drag_to(x, y);
		}
	};

	let context_te = context.clone();
	let on_touchend = move |ev: TouchEvent| {
		let (Some(canvas), Some((cx, cy))) = (canvas_ref.get(), first_touch(&ev)) else {
			return;
		};
		let (x, y) = canvas_point(&canvas, cx, cy);
		if let Some(ref mut c) = *context_te.borrow_mut() {
			c.release(x, y);
			sync_panel(&c.state, panel);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, ev.client_x() as f64, ev.client_y() as f64);
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let t = &mut c.state.transform;
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (t.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / t.k;
			t.x = x - (x - t.x) * ratio;
			t.y = y - (y - t.y) * ratio;
			t.k = new_k;
		}
	};

	let mode_buttons = PathSelectionType::ALL_MODES
		.into_iter()
		.map(|mode| {
			view! {
				<button
					type="button"
					class="path-mode-button"
					class:active=move || path_mode.get() == mode
					on:click=move |_| path_mode.set(mode)
				>
					{mode.label()}
				</button>
			}
		})
		.collect_view();

	view! {
		<div class="company-graph">
			<h3 class="company-graph-title">"관계도"</h3>
			<div class="path-mode-toggle">{mode_buttons}</div>
			<canvas
				node_ref=canvas_ref
				class="company-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:touchstart=on_touchstart
				on:touchmove=on_touchmove
				on:touchend=on_touchend
				on:wheel=on_wheel
				style="display: block; cursor: grab; touch-action: none;"
			/>
			{move || panel.get().map(|p| detail_overlay(p, close_requests))}
		</div>
	}
}

fn detail_overlay(panel: DetailPanel, close_requests: RwSignal<u32>) -> AnyView {
	let DetailPanel {
		summary,
		device,
		anchor,
	} = panel;
	let name = summary.name.clone();
	match device {
		DeviceClass::Pointer => {
			let (x, y) = anchor.unwrap_or_default();
			view! {
				<div
					class="relations-popover"
					style=format!("position: fixed; left: {}px; top: {}px;", x + 10.0, y + 10.0)
				>
					<h3 class="relations-title">{name}</h3>
					<RelationsContent summary=summary />
				</div>
			}
			.into_any()
		}
		DeviceClass::Touch => {
			let close = move |_: MouseEvent| close_requests.update(|n| *n += 1);
			view! {
				<div class="bottom-sheet-backdrop" on:click=close>
					<div class="bottom-sheet" on:click=|ev: MouseEvent| ev.stop_propagation()>
						<header class="bottom-sheet-header">
							<h3 class="relations-title">{name}</h3>
							<button
								type="button"
								class="bottom-sheet-close"
								on:click=move |_| close_requests.update(|n| *n += 1)
							>
								"×"
							</button>
						</header>
						<RelationsContent summary=summary />
					</div>
				</div>
			}
			.into_any()
		}
	}
}

/// IN and OUT reason lists for one related company.
#[component]
fn RelationsContent(summary: RelationSummary) -> impl IntoView {
	let empty = summary
		.is_empty()
		.then(|| view! { <p class="relations-empty">"표시할 관계 정보가 없습니다."</p> });
	view! {
		<div class="relations">
			{empty}
			{reason_group("IN", "relations-in", summary.in_reasons)}
			{reason_group("OUT", "relations-out", summary.out_reasons)}
		</div>
	}
}

fn reason_group(
	title: &'static str,
	class: &'static str,
	reasons: Vec<ReasonRecord>,
) -> Option<impl IntoView> {
	if reasons.is_empty() {
		return None;
	}
	let items = reasons.into_iter().map(reason_item).collect_view();
	Some(view! {
		<div class=class>
			<div class="relations-direction">{title}</div>
			<ul class="relations-list">{items}</ul>
		</div>
	})
}

fn reason_item(record: ReasonRecord) -> impl IntoView {
	let body = match (record.news_href(), record.disclosure_url) {
		(Some(href), _) => view! { <a href=href>{record.reason}</a> }.into_any(),
		(None, Some(url)) => view! {
			<a href=url target="_blank" rel="noopener noreferrer">{record.reason}</a>
		}
		.into_any(),
		(None, None) => view! { <span>{record.reason}</span> }.into_any(),
	};
	view! { <li class="relations-item">{body}</li> }
}
