//! Drag-and-drop reordering of formset rows.
//!
//! Only a row's handles start a drag: pressing one makes its row `draggable` for the gesture.
//! The dragged row moves live as it's dragged over its siblings, and the rows are renumbered once it's dropped.

use crate::{
	dom,
	listeners::ListenerSet,
	manager::{FormsetEvent, FormsetManager},
};
use core::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, trace};
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Element, MouseEvent, Node};

/// Marks the row being dragged.
pub const DRAGGED_CLASS: &str = "info";
/// Marks every handle while a drag is in progress.
pub const GRABBED_CLASS: &str = "grabbed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
	Before,
	After,
}

/// Where a row dropped at `pointer_y` lands relative to the row spanning `top..top + height`.
#[must_use]
pub fn placement(pointer_y: f64, top: f64, height: f64) -> Placement {
	if pointer_y < top + height / 2. {
		Placement::Before
	} else {
		Placement::After
	}
}

pub fn bind(manager: &FormsetManager, listeners: &mut ListenerSet) {
	let dragged: Rc<RefCell<Option<Element>>> = Rc::default();
	let pressed: Rc<RefCell<Option<Element>>> = Rc::default();
	let container = manager.container().clone();

	{
		let manager = manager.clone();
		let pressed = Rc::clone(&pressed);
		listeners.listen(container.as_ref(), "mousedown", move |event| {
			if event.dyn_ref::<MouseEvent>().map_or(false, |event| event.button() != 0) {
				return;
			}
			if dom::closest(event.target(), &manager.config().handle).is_none() {
				return;
			}
			if let Some(row) = row_of(&manager, event.target()) {
				dom::set_attribute(&row, "draggable", "true");
				*pressed.borrow_mut() = Some(row);
			}
		});
	}

	// A press on a handle that didn't turn into a drag. The button may be released anywhere on the page.
	match container.owner_document() {
		Some(document) => {
			let dragged = Rc::clone(&dragged);
			listeners.listen(document.as_ref(), "mouseup", move |_| {
				if dragged.borrow().is_some() {
					return;
				}
				if let Some(row) = pressed.borrow_mut().take() {
					dom::remove_attribute(&row, "draggable");
				}
			});
		}
		None => error!("Formset container has no owner document."),
	}

	{
		let manager = manager.clone();
		let dragged = Rc::clone(&dragged);
		listeners.listen(container.as_ref(), "dragstart", move |event| {
			let row = match row_of(&manager, event.target()) {
				Some(row) if row.get_attribute("draggable").as_deref() == Some("true") => row,
				_ => return,
			};
			if let Some(data_transfer) = event.dyn_ref::<DragEvent>().and_then(DragEvent::data_transfer) {
				data_transfer.set_effect_allowed("move");
				// Firefox won't start a drag without data.
				if let Err(error) = data_transfer.set_data("text/plain", "") {
					error!("Failed to set drag data: {:?}", error);
				}
			}
			dom::add_class(&row, DRAGGED_CLASS);
			for handle in dom::query_all(manager.container(), &manager.config().handle) {
				dom::add_class(&handle, GRABBED_CLASS);
			}
			trace!("Drag started.");
			*dragged.borrow_mut() = Some(row);
		});
	}

	{
		let manager = manager.clone();
		let dragged = Rc::clone(&dragged);
		listeners.listen(container.as_ref(), "dragover", move |event| {
			let dragged = dragged.borrow();
			let dragged = match dragged.as_ref() {
				Some(dragged) => dragged,
				None => return,
			};
			event.prevent_default();
			let over = match row_of(&manager, event.target()) {
				Some(over) if &over != dragged => over,
				_ => return,
			};
			let pointer_y = match event.dyn_ref::<MouseEvent>() {
				Some(event) => f64::from(event.client_y()),
				None => return,
			};
			let rect = over.get_bounding_client_rect();
			let reference: Option<Node> = match placement(pointer_y, rect.top(), rect.height()) {
				Placement::Before => Some(over.clone().into()),
				Placement::After => over.next_sibling(),
			};
			if let Some(parent) = over.parent_node() {
				if let Err(error) = parent.insert_before(dragged.as_ref(), reference.as_ref()) {
					error!("Failed to move the dragged row: {:?}", error);
				}
			}
		});
	}

	{
		let manager = manager.clone();
		let dragged = Rc::clone(&dragged);
		listeners.listen(container.as_ref(), "drop", move |event| {
			if dragged.borrow().is_some() {
				event.prevent_default();
				finish(&manager, &dragged);
			}
		});
	}

	{
		let manager = manager.clone();
		listeners.listen(container.as_ref(), "dragend", move |_| finish(&manager, &dragged));
	}
}

/// Clears the transient drag state and renumbers. Runs for successful and cancelled drags alike.
fn finish(manager: &FormsetManager, dragged: &RefCell<Option<Element>>) {
	let row = match dragged.borrow_mut().take() {
		Some(row) => row,
		None => return,
	};
	dom::remove_class(&row, DRAGGED_CLASS);
	dom::remove_attribute(&row, "draggable");
	for handle in dom::query_all(manager.container(), &manager.config().handle) {
		dom::remove_class(&handle, GRABBED_CLASS);
	}
	debug!("Row dropped.");
	manager.handle(FormsetEvent::DragDropped);
}

/// The live row containing an event target.
fn row_of(manager: &FormsetManager, target: Option<web_sys::EventTarget>) -> Option<Element> {
	let row = dom::closest(target, &manager.config().row)?;
	let container: &Node = manager.container().as_ref();
	if container.contains(Some(row.as_ref())) {
		Some(row)
	} else {
		None
	}
}
