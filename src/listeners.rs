//! Ownership of JavaScript event listener closures.

use core::cell::RefCell;
use tracing::{error, trace};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Event, EventTarget};

thread_local! {
	/// Listener sets that live as long as the page.
	static PAGE_LISTENERS: RefCell<Vec<ListenerSet>> = RefCell::new(Vec::new());
}

struct Listener {
	target: EventTarget,
	event: &'static str,
	closure: Closure<dyn FnMut(Event)>,
}

/// A group of event listeners that are removed again when the set is dropped.
///
/// Dropping a set while one of its listeners runs is not supported.
#[derive(Default)]
pub struct ListenerSet {
	listeners: Vec<Listener>,
}
impl core::fmt::Debug for ListenerSet {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_list().entries(self.listeners.iter().map(|listener| listener.event)).finish()
	}
}
impl ListenerSet {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Listens for `event` on `target`. Failures are logged and the listener is discarded.
	pub fn listen(&mut self, target: &EventTarget, event: &'static str, handler: impl 'static + FnMut(Event)) {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
		if let Err(error) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
			error!("Failed to add event listener {:?}: {:?}", event, error);
			return;
		}
		trace!("Added {:?} listener.", event);
		self.listeners.push(Listener {
			target: target.clone(),
			event,
			closure,
		});
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.listeners.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.listeners.is_empty()
	}

	/// Moves the listeners into page-lifetime storage.
	pub fn keep_for_page(self) {
		PAGE_LISTENERS.with(|page| page.borrow_mut().push(self));
	}

	/// Drops every set handed to [`ListenerSet::keep_for_page`].
	pub fn release_page() {
		let released = PAGE_LISTENERS.with(|page| page.borrow_mut().drain(..).collect::<Vec<_>>());
		trace!("Released {} page listener set(s).", released.len());
	}
}
impl Drop for ListenerSet {
	fn drop(&mut self) {
		for Listener { target, event, closure } in self.listeners.drain(..) {
			if let Err(error) = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
				error!("Failed to remove event listener {:?}: {:?}", event, error);
			}
		}
	}
}
