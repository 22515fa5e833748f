//! Entry points for the page's JavaScript.

use crate::{
	config::{FormsetConfig, GlossaryConfig, NotificationConfig},
	dom, editor, glossary,
	listeners::ListenerSet,
	loading::LoadingIndicator,
	manager::{FormsetEvent, FormsetManager},
	notifications::NotificationFeed,
	visibility::StatusPreview,
};
use core::cell::RefCell;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

/// Marks additional formset containers. Their settings come from `data-formset-*` attributes.
pub const FORMSET_MARKER: &str = "[data-formset]";

thread_local! {
	static FORMSETS: RefCell<Vec<FormsetManager>> = RefCell::new(Vec::new());
	static NOTIFICATIONS: RefCell<Option<NotificationFeed>> = RefCell::new(None);
}

/// Wires every feature present on the current page. Calling it again rewires from scratch.
#[wasm_bindgen(js_name = initPage)]
pub fn init_page() {
	#[cfg(feature = "console")]
	let _ = tracing_wasm::try_set_as_global_default();

	ListenerSet::release_page();
	FORMSETS.with(|formsets| formsets.borrow_mut().clear());
	NOTIFICATIONS.with(|feed| feed.borrow_mut().take());

	let window = match web_sys::window() {
		Some(window) => window,
		None => return warn!("Not running in a browser window."),
	};
	let document = match window.document() {
		Some(document) => document,
		None => return warn!("Window has no document."),
	};
	let indicator = LoadingIndicator::find(&document);

	let managers = attach_formsets(&document);
	for manager in &managers {
		manager.bind().keep_for_page();
	}
	info!(formsets = managers.len(), "Formsets attached.");
	FORMSETS.with(|formsets| *formsets.borrow_mut() = managers);

	if let Some(preview) = StatusPreview::from_page(&window, &document) {
		preview.update();
		preview.bind().keep_for_page();
	}

	glossary::decorate(&document, GlossaryConfig::default(), indicator.clone());

	let feed = NotificationFeed::start(&document, NotificationConfig::default(), indicator);
	NOTIFICATIONS.with(|slot| *slot.borrow_mut() = feed);
}

fn attach_formsets(document: &web_sys::Document) -> Vec<FormsetManager> {
	let marked = dom::query_all(document, FORMSET_MARKER);
	if marked.is_empty() {
		return FormsetManager::attach(document, FormsetConfig::default()).into_iter().collect();
	}
	marked
		.into_iter()
		.filter_map(|container| FormsetManager::attach_to(document, container, FormsetConfig::default()))
		.collect()
}

/// Adds a row to every formset on the page. Returns `false` so inline `onclick` handlers cancel the default action.
#[wasm_bindgen(js_name = addCode)]
#[must_use]
pub fn add_code() -> bool {
	FORMSETS.with(|formsets| {
		for manager in formsets.borrow().iter() {
			manager.handle(FormsetEvent::AddClicked);
		}
	});
	false
}

#[wasm_bindgen(js_name = glossaryAnchorHtml)]
#[must_use]
pub fn glossary_anchor_html(term_id: u32, link_text: &str, term_name: &str, url: &str) -> String {
	editor::glossary_anchor(term_id.into(), link_text, term_name, url)
}

#[wasm_bindgen(js_name = isGlossaryAnchor)]
#[must_use]
pub fn is_glossary_anchor(node: &web_sys::Node) -> bool {
	editor::is_glossary_anchor(node)
}
