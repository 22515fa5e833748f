//! Small `web-sys` helpers that log instead of failing.

use tracing::{error, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

#[must_use]
pub fn document() -> Option<Document> {
	let document = web_sys::window().and_then(|window| window.document());
	if document.is_none() {
		warn!("No document available.");
	}
	document
}

/// The first element below `root` matching `selector`.
pub fn query(root: &impl AsRef<web_sys::Node>, selector: &str) -> Option<Element> {
	let root: &web_sys::Node = root.as_ref();
	let result = if let Some(document) = root.dyn_ref::<Document>() {
		document.query_selector(selector)
	} else if let Some(element) = root.dyn_ref::<Element>() {
		element.query_selector(selector)
	} else {
		return None;
	};
	result.unwrap_or_else(|error| {
		error!("Invalid selector {:?}: {:?}", selector, error);
		None
	})
}

/// Every element below `root` matching `selector`, in document order.
pub fn query_all(root: &impl AsRef<web_sys::Node>, selector: &str) -> Vec<Element> {
	let root: &web_sys::Node = root.as_ref();
	let result = if let Some(document) = root.dyn_ref::<Document>() {
		document.query_selector_all(selector)
	} else if let Some(element) = root.dyn_ref::<Element>() {
		element.query_selector_all(selector)
	} else {
		return Vec::new();
	};
	match result {
		Ok(nodes) => (0..nodes.length()).filter_map(|i| nodes.item(i)).filter_map(|node| node.dyn_into::<Element>().ok()).collect(),
		Err(error) => {
			error!("Invalid selector {:?}: {:?}", selector, error);
			Vec::new()
		}
	}
}

pub fn add_class(element: &Element, class: &str) {
	if let Err(error) = element.class_list().add_1(class) {
		error!("Failed to add class {:?}: {:?}", class, error);
	}
}

pub fn remove_class(element: &Element, class: &str) {
	if let Err(error) = element.class_list().remove_1(class) {
		error!("Failed to remove class {:?}: {:?}", class, error);
	}
}

pub fn set_attribute(element: &Element, name: &str, value: &str) {
	if let Err(error) = element.set_attribute(name, value) {
		error!("Failed to set attribute {:?}: {:?}", name, error);
	}
}

pub fn remove_attribute(element: &Element, name: &str) {
	if let Err(error) = element.remove_attribute(name) {
		error!("Failed to remove attribute {:?}: {:?}", name, error);
	}
}

/// The closest inclusive ancestor of an event target matching `selector`.
pub fn closest(target: Option<web_sys::EventTarget>, selector: &str) -> Option<Element> {
	let node = target?.dyn_into::<web_sys::Node>().ok()?;
	let element = match node.dyn_into::<Element>() {
		Ok(element) => element,
		Err(node) => node.parent_element()?,
	};
	element.closest(selector).unwrap_or_else(|error| {
		error!("Invalid selector {:?}: {:?}", selector, error);
		None
	})
}
