//! Helpers for the rich-text editor's glossary plugin.

use crate::glossary::TERM_ATTRIBUTE;
use wasm_bindgen::JsCast;
use web_sys::{Element, Node};

pub const GLOSSARY_CLASS: &str = "aristotle_glossary";

/// Escapes text for use in element content and double-quoted attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#x27;"),
			c => escaped.push(c),
		}
	}
	escaped
}

/// The anchor inserted for a glossary term. Blank link text falls back to the term's name.
#[must_use]
pub fn glossary_anchor(term_id: u64, link_text: &str, term_name: &str, url: &str) -> String {
	let text = if link_text.trim().is_empty() { term_name } else { link_text };
	format!(
		r#"<a class="{}" {}="{}" href="{}">{}</a>"#,
		GLOSSARY_CLASS,
		TERM_ATTRIBUTE,
		term_id,
		escape(url),
		escape(text)
	)
}

/// Which toolbar commands apply to the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarState {
	pub link_enabled: bool,
	pub glossary_active: bool,
}
impl ToolbarState {
	/// On a glossary anchor the glossary command is active and the generic link command disabled.
	#[must_use]
	pub fn for_selection(on_glossary_anchor: bool) -> Self {
		Self {
			link_enabled: !on_glossary_anchor,
			glossary_active: on_glossary_anchor,
		}
	}
}

/// Whether `node` is, or is inside, a glossary anchor.
#[must_use]
pub fn is_glossary_anchor(node: &Node) -> bool {
	let element = match node.dyn_ref::<Element>() {
		Some(element) => Some(element.clone()),
		None => node.parent_element(),
	};
	element
		.and_then(|element| element.closest(&format!("a.{}", GLOSSARY_CLASS)).ok().flatten())
		.map_or(false, |anchor| anchor.has_attribute(TERM_ATTRIBUTE))
}
