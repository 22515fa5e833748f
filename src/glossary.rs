//! Glossary tooltips for in-text term links.

use crate::{
	config::GlossaryConfig,
	dom,
	loading::LoadingIndicator,
	request::{fetch_json, Request},
};
use hashbrown::HashMap;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use web_sys::{Document, Element};

/// The attribute carrying a term's id.
pub const TERM_ATTRIBUTE: &str = "data-aristotle_glossary_id";
pub const DECORATED_CLASS: &str = "aristotle-glossary-decorated";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Term {
	pub id: u64,
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TermList {
	pub objects: Vec<Term>,
}

/// The unique, sorted term ids among `raw_ids`. Unparsable ids are skipped.
#[must_use]
pub fn term_ids<'a>(raw_ids: impl IntoIterator<Item = &'a str>) -> Vec<u64> {
	let mut ids: Vec<u64> = raw_ids.into_iter().filter_map(|id| id.trim().parse().ok()).collect();
	ids.sort_unstable();
	ids.dedup();
	ids
}

/// One lookup for all of `ids`.
#[must_use]
pub fn batch_url(endpoint: &str, ids: &[u64]) -> String {
	let ids: Vec<String> = ids.iter().map(u64::to_string).collect();
	let separator = if endpoint.contains('?') { '&' } else { '?' };
	format!("{}{}format=json&limit=0&id__in={}", endpoint, separator, ids.join(","))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
	pub title: String,
	pub content: String,
}

/// The tooltip for a looked-up term, or the fallback label for a missing one.
#[must_use]
pub fn tooltip(term: Option<&Term>, fallback_label: Option<&str>) -> Option<Tooltip> {
	match (term, fallback_label) {
		(Some(term), _) => Some(Tooltip {
			title: term.name.clone(),
			content: term.description.clone(),
		}),
		(None, Some(label)) => Some(Tooltip {
			title: label.to_owned(),
			content: String::new(),
		}),
		(None, None) => None,
	}
}

fn annotate(element: &Element, tooltip: &Tooltip) {
	dom::set_attribute(element, "title", &tooltip.title);
	dom::set_attribute(element, "data-content", &tooltip.content);
	dom::set_attribute(element, "data-toggle", "popover");
	dom::add_class(element, DECORATED_CLASS);
}

/// Annotates each tagged element with its term's tooltip. Returns how many were annotated.
///
/// Elements without a known term get `fallback_label` as title, or are left alone without one.
pub fn annotate_all(elements: &[Element], terms: &HashMap<u64, Term>, fallback_label: Option<&str>) -> usize {
	let mut annotated = 0;
	for element in elements {
		let term = element.get_attribute(TERM_ATTRIBUTE).and_then(|id| id.trim().parse::<u64>().ok()).and_then(|id| terms.get(&id));
		if let Some(tooltip) = tooltip(term, fallback_label) {
			annotate(element, &tooltip);
			annotated += 1;
		}
	}
	annotated
}

/// Looks up every tagged term on the page in one request and annotates the elements.
///
/// Runs in the background. Two overlapping runs may race; both only read and re-annotate.
#[instrument(skip(document, indicator))]
pub fn decorate(document: &Document, config: GlossaryConfig, indicator: LoadingIndicator) {
	let elements = dom::query_all(document, &format!("[{}]", TERM_ATTRIBUTE));
	let attributes: Vec<String> = elements.iter().filter_map(|element| element.get_attribute(TERM_ATTRIBUTE)).collect();
	let ids = term_ids(attributes.iter().map(String::as_str));
	if ids.is_empty() {
		debug!("No glossary terms on this page.");
		return;
	}

	wasm_bindgen_futures::spawn_local(async move {
		let url = batch_url(&config.endpoint, &ids);
		let terms = match fetch_json::<TermList>(Request::quiet(&url), &indicator).await {
			Ok(list) => list.objects,
			Err(error) => {
				warn!("Glossary lookup failed: {}", error);
				return;
			}
		};
		let terms: HashMap<u64, Term> = terms.into_iter().map(|term| (term.id, term)).collect();
		let decorated = annotate_all(&elements, &terms, config.fallback_label.as_deref());
		debug!(decorated, total = elements.len(), "Decorated glossary terms.");
	});
}
