use crate::dom;
use tracing::trace;
use web_sys::{Document, Element};

pub const DEFAULT_SELECTOR: &str = "#loading_indicator";

/// The page's "loading" spinner.
///
/// Pages without one get a detached indicator on which every call is a no-op.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
	element: Option<Element>,
}
impl LoadingIndicator {
	#[must_use]
	pub fn find(document: &Document) -> Self {
		Self::find_with(document, DEFAULT_SELECTOR)
	}

	#[must_use]
	pub fn find_with(document: &Document, selector: &str) -> Self {
		Self {
			element: dom::query(document, selector),
		}
	}

	#[must_use]
	pub fn detached() -> Self {
		Self::default()
	}

	pub fn request_started(&self) {
		if let Some(element) = &self.element {
			trace!("Showing loading indicator.");
			dom::remove_attribute(element, "hidden");
			dom::remove_class(element, "hidden");
			dom::add_class(element, "loading");
		}
	}

	pub fn request_finished(&self) {
		if let Some(element) = &self.element {
			trace!("Hiding loading indicator.");
			dom::remove_class(element, "loading");
			dom::set_attribute(element, "hidden", "");
		}
	}

	#[must_use]
	pub fn is_shown(&self) -> bool {
		self.element.as_ref().map_or(false, |element| element.class_list().contains("loading"))
	}
}
