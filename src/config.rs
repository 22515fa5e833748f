use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

/// Where a formset lives in the page and how its parts are recognised.
///
/// The defaults match the server's `alter_one_to_many` templates.
/// Each selector can be overridden per container with a `data-formset-*` attribute, see [`FormsetConfig::with_overrides_from`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormsetConfig {
	/// The element whose children are the rows.
	pub container: String,
	/// The hidden prototype row. Must not match a live row.
	pub template: String,
	pub row: String,
	/// Sub-elements of a row that start a drag.
	pub handle: String,
	/// Controls that add a row when clicked.
	pub add_control: String,
	/// Enhanced-widget markup that must not survive cloning.
	pub decoration: String,
	/// Inferred from the template's field names when [`None`].
	pub prefix: Option<String>,
}
impl Default for FormsetConfig {
	fn default() -> Self {
		Self {
			container: "#draggableTable".to_owned(),
			template: "#formstage tr".to_owned(),
			row: ".moveablerow".to_owned(),
			handle: ".grabber".to_owned(),
			add_control: "[data-formset-add]".to_owned(),
			decoration: ".select2-container".to_owned(),
			prefix: None,
		}
	}
}
impl FormsetConfig {
	/// Applies `data-formset-template`, `-row`, `-handle`, `-add`, `-decoration` and `-prefix` from `container`.
	#[must_use]
	pub fn with_overrides_from(mut self, container: &Element) -> Self {
		let dataset = match container.dyn_ref::<HtmlElement>() {
			Some(element) => element.dataset(),
			None => return self,
		};
		let overrides: [(&str, &mut String); 5] = [
			("formsetTemplate", &mut self.template),
			("formsetRow", &mut self.row),
			("formsetHandle", &mut self.handle),
			("formsetAdd", &mut self.add_control),
			("formsetDecoration", &mut self.decoration),
		];
		for (key, target) in overrides {
			if let Some(value) = dataset.get(key).filter(|value| !value.is_empty()) {
				*target = value;
			}
		}
		if let Some(prefix) = dataset.get("formsetPrefix").filter(|prefix| !prefix.is_empty()) {
			self.prefix = Some(prefix);
		}
		self
	}
}

/// Settings for [`crate::notifications::NotificationFeed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
	pub endpoint: String,
	pub menu: String,
	pub badge: String,
	pub interval_ms: i32,
	/// Entries shown at most.
	pub limit: usize,
	/// Consecutive failures after which polling stops.
	pub max_failures: u32,
	pub empty_text: String,
	pub reconnect_text: String,
}
impl Default for NotificationConfig {
	fn default() -> Self {
		Self {
			endpoint: "/inbox/notifications/api/unread_list/".to_owned(),
			menu: "#notify_menu".to_owned(),
			badge: ".notify-badge".to_owned(),
			interval_ms: 15_000,
			limit: 5,
			max_failures: 3,
			empty_text: "No unread notifications".to_owned(),
			reconnect_text: "Lost connection to notifications. Click to reconnect.".to_owned(),
		}
	}
}

/// Settings for [`crate::glossary::decorate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryConfig {
	pub endpoint: String,
	/// Title for elements whose term wasn't found. They are left alone when [`None`].
	pub fallback_label: Option<String>,
}
impl Default for GlossaryConfig {
	fn default() -> Self {
		Self {
			endpoint: "/api/v1/glossarylist/".to_owned(),
			fallback_label: None,
		}
	}
}
