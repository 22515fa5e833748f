//! Previews how visible an item becomes once a status change is registered.

use crate::dom;
use core::str::FromStr;
use hashbrown::HashMap;
use serde::Deserialize;
use tracing::{debug, instrument, trace, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement, Window};

/// Ordered from least to most visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
	Hidden,
	Locked,
	Public,
}
impl Visibility {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Visibility::Hidden => "hidden",
			Visibility::Locked => "locked",
			Visibility::Public => "public",
		}
	}
}
impl FromStr for Visibility {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"hidden" => Ok(Visibility::Hidden),
			"locked" => Ok(Visibility::Locked),
			"public" => Ok(Visibility::Public),
			_ => Err(()),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthorityStates {
	/// State id to visibility. Values other than the known visibilities (e.g. `"unselected"`) are no-ops.
	pub states: HashMap<String, String>,
}

/// Registration authority id to the visibility each state would give an item there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct StatusMatrix(pub HashMap<String, AuthorityStates>);
impl StatusMatrix {
	/// What registering in `state` with every one of `authorities` would make the item.
	///
	/// Starts out hidden. Any authority making it public makes it public; otherwise any making it locked makes it locked.
	#[must_use]
	pub fn resolve<'a>(&self, state: &str, authorities: impl IntoIterator<Item = &'a str>) -> Visibility {
		let mut visibility = Visibility::Hidden;
		for authority in authorities {
			let potential = match self.0.get(authority).and_then(|states| states.states.get(state)) {
				Some(potential) => potential,
				None => {
					warn!(authority, state, "Status matrix has no entry.");
					continue;
				}
			};
			match potential.parse::<Visibility>() {
				Ok(potential) => visibility = visibility.max(potential),
				Err(()) => trace!(authority, state, %potential, "Ignoring non-visibility."),
			}
		}
		visibility
	}
}

/// The translated texts the status change page provides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewText {
	pub select_state_to_see: String,
	pub same_visibility_text: String,
	pub diff_visibility_text: String,
	pub visibility_translations: HashMap<Visibility, String>,
	pub current_visibility: Option<Visibility>,
}

/// Substituted in the same/different texts.
pub const PLACEHOLDER: &str = "VISIBILITY_STATUS";

impl PreviewText {
	/// The message for a resolved visibility, or the prompt to select a state when there is none.
	#[must_use]
	pub fn message(&self, resolved: Option<Visibility>) -> String {
		let resolved = match resolved {
			Some(resolved) => resolved,
			None => return self.select_state_to_see.clone(),
		};
		let template = if Some(resolved) == self.current_visibility {
			&self.same_visibility_text
		} else {
			&self.diff_visibility_text
		};
		let translated = self.visibility_translations.get(&resolved).map_or(resolved.as_str(), String::as_str);
		template.replacen(PLACEHOLDER, translated, 1)
	}
}

/// The status-change form's preview.
#[derive(Debug, Clone)]
pub struct StatusPreview {
	form: Element,
	output: Element,
	matrix: StatusMatrix,
	text: PreviewText,
}
impl StatusPreview {
	/// Reads the page globals the status change template defines. Returns [`None`] on other pages.
	#[must_use]
	#[instrument(skip(window, document))]
	pub fn from_page(window: &Window, document: &Document) -> Option<Self> {
		let form = dom::query(document, "#changeStatus")?;
		let output = dom::query(document, "#potential")?;
		let matrix = read_global(window, "status_matrix")?;
		let translations: HashMap<String, String> = read_global(window, "visibility_translations").unwrap_or_default();
		let text = PreviewText {
			select_state_to_see: read_global(window, "select_state_to_see").unwrap_or_default(),
			same_visibility_text: read_global(window, "same_visibility_text").unwrap_or_default(),
			diff_visibility_text: read_global(window, "diff_visibility_text").unwrap_or_default(),
			visibility_translations: translations.into_iter().filter_map(|(key, value)| Some((key.parse().ok()?, value))).collect(),
			current_visibility: read_global::<String>(window, "current_visibility").and_then(|current| current.parse().ok()),
		};
		Some(Self { form, output, matrix, text })
	}

	#[must_use]
	pub fn new(form: Element, output: Element, matrix: StatusMatrix, text: PreviewText) -> Self {
		Self { form, output, matrix, text }
	}

	/// The checked state and the checked authorities, or [`None`] while either is missing.
	#[must_use]
	pub fn resolve(&self) -> Option<Visibility> {
		let state = checked_values(&self.form, "input[name=state]:checked").into_iter().next()?;
		let authorities = checked_values(&self.form, "input[name^=registration]:checked");
		if authorities.is_empty() {
			return None;
		}
		Some(self.matrix.resolve(&state, authorities.iter().map(String::as_str)))
	}

	pub fn update(&self) {
		let resolved = self.resolve();
		debug!(?resolved, "Updating visibility preview.");
		self.output.set_inner_html(&self.text.message(resolved));
	}

	/// Updates the preview whenever an input in the form changes.
	#[must_use = "dropping the set removes the listeners again"]
	pub fn bind(&self) -> crate::listeners::ListenerSet {
		let mut listeners = crate::listeners::ListenerSet::new();
		let preview = self.clone();
		listeners.listen(self.form.as_ref(), "change", move |event| {
			if dom::closest(event.target(), "input").is_some() {
				preview.update();
			}
		});
		listeners
	}
}

fn checked_values(form: &Element, selector: &str) -> Vec<String> {
	dom::query_all(form, selector)
		.into_iter()
		.filter_map(|element| element.dyn_into::<HtmlInputElement>().ok())
		.map(|input| input.value())
		.collect()
}

/// Deserializes a page global through `JSON.stringify`.
fn read_global<T: serde::de::DeserializeOwned>(window: &Window, name: &str) -> Option<T> {
	let value = js_sys::Reflect::get(window.as_ref(), &JsValue::from_str(name)).ok()?;
	if value.is_undefined() {
		debug!(name, "Page global not defined.");
		return None;
	}
	let json = js_sys::JSON::stringify(&value).ok()?;
	let json: String = json.into();
	serde_json::from_str(&json)
		.map_err(|error| warn!(name, "Malformed page global: {}", error))
		.ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn matrix() -> StatusMatrix {
		serde_json::from_str(
			r#"{
				"1": {"states": {"6": "hidden", "7": "locked", "8": "public"}},
				"2": {"states": {"6": "public", "7": "unselected", "8": "locked"}},
				"3": {"states": {"6": "locked", "7": "locked", "8": "hidden"}}
			}"#,
		)
		.unwrap()
	}

	#[test]
	fn public_wins() {
		assert_eq!(matrix().resolve("6", vec!["1", "2"]), Visibility::Public);
		assert_eq!(matrix().resolve("8", vec!["3", "1", "2"]), Visibility::Public);
	}

	#[test]
	fn locked_beats_hidden() {
		assert_eq!(matrix().resolve("6", vec!["1", "3"]), Visibility::Locked);
	}

	#[test]
	fn unselected_and_unknown_are_no_ops() {
		assert_eq!(matrix().resolve("7", vec!["2"]), Visibility::Hidden);
		assert_eq!(matrix().resolve("7", vec!["2", "9"]), Visibility::Hidden);
		assert_eq!(matrix().resolve("7", vec!["2", "1"]), Visibility::Locked);
		assert_eq!(matrix().resolve("99", vec!["1"]), Visibility::Hidden);
	}

	fn text() -> PreviewText {
		PreviewText {
			select_state_to_see: "Select a state".to_owned(),
			same_visibility_text: "Will remain VISIBILITY_STATUS".to_owned(),
			diff_visibility_text: "Will become VISIBILITY_STATUS".to_owned(),
			visibility_translations: vec![(Visibility::Public, "Public".to_owned()), (Visibility::Hidden, "Hidden".to_owned())].into_iter().collect(),
			current_visibility: Some(Visibility::Hidden),
		}
	}

	#[test]
	fn messages() {
		assert_eq!(text().message(None), "Select a state");
		assert_eq!(text().message(Some(Visibility::Hidden)), "Will remain Hidden");
		assert_eq!(text().message(Some(Visibility::Public)), "Will become Public");
		assert_eq!(text().message(Some(Visibility::Locked)), "Will become locked");
	}

	#[test]
	fn precedence_order() {
		assert!(Visibility::Public > Visibility::Locked);
		assert!(Visibility::Locked > Visibility::Hidden);
		assert_eq!("public".parse::<Visibility>(), Ok(Visibility::Public));
		assert_eq!("unselected".parse::<Visibility>(), Err(()));
	}
}
