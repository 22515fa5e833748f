use crate::row::FieldValue;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

/// Selects every element [`Control::from_element`] accepts.
pub const CONTROL_SELECTOR: &str = "input, select, textarea";

/// A named form control inside a formset row.
#[derive(Debug, Clone)]
pub enum Control {
	Input(HtmlInputElement),
	Select(HtmlSelectElement),
	TextArea(HtmlTextAreaElement),
}
impl Control {
	#[must_use]
	pub fn from_element(element: &Element) -> Option<Self> {
		if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
			Some(Control::Input(input.clone()))
		} else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
			Some(Control::Select(select.clone()))
		} else {
			element.dyn_ref::<HtmlTextAreaElement>().map(|text_area| Control::TextArea(text_area.clone()))
		}
	}

	/// All controls below `root`, in document order.
	#[must_use]
	pub fn all_in(root: &Element) -> Vec<Self> {
		crate::dom::query_all(root, CONTROL_SELECTOR).iter().filter_map(Self::from_element).collect()
	}

	#[must_use]
	pub fn element(&self) -> &Element {
		match self {
			Control::Input(input) => input.as_ref(),
			Control::Select(select) => select.as_ref(),
			Control::TextArea(text_area) => text_area.as_ref(),
		}
	}

	#[must_use]
	pub fn name(&self) -> String {
		match self {
			Control::Input(input) => input.name(),
			Control::Select(select) => select.name(),
			Control::TextArea(text_area) => text_area.name(),
		}
	}

	pub fn set_name(&self, name: &str) {
		match self {
			Control::Input(input) => input.set_name(name),
			Control::Select(select) => select.set_name(name),
			Control::TextArea(text_area) => text_area.set_name(name),
		}
	}

	/// Checkboxes and radio buttons carry state in `checked`, not in `value`.
	#[must_use]
	pub fn is_checkable(&self) -> bool {
		match self {
			Control::Input(input) => {
				let kind = input.type_();
				kind.eq_ignore_ascii_case("checkbox") || kind.eq_ignore_ascii_case("radio")
			}
			Control::Select(_) | Control::TextArea(_) => false,
		}
	}

	#[must_use]
	pub fn is_radio(&self) -> bool {
		match self {
			Control::Input(input) => input.type_().eq_ignore_ascii_case("radio"),
			Control::Select(_) | Control::TextArea(_) => false,
		}
	}

	#[must_use]
	pub fn is_checked(&self) -> bool {
		match self {
			Control::Input(input) => self.is_checkable() && input.checked(),
			Control::Select(_) | Control::TextArea(_) => false,
		}
	}

	/// A radio button reads as the choice it submits when checked, so two buttons of one group never compare equal.
	#[must_use]
	pub fn value(&self) -> FieldValue {
		match self {
			Control::Input(input) if self.is_radio() => FieldValue::Choice(Some(input.value()).filter(|_| input.checked())),
			Control::Input(input) if self.is_checkable() => FieldValue::Checkbox(input.checked()),
			Control::Input(input) => FieldValue::Text(input.value()),
			Control::Select(select) => FieldValue::Text(select.value()),
			Control::TextArea(text_area) => FieldValue::Text(text_area.value()),
		}
	}

	/// Writes text into the control. Checkable inputs keep their `value` attribute (the submitted token) and are left as they are.
	pub fn set_text(&self, text: &str) {
		match self {
			Control::Input(_) if self.is_checkable() => (),
			Control::Input(input) => input.set_value(text),
			Control::Select(select) => select.set_value(text),
			Control::TextArea(text_area) => text_area.set_value(text),
		}
	}

	pub fn set_checked(&self, checked: bool) {
		if let Control::Input(input) = self {
			if self.is_checkable() {
				input.set_checked(checked);
			}
		}
	}

	/// Empties the control: unchecks checkables and blanks everything else.
	pub fn clear(&self) {
		if self.is_checkable() {
			self.set_checked(false);
		} else {
			self.set_text("");
		}
	}

	/// Sets a boolean-like flag: `checked` for checkables, `"on"` otherwise.
	pub fn raise_flag(&self) {
		if self.is_checkable() {
			self.set_checked(true);
		} else {
			self.set_text("on");
		}
	}
}
