use crate::name::{is_id, is_ordinal, is_reserved};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
	Text(String),
	Checkbox(bool),
	/// A radio group: the checked button's value, if any.
	Choice(Option<String>),
}
impl FieldValue {
	#[must_use]
	pub fn is_blank(&self) -> bool {
		match self {
			FieldValue::Text(text) => text.is_empty(),
			FieldValue::Checkbox(checked) => !checked,
			FieldValue::Choice(choice) => choice.is_none(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
	pub suffix: String,
	pub value: FieldValue,
}

/// A snapshot of one formset row, keyed by field-name suffix.
///
/// Field order is preserved, and the row's index is deliberately not part of it:
/// identity is always derived from the row's position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
	fields: Vec<Field>,
}
impl Row {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with(mut self, suffix: &str, value: FieldValue) -> Self {
		self.set(suffix, value);
		self
	}

	#[must_use]
	pub fn with_text(self, suffix: &str, text: &str) -> Self {
		self.with(suffix, FieldValue::Text(text.to_owned()))
	}

	#[must_use]
	pub fn fields(&self) -> &[Field] {
		&self.fields
	}

	#[must_use]
	pub fn get(&self, suffix: &str) -> Option<&FieldValue> {
		self.fields.iter().find(|field| field.suffix == suffix).map(|field| &field.value)
	}

	pub fn set(&mut self, suffix: &str, value: FieldValue) {
		match self.fields.iter_mut().find(|field| field.suffix == suffix) {
			Some(field) => field.value = value,
			None => self.fields.push(Field { suffix: suffix.to_owned(), value }),
		}
	}

	/// Whether the row has no persisted counterpart on the server.
	#[must_use]
	pub fn is_new(&self) -> bool {
		self.fields.iter().filter(|field| is_id(&field.suffix)).all(|field| field.value.is_blank())
	}
}

/// A row is untouched if every editable field still holds its template value or is blank.
///
/// Reserved (upper-case) fields, the ordinal and the id field are not editable.
/// Fields the template lacks only count as untouched while blank.
#[must_use]
pub fn is_untouched(row: &Row, template: &Row) -> bool {
	row.fields()
		.iter()
		.filter(|field| !is_reserved(&field.suffix) && !is_ordinal(&field.suffix) && !is_id(&field.suffix))
		.all(|field| field.value.is_blank() || template.get(&field.suffix) == Some(&field.value))
}
