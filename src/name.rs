//! Django formset field names: `prefix-index-suffix`.

use core::fmt::{self, Display, Formatter};

/// The marker Django renders into the `empty_form` that new rows are stamped from.
pub const PLACEHOLDER: &str = "__prefix__";

pub const ID_SUFFIX: &str = "id";
pub const DELETE_SUFFIX: &str = "DELETE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormIndex {
	Number(usize),
	Placeholder,
}
impl Display for FormIndex {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			FormIndex::Number(index) => index.fmt(f),
			FormIndex::Placeholder => f.write_str(PLACEHOLDER),
		}
	}
}

/// A parsed field name.
///
/// The name is split at its **last two** dashes, so prefixes may themselves contain dashes
/// while suffixes (Django field names) may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldName<'a> {
	pub prefix: &'a str,
	pub index: FormIndex,
	pub suffix: &'a str,
}
impl<'a> FieldName<'a> {
	/// Returns [`None`] for names that don't follow the convention, like the management form's `form-TOTAL_FORMS`.
	#[must_use]
	pub fn parse(name: &'a str) -> Option<Self> {
		let (rest, suffix) = name.rsplit_once('-')?;
		let (prefix, index) = rest.rsplit_once('-')?;
		if prefix.is_empty() || suffix.is_empty() {
			return None;
		}
		let index = if index == PLACEHOLDER {
			FormIndex::Placeholder
		} else if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
			FormIndex::Number(index.parse().ok()?)
		} else {
			return None;
		};
		Some(Self { prefix, index, suffix })
	}

	#[must_use]
	pub fn with_index(&self, index: usize) -> String {
		format!("{}-{}-{}", self.prefix, index, self.suffix)
	}
}
impl Display for FieldName<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}-{}", self.prefix, self.index, self.suffix)
	}
}

/// The element id Django renders for a field name.
#[must_use]
pub fn element_id(name: &str) -> String {
	format!("id_{}", name)
}

#[must_use]
pub fn total_forms_name(prefix: &str) -> String {
	format!("{}-TOTAL_FORMS", prefix)
}

/// Administrative fields are named in upper case (`ORDER`, `DELETE`).
#[must_use]
pub fn is_reserved(suffix: &str) -> bool {
	suffix.bytes().any(|b| b.is_ascii_uppercase()) && !suffix.bytes().any(|b| b.is_ascii_lowercase())
}

#[must_use]
pub fn is_ordinal(suffix: &str) -> bool {
	suffix == "order" || suffix == "ORDER"
}

#[must_use]
pub fn is_delete(suffix: &str) -> bool {
	suffix == DELETE_SUFFIX
}

#[must_use]
pub fn is_id(suffix: &str) -> bool {
	suffix == ID_SUFFIX
}
