//! Builds [`Row`] snapshots from live row elements.

use crate::{
	control::Control,
	name::FieldName,
	row::{Field, Row},
};
use tracing::trace;
use web_sys::Element;

/// Snapshots every conventionally named control below `row_element`.
///
/// Controls whose names don't parse are skipped.
/// A radio group becomes one field holding the checked button's value.
#[must_use]
pub fn load_row(row_element: &Element) -> Row {
	let mut row = Row::new();
	for control in Control::all_in(row_element) {
		load_control(&control, &mut row);
	}
	row
}

pub fn load_control(control: &Control, row: &mut Row) {
	let name = control.name();
	let field_name = match FieldName::parse(&name) {
		Some(field_name) => field_name,
		None => {
			trace!("Skipping control named {:?}.", name);
			return;
		}
	};
	let value = control.value();
	match row.get(field_name.suffix) {
		Some(existing) if !existing.is_blank() => (),
		_ => row.set(field_name.suffix, value),
	}
}

/// Field suffixes in row order, for log records.
#[must_use]
pub fn describe(row: &Row) -> Vec<&str> {
	row.fields().iter().map(|Field { suffix, .. }| suffix.as_str()).collect()
}
