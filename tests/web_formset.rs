#![cfg(target_arch = "wasm32")]

use aristotle_dom::manager::FormsetEvent;
use std::collections::HashSet;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

mod web_fixture_;
use web_fixture_::{choose_kind, column, formset, input, kinds, names, total_forms};

#[wasm_bindgen_test]
fn add_row_after_two() {
	let manager = formset(&[("1", "M", "Male"), ("2", "F", "Female")]);

	let row = manager.add_row().unwrap();

	assert_eq!(manager.rows().len(), 3);
	assert_eq!(column(&manager, "order"), vec!["0", "1", "2"]);
	assert_eq!(total_forms(&manager), "3");
	assert_eq!(input(&row, "form-2-value").id(), "id_form-2-value");
	assert_eq!(input(&row, "form-2-id").value(), "");
	assert!(row.query_selector(".select2-container").unwrap().is_none());
	assert!(!row.has_attribute("id"));
}

#[wasm_bindgen_test]
fn adding_to_an_empty_formset() {
	let manager = formset(&[]);
	assert_eq!(total_forms(&manager), "0");

	manager.handle(FormsetEvent::AddClicked);
	manager.handle(FormsetEvent::AddClicked);

	assert_eq!(column(&manager, "order"), vec!["0", "1"]);
	assert_eq!(total_forms(&manager), "2");
	assert!(names(&manager).iter().all(|name| !name.contains("__prefix__")));
}

#[wasm_bindgen_test]
fn reorder_after_moving_c_to_front() {
	let manager = formset(&[("1", "A", "a"), ("2", "B", "b"), ("3", "C", "c")]);
	let rows = manager.rows();
	manager.container().insert_before(rows[2].as_ref(), Some(rows[0].as_ref())).unwrap();

	manager.handle(FormsetEvent::DragDropped);

	assert_eq!(column(&manager, "value"), vec!["C", "A", "B"]);
	assert_eq!(column(&manager, "order"), vec!["0", "1", "2"]);
	assert_eq!(column(&manager, "id"), vec!["3", "1", "2"]);

	let rows = manager.rows();
	assert_eq!(input(&rows[0], "form-0-value").value(), "C");
	assert_eq!(input(&rows[0], "form-0-value").id(), "id_form-0-value");
	assert_eq!(rows[0].query_selector("label").unwrap().unwrap().get_attribute("for").as_deref(), Some("id_form-0-value"));
	assert_eq!(input(&rows[1], "form-1-DELETE").title(), "Delete item 1");

	assert_eq!(kinds(&manager), vec!["a", "a", "a"]);
	assert_unique_names(&manager);
}

fn assert_unique_names(manager: &aristotle_dom::manager::FormsetManager) {
	let all = names(manager);
	let unique: HashSet<_> = all.iter().collect();
	assert_eq!(unique.len(), all.len(), "{:?}", all);
}

fn assert_consistent(manager: &aristotle_dom::manager::FormsetManager) {
	let count = manager.rows().len();
	let expected: Vec<String> = (0..count).map(|index| index.to_string()).collect();
	assert_eq!(column(manager, "order"), expected);
	assert_eq!(total_forms(manager), count.to_string());
	assert_unique_names(manager);
}

#[wasm_bindgen_test]
fn ordinals_hold_through_mixed_operations() {
	let manager = formset(&[("1", "A", "a"), ("2", "B", "b")]);
	assert_consistent(&manager);

	manager.add_row().unwrap();
	assert_consistent(&manager);

	let rows = manager.rows();
	manager.container().insert_before(rows[2].as_ref(), Some(rows[0].as_ref())).unwrap();
	manager.handle(FormsetEvent::DragDropped);
	assert_consistent(&manager);
	assert_eq!(column(&manager, "value"), vec!["", "A", "B"]);

	manager.add_row().unwrap();
	manager.remove_row(&manager.rows()[1]);
	assert_consistent(&manager);
	assert_eq!(column(&manager, "value"), vec!["", "B", ""]);
	assert_eq!(column(&manager, "id"), vec!["", "2", ""]);
}

#[wasm_bindgen_test]
fn new_rows_never_inherit_an_id() {
	let manager = formset(&[]);
	input(manager.template(), "form-__prefix__-id").set_value("99");
	input(manager.template(), "form-__prefix__-DELETE").set_checked(true);

	let row = manager.add_row().unwrap();

	assert_eq!(input(&row, "form-0-id").value(), "");
	assert!(!input(&row, "form-0-DELETE").checked());
}

#[wasm_bindgen_test]
fn reorder_is_idempotent() {
	let manager = formset(&[("1", "A", "a"), ("2", "B", "b")]);
	manager.reorder();
	let before = names(&manager);
	manager.reorder();
	manager.reorder();
	assert_eq!(names(&manager), before);
	assert_eq!(column(&manager, "order"), vec!["0", "1"]);
}

#[wasm_bindgen_test]
fn remove_row_renumbers() {
	let manager = formset(&[("1", "A", "a"), ("2", "B", "b"), ("3", "C", "c")]);
	manager.remove_row(&manager.rows()[0]);
	assert_eq!(column(&manager, "value"), vec!["B", "C"]);
	assert_eq!(column(&manager, "order"), vec!["0", "1"]);
	assert_eq!(total_forms(&manager), "2");
}

#[wasm_bindgen_test]
fn blank_new_row_is_flagged() {
	let manager = formset(&[("1", "A", "a")]);
	let row = manager.add_row().unwrap();

	assert_eq!(manager.normalize_on_submit(), 1);

	assert!(input(&row, "form-1-DELETE").checked());
	for suffix in &["id", "order", "value", "meaning"] {
		assert_eq!(input(&row, &format!("form-1-{}", suffix)).value(), "", "{}", suffix);
	}
	assert!(!input(&row, "form-1-active").checked());
	assert_eq!(kinds(&manager), vec!["a", ""]);
	assert_eq!(column(&manager, "DELETE"), vec!["", "on"]);
	assert_eq!(column(&manager, "value"), vec!["A", ""]);
}

#[wasm_bindgen_test]
fn edited_new_row_is_kept() {
	let manager = formset(&[]);
	let kept = manager.add_row().unwrap();
	let blank = manager.add_row().unwrap();
	input(&kept, "form-0-meaning").set_value("Unknown");

	assert_eq!(manager.normalize_on_submit(), 1);

	assert!(!input(&kept, "form-0-DELETE").checked());
	assert_eq!(input(&kept, "form-0-meaning").value(), "Unknown");
	assert_eq!(input(&kept, "form-0-order").value(), "0");
	assert!(input(&blank, "form-1-DELETE").checked());
}

#[wasm_bindgen_test]
fn persisted_rows_are_never_flagged() {
	let manager = formset(&[("7", "", "")]);
	assert_eq!(manager.normalize_on_submit(), 0);
	assert_eq!(column(&manager, "DELETE"), vec![""]);
	assert_eq!(column(&manager, "id"), vec!["7"]);
}

#[wasm_bindgen_test]
fn only_blank_rows_of_several_are_flagged() {
	let manager = formset(&[]);
	for _ in 0..3 {
		manager.add_row().unwrap();
	}
	input(&manager.rows()[1], "form-1-value").set_value("X");

	assert_eq!(manager.normalize_on_submit(), 2);
	assert_eq!(column(&manager, "DELETE"), vec!["on", "", "on"]);
	assert_eq!(column(&manager, "value"), vec!["", "X", ""]);
}

#[wasm_bindgen_test]
fn changed_radio_choice_is_kept() {
	let manager = formset(&[]);
	let chosen = manager.add_row().unwrap();
	manager.add_row().unwrap();
	choose_kind(&chosen, "b");
	assert_eq!(kinds(&manager), vec!["b", "a"]);

	assert_eq!(manager.normalize_on_submit(), 1);

	assert_eq!(column(&manager, "DELETE"), vec!["", "on"]);
	assert_eq!(kinds(&manager), vec!["b", ""]);
	assert_eq!(column(&manager, "active"), vec!["on", ""]);
}

#[wasm_bindgen_test]
fn radio_choices_survive_reordering() {
	let manager = formset(&[("1", "A", "a"), ("2", "B", "b"), ("3", "C", "c")]);
	let rows = manager.rows();
	choose_kind(&rows[0], "b");
	manager.container().insert_before(rows[2].as_ref(), Some(rows[0].as_ref())).unwrap();

	manager.reorder();

	assert_eq!(column(&manager, "value"), vec!["C", "A", "B"]);
	assert_eq!(kinds(&manager), vec!["a", "b", "a"]);
}
