#![allow(dead_code)]

use aristotle_dom::{config::FormsetConfig, manager::FormsetManager};
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlInputElement};

static mut LOG_INITIALIZED: bool = false;

pub fn document() -> Document {
	unsafe {
		if !LOG_INITIALIZED {
			//TODO: Fail on Warning or Error.
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}
	window().unwrap().document().unwrap()
}

pub fn row_html(index: &str, id: &str, value: &str, meaning: &str) -> String {
	format!(
		r#"<tr class="moveablerow">
			<td><span class="grabber">&#8597;</span></td>
			<td>
				<input type="hidden" name="form-{i}-id" id="id_form-{i}-id" value="{id}">
				<input type="hidden" name="form-{i}-order" id="id_form-{i}-order" value="{i}">
			</td>
			<td><label for="id_form-{i}-value">Value</label><input type="text" name="form-{i}-value" id="id_form-{i}-value" value="{value}"></td>
			<td><input type="text" name="form-{i}-meaning" id="id_form-{i}-meaning" value="{meaning}"></td>
			<td>
				<input type="radio" name="form-{i}-kind" value="a" checked>
				<input type="radio" name="form-{i}-kind" value="b">
			</td>
			<td><input type="checkbox" name="form-{i}-active" id="id_form-{i}-active" checked></td>
			<td><input type="checkbox" name="form-{i}-DELETE" id="id_form-{i}-DELETE"></td>
		</tr>"#,
		i = index,
		id = id,
		value = value,
		meaning = meaning,
	)
}

/// Replaces the page body with a formset of the given `(id, value, meaning)` rows.
pub fn formset(rows: &[(&str, &str, &str)]) -> FormsetManager {
	let document = document();
	let body = document.body().unwrap();
	let rows_html: String = rows.iter().enumerate().map(|(i, (id, value, meaning))| row_html(&i.to_string(), id, value, meaning)).collect();
	let template = row_html("__prefix__", "", "", "").replace(
		"<td><span class=\"grabber\">",
		"<td><span class=\"select2-container\">decoration</span><span class=\"grabber\">",
	);
	body.set_inner_html(&format!(
		r#"<form id="fixture-form" action="javascript:void(0)">
			<input type="hidden" name="form-TOTAL_FORMS" value="{total}">
			<input type="hidden" name="form-INITIAL_FORMS" value="{total}">
			<table><tbody id="draggableTable">{rows}</tbody></table>
			<button type="button" data-formset-add>Add</button>
		</form>
		<table id="formstage" hidden><tbody>{template}</tbody></table>"#,
		total = rows.len(),
		rows = rows_html,
		template = template,
	));
	FormsetManager::attach(&document, FormsetConfig::default()).expect("fixture formset")
}

pub fn input(root: &Element, name: &str) -> HtmlInputElement {
	root.query_selector(&format!("input[name=\"{}\"]", name)).unwrap().unwrap_or_else(|| panic!("no input named {}", name)).dyn_into().unwrap()
}

/// The value of each row's `suffix` field, in row order. Checkboxes read as `"on"` or `""`.
pub fn column(manager: &FormsetManager, suffix: &str) -> Vec<String> {
	manager
		.rows()
		.iter()
		.map(|row| {
			let input: HtmlInputElement = row.query_selector(&format!("input[name$=\"-{}\"]", suffix)).unwrap().unwrap().dyn_into().unwrap();
			if input.type_() == "checkbox" {
				if input.checked() { "on".to_owned() } else { String::new() }
			} else {
				input.value()
			}
		})
		.collect()
}

/// The checked `kind` radio button's value in each row, or `""`.
pub fn kinds(manager: &FormsetManager) -> Vec<String> {
	manager
		.rows()
		.iter()
		.map(|row| {
			row.query_selector("input[name$=\"-kind\"]:checked")
				.unwrap()
				.map(|input| input.dyn_into::<HtmlInputElement>().unwrap().value())
				.unwrap_or_default()
		})
		.collect()
}

/// Picks the `kind` radio button with `value` in `row`.
pub fn choose_kind(row: &Element, value: &str) {
	let radio: HtmlInputElement = row.query_selector(&format!("input[name$=\"-kind\"][value=\"{}\"]", value)).unwrap().unwrap().dyn_into().unwrap();
	radio.set_checked(true);
}

/// Every control name in the formset, in document order. A radio group counts once.
pub fn names(manager: &FormsetManager) -> Vec<String> {
	let nodes = manager.container().query_selector_all("input").unwrap();
	let mut names: Vec<String> = (0..nodes.length()).map(|i| nodes.item(i).unwrap().dyn_into::<HtmlInputElement>().unwrap().name()).collect();
	names.dedup();
	names
}

pub fn total_forms(manager: &FormsetManager) -> String {
	manager.total_forms_input().unwrap().value()
}
