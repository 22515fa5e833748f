use crate::{
	config::FormsetConfig,
	control::Control,
	dom,
	listeners::ListenerSet,
	load::load_row,
	name::{element_id, is_delete, is_id, is_ordinal, total_forms_name, FieldName},
	row::is_untouched,
};
use std::rc::Rc;
use tracing::{debug, error, info, instrument, trace, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, Node};

/// The interactions a formset reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormsetEvent {
	AddClicked,
	DragDropped,
	FormSubmitting,
}

/// Keeps a server-rendered Django formset's rows consistent with its `prefix-index-suffix` naming while rows are added, removed and dragged around.
///
/// The manager holds no row state of its own: every operation re-reads the DOM, so calling them redundantly is always safe.
/// Clones share the same elements.
#[derive(Debug, Clone)]
pub struct FormsetManager {
	config: Rc<FormsetConfig>,
	prefix: Rc<str>,
	container: Element,
	template: Element,
}
impl FormsetManager {
	/// Attaches to the container named by `config`.
	///
	/// Returns [`None`] (and logs why) if the page lacks the container or template,
	/// or if no prefix is configured and none can be inferred from the template.
	#[must_use]
	#[instrument(skip(document))]
	pub fn attach(document: &Document, config: FormsetConfig) -> Option<Self> {
		match dom::query(document, &config.container) {
			Some(container) => Self::attach_to(document, container, config),
			None => {
				debug!("No formset container on this page.");
				None
			}
		}
	}

	#[must_use]
	#[instrument(skip(document, container))]
	pub fn attach_to(document: &Document, container: Element, config: FormsetConfig) -> Option<Self> {
		let config = config.with_overrides_from(&container);
		let template = match dom::query(document, &config.template) {
			Some(template) => template,
			None => {
				warn!("Formset template {:?} not found.", config.template);
				return None;
			}
		};
		let container_node: &Node = container.as_ref();
		if container_node.contains(Some(template.as_ref())) {
			error!("The formset template {:?} must not be part of the container {:?}.", config.template, config.container);
			return None;
		}

		let prefix = match config.prefix.clone().or_else(|| infer_prefix(&template)) {
			Some(prefix) => prefix,
			None => {
				warn!("Couldn't infer the formset prefix from the template's field names.");
				return None;
			}
		};

		info!(%prefix, "Attached formset manager.");
		Some(Self {
			config: Rc::new(config),
			prefix: prefix.into(),
			container,
			template,
		})
	}

	#[must_use]
	pub fn config(&self) -> &FormsetConfig {
		&self.config
	}

	#[must_use]
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	#[must_use]
	pub fn container(&self) -> &Element {
		&self.container
	}

	#[must_use]
	pub fn template(&self) -> &Element {
		&self.template
	}

	/// The live rows, in their current visual order.
	#[must_use]
	pub fn rows(&self) -> Vec<Element> {
		dom::query_all(&self.container, &self.config.row)
	}

	/// The management form's `TOTAL_FORMS` input, looked up in the owning form first.
	#[must_use]
	pub fn total_forms_input(&self) -> Option<HtmlInputElement> {
		let selector = format!("input[name=\"{}\"]", total_forms_name(&self.prefix));
		let found = match self.form() {
			Some(form) => dom::query(&form, &selector),
			None => None,
		};
		found
			.or_else(|| self.container.owner_document().and_then(|document| dom::query(&document, &selector)))
			.and_then(|element| element.dyn_into().ok())
	}

	/// The form the container is submitted with.
	#[must_use]
	pub fn form(&self) -> Option<Element> {
		self.container.closest("form").unwrap_or_else(|error| {
			error!("Failed to look up the owning form: {:?}", error);
			None
		})
	}

	pub fn handle(&self, event: FormsetEvent) {
		let span = tracing::trace_span!("FormsetManager::handle", ?event, prefix = %self.prefix);
		let _enter = span.enter();
		match event {
			FormsetEvent::AddClicked => {
				self.add_row();
			}
			FormsetEvent::DragDropped => self.reorder(),
			FormsetEvent::FormSubmitting => {
				self.normalize_on_submit();
			}
		}
	}

	/// Stamps out a new row from the template and appends it.
	///
	/// The new row keeps the template's defaults, but never its id or delete flag,
	/// and loses any enhanced-widget decoration so the widget can be initialised afresh.
	#[instrument(skip(self), fields(prefix = %self.prefix))]
	pub fn add_row(&self) -> Option<Element> {
		let row: Element = match self.template.clone_node_with_deep(true).map(|node| node.dyn_into::<Element>()) {
			Ok(Ok(row)) => row,
			Ok(Err(node)) => {
				error!("Formset template cloned into a non-element: {:?}", node);
				return None;
			}
			Err(error) => {
				error!("Failed to clone the formset template: {:?}", error);
				return None;
			}
		};

		dom::remove_attribute(&row, "id");
		if let Some(class) = simple_class(&self.config.row) {
			dom::add_class(&row, class);
		}
		self.strip_decoration(&row);
		for control in Control::all_in(&row) {
			let name = control.name();
			match FieldName::parse(&name) {
				Some(field_name) if is_id(field_name.suffix) => control.set_text(""),
				Some(field_name) if is_delete(field_name.suffix) => control.clear(),
				_ => (),
			}
		}

		if let Err(error) = self.container.append_child(&row) {
			error!("Failed to append the new row: {:?}", error);
			return None;
		}
		self.reorder();
		debug!(rows = self.rows().len(), "Added row.");
		Some(row)
	}

	/// Removes `row` from the formset outright. Rows that aren't part of this formset are ignored.
	#[instrument(skip(self, row), fields(prefix = %self.prefix))]
	pub fn remove_row(&self, row: &Element) {
		let container: &Node = self.container.as_ref();
		if !container.contains(Some(row.as_ref())) {
			warn!("Ignoring removal of a row outside the formset.");
			return;
		}
		row.remove();
		self.reorder();
	}

	/// Renumbers every row from its current position: ordinal values, field names, matching element ids and `<label for>` targets.
	/// Also refreshes the `TOTAL_FORMS` count.
	///
	/// Checkable states are restored afterwards, since renaming a radio button into a group where another button is checked would uncheck one of them.
	#[instrument(skip(self), fields(prefix = %self.prefix))]
	pub fn reorder(&self) {
		let rows = self.rows();
		let controls: Vec<Vec<Control>> = rows.iter().map(Control::all_in).collect();
		let checked: Vec<(Control, bool)> = controls
			.iter()
			.flatten()
			.filter(|control| control.is_checkable())
			.map(|control| (control.clone(), control.is_checked()))
			.collect();

		for (index, (row, controls)) in rows.iter().zip(&controls).enumerate() {
			for control in controls {
				renumber_control(control, index);
			}
			renumber_labels(row, index);
		}
		for (control, state) in checked {
			control.set_checked(state);
		}
		self.sync_total_forms(rows.len());
		trace!(rows = rows.len(), "Renumbered rows.");
	}

	fn sync_total_forms(&self, count: usize) {
		match self.total_forms_input() {
			Some(input) => input.set_value(&count.to_string()),
			None => warn!("No {} input found.", total_forms_name(&self.prefix)),
		}
	}

	/// Flags every new row the user left as the template had it for deletion, and clears its values.
	/// Returns how many rows were flagged.
	///
	/// Rows with an id are persisted and never flagged.
	/// This never cancels the submission it runs in.
	#[instrument(skip(self), fields(prefix = %self.prefix))]
	pub fn normalize_on_submit(&self) -> usize {
		let template = load_row(&self.template);
		let mut flagged = 0;
		for (index, row_element) in self.rows().iter().enumerate() {
			let row = load_row(row_element);
			#[cfg(feature = "dangerous-logging")]
			trace!(index, ?row, "Checking row.");
			#[cfg(not(feature = "dangerous-logging"))]
			trace!(index, fields = ?crate::load::describe(&row), "Checking row.");

			if !row.is_new() || !is_untouched(&row, &template) {
				continue;
			}

			let mut has_delete_flag = false;
			for control in Control::all_in(row_element) {
				let name = control.name();
				match FieldName::parse(&name) {
					Some(field_name) if is_delete(field_name.suffix) => {
						control.raise_flag();
						has_delete_flag = true;
					}
					Some(_) => control.clear(),
					None => (),
				}
			}
			if !has_delete_flag {
				warn!(index, "Untouched row has no DELETE field; it was cleared but will still be submitted.");
			}
			flagged += 1;
		}
		if flagged > 0 {
			debug!(flagged, "Flagged untouched rows for deletion.");
		}
		flagged
	}

	/// Binds the add controls, the owning form's submission and drag reordering.
	#[must_use = "dropping the set removes the listeners again"]
	pub fn bind(&self) -> ListenerSet {
		let mut listeners = ListenerSet::new();

		if let Some(document) = self.container.owner_document() {
			for add_control in dom::query_all(&document, &self.config.add_control) {
				let manager = self.clone();
				listeners.listen(add_control.as_ref(), "click", move |event| {
					event.prevent_default();
					manager.handle(FormsetEvent::AddClicked);
				});
			}
		}

		match self.form() {
			Some(form) => {
				let manager = self.clone();
				listeners.listen(form.as_ref(), "submit", move |_| manager.handle(FormsetEvent::FormSubmitting));
			}
			None => warn!("Formset container isn't inside a form; untouched rows won't be normalised."),
		}

		crate::drag::bind(self, &mut listeners);
		listeners
	}

	fn strip_decoration(&self, row: &Element) {
		for decoration in dom::query_all(row, &self.config.decoration) {
			decoration.remove();
		}
		for decorated in dom::query_all(row, "[data-select2-id]") {
			dom::remove_attribute(&decorated, "data-select2-id");
		}
		for hidden in dom::query_all(row, ".select2-hidden-accessible") {
			dom::remove_class(&hidden, "select2-hidden-accessible");
			dom::remove_attribute(&hidden, "aria-hidden");
		}
	}
}

/// `moveablerow` for `.moveablerow`, [`None`] for anything more complex.
fn simple_class(selector: &str) -> Option<&str> {
	selector
		.strip_prefix('.')
		.filter(|class| !class.is_empty() && class.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'))
}

fn infer_prefix(template: &Element) -> Option<String> {
	Control::all_in(template).iter().find_map(|control| FieldName::parse(&control.name()).map(|field_name| field_name.prefix.to_owned()))
}

fn renumber_control(control: &Control, index: usize) {
	let name = control.name();
	let field_name = match FieldName::parse(&name) {
		Some(field_name) => field_name,
		None => return,
	};
	let renamed = field_name.with_index(index);
	let element = control.element();
	if element.id() == element_id(&name) {
		element.set_id(&element_id(&renamed));
	}
	control.set_name(&renamed);

	if is_ordinal(field_name.suffix) {
		control.set_text(&index.to_string());
	}
	if is_delete(field_name.suffix) {
		dom::set_attribute(element, "title", &format!("Delete item {}", index));
	}
}

fn renumber_labels(row: &Element, index: usize) {
	for label in dom::query_all(row, "label[for]") {
		let target = match label.get_attribute("for") {
			Some(target) => target,
			None => continue,
		};
		let renamed = match target.strip_prefix("id_").and_then(FieldName::parse) {
			Some(field_name) => element_id(&field_name.with_index(index)),
			None => continue,
		};
		dom::set_attribute(&label, "for", &renamed);
	}
}
