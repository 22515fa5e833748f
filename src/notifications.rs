//! The notification menu: polls the unread list and renders a bounded menu of it.

use crate::{
	config::NotificationConfig,
	dom,
	loading::LoadingIndicator,
	request::{fetch_json, Request},
};
use core::cell::RefCell;
use serde::Deserialize;
use std::rc::Rc;
use tracing::{info, instrument, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{AddEventListenerOptions, Document, Element};

/// One unread notification, as the unread-list endpoint reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Notification {
	pub id: u64,
	#[serde(default)]
	pub actor: String,
	pub verb: String,
	#[serde(default)]
	pub target: Option<String>,
	#[serde(default)]
	pub timestamp: Option<String>,
}
impl Notification {
	/// "actor verb target", skipping absent parts.
	#[must_use]
	pub fn text(&self) -> String {
		[Some(self.actor.as_str()), Some(self.verb.as_str()), self.target.as_deref()]
			.iter()
			.flatten()
			.filter(|part| !part.is_empty())
			.copied()
			.collect::<Vec<_>>()
			.join(" ")
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnreadList {
	pub unread_count: usize,
	#[serde(default)]
	pub unread_list: Vec<Notification>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
	Notification { text: String, id: u64 },
	Empty,
	Reconnect,
}

/// At most `limit` entries for `list`, or [`MenuEntry::Empty`].
#[must_use]
pub fn menu_entries(list: &UnreadList, limit: usize) -> Vec<MenuEntry> {
	if list.unread_list.is_empty() {
		return vec![MenuEntry::Empty];
	}
	list.unread_list
		.iter()
		.take(limit)
		.map(|notification| MenuEntry::Notification {
			text: notification.text(),
			id: notification.id,
		})
		.collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
	Polling,
	/// Too many consecutive failures: polling has stopped until the user reconnects.
	Disconnected,
}

/// Consecutive-failure bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
	failures: u32,
	max_failures: u32,
}
impl FeedState {
	#[must_use]
	pub fn new(max_failures: u32) -> Self {
		Self { failures: 0, max_failures }
	}

	pub fn record_success(&mut self) -> FeedStatus {
		self.failures = 0;
		FeedStatus::Polling
	}

	pub fn record_failure(&mut self) -> FeedStatus {
		self.failures = self.failures.saturating_add(1);
		self.status()
	}

	#[must_use]
	pub fn status(&self) -> FeedStatus {
		if self.failures >= self.max_failures {
			FeedStatus::Disconnected
		} else {
			FeedStatus::Polling
		}
	}

	#[must_use]
	pub fn failures(&self) -> u32 {
		self.failures
	}

	pub fn reconnect(&mut self) {
		self.failures = 0;
	}
}

struct Feed {
	config: NotificationConfig,
	document: Document,
	menu: Element,
	indicator: LoadingIndicator,
	state: RefCell<FeedState>,
	interval: RefCell<Option<(i32, Closure<dyn FnMut()>)>>,
}

/// A running notification feed. Polling stops when it's dropped.
#[derive(Clone)]
pub struct NotificationFeed(Rc<Feed>);
impl core::fmt::Debug for NotificationFeed {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("NotificationFeed").field("config", &self.0.config).field("state", &self.0.state).finish()
	}
}
impl NotificationFeed {
	/// Starts polling if the page has a notification menu.
	#[must_use]
	#[instrument(skip(document, indicator))]
	pub fn start(document: &Document, config: NotificationConfig, indicator: LoadingIndicator) -> Option<Self> {
		let feed = Self::new(document, config, indicator)?;
		feed.poll();
		feed.schedule();
		info!("Notification feed started.");
		Some(feed)
	}

	/// A feed for the page's notification menu that doesn't poll by itself.
	#[must_use]
	pub fn new(document: &Document, config: NotificationConfig, indicator: LoadingIndicator) -> Option<Self> {
		let menu = dom::query(document, &config.menu)?;
		Some(Self(Rc::new(Feed {
			state: RefCell::new(FeedState::new(config.max_failures)),
			config,
			document: document.clone(),
			menu,
			indicator,
			interval: RefCell::new(None),
		})))
	}

	#[must_use]
	pub fn failures(&self) -> u32 {
		self.0.state.borrow().failures()
	}

	#[must_use]
	pub fn is_scheduled(&self) -> bool {
		self.0.interval.borrow().is_some()
	}

	#[must_use]
	pub fn status(&self) -> FeedStatus {
		self.0.state.borrow().status()
	}

	/// Issues one request. Responses are not serialised against each other.
	pub fn poll(&self) {
		let feed = self.clone();
		wasm_bindgen_futures::spawn_local(async move {
			let result = fetch_json::<UnreadList>(Request::quiet(&feed.0.config.endpoint), &feed.0.indicator).await;
			feed.receive(result);
		});
	}

	/// Applies one poll result to the badge, the menu and the failure count.
	pub fn receive(&self, result: Result<UnreadList, crate::request::RequestError>) {
		match result {
			Ok(list) => {
				self.0.state.borrow_mut().record_success();
				self.render_badge(list.unread_count);
				self.render(&menu_entries(&list, self.0.config.limit));
			}
			Err(error) => {
				let status = self.0.state.borrow_mut().record_failure();
				warn!(failures = self.0.state.borrow().failures(), "Notification poll failed: {}", error);
				if status == FeedStatus::Disconnected {
					self.stop();
					self.render(&[MenuEntry::Reconnect]);
				}
			}
		}
	}

	fn schedule(&self) {
		let window = match web_sys::window() {
			Some(window) => window,
			None => return,
		};
		let weak = Rc::downgrade(&self.0);
		let tick = Closure::wrap(Box::new(move || {
			if let Some(feed) = weak.upgrade() {
				NotificationFeed(feed).poll();
			}
		}) as Box<dyn FnMut()>);
		match window.set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), self.0.config.interval_ms) {
			Ok(handle) => *self.0.interval.borrow_mut() = Some((handle, tick)),
			Err(error) => tracing::error!("Failed to schedule notification polling: {:?}", error),
		}
	}

	fn stop(&self) {
		if let Some((handle, _tick)) = self.0.interval.borrow_mut().take() {
			if let Some(window) = web_sys::window() {
				window.clear_interval_with_handle(handle);
			}
			info!("Notification polling stopped.");
		}
	}

	/// Resets the failure count and resumes polling.
	pub fn reconnect(&self) {
		self.0.state.borrow_mut().reconnect();
		self.stop();
		self.poll();
		self.schedule();
	}

	fn render_badge(&self, count: usize) {
		for badge in dom::query_all(&self.0.document, &self.0.config.badge) {
			let text = if count == 0 { String::new() } else { count.to_string() };
			badge.set_text_content(Some(&text));
		}
	}

	fn render(&self, entries: &[MenuEntry]) {
		let menu = &self.0.menu;
		menu.set_inner_html("");
		for entry in entries {
			let item = match self.0.document.create_element("li") {
				Ok(item) => item,
				Err(error) => {
					tracing::error!("Failed to create a menu entry: {:?}", error);
					return;
				}
			};
			match entry {
				MenuEntry::Notification { text, id } => {
					item.set_text_content(Some(text));
					dom::set_attribute(&item, "data-notification-id", &id.to_string());
				}
				MenuEntry::Empty => item.set_text_content(Some(&self.0.config.empty_text)),
				MenuEntry::Reconnect => {
					item.set_text_content(Some(&self.0.config.reconnect_text));
					dom::add_class(&item, "notify-reconnect");
					let weak = Rc::downgrade(&self.0);
					let click = Closure::once_into_js(move || {
						if let Some(feed) = weak.upgrade() {
							NotificationFeed(feed).reconnect();
						}
					});
					let mut options = AddEventListenerOptions::new();
					options.once(true);
					if let Err(error) = item.add_event_listener_with_callback_and_add_event_listener_options("click", click.unchecked_ref(), &options) {
						tracing::error!("Failed to bind the reconnect entry: {:?}", error);
					}
				}
			}
			if let Err(error) = menu.append_child(&item) {
				tracing::error!("Failed to append a menu entry: {:?}", error);
			}
		}
	}
}
impl Drop for Feed {
	fn drop(&mut self) {
		if let Some((handle, _)) = self.interval.get_mut().take() {
			if let Some(window) = web_sys::window() {
				window.clear_interval_with_handle(handle);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn list(count: usize) -> UnreadList {
		UnreadList {
			unread_count: count,
			unread_list: (0..count as u64)
				.map(|id| Notification {
					id,
					actor: "admin".to_owned(),
					verb: "changed".to_owned(),
					target: Some(format!("Item {}", id)),
					timestamp: None,
				})
				.collect(),
		}
	}

	#[test]
	fn decodes_unread_list() {
		let list: UnreadList = serde_json::from_str(
			r#"{"unread_count": 1, "unread_list": [{"id": 7, "actor": "Bob", "verb": "commented on", "target": "Person-sex", "timestamp": "2016-10-16T23:09:00Z", "unread": true}]}"#,
		)
		.unwrap();
		assert_eq!(list.unread_count, 1);
		assert_eq!(list.unread_list[0].text(), "Bob commented on Person-sex");
	}

	#[test]
	fn menu_is_bounded() {
		let entries = menu_entries(&list(8), 5);
		assert_eq!(entries.len(), 5);
		assert_eq!(
			entries[0],
			MenuEntry::Notification {
				text: "admin changed Item 0".to_owned(),
				id: 0
			}
		);
	}

	#[test]
	fn empty_menu() {
		assert_eq!(menu_entries(&list(0), 5), vec![MenuEntry::Empty]);
	}

	#[test]
	fn disconnects_after_consecutive_failures() {
		let mut state = FeedState::new(3);
		assert_eq!(state.record_failure(), FeedStatus::Polling);
		assert_eq!(state.record_failure(), FeedStatus::Polling);
		assert_eq!(state.record_success(), FeedStatus::Polling);
		assert_eq!(state.record_failure(), FeedStatus::Polling);
		assert_eq!(state.record_failure(), FeedStatus::Polling);
		assert_eq!(state.record_failure(), FeedStatus::Disconnected);
		state.reconnect();
		assert_eq!(state.status(), FeedStatus::Polling);
		assert_eq!(state.failures(), 0);
	}

	#[test]
	fn text_skips_missing_parts() {
		let notification = Notification {
			id: 1,
			actor: String::new(),
			verb: "was published".to_owned(),
			target: None,
			timestamp: None,
		};
		assert_eq!(notification.text(), "was published");
	}
}
