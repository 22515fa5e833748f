use crate::loading::LoadingIndicator;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// An outgoing request.
///
/// Whether it shows the loading indicator is decided per request, so background polling can stay quiet without affecting anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
	pub url: &'a str,
	pub indicate_loading: bool,
}
impl<'a> Request<'a> {
	#[must_use]
	pub fn new(url: &'a str) -> Self {
		Self { url, indicate_loading: true }
	}

	#[must_use]
	pub fn quiet(url: &'a str) -> Self {
		Self { url, indicate_loading: false }
	}
}

#[derive(Debug, Error)]
pub enum RequestError {
	#[error("no window to fetch from")]
	NoWindow,
	#[error("network error: {0}")]
	Network(String),
	#[error("HTTP status {0}")]
	Status(u16),
	#[error("invalid JSON: {0}")]
	Decode(#[from] serde_json::Error),
}

impl RequestError {
	fn network(error: &JsValue) -> Self {
		RequestError::Network(error.as_string().unwrap_or_else(|| format!("{:?}", error)))
	}
}

/// Fetches `request.url` and decodes its JSON body.
#[instrument(skip(indicator))]
pub async fn fetch_json<T: DeserializeOwned>(request: Request<'_>, indicator: &LoadingIndicator) -> Result<T, RequestError> {
	if request.indicate_loading {
		indicator.request_started();
	}
	let result = fetch_text(request.url).await;
	if request.indicate_loading {
		indicator.request_finished();
	}
	let text = result?;
	debug!(bytes = text.len(), "Received response.");
	Ok(serde_json::from_str(&text)?)
}

async fn fetch_text(url: &str) -> Result<String, RequestError> {
	let window = web_sys::window().ok_or(RequestError::NoWindow)?;
	let response = JsFuture::from(window.fetch_with_str(url)).await.map_err(|error| RequestError::network(&error))?;
	let response: Response = response.dyn_into().map_err(|error| RequestError::network(&error))?;
	if !response.ok() {
		return Err(RequestError::Status(response.status()));
	}
	let text = response.text().map_err(|error| RequestError::network(&error))?;
	let text = JsFuture::from(text).await.map_err(|error| RequestError::network(&error))?;
	Ok(text.as_string().unwrap_or_default())
}
