//! The session handle and its command surface.

use std::fmt;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use wd_protocol::{By, Capabilities, Cookie, ElementRef, LogMessage, LogType, Status, WireCookie};
use wd_runtime::{Error, Method, Result, Transport};

use crate::dialect::{Dialect, DialectCodec, KeyDirection, ScriptKind, TimeoutKind, codec_for};
use crate::element::WebElement;
use crate::session;

/// Default endpoint of a locally running Selenium server.
pub const DEFAULT_URL_PREFIX: &str = "http://127.0.0.1:4444/wd/hub";

/// A WebDriver session against a remote server.
///
/// Commands are issued one at a time: server-side session state (window
/// focus, active frame, pending alert) is ordering-sensitive, so a
/// handle is not meant to be shared across tasks. Independent sessions
/// run in parallel fine, including over a cloned [`Transport`].
///
/// Sessions are never torn down implicitly; call [`WebDriver::quit`]
/// when done, or the server keeps the browser alive.
pub struct WebDriver {
	transport: Transport,
	url_prefix: String,
	id: String,
	capabilities: Capabilities,
	codec: &'static dyn DialectCodec,
}

impl fmt::Debug for WebDriver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebDriver")
			.field("url_prefix", &self.url_prefix)
			.field("id", &self.id)
			.field("dialect", &self.codec.dialect())
			.finish_non_exhaustive()
	}
}

/// Reply wrapper for commands whose absence of a value is meaningful
/// (empty list, false, default struct).
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + Default"))]
struct ValueReply<T> {
	#[serde(default)]
	value: T,
}

/// Reply wrapper for commands that must carry a value.
#[derive(Deserialize)]
struct RequiredReply<T> {
	value: T,
}

pub(crate) fn value_of<T: DeserializeOwned + Default>(payload: &[u8]) -> Result<T> {
	Ok(serde_json::from_slice::<ValueReply<T>>(payload)?.value)
}

pub(crate) fn required_value<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
	Ok(serde_json::from_slice::<RequiredReply<T>>(payload)?.value)
}

impl WebDriver {
	/// Negotiates a new session against `url_prefix` (the default local
	/// Selenium endpoint when empty) and fixes the protocol dialect for
	/// the session's lifetime.
	pub async fn new_session(
		transport: Transport,
		url_prefix: &str,
		capabilities: Capabilities,
	) -> Result<Self> {
		let url_prefix = if url_prefix.is_empty() {
			DEFAULT_URL_PREFIX
		} else {
			url_prefix
		};
		let (id, dialect) = session::negotiate(&transport, url_prefix, &capabilities).await?;
		Ok(Self {
			transport,
			url_prefix: url_prefix.to_string(),
			id,
			capabilities,
			codec: codec_for(dialect),
		})
	}

	/// Dialect settled at session creation; never re-derived afterward.
	pub fn dialect(&self) -> Dialect {
		self.codec.dialect()
	}

	/// Server-assigned session identifier. Empty after [`Self::quit`].
	pub fn session_id(&self) -> &str {
		&self.id
	}

	/// Capabilities as requested at creation, not as granted.
	pub fn requested_capabilities(&self) -> &Capabilities {
		&self.capabilities
	}

	/// Re-targets the handle at an existing server-side session. The
	/// negotiated dialect carries over unchanged.
	pub fn switch_session(&mut self, session_id: impl Into<String>) {
		self.id = session_id.into();
	}

	pub(crate) fn codec(&self) -> &'static dyn DialectCodec {
		self.codec
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.url_prefix, path)
	}

	pub(crate) fn session_url(&self, path: &str) -> String {
		format!("{}/session/{}{}", self.url_prefix, self.id, path)
	}

	pub(crate) async fn execute(
		&self,
		method: Method,
		url: String,
		body: Option<Value>,
	) -> Result<Vec<u8>> {
		let body = body.map(|value| serde_json::to_vec(&value)).transpose()?;
		self.transport.execute(method, &url, body).await
	}

	pub(crate) async fn void_command(&self, path: &str, params: Value) -> Result<()> {
		self.execute(Method::POST, self.session_url(path), Some(params))
			.await?;
		Ok(())
	}

	pub(crate) async fn string_command(&self, path: &str) -> Result<String> {
		let payload = self.execute(Method::GET, self.session_url(path), None).await?;
		value_of::<Option<String>>(&payload)?.ok_or(Error::MissingValue)
	}

	pub(crate) async fn strings_command(&self, path: &str) -> Result<Vec<String>> {
		let payload = self.execute(Method::GET, self.session_url(path), None).await?;
		value_of(&payload)
	}

	pub(crate) async fn bool_command(&self, path: &str) -> Result<bool> {
		let payload = self.execute(Method::GET, self.session_url(path), None).await?;
		value_of(&payload)
	}

	// Session lifecycle.

	/// Server readiness and version information. Session-independent.
	pub async fn status(&self) -> Result<Status> {
		let payload = self.execute(Method::GET, self.url("/status"), None).await?;
		value_of(&payload)
	}

	/// Capabilities as the server reports them for this session.
	pub async fn capabilities(&self) -> Result<Capabilities> {
		let payload = self.execute(Method::GET, self.session_url(""), None).await?;
		value_of(&payload)
	}

	/// Terminates the session server-side and clears the local id;
	/// calling it again is a no-op.
	pub async fn quit(&mut self) -> Result<()> {
		if self.id.is_empty() {
			return Ok(());
		}
		self.execute(Method::DELETE, self.session_url(""), None).await?;
		self.id.clear();
		Ok(())
	}

	// Timeouts.

	/// Time the server waits for an asynchronous script to finish.
	pub async fn set_async_script_timeout(&self, timeout: Duration) -> Result<()> {
		self.set_timeout(TimeoutKind::Script, timeout).await
	}

	/// Time element lookups poll before reporting no match.
	pub async fn set_implicit_wait_timeout(&self, timeout: Duration) -> Result<()> {
		self.set_timeout(TimeoutKind::ImplicitWait, timeout).await
	}

	/// Time the server waits for a page load to complete.
	pub async fn set_page_load_timeout(&self, timeout: Duration) -> Result<()> {
		self.set_timeout(TimeoutKind::PageLoad, timeout).await
	}

	async fn set_timeout(&self, kind: TimeoutKind, timeout: Duration) -> Result<()> {
		let (path, body) = self.codec.timeout_request(kind, timeout.as_millis() as u64);
		self.void_command(path, body).await
	}

	// Navigation.

	/// Navigates the current window to `url`.
	pub async fn get(&self, url: &str) -> Result<()> {
		self.void_command("/url", json!({"url": url})).await
	}

	pub async fn current_url(&self) -> Result<String> {
		self.string_command("/url").await
	}

	pub async fn back(&self) -> Result<()> {
		self.void_command("/back", json!({})).await
	}

	pub async fn forward(&self) -> Result<()> {
		self.void_command("/forward", json!({})).await
	}

	pub async fn refresh(&self) -> Result<()> {
		self.void_command("/refresh", json!({})).await
	}

	pub async fn title(&self) -> Result<String> {
		self.string_command("/title").await
	}

	pub async fn page_source(&self) -> Result<String> {
		self.string_command("/source").await
	}

	// Element lookup.

	pub(crate) async fn find(
		&self,
		by: By,
		value: &str,
		plural: bool,
		root: Option<&ElementRef>,
	) -> Result<Vec<u8>> {
		let (using, value) = self.codec.locator(by, value);
		let suffix = if plural { "s" } else { "" };
		let path = match root {
			Some(parent) => format!("/element/{}/element{suffix}", parent.id()),
			None => format!("/element{suffix}"),
		};
		self.execute(
			Method::POST,
			self.session_url(&path),
			Some(json!({"using": using, "value": value})),
		)
		.await
	}

	/// Finds the first element matching the locator.
	pub async fn find_element(&self, by: By, value: &str) -> Result<WebElement<'_>> {
		let payload = self.find(by, value, false, None).await?;
		Ok(WebElement::new(self, self.codec.decode_element(&payload)?))
	}

	/// Finds every element matching the locator.
	pub async fn find_elements(&self, by: By, value: &str) -> Result<Vec<WebElement<'_>>> {
		let payload = self.find(by, value, true, None).await?;
		let refs = self.codec.decode_elements(&payload)?;
		Ok(refs.into_iter().map(|r| WebElement::new(self, r)).collect())
	}

	/// Element that currently has keyboard focus.
	pub async fn active_element(&self) -> Result<WebElement<'_>> {
		let payload = self
			.execute(Method::GET, self.session_url("/element/active"), None)
			.await?;
		Ok(WebElement::new(self, self.codec.decode_element(&payload)?))
	}

	// Windows.

	pub async fn current_window_handle(&self) -> Result<String> {
		self.string_command(self.codec.current_window_path()).await
	}

	pub async fn window_handles(&self) -> Result<Vec<String>> {
		self.strings_command("/window_handles").await
	}

	/// Closes the current window.
	pub async fn close_window(&self) -> Result<()> {
		self.execute(Method::DELETE, self.session_url("/window"), None)
			.await?;
		Ok(())
	}

	/// Switches focus to the window named by its handle.
	pub async fn switch_window(&self, name: &str) -> Result<()> {
		self.void_command("/window", self.codec.switch_window_params(name))
			.await
	}

	/// Resizes the named window, or the current one when `name` is
	/// empty.
	pub async fn resize_window(&self, name: &str, width: u32, height: u32) -> Result<()> {
		match self.codec.dialect() {
			Dialect::Legacy => {
				let name = self.window_or_current(name).await?;
				let url = self.session_url(&format!("/window/{name}/size"));
				self.execute(Method::POST, url, Some(json!({"width": width, "height": height})))
					.await?;
				Ok(())
			}
			Dialect::W3c => {
				self.modify_window(name, "rect", json!({"width": width, "height": height}))
					.await
			}
		}
	}

	/// Maximizes the named window, or the current one when `name` is
	/// empty.
	pub async fn maximize_window(&self, name: &str) -> Result<()> {
		match self.codec.dialect() {
			Dialect::Legacy => {
				let name = self.window_or_current(name).await?;
				let url = self.session_url(&format!("/window/{name}/maximize"));
				self.execute(Method::POST, url, None).await?;
				Ok(())
			}
			Dialect::W3c => self.modify_window(name, "maximize", json!({})).await,
		}
	}

	async fn window_or_current(&self, name: &str) -> Result<String> {
		if name.is_empty() {
			self.current_window_handle().await
		} else {
			Ok(name.to_string())
		}
	}

	/// W3C servers only modify the window that has focus, so a named
	/// modification switches to the target, modifies, and switches
	/// back. A failure mid-sequence surfaces immediately without the
	/// restorative switch; the caller can be left focused on the
	/// target.
	async fn modify_window(&self, name: &str, command: &str, params: Value) -> Result<()> {
		let mut start_window = String::new();
		if !name.is_empty() {
			start_window = self.current_window_handle().await?;
			if name != start_window {
				self.switch_window(name).await?;
			}
		}

		self.void_command(&format!("/window/{command}"), params).await?;

		if name != start_window {
			self.switch_window(&start_window).await?;
		}
		Ok(())
	}

	// Frames.

	/// Switches to the frame at `index` within the current context.
	pub async fn switch_frame_index(&self, index: u16) -> Result<()> {
		self.void_command("/frame", json!({"id": index})).await
	}

	/// Switches to the frame with the given name or id attribute. W3C
	/// servers address frames by element, so the name resolves through
	/// an element lookup first.
	pub async fn switch_frame_name(&self, name: &str) -> Result<()> {
		let id = match self.codec.dialect() {
			Dialect::Legacy => json!(name),
			Dialect::W3c => {
				let element = self.find_element(By::Id, name).await?;
				serde_json::to_value(element.reference())?
			}
		};
		self.void_command("/frame", json!({"id": id})).await
	}

	/// Switches to the frame held by `element`.
	pub async fn switch_frame_element(&self, element: &WebElement<'_>) -> Result<()> {
		self.void_command("/frame", json!({"id": element.reference()}))
			.await
	}

	/// Switches back to the top-level browsing context.
	pub async fn switch_to_top_frame(&self) -> Result<()> {
		self.void_command("/frame", json!({"id": null})).await
	}

	// Cookies.

	/// All cookies visible to the current page, with expiry times
	/// normalized to whole seconds.
	pub async fn get_cookies(&self) -> Result<Vec<Cookie>> {
		let payload = self.execute(Method::GET, self.session_url("/cookie"), None).await?;
		let cookies: Vec<WireCookie> = value_of(&payload)?;
		Ok(cookies.into_iter().map(WireCookie::sanitize).collect())
	}

	/// Fetches one cookie by name. GeckoDriver answers this endpoint
	/// with a one-element list instead of a single object, so both
	/// shapes decode.
	pub async fn get_cookie(&self, name: &str) -> Result<Cookie> {
		let payload = self
			.execute(Method::GET, self.session_url(&format!("/cookie/{name}")), None)
			.await?;
		// Branch on the value's shape: a struct decode would also
		// accept a list, swallowing the empty-list case.
		let value: Value = required_value(&payload)?;
		if value.is_array() {
			let cookies: Vec<WireCookie> = serde_json::from_value(value)?;
			return cookies
				.into_iter()
				.next()
				.map(WireCookie::sanitize)
				.ok_or(Error::NoSuchCookie);
		}
		let cookie: WireCookie = serde_json::from_value(value)?;
		Ok(cookie.sanitize())
	}

	pub async fn add_cookie(&self, cookie: &Cookie) -> Result<()> {
		self.void_command("/cookie", json!({"cookie": cookie})).await
	}

	pub async fn delete_cookie(&self, name: &str) -> Result<()> {
		self.execute(Method::DELETE, self.session_url(&format!("/cookie/{name}")), None)
			.await?;
		Ok(())
	}

	pub async fn delete_all_cookies(&self) -> Result<()> {
		self.execute(Method::DELETE, self.session_url("/cookie"), None)
			.await?;
		Ok(())
	}

	// Pointer and keyboard input.

	/// Presses and releases the given mouse button at the current
	/// pointer position.
	pub async fn click(&self, button: i32) -> Result<()> {
		self.void_command("/click", json!({"button": button})).await
	}

	pub async fn double_click(&self) -> Result<()> {
		self.void_command("/doubleclick", json!({})).await
	}

	pub async fn button_down(&self) -> Result<()> {
		self.void_command("/buttondown", json!({})).await
	}

	pub async fn button_up(&self) -> Result<()> {
		self.void_command("/buttonup", json!({})).await
	}

	/// Presses every key in the sequence without releasing.
	pub async fn key_down(&self, keys: &str) -> Result<()> {
		let (path, body) = self.codec.key_request(KeyDirection::Down, keys);
		self.void_command(path, body).await
	}

	/// Releases every key in the sequence.
	pub async fn key_up(&self, keys: &str) -> Result<()> {
		let (path, body) = self.codec.key_request(KeyDirection::Up, keys);
		self.void_command(path, body).await
	}

	/// Holds or releases a modifier key such as control or shift.
	pub async fn send_modifier(&self, modifier: &str, is_down: bool) -> Result<()> {
		let (path, body) = self.codec.modifier_request(modifier, is_down);
		self.void_command(path, body).await
	}

	// Alerts.

	pub async fn accept_alert(&self) -> Result<()> {
		self.void_command("/accept_alert", json!({})).await
	}

	pub async fn dismiss_alert(&self) -> Result<()> {
		self.void_command("/dismiss_alert", json!({})).await
	}

	/// Text of the currently displayed alert.
	pub async fn alert_text(&self) -> Result<String> {
		self.string_command("/alert_text").await
	}

	/// Types into the prompt of the currently displayed alert.
	pub async fn set_alert_text(&self, text: &str) -> Result<()> {
		self.void_command("/alert_text", json!({"text": text})).await
	}

	// Scripts.

	async fn exec_script(&self, script: &str, args: &[Value], kind: ScriptKind) -> Result<Vec<u8>> {
		let body = json!({"script": script, "args": args});
		self.execute(
			Method::POST,
			self.session_url(self.codec.script_path(kind)),
			Some(body),
		)
		.await
	}

	/// Runs a script in the page, returning its value.
	pub async fn execute_script(&self, script: &str, args: &[Value]) -> Result<Value> {
		let payload = self.exec_script(script, args, ScriptKind::Sync).await?;
		required_value(&payload)
	}

	/// Runs a script that reports completion through its final callback
	/// argument, returning the value passed to it.
	pub async fn execute_script_async(&self, script: &str, args: &[Value]) -> Result<Value> {
		let payload = self.exec_script(script, args, ScriptKind::Async).await?;
		required_value(&payload)
	}

	/// As [`Self::execute_script`], but hands back the raw reply for
	/// callers that decode into their own types.
	pub async fn execute_script_raw(&self, script: &str, args: &[Value]) -> Result<Vec<u8>> {
		self.exec_script(script, args, ScriptKind::Sync).await
	}

	/// As [`Self::execute_script_async`], but hands back the raw reply.
	pub async fn execute_script_async_raw(&self, script: &str, args: &[Value]) -> Result<Vec<u8>> {
		self.exec_script(script, args, ScriptKind::Async).await
	}

	// Miscellaneous.

	/// Screenshot of the current page, decoded to raw image bytes.
	pub async fn screenshot(&self) -> Result<Vec<u8>> {
		let encoded = self.string_command("/screenshot").await?;
		BASE64
			.decode(encoded.as_bytes())
			.map_err(|err| Error::InvalidPayload(format!("screenshot base64: {err}")))
	}

	/// Fetches buffered messages from one of the server's log channels.
	/// The buffer is cleared by the read.
	pub async fn log(&self, log_type: LogType) -> Result<Vec<LogMessage>> {
		let payload = self
			.execute(Method::POST, self.session_url("/log"), Some(json!({"type": log_type})))
			.await?;
		value_of(&payload)
	}

	// Input method engines (legacy servers only).

	pub async fn available_engines(&self) -> Result<Vec<String>> {
		self.strings_command("/ime/available_engines").await
	}

	pub async fn active_engine(&self) -> Result<String> {
		self.string_command("/ime/active_engine").await
	}

	pub async fn is_engine_activated(&self) -> Result<bool> {
		self.bool_command("/ime/activated").await
	}

	pub async fn activate_engine(&self, engine: &str) -> Result<()> {
		self.void_command("/ime/activate", json!({"engine": engine}))
			.await
	}

	pub async fn deactivate_engine(&self) -> Result<()> {
		self.void_command("/ime/deactivate", json!({})).await
	}
}
