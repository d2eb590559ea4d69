//! HTTP transport for the WebDriver wire protocol.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Method, StatusCode};
use tracing::debug;
use url::Url;
use wd_protocol::JSON_TYPE;

use crate::error::{Error, Result};
use crate::reply;

/// Maximum number of redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Raw result of one HTTP round trip, before envelope decoding.
#[derive(Debug)]
pub struct RawResponse {
	pub status: StatusCode,
	pub content_type: Option<String>,
	pub body: Vec<u8>,
}

/// HTTP client for WebDriver endpoints.
///
/// Redirects are followed manually: the protocol requires `Accept:
/// application/json` on every request, and automatic redirect handling
/// drops the header on follow-up hops. Configuration is read-only after
/// construction; clones share the underlying connection pool, so one
/// transport can serve many independent sessions.
#[derive(Debug, Clone)]
pub struct Transport {
	client: reqwest::Client,
}

impl Transport {
	pub fn new() -> Result<Self> {
		Self::with_timeout(None)
	}

	/// Creates a transport whose requests are bounded by `timeout`.
	/// This deadline is the caller's cancellation mechanism; there is no
	/// separate cancellation channel.
	pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
		let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}
		Ok(Self {
			client: builder.build()?,
		})
	}

	/// Performs one request, following up to [`MAX_REDIRECTS`] redirects
	/// and reapplying the `Accept` header on each hop.
	pub async fn send(
		&self,
		method: Method,
		url: &str,
		body: Option<Vec<u8>>,
	) -> Result<RawResponse> {
		let mut url = Url::parse(url).map_err(|err| Error::InvalidUrl(format!("{url}: {err}")))?;
		let mut method = method;
		let mut body = body;

		debug!(
			target: "wd::wire",
			%method,
			%url,
			body = %body.as_deref().map(pretty).unwrap_or_default(),
			"request"
		);

		for _ in 0..=MAX_REDIRECTS {
			let mut request = self
				.client
				.request(method.clone(), url.clone())
				.header(ACCEPT, JSON_TYPE);
			if let Some(bytes) = &body {
				request = request.header(CONTENT_TYPE, JSON_TYPE).body(bytes.clone());
			}

			let response = request.send().await?;
			let status = response.status();

			if is_redirect(status) {
				let location = response
					.headers()
					.get(LOCATION)
					.and_then(|value| value.to_str().ok())
					.ok_or_else(|| {
						Error::InvalidUrl("redirect without a Location header".to_string())
					})?;
				url = url
					.join(location)
					.map_err(|err| Error::InvalidUrl(format!("{location}: {err}")))?;
				// A 307 preserves the method and body; the rest demote
				// the follow-up to a bare GET.
				if status != StatusCode::TEMPORARY_REDIRECT {
					method = Method::GET;
					body = None;
				}
				continue;
			}

			let content_type = response
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let bytes = response.bytes().await?.to_vec();

			debug!(
				target: "wd::wire",
				status = %status,
				content_type = content_type.as_deref().unwrap_or(""),
				body = %pretty(&bytes),
				"response"
			);

			return Ok(RawResponse {
				status,
				content_type,
				body: bytes,
			});
		}

		Err(Error::TooManyRedirects(MAX_REDIRECTS + 1))
	}

	/// One round trip plus envelope decoding: the payload bytes on
	/// success, the normalized remote error otherwise.
	pub async fn execute(
		&self,
		method: Method,
		url: &str,
		body: Option<Vec<u8>>,
	) -> Result<Vec<u8>> {
		let raw = self.send(method, url, body).await?;
		reply::decode(raw)
	}
}

fn is_redirect(status: StatusCode) -> bool {
	matches!(status.as_u16(), 301 | 302 | 303 | 307)
}

/// Pretty-prints JSON payloads for the diagnostic log without touching
/// the bytes handed to the decoder.
fn pretty(bytes: &[u8]) -> String {
	match serde_json::from_slice::<serde_json::Value>(bytes) {
		Ok(value) => serde_json::to_string_pretty(&value)
			.unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned()),
		Err(_) => String::from_utf8_lossy(bytes).into_owned(),
	}
}
