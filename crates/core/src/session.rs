//! Session negotiation.
//!
//! Servers accept the new-session payload in three shapes depending on
//! their age and conformance. The negotiator probes the shapes in a
//! fixed priority order against one endpoint and infers the dialect
//! from wherever the reply placed the session identifier. This is a
//! compatibility probe with a bounded attempt count, not a retry loop.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use wd_protocol::{Capabilities, ServerReply};
use wd_runtime::{Error, Method, Result, Transport};

use crate::dialect::Dialect;

/// Fields W3C servers nest under `value` in a new-session reply,
/// alongside the echoed capabilities.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct NewSessionValue {
	#[serde(alias = "sessionID")]
	session_id: String,
}

/// Creates a session and reports its id together with the dialect the
/// server turned out to speak.
pub(crate) async fn negotiate(
	transport: &Transport,
	url_prefix: &str,
	capabilities: &Capabilities,
) -> Result<(String, Dialect)> {
	let caps = serde_json::to_value(capabilities)?;
	// Shape priority: both generations of keys at once, then the W3C
	// capabilities wrapper alone, then the bare legacy key.
	let attempts = [
		json!({
			"capabilities": {
				"alwaysMatch": &caps,
				"desiredCapabilities": &caps,
			},
			"desiredCapabilities": &caps,
		}),
		json!({"capabilities": {"desiredCapabilities": &caps}}),
		json!({"desiredCapabilities": &caps}),
	];

	let url = format!("{url_prefix}/session");
	let last = attempts.len() - 1;

	for (attempt, params) in attempts.iter().enumerate() {
		let body = serde_json::to_vec(params)?;
		let payload = match transport.execute(Method::POST, &url, Some(body)).await {
			Ok(payload) => payload,
			// A rejected payload shape surfaces as a remote or decode
			// error; try the next shape. Transport failures abort: the
			// remaining shapes would hit the same wall.
			Err(err @ (Error::Remote { .. } | Error::Json(_))) if attempt < last => {
				debug!(target: "wd", attempt, %err, "session payload shape rejected");
				continue;
			}
			Err(err) => return Err(err),
		};

		let reply: ServerReply = serde_json::from_slice(&payload)?;

		// A top-level id means the server answered in the legacy shape.
		if let Some(id) = reply.session_id {
			if !id.is_empty() {
				debug!(target: "wd", session = %id, "negotiated legacy session");
				return Ok((id, Dialect::Legacy));
			}
		} else if let Some(value) = reply.value {
			if let Ok(new_session) = serde_json::from_value::<NewSessionValue>(value) {
				if !new_session.session_id.is_empty() {
					debug!(target: "wd", session = %new_session.session_id, "negotiated w3c session");
					return Ok((new_session.session_id, Dialect::W3c));
				}
			}
		}

		// Accepted but no id anywhere; the next shape may fare better.
		if attempt == last {
			return Err(Error::MissingValue);
		}
	}

	unreachable!("negotiation returns or errors within the attempt sequence")
}
