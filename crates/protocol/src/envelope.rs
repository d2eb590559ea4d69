//! The reply envelope wrapping every command response, plus the legacy
//! numeric status table.
//!
//! Three historically distinct shapes feed into [`ServerReply`]: a
//! top-level numeric `status` (pre-Selenium-3 and old ChromeDriver), a
//! top-level `error`/`message`/`stacktrace` object, and a W3C error
//! nested inside `value`. The decoder in `wd-runtime` reconciles them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured error payload as servers put it on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireError {
	#[serde(default)]
	pub error: String,

	#[serde(default)]
	pub message: String,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stacktrace: Option<String>,
}

/// Top-level reply envelope covering every response shape the client
/// must tolerate. Fields absent on the wire take their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ServerReply {
	/// Present at the top level only on legacy servers.
	#[serde(default, rename = "sessionId", alias = "sessionID")]
	pub session_id: Option<String>,

	/// The command payload; its shape depends on the command.
	#[serde(default)]
	pub value: Option<Value>,

	/// Legacy numeric status; zero means success.
	#[serde(default)]
	pub status: i64,

	/// Extra state string old ChromeDriver versions attach.
	#[serde(default)]
	pub state: Option<String>,

	/// Modern error fields, flattened at the top level.
	#[serde(flatten)]
	pub error: WireError,
}

/// Short message for a legacy numeric status code. This is a closed
/// mapping; unknown codes are the caller's problem to template.
pub fn legacy_error_message(code: i64) -> Option<&'static str> {
	Some(match code {
		6 => "invalid session ID",
		7 => "no such element",
		8 => "no such frame",
		9 => "unknown command",
		10 => "stale element reference",
		11 => "element not visible",
		12 => "invalid element state",
		13 => "unknown error",
		15 => "element is not selectable",
		17 => "javascript error",
		19 => "xpath lookup error",
		21 => "timeout",
		23 => "no such window",
		24 => "invalid cookie domain",
		25 => "unable to set cookie",
		26 => "unexpected alert open",
		27 => "no alert open",
		28 => "script timeout",
		29 => "invalid element coordinates",
		32 => "invalid selector",
		_ => return None,
	})
}
