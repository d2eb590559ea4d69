//! Remote log retrieval types.

use serde::{Deserialize, Serialize};

/// Log channel exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
	Browser,
	Client,
	Driver,
	Performance,
	Server,
}

/// One entry returned by the log command.
#[derive(Debug, Clone, Deserialize)]
pub struct LogMessage {
	/// Milliseconds since the Unix epoch.
	#[serde(default)]
	pub timestamp: i64,

	#[serde(default)]
	pub level: String,

	#[serde(default)]
	pub message: String,
}
