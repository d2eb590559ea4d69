//! Server readiness and version info from `GET /status`.

use serde::Deserialize;

/// Reply of the status command. Legacy servers report build and OS
/// details; W3C servers report readiness. All fields default so either
/// shape parses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Status {
	pub ready: bool,
	pub message: String,
	pub build: BuildInfo,
	pub os: OsInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuildInfo {
	pub version: String,
	pub revision: String,
	pub time: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OsInfo {
	pub arch: String,
	pub name: String,
	pub version: String,
}
