//! Session capabilities: a handful of well-typed common fields plus an
//! open map for everything else, since real servers accept (and echo
//! back) arbitrary capability keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capabilities requested at session creation and possibly echoed back,
/// augmented, by the server.
///
/// Unknown keys survive a round trip through `extra`; nothing the caller
/// sets is silently dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub browser_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub browser_version: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub platform_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub proxy: Option<Proxy>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_load_strategy: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeouts: Option<Timeouts>,

	/// Any capability without a typed field above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Capabilities {
	/// Capabilities naming only a browser.
	pub fn browser(name: impl Into<String>) -> Self {
		Self {
			browser_name: Some(name.into()),
			..Self::default()
		}
	}

	/// Sets an arbitrary capability key.
	pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra.insert(key.into(), value);
		self
	}

	pub fn proxy(mut self, proxy: Proxy) -> Self {
		self.proxy = Some(proxy);
		self
	}
}

/// Proxy configuration, serialized per the W3C capability schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proxy {
	/// One of "direct", "manual", "pac", "autodetect", "system".
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub proxy_type: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub proxy_autoconfig_url: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub http_proxy: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ssl_proxy: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ftp_proxy: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub socks_proxy: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub socks_version: Option<u8>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub no_proxy: Option<String>,
}

/// Session timeouts in milliseconds, as they appear in a W3C new-session
/// reply. Older servers spell the page-load key with a space.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Timeouts {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub implicit: Option<u64>,

	#[serde(
		default,
		rename = "pageLoad",
		alias = "page load",
		skip_serializing_if = "Option::is_none"
	)]
	pub page_load: Option<u64>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub script: Option<u64>,
}
