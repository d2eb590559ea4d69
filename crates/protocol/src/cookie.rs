//! Cookies, including the expiry normalization servers make necessary:
//! ChromeDriver returns the expiration date as a float where other
//! servers return a whole number.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A browser cookie with a normalized expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
	pub name: String,

	pub value: String,

	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub path: String,

	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub domain: String,

	#[serde(default)]
	pub secure: bool,

	/// Unix timestamp in seconds; `None` means no expiry.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expiry: Option<u64>,
}

impl Cookie {
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			..Self::default()
		}
	}
}

/// Cookie as it arrives on the wire, before expiry normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireCookie {
	#[serde(default)]
	pub name: String,

	#[serde(default)]
	pub value: String,

	#[serde(default)]
	pub path: String,

	#[serde(default)]
	pub domain: String,

	#[serde(default)]
	pub secure: bool,

	/// Integer or float depending on the server.
	#[serde(default)]
	pub expiry: Option<Value>,
}

impl WireCookie {
	/// Converts to a [`Cookie`], treating an absent or non-positive
	/// expiry as "no expiry" rather than a literal zero.
	pub fn sanitize(self) -> Cookie {
		let expiry = match self.expiry {
			Some(Value::Number(n)) => n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64),
			_ => None,
		};
		Cookie {
			name: self.name,
			value: self.value,
			path: self.path,
			domain: self.domain,
			secure: self.secure,
			expiry,
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn wire(expiry: Value) -> WireCookie {
		serde_json::from_value(json!({
			"name": "session",
			"value": "tok",
			"path": "/",
			"domain": ".example.com",
			"secure": true,
			"expiry": expiry
		}))
		.unwrap()
	}

	#[test]
	fn integer_and_float_expiry_normalize_identically() {
		assert_eq!(wire(json!(1_700_000_000)).sanitize().expiry, Some(1_700_000_000));
		assert_eq!(wire(json!(1_700_000_000.0)).sanitize().expiry, Some(1_700_000_000));
	}

	#[test]
	fn non_positive_or_absent_expiry_means_none() {
		assert_eq!(wire(json!(0)).sanitize().expiry, None);
		assert_eq!(wire(json!(0.0)).sanitize().expiry, None);
		assert_eq!(wire(json!(-1)).sanitize().expiry, None);

		let no_expiry: WireCookie =
			serde_json::from_value(json!({"name": "a", "value": "b"})).unwrap();
		assert_eq!(no_expiry.sanitize().expiry, None);
	}

	#[test]
	fn fields_carry_over() {
		let c = wire(json!(5)).sanitize();
		assert_eq!(c.name, "session");
		assert_eq!(c.value, "tok");
		assert_eq!(c.domain, ".example.com");
		assert!(c.secure);
	}
}
