//! Element references and geometry.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Key legacy servers wrap element identifiers under.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Key constant defined by the W3C specification for element references.
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Opaque reference to a remote DOM element, valid only within the
/// session that produced it.
///
/// Serialization emits the identifier under both dialect keys at once so
/// a reference round-trips into request payloads regardless of which
/// dialect the session negotiated. Decoding is strict per dialect and
/// lives in the command layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(String);

impl ElementRef {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn id(&self) -> &str {
		&self.0
	}
}

impl Serialize for ElementRef {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(2))?;
		map.serialize_entry(LEGACY_ELEMENT_KEY, &self.0)?;
		map.serialize_entry(W3C_ELEMENT_KEY, &self.0)?;
		map.end()
	}
}

/// Element position in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
	pub x: i64,
	pub y: i64,
}

/// Element dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
	pub width: i64,
	pub height: i64,
}

/// Combined geometry as the W3C "Get Element Rect" command returns it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reference_serializes_under_both_keys() {
		let wire = serde_json::to_value(ElementRef::new("e-42")).unwrap();
		assert_eq!(wire[LEGACY_ELEMENT_KEY], "e-42");
		assert_eq!(wire[W3C_ELEMENT_KEY], "e-42");
		assert_eq!(wire.as_object().unwrap().len(), 2);
	}
}
