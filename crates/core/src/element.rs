//! Handle to a remote DOM element.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::json;
use wd_protocol::{By, ElementRef, Point, Rect, Size};
use wd_runtime::{Method, Result};

use crate::dialect::Dialect;
use crate::webdriver::{WebDriver, required_value};

/// A DOM element, scoped to the session that produced it.
///
/// Only decoding a server reply creates one, and the borrow ties it to
/// its session, so a reference can neither outlive its session nor
/// cross into another.
#[derive(Clone)]
pub struct WebElement<'a> {
	parent: &'a WebDriver,
	reference: ElementRef,
}

impl<'a> WebElement<'a> {
	pub(crate) fn new(parent: &'a WebDriver, reference: ElementRef) -> Self {
		Self { parent, reference }
	}

	/// Opaque identifier the server assigned to this element.
	pub fn id(&self) -> &str {
		self.reference.id()
	}

	pub(crate) fn reference(&self) -> &ElementRef {
		&self.reference
	}

	fn path(&self, suffix: &str) -> String {
		format!("/element/{}{}", self.reference.id(), suffix)
	}

	pub async fn click(&self) -> Result<()> {
		self.parent.void_command(&self.path("/click"), json!({})).await
	}

	/// Types the sequence into the element.
	pub async fn send_keys(&self, keys: &str) -> Result<()> {
		let body = self.parent.codec().send_keys_body(keys);
		self.parent.void_command(&self.path("/value"), body).await
	}

	/// Submits the form this element belongs to.
	pub async fn submit(&self) -> Result<()> {
		self.parent.void_command(&self.path("/submit"), json!({})).await
	}

	/// Clears a text input or textarea.
	pub async fn clear(&self) -> Result<()> {
		self.parent.void_command(&self.path("/clear"), json!({})).await
	}

	/// Visible text of the element and its descendants.
	pub async fn text(&self) -> Result<String> {
		self.parent.string_command(&self.path("/text")).await
	}

	pub async fn tag_name(&self) -> Result<String> {
		self.parent.string_command(&self.path("/name")).await
	}

	pub async fn attribute(&self, name: &str) -> Result<String> {
		self.parent
			.string_command(&self.path(&format!("/attribute/{name}")))
			.await
	}

	/// Computed value of a CSS property.
	pub async fn css_property(&self, name: &str) -> Result<String> {
		self.parent
			.string_command(&self.path(&format!("/css/{name}")))
			.await
	}

	pub async fn is_selected(&self) -> Result<bool> {
		self.parent.bool_command(&self.path("/selected")).await
	}

	pub async fn is_enabled(&self) -> Result<bool> {
		self.parent.bool_command(&self.path("/enabled")).await
	}

	pub async fn is_displayed(&self) -> Result<bool> {
		self.parent.bool_command(&self.path("/displayed")).await
	}

	/// Finds the first descendant matching the locator.
	pub async fn find_element(&self, by: By, value: &str) -> Result<WebElement<'a>> {
		let payload = self.parent.find(by, value, false, Some(&self.reference)).await?;
		let reference = self.parent.codec().decode_element(&payload)?;
		Ok(WebElement::new(self.parent, reference))
	}

	/// Finds every descendant matching the locator.
	pub async fn find_elements(&self, by: By, value: &str) -> Result<Vec<WebElement<'a>>> {
		let payload = self.parent.find(by, value, true, Some(&self.reference)).await?;
		let refs = self.parent.codec().decode_elements(&payload)?;
		Ok(refs
			.into_iter()
			.map(|r| WebElement::new(self.parent, r))
			.collect())
	}

	/// Moves the pointer relative to this element's top-left corner
	/// (legacy interactions endpoint).
	pub async fn move_to(&self, x_offset: i32, y_offset: i32) -> Result<()> {
		self.parent
			.void_command(
				"/moveto",
				json!({
					"element": self.reference.id(),
					"xoffset": x_offset,
					"yoffset": y_offset,
				}),
			)
			.await
	}

	/// Element position in the page. W3C servers expose only the
	/// combined rect, so there the position is a projection of it.
	pub async fn location(&self) -> Result<Point> {
		self.location_at("/location").await
	}

	/// Position once scrolled into view. A legacy distinction; same as
	/// [`Self::location`] under W3C.
	pub async fn location_in_view(&self) -> Result<Point> {
		self.location_at("/location_in_view").await
	}

	async fn location_at(&self, suffix: &str) -> Result<Point> {
		match self.parent.dialect() {
			Dialect::Legacy => {
				let url = self.parent.session_url(&self.path(suffix));
				let payload = self.parent.execute(Method::GET, url, None).await?;
				required_value(&payload)
			}
			Dialect::W3c => {
				let rect = self.rect().await?;
				Ok(Point { x: rect.x as i64, y: rect.y as i64 })
			}
		}
	}

	pub async fn size(&self) -> Result<Size> {
		match self.parent.dialect() {
			Dialect::Legacy => {
				let url = self.parent.session_url(&self.path("/size"));
				let payload = self.parent.execute(Method::GET, url, None).await?;
				required_value(&payload)
			}
			Dialect::W3c => {
				let rect = self.rect().await?;
				Ok(Size {
					width: rect.width as i64,
					height: rect.height as i64,
				})
			}
		}
	}

	/// Combined position and size (the W3C "element rect").
	pub async fn rect(&self) -> Result<Rect> {
		let url = self.parent.session_url(&self.path("/rect"));
		let payload = self.parent.execute(Method::GET, url, None).await?;
		required_value(&payload)
	}
}

impl fmt::Debug for WebElement<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebElement")
			.field("reference", &self.reference)
			.finish_non_exhaustive()
	}
}

/// Serializes as the wire reference, so elements can be embedded in
/// script arguments and frame-switch parameters.
impl Serialize for WebElement<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		self.reference.serialize(serializer)
	}
}
