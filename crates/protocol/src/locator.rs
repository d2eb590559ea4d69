//! Element lookup strategies.

use std::fmt;

/// Locator strategy for find operations.
///
/// `Id` and `Name` exist only in the legacy dialect; the command layer
/// rewrites them to CSS selectors when the session is W3C-compliant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum By {
	Id,
	XPath,
	LinkText,
	PartialLinkText,
	Name,
	TagName,
	ClassName,
	CssSelector,
}

impl By {
	/// Strategy name as it appears in find-element payloads.
	pub fn as_str(&self) -> &'static str {
		match self {
			By::Id => "id",
			By::XPath => "xpath",
			By::LinkText => "link text",
			By::PartialLinkText => "partial link text",
			By::Name => "name",
			By::TagName => "tag name",
			By::ClassName => "class name",
			By::CssSelector => "css selector",
		}
	}
}

impl fmt::Display for By {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wire_names_match_the_protocol() {
		assert_eq!(By::Id.as_str(), "id");
		assert_eq!(By::LinkText.as_str(), "link text");
		assert_eq!(By::PartialLinkText.as_str(), "partial link text");
		assert_eq!(By::CssSelector.as_str(), "css selector");
	}
}
