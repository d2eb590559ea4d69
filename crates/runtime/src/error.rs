//! Error types for the WebDriver runtime.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors a WebDriver command can surface.
///
/// Remote errors are normalized here from the three wire shapes; the
/// client never swallows one, it only reshapes it.
#[derive(Debug, Error)]
pub enum Error {
	/// Connection-level HTTP failure.
	#[error("http error: {0}")]
	Http(#[from] reqwest::Error),

	/// Redirect chain exceeded the fixed bound.
	#[error("too many redirects ({0})")]
	TooManyRedirects(usize),

	/// The server replied with a non-JSON content type.
	#[error("got content type {got:?}, expected \"application/json\"")]
	ContentType { got: String },

	/// Unparseable body together with a non-OK HTTP status.
	#[error("bad server reply status: {0}")]
	BadStatus(u16),

	#[error("invalid URL: {0}")]
	InvalidUrl(String),

	/// JSON (de)serialization failure.
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),

	/// Server-reported command failure.
	#[error("{error}{}", if message.is_empty() { String::new() } else { format!(": {message}") })]
	Remote {
		/// Short classification, e.g. "no such element".
		error: String,
		/// Descriptive message, possibly empty.
		message: String,
		/// Diagnostic trace from the server, when it sent one.
		stacktrace: Option<String>,
	},

	/// An element reply was missing its reference key.
	#[error("invalid element returned: {0}")]
	InvalidElement(String),

	/// A reply carried no usable `value` payload.
	#[error("nil return value")]
	MissingValue,

	/// A reply value failed a post-decode conversion.
	#[error("invalid payload: {0}")]
	InvalidPayload(String),

	/// Single-name cookie lookup matched nothing.
	#[error("no cookies returned")]
	NoSuchCookie,
}

impl Error {
	/// Short classification if this is a server-reported error.
	pub fn error_name(&self) -> Option<&str> {
		match self {
			Error::Remote { error, .. } => Some(error),
			_ => None,
		}
	}

	/// Server stack trace, when one was sent.
	pub fn stacktrace(&self) -> Option<&str> {
		match self {
			Error::Remote { stacktrace, .. } => stacktrace.as_deref(),
			_ => None,
		}
	}

	pub fn is_timeout(&self) -> bool {
		match self {
			Error::Remote { error, .. } => {
				error == "timeout" || error == "script timeout"
			}
			Error::Http(err) => err.is_timeout(),
			_ => false,
		}
	}

	pub fn is_no_such_element(&self) -> bool {
		matches!(self, Error::Remote { error, .. } if error == "no such element")
	}

	pub fn is_stale_element(&self) -> bool {
		matches!(self, Error::Remote { error, .. } if error == "stale element reference")
	}
}
