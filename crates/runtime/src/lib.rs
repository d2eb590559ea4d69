//! HTTP transport and reply decoding for the WebDriver client.
//!
//! The transport performs one blocking-style round trip per call and
//! follows redirects manually so protocol headers survive every hop.
//! The reply module normalizes the three historical response envelope
//! shapes into payload-or-error.

pub mod error;
pub mod reply;
pub mod transport;

pub use error::{Error, Result};
pub use transport::{MAX_REDIRECTS, RawResponse, Transport};

// Re-exported so callers build requests without depending on reqwest.
pub use reqwest::{Method, StatusCode};
