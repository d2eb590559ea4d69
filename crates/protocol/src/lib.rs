//! Wire-level types for the WebDriver protocol.
//!
//! Everything in this crate is pure data: request payload shapes, reply
//! envelopes, and the constants both protocol dialects put on the wire.
//! No I/O happens here; the transport lives in `wd-runtime` and the
//! dialect-aware command layer in `wd-rs`.

pub mod capabilities;
pub mod cookie;
pub mod element;
pub mod envelope;
pub mod locator;
pub mod log;
pub mod status;

pub use capabilities::{Capabilities, Proxy, Timeouts};
pub use cookie::{Cookie, WireCookie};
pub use element::{ElementRef, LEGACY_ELEMENT_KEY, Point, Rect, Size, W3C_ELEMENT_KEY};
pub use envelope::{ServerReply, WireError, legacy_error_message};
pub use locator::By;
pub use log::{LogMessage, LogType};
pub use status::{BuildInfo, OsInfo, Status};

/// JSON media type required on every request and reply.
pub const JSON_TYPE: &str = "application/json";
