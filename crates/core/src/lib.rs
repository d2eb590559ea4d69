//! Client for the WebDriver wire protocol.
//!
//! Speaks both protocol generations, the legacy JSON Wire Protocol and
//! the W3C WebDriver standard, behind one surface. The dialect is
//! negotiated once when the session is created and every later request
//! is encoded through it.
//!
//! ```no_run
//! use wd::{By, Capabilities, Transport, WebDriver};
//!
//! # async fn run() -> wd::Result<()> {
//! let transport = Transport::new()?;
//! let mut driver =
//! 	WebDriver::new_session(transport, "", Capabilities::browser("firefox")).await?;
//!
//! driver.get("https://example.com/").await?;
//! let heading = driver.find_element(By::TagName, "h1").await?;
//! println!("{}", heading.text().await?);
//! driver.quit().await
//! # }
//! ```

mod dialect;
mod element;
mod session;
mod webdriver;

pub use dialect::Dialect;
pub use element::WebElement;
pub use webdriver::{DEFAULT_URL_PREFIX, WebDriver};

pub use wd_protocol::{
	BuildInfo, By, Capabilities, Cookie, LogMessage, LogType, OsInfo, Point, Proxy, Rect, Size,
	Status, Timeouts,
};
pub use wd_runtime::{Error, Result, Transport};
