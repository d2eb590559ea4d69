//! Session negotiation against servers of both generations.

mod support;

use support::MockServer;
use wd::{Capabilities, Dialect, Transport, WebDriver};

const SHAPE_REJECTED: &str = r#"{"status":9,"value":{"message":"payload shape not understood"}}"#;

async fn connect(server: &MockServer, caps: Capabilities) -> wd::Result<WebDriver> {
	WebDriver::new_session(Transport::new()?, &server.base, caps).await
}

#[tokio::test]
async fn w3c_server_negotiates_on_the_first_attempt() {
	let server = MockServer::start(&[
		r#"{"value":{"sessionId":"w3c-1","capabilities":{"browserName":"firefox"}}}"#,
	])
	.await;

	let driver = connect(&server, Capabilities::browser("firefox")).await.unwrap();
	assert_eq!(driver.dialect(), Dialect::W3c);
	assert_eq!(driver.session_id(), "w3c-1");

	let requests = server.requests();
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].method, "POST");
	assert_eq!(requests[0].path, "/session");

	// The first shape carries both generations of capability keys.
	let body = requests[0].json();
	assert_eq!(body["capabilities"]["alwaysMatch"]["browserName"], "firefox");
	assert_eq!(body["capabilities"]["desiredCapabilities"]["browserName"], "firefox");
	assert_eq!(body["desiredCapabilities"]["browserName"], "firefox");
}

#[tokio::test]
async fn legacy_only_server_settles_on_the_bare_shape() {
	let server = MockServer::start(&[
		SHAPE_REJECTED,
		SHAPE_REJECTED,
		r#"{"sessionId":"legacy-1","status":0,"value":{"browserName":"chrome"}}"#,
	])
	.await;

	let driver = connect(&server, Capabilities::browser("chrome")).await.unwrap();
	assert_eq!(driver.dialect(), Dialect::Legacy);
	assert_eq!(driver.session_id(), "legacy-1");

	let requests = server.requests();
	assert_eq!(requests.len(), 3);
	let last = requests[2].json();
	assert!(last.get("capabilities").is_none());
	assert_eq!(last["desiredCapabilities"]["browserName"], "chrome");
}

#[tokio::test]
async fn legacy_id_in_an_accepted_reply_wins_over_value() {
	// Old Selenium servers accept the combined shape but answer in the
	// legacy envelope; the top-level id decides the dialect.
	let server = MockServer::start(&[
		r#"{"sessionId":"legacy-2","status":0,"value":{"takesScreenshot":true}}"#,
	])
	.await;

	let driver = connect(&server, Capabilities::default()).await.unwrap();
	assert_eq!(driver.dialect(), Dialect::Legacy);
	assert_eq!(driver.session_id(), "legacy-2");
	assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn rejection_of_every_shape_surfaces_the_last_error() {
	let server = MockServer::start(&[SHAPE_REJECTED, SHAPE_REJECTED, SHAPE_REJECTED]).await;

	let err = connect(&server, Capabilities::default()).await.unwrap_err();
	assert_eq!(err.error_name(), Some("unknown command"));
	assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn requested_capabilities_survive_every_shape() {
	let server = MockServer::start(&[
		SHAPE_REJECTED,
		SHAPE_REJECTED,
		r#"{"sessionId":"legacy-3","status":0,"value":{}}"#,
	])
	.await;

	let caps = Capabilities::browser("chrome")
		.set("goog:chromeOptions", serde_json::json!({"args": ["--headless"]}));
	connect(&server, caps).await.unwrap();

	for request in server.requests() {
		let body = request.json();
		let carried = body["desiredCapabilities"]["goog:chromeOptions"]["args"][0]
			== "--headless"
			|| body["capabilities"]["desiredCapabilities"]["goog:chromeOptions"]["args"][0]
				== "--headless";
		assert!(carried, "capability dropped in attempt body: {body}");
	}
}

#[tokio::test]
async fn accepted_reply_without_an_id_fails_after_the_last_shape() {
	let server =
		MockServer::start(&[r#"{"value":{}}"#, r#"{"value":{}}"#, r#"{"value":{}}"#]).await;

	let err = connect(&server, Capabilities::default()).await.unwrap_err();
	assert!(matches!(err, wd::Error::MissingValue));
	assert_eq!(server.requests().len(), 3);
}
