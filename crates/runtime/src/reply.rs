//! Decodes a raw HTTP response into payload-or-error.
//!
//! Servers have shipped three incompatible error envelopes over the
//! protocol's lifetime. Decoding attempts them in a fixed priority
//! order and stops at the first that parses and is non-empty:
//!
//! 1. a non-empty top-level `error` field,
//! 2. an error object nested inside `value` (W3C),
//! 3. a non-zero legacy numeric `status` with the code table.
//!
//! Anything else is a successful payload; the raw envelope bytes are
//! handed back so callers can re-parse `value` per their expected shape.

use reqwest::StatusCode;
use serde_json::Value;
use wd_protocol::{JSON_TYPE, ServerReply, WireError, legacy_error_message};

use crate::error::{Error, Result};
use crate::transport::RawResponse;

/// Decodes one reply envelope, returning the raw payload bytes on
/// success and the normalized error otherwise.
pub fn decode(raw: RawResponse) -> Result<Vec<u8>> {
	let full_ctype = raw.content_type.as_deref().unwrap_or("");
	let media_type = full_ctype.split(';').next().unwrap_or("").trim();
	if !media_type.eq_ignore_ascii_case(JSON_TYPE) {
		return Err(Error::ContentType {
			got: full_ctype.to_string(),
		});
	}

	let reply: ServerReply = match serde_json::from_slice(&raw.body) {
		Ok(reply) => reply,
		Err(err) => {
			if raw.status != StatusCode::OK {
				return Err(Error::BadStatus(raw.status.as_u16()));
			}
			return Err(err.into());
		}
	};

	if !reply.error.error.is_empty() {
		return Err(remote(reply.error));
	}

	// W3C-compliant servers embed the error as an object in `value`.
	// Only objects qualify: serde would also fill the struct from a
	// sequence, turning string-list payloads into phantom errors.
	if let Some(value) = reply.value.as_ref().filter(|value| value.is_object()) {
		if let Ok(err) = serde_json::from_value::<WireError>(value.clone()) {
			if !err.error.is_empty() {
				return Err(remote(err));
			}
		}
	}

	if reply.status != 0 {
		let short = legacy_error_message(reply.status)
			.map(str::to_owned)
			.unwrap_or_else(|| format!("unknown error - {}", reply.status));
		let long = reply.value.as_ref().and_then(long_message);
		return Err(Error::Remote {
			error: short,
			message: long.unwrap_or_default(),
			stacktrace: None,
		});
	}

	Ok(raw.body)
}

fn remote(err: WireError) -> Error {
	Error::Remote {
		error: err.error,
		message: err.message,
		stacktrace: err.stacktrace,
	}
}

/// Long message legacy servers tuck into `value.message`. Some spell
/// the key capitalized.
fn long_message(value: &Value) -> Option<String> {
	let message = value
		.get("message")
		.or_else(|| value.get("Message"))?
		.as_str()?;
	(!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn json_response(status: StatusCode, body: &str) -> RawResponse {
		RawResponse {
			status,
			content_type: Some("application/json; charset=utf-8".to_string()),
			body: body.as_bytes().to_vec(),
		}
	}

	fn remote_error(raw: RawResponse) -> (String, String) {
		match decode(raw) {
			Err(Error::Remote { error, message, .. }) => (error, message),
			other => panic!("expected remote error, got {other:?}"),
		}
	}

	#[test]
	fn success_returns_envelope_bytes() {
		let body = r#"{"sessionId":"s1","status":0,"value":"ok"}"#;
		let payload = decode(json_response(StatusCode::OK, body)).unwrap();
		assert_eq!(payload, body.as_bytes());
	}

	#[test]
	fn top_level_error_shape() {
		let (error, message) = remote_error(json_response(
			StatusCode::NOT_FOUND,
			r#"{"error":"no such element","message":"cannot find it"}"#,
		));
		assert_eq!(error, "no such element");
		assert_eq!(message, "cannot find it");
	}

	#[test]
	fn w3c_error_nested_under_value() {
		let (error, message) = remote_error(json_response(
			StatusCode::NOT_FOUND,
			r#"{"value":{"error":"no such element","message":"gone","stacktrace":"t"}}"#,
		));
		assert_eq!(error, "no such element");
		assert_eq!(message, "gone");
	}

	#[test]
	fn legacy_status_with_long_message() {
		let (error, message) = remote_error(json_response(
			StatusCode::OK,
			r#"{"status":7,"value":{"message":"Unable to locate element"}}"#,
		));
		assert_eq!(error, "no such element");
		assert_eq!(message, "Unable to locate element");
	}

	#[test]
	fn legacy_status_capitalized_message_key() {
		let (error, message) = remote_error(json_response(
			StatusCode::OK,
			r#"{"status":21,"value":{"Message":"took too long"}}"#,
		));
		assert_eq!(error, "timeout");
		assert_eq!(message, "took too long");
	}

	#[test]
	fn legacy_status_without_long_message() {
		let (error, message) =
			remote_error(json_response(StatusCode::OK, r#"{"status":28,"value":null}"#));
		assert_eq!(error, "script timeout");
		assert_eq!(message, "");
	}

	#[test]
	fn unknown_legacy_status_degrades_to_template() {
		let (error, _) =
			remote_error(json_response(StatusCode::OK, r#"{"status":99,"value":{}}"#));
		assert_eq!(error, "unknown error - 99");
	}

	#[test]
	fn same_logical_error_across_all_three_shapes() {
		let shapes = [
			r#"{"status":7,"value":{"message":"x"}}"#,
			r#"{"error":"no such element","message":"x"}"#,
			r#"{"value":{"error":"no such element","message":"x"}}"#,
		];
		for body in shapes {
			let err = decode(json_response(StatusCode::OK, body)).unwrap_err();
			assert!(
				err.to_string().contains("no such element"),
				"shape {body} lost the classification: {err}"
			);
		}
	}

	#[test]
	fn non_json_content_type_is_fatal() {
		let raw = RawResponse {
			status: StatusCode::OK,
			content_type: Some("text/html".to_string()),
			body: b"<html></html>".to_vec(),
		};
		assert!(matches!(decode(raw), Err(Error::ContentType { .. })));
	}

	#[test]
	fn content_type_parameters_are_ignored() {
		let body = r#"{"value":null}"#;
		assert!(decode(json_response(StatusCode::OK, body)).is_ok());
	}

	#[test]
	fn garbage_body_with_error_status_surfaces_http_status() {
		let raw = json_response(StatusCode::INTERNAL_SERVER_ERROR, "not json");
		assert!(matches!(decode(raw), Err(Error::BadStatus(500))));
	}

	#[test]
	fn garbage_body_with_ok_status_surfaces_parse_error() {
		let raw = json_response(StatusCode::OK, "not json");
		assert!(matches!(decode(raw), Err(Error::Json(_))));
	}

	#[test]
	fn string_list_value_is_not_mistaken_for_an_error() {
		let body = r#"{"value":["w1","w2"]}"#;
		let payload = decode(json_response(StatusCode::OK, body)).unwrap();
		assert_eq!(payload, body.as_bytes());
	}

	#[test]
	fn value_error_object_with_empty_kind_is_not_an_error() {
		let body = r#"{"value":{"error":"","message":""}}"#;
		assert!(decode(json_response(StatusCode::OK, body)).is_ok());
	}
}
