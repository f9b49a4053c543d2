//! Per-call request options: method, extra headers, and body.

// self
use crate::{_prelude::*, error::ConfigError, http::MultipartForm};

/// Body attached to an API call.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// JSON document; sent with `Content-Type: application/json`.
	Json(JsonValue),
	/// Multipart form; the transport picks the boundary-bearing content type.
	Multipart(MultipartForm),
}
impl RequestBody {
	/// Returns `true` for JSON bodies.
	pub fn is_json(&self) -> bool {
		matches!(self, Self::Json(_))
	}
}

/// Options for a single call made through
/// [`ApiClient::request`](crate::client::ApiClient::request).
///
/// Caller headers are applied after the JSON content type, so they may override it. The
/// `Authorization` header is always set last from the stored access token when one exists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
	/// HTTP method; defaults to `GET`.
	pub method: ::http::Method,
	/// Extra headers in insertion order.
	pub headers: Vec<(String, String)>,
	/// Request body.
	pub body: RequestBody,
}
impl RequestOptions {
	/// Creates options for the provided method with no headers or body.
	pub fn new(method: ::http::Method) -> Self {
		Self { method, ..Default::default() }
	}

	/// `GET` with no body.
	pub fn get() -> Self {
		Self::new(::http::Method::GET)
	}

	/// `POST` with no body.
	pub fn post() -> Self {
		Self::new(::http::Method::POST)
	}

	/// `PUT` with no body.
	pub fn put() -> Self {
		Self::new(::http::Method::PUT)
	}

	/// `PATCH` with no body.
	pub fn patch() -> Self {
		Self::new(::http::Method::PATCH)
	}

	/// `DELETE` with no body.
	pub fn delete() -> Self {
		Self::new(::http::Method::DELETE)
	}

	/// Serializes `body` to JSON and attaches it.
	pub fn json<B>(mut self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		let value = serde_json::to_value(body).map_err(ConfigError::BodyEncode)?;

		self.body = RequestBody::Json(value);

		Ok(self)
	}

	/// Attaches an already-built JSON value.
	pub fn json_value(mut self, value: JsonValue) -> Self {
		self.body = RequestBody::Json(value);

		self
	}

	/// Attaches a multipart form.
	pub fn multipart(mut self, form: MultipartForm) -> Self {
		self.body = RequestBody::Multipart(form);

		self
	}

	/// Appends an extra header; validated when the request is built.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_to_get_without_body() {
		let options = RequestOptions::default();

		assert_eq!(options.method, ::http::Method::GET);
		assert_eq!(options.body, RequestBody::Empty);
		assert!(options.headers.is_empty());
	}

	#[test]
	fn json_serializes_structs() {
		#[derive(Serialize)]
		struct Notice {
			vacate_date: &'static str,
		}

		let options = RequestOptions::put()
			.json(&Notice { vacate_date: "2026-11-30" })
			.expect("Notice should serialize.")
			.header("X-Request-Id", "abc");

		assert!(options.body.is_json());
		assert_eq!(
			options.body,
			RequestBody::Json(serde_json::json!({ "vacate_date": "2026-11-30" }))
		);
		assert_eq!(options.headers, [("X-Request-Id".to_owned(), "abc".to_owned())]);
	}
}
