//! Authenticated request execution with a single replay after a token refresh.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	client::{ApiClient, RequestBody, RequestOptions},
	error::{ConfigError, DecodeError},
	http::{ApiRequest, HttpResponse, HttpTransport, Payload},
	obs::{self, CallKind},
};

const APPLICATION_JSON: &str = "application/json";

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Calls `path` with the stored bearer token and returns the parsed JSON body.
	///
	/// A 401 on any path but the refresh endpoint triggers one coordinated refresh followed by
	/// a single replay. Returns `Ok(None)` for 2xx responses that are not JSON.
	pub async fn request(
		&self,
		path: &str,
		options: RequestOptions,
	) -> Result<Option<JsonValue>> {
		obs::observe(CallKind::Request, "request", async {
			let response = self.execute(path, &options).await?;

			json_body(path, &response)
		})
		.await
	}

	/// Like [`ApiClient::request`], decoding the body into `R`.
	///
	/// Non-JSON bodies decode from `null`, so `R = ()` or `Option<_>` fits empty responses.
	pub async fn request_json<R>(&self, path: &str, options: RequestOptions) -> Result<R>
	where
		R: DeserializeOwned,
	{
		obs::observe(CallKind::Request, "request_json", async {
			let response = self.execute(path, &options).await?;
			let body = if is_json(&response) && !is_blank(response.body()) {
				response.body().as_slice()
			} else {
				b"null".as_slice()
			};

			decode(path, body)
		})
		.await
	}

	/// Sends the call, recovering from one 401, and fails on any remaining non-2xx status.
	pub(crate) async fn execute(
		&self,
		path: &str,
		options: &RequestOptions,
	) -> Result<HttpResponse> {
		let url = self.config.endpoint(path)?;
		let payload = encode_body(&options.body)?;
		let token = self.store.access_token().await?;
		let response = self.dispatch(&url, options, &payload, token.as_ref()).await?;

		if response.status() != ::http::StatusCode::UNAUTHORIZED
			|| self.config.is_refresh_path(path)
		{
			return ensure_success(&options.method, path, response);
		}

		let fresh = self.recover_unauthorized(path, token.as_ref()).await?;
		let replay = self.dispatch(&url, options, &payload, Some(&fresh)).await?;

		ensure_success(&options.method, path, replay)
	}

	async fn dispatch(
		&self,
		url: &Url,
		options: &RequestOptions,
		payload: &Payload,
		token: Option<&TokenSecret>,
	) -> Result<HttpResponse> {
		let headers = build_headers(options, token)?;
		let request = ApiRequest {
			method: options.method.clone(),
			url: url.clone(),
			headers,
			payload: payload.clone(),
		};

		Ok(self.transport.execute(request).await?)
	}
}

/// Encodes a body once so a replay sends identical bytes.
pub(crate) fn encode_body(body: &RequestBody) -> Result<Payload> {
	Ok(match body {
		RequestBody::Empty => Payload::Empty,
		RequestBody::Json(value) =>
			Payload::Bytes(serde_json::to_vec(value).map_err(ConfigError::BodyEncode)?),
		RequestBody::Multipart(form) => Payload::Multipart(form.clone()),
	})
}

/// Resolves the headers for one attempt.
///
/// Order: JSON content type, then caller headers, then `Authorization`. Multipart bodies never
/// carry a caller content type because the transport must add the boundary.
pub(crate) fn build_headers(
	options: &RequestOptions,
	token: Option<&TokenSecret>,
) -> Result<::http::HeaderMap> {
	let mut headers = ::http::HeaderMap::new();

	if options.body.is_json() {
		headers.insert(
			::http::header::CONTENT_TYPE,
			::http::HeaderValue::from_static(APPLICATION_JSON),
		);
	}

	for (name, value) in &options.headers {
		let invalid = || ConfigError::InvalidHeader { name: name.clone() };
		let name = ::http::HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let value = ::http::HeaderValue::from_str(value).map_err(|_| invalid())?;

		headers.insert(name, value);
	}

	if matches!(options.body, RequestBody::Multipart(_)) {
		headers.remove(::http::header::CONTENT_TYPE);
	}
	if let Some(token) = token {
		headers.insert(::http::header::AUTHORIZATION, bearer_value(token)?);
	}

	Ok(headers)
}

pub(crate) fn bearer_value(token: &TokenSecret) -> Result<::http::HeaderValue> {
	let mut value = ::http::HeaderValue::from_str(&token.bearer()).map_err(|_| {
		ConfigError::InvalidHeader { name: ::http::header::AUTHORIZATION.to_string() }
	})?;

	value.set_sensitive(true);

	Ok(value)
}

/// Passes 2xx responses through and turns anything else into [`Error::Http`].
pub(crate) fn ensure_success(
	method: &::http::Method,
	path: &str,
	response: HttpResponse,
) -> Result<HttpResponse> {
	if response.status().is_success() {
		return Ok(response);
	}

	Err(Error::Http {
		method: method.to_string(),
		path: path.to_owned(),
		status: response.status().as_u16(),
		message: error_message(&response),
	})
}

/// Best-effort failure text: JSON `message`, JSON `error`, the raw body, the status reason.
pub(crate) fn error_message(response: &HttpResponse) -> String {
	let text = String::from_utf8_lossy(response.body());
	let text = text.trim();

	if let Ok(JsonValue::Object(map)) = serde_json::from_str::<JsonValue>(text) {
		for field in ["message", "error"] {
			if let Some(message) =
				map.get(field).and_then(JsonValue::as_str).filter(|message| !message.is_empty())
			{
				return message.to_owned();
			}
		}
	}
	if !text.is_empty() {
		return text.to_owned();
	}

	match response.status().canonical_reason() {
		Some(reason) => reason.to_owned(),
		None => format!("API error: {}", response.status().as_u16()),
	}
}

pub(crate) fn is_json(response: &HttpResponse) -> bool {
	response
		.headers()
		.get(::http::header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.map(|value| {
			let essence = value.split(';').next().unwrap_or(value).trim().to_ascii_lowercase();

			essence == APPLICATION_JSON || essence.ends_with("+json")
		})
		.unwrap_or(false)
}

fn is_blank(body: &[u8]) -> bool {
	body.iter().all(u8::is_ascii_whitespace)
}

fn json_body(path: &str, response: &HttpResponse) -> Result<Option<JsonValue>> {
	if !is_json(response) || is_blank(response.body()) {
		return Ok(None);
	}

	decode(path, response.body()).map(Some)
}

pub(crate) fn decode<R>(path: &str, body: &[u8]) -> Result<R>
where
	R: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Json { path: path.to_owned(), source }.into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::http::MultipartForm;

	fn response(status: u16, content_type: Option<&str>, body: &str) -> HttpResponse {
		let mut builder = ::http::Response::builder().status(status);

		if let Some(content_type) = content_type {
			builder = builder.header(::http::header::CONTENT_TYPE, content_type);
		}

		builder.body(body.as_bytes().to_vec()).expect("Test response should build.")
	}

	#[test]
	fn json_body_gets_content_type_and_single_authorization() {
		let options = RequestOptions::post()
			.json_value(serde_json::json!({ "a": 1 }))
			.header("Authorization", "Bearer caller");
		let headers = build_headers(&options, Some(&TokenSecret::new("T1")))
			.expect("Headers should build.");

		assert_eq!(headers.get_all(::http::header::AUTHORIZATION).iter().count(), 1);
		assert_eq!(headers[::http::header::AUTHORIZATION], "Bearer T1");
		assert_eq!(headers[::http::header::CONTENT_TYPE], APPLICATION_JSON);
	}

	#[test]
	fn empty_and_multipart_bodies_have_no_json_content_type() {
		let empty = build_headers(&RequestOptions::get(), None).expect("Headers should build.");
		let multipart = build_headers(
			&RequestOptions::post()
				.multipart(MultipartForm::new().text("name", "Loft"))
				.header("Content-Type", "application/json"),
			None,
		)
		.expect("Headers should build.");

		assert!(empty.is_empty());
		assert!(multipart.get(::http::header::CONTENT_TYPE).is_none());
		assert!(multipart.get(::http::header::AUTHORIZATION).is_none());
	}

	#[test]
	fn caller_headers_override_defaults() {
		let options = RequestOptions::post()
			.json_value(JsonValue::Null)
			.header("Content-Type", "application/merge-patch+json");
		let headers = build_headers(&options, None).expect("Headers should build.");

		assert_eq!(headers[::http::header::CONTENT_TYPE], "application/merge-patch+json");
	}

	#[test]
	fn invalid_header_is_a_config_error() {
		let options = RequestOptions::get().header("bad header", "x");
		let err = build_headers(&options, None).expect_err("Header name with space must fail.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidHeader { .. })));
	}

	#[test]
	fn error_message_prefers_message_then_error_then_text() {
		assert_eq!(
			error_message(&response(400, Some(APPLICATION_JSON), r#"{"message":"Bad dates"}"#)),
			"Bad dates"
		);
		assert_eq!(
			error_message(&response(403, Some(APPLICATION_JSON), r#"{"error":"Forbidden lease"}"#)),
			"Forbidden lease"
		);
		assert_eq!(error_message(&response(502, None, "upstream down")), "upstream down");
		assert_eq!(error_message(&response(404, None, "")), "Not Found");
		assert_eq!(error_message(&response(599, None, "")), "API error: 599");
	}

	#[test]
	fn ensure_success_maps_status() {
		let err = ensure_success(
			&::http::Method::DELETE,
			"/properties/3",
			response(500, Some(APPLICATION_JSON), r#"{"message":"boom"}"#),
		)
		.expect_err("500 must fail.");

		assert!(matches!(
			err,
			Error::Http { ref method, status: 500, ref message, .. }
				if method == "DELETE" && message == "boom"
		));
	}

	#[test]
	fn json_detection_handles_parameters_and_suffixes() {
		assert!(is_json(&response(200, Some("application/json; charset=utf-8"), "{}")));
		assert!(is_json(&response(200, Some("application/problem+json"), "{}")));
		assert!(!is_json(&response(200, Some("text/plain"), "{}")));
		assert!(!is_json(&response(200, None, "{}")));
	}

	#[test]
	fn json_body_skips_blank_and_non_json_bodies() {
		assert_eq!(
			json_body("/health", &response(200, Some(APPLICATION_JSON), " ")).expect("Blank ok."),
			None
		);
		assert_eq!(json_body("/health", &response(200, None, "ok")).expect("Text ok."), None);
		assert_eq!(
			json_body("/health", &response(200, Some(APPLICATION_JSON), r#"{"ok":true}"#))
				.expect("JSON ok."),
			Some(serde_json::json!({ "ok": true }))
		);
	}

	#[test]
	fn decode_reports_json_path() {
		#[derive(Debug, Deserialize)]
		struct Lease {
			#[allow(dead_code)]
			id: u64,
		}

		let err = decode::<Vec<Lease>>("/leases", br#"[{"id":1},{"id":"x"}]"#)
			.expect_err("String id must not decode.");

		match err {
			Error::Decode(DecodeError::Json { path, source }) => {
				assert_eq!(path, "/leases");
				assert_eq!(source.path().to_string(), "[1].id");
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}
}
