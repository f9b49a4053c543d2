//! Transport primitives for API calls.
//!
//! The module exposes [`HttpTransport`], the client's only dependency on an HTTP stack, along
//! with the wire-level [`ApiRequest`] it executes. The client resolves authorization and
//! content-type headers before handing a request over, so transports only move bytes; the
//! one exception is multipart bodies, whose boundary-bearing content type is left to the
//! transport.

pub mod multipart;

pub use multipart::*;

// self
use crate::{_prelude::*, error::TransportError};

/// Response type returned by transports.
pub type HttpResponse = ::http::Response<Vec<u8>>;

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing API requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// clone of a client, and the futures they return must be `Send` so client calls can hop
/// executors. A transport reports only transport-level failures; any HTTP status, including
/// 401 and 5xx, is a successful [`HttpResponse`].
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the full response body.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// Fully-resolved request handed to an [`HttpTransport`].
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: ::http::Method,
	/// Absolute target URL.
	pub url: Url,
	/// Headers to send verbatim.
	pub headers: ::http::HeaderMap,
	/// Encoded body.
	pub payload: Payload,
}
impl ApiRequest {
	/// Returns the bearer token carried in the `Authorization` header, if any.
	pub fn bearer(&self) -> Option<&str> {
		self.headers
			.get(::http::header::AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.strip_prefix("Bearer "))
	}
}

/// Encoded request body.
#[derive(Clone, Debug, Default)]
pub enum Payload {
	/// No body.
	#[default]
	Empty,
	/// Pre-encoded bytes (JSON bodies land here).
	Bytes(Vec<u8>),
	/// Multipart form data, rebuilt by the transport on every attempt.
	Multipart(MultipartForm),
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds the transport from a configured reqwest builder (proxies, TLS roots, timeouts).
	pub fn from_builder(
		builder: reqwest::ClientBuilder,
	) -> Result<Self, crate::error::ConfigError> {
		builder.build().map(Self).map_err(crate::error::ConfigError::http_client_build)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let ApiRequest { method, url, headers, payload } = request;
			let mut builder = client.request(method, url.clone()).headers(headers);

			builder = match payload {
				Payload::Empty => builder,
				Payload::Bytes(bytes) => builder.body(bytes),
				Payload::Multipart(form) => builder.multipart(
					form.to_reqwest().map_err(|e| TransportError::request(&url, e))?,
				),
			};

			let response = builder.send().await.map_err(|e| TransportError::network(&url, e))?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let bytes = response.bytes().await.map_err(|e| TransportError::network(&url, e))?;
			let mut response_new = HttpResponse::new(bytes.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bearer_reads_authorization_header() {
		let mut headers = ::http::HeaderMap::new();

		headers.insert(
			::http::header::AUTHORIZATION,
			::http::HeaderValue::from_static("Bearer T1"),
		);

		let request = ApiRequest {
			method: ::http::Method::GET,
			url: Url::parse("http://localhost:5000/leases").expect("Test URL should parse."),
			headers,
			payload: Payload::Empty,
		};

		assert_eq!(request.bearer(), Some("T1"));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn builder_failures_surface_as_config_errors() {
		let builder = ReqwestClient::builder().user_agent("bad\nagent");
		let err = ReqwestTransport::from_builder(builder)
			.err()
			.expect("A header value with a newline must not build.");

		assert!(matches!(err, crate::error::ConfigError::HttpClientBuild { .. }));
	}
}
