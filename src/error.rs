//! Client-level error types shared across requests, sessions, and stores.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS); never retried by the client.
	#[error(transparent)]
	Network(#[from] TransportError),
	/// Successful response whose body does not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Server answered with a non-2xx status after any applicable refresh-retry.
	#[error("API {method} {path} failed: {status} {message}.")]
	Http {
		/// HTTP method of the failed call.
		method: String,
		/// Request path relative to the base URL.
		path: String,
		/// HTTP status code.
		status: u16,
		/// Best-effort message extracted from the response.
		message: String,
	},
	/// Refresh token missing or the refresh call failed; stored credentials were cleared.
	#[error("Session expired: {reason}.")]
	AuthExpired {
		/// Why the session could not be recovered.
		reason: String,
	},
}
impl Error {
	/// Returns the HTTP status for [`Error::Http`] failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Http { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Checks whether the session is gone and the user must log in again.
	pub fn is_auth_expired(&self) -> bool {
		matches!(self, Self::AuthExpired { .. })
	}

	/// Checks whether the server reported a missing resource.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::Http { status: 404, .. })
	}
}
impl From<SessionExpired> for Error {
	fn from(e: SessionExpired) -> Self {
		Self::AuthExpired { reason: e.reason }
	}
}

/// Refresh failure that ended the session.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Session expired: {reason}.")]
pub struct SessionExpired {
	/// Why the session could not be recovered.
	pub reason: String,
}
impl SessionExpired {
	/// Creates a new failure with the provided reason.
	pub fn new(reason: impl Into<String>) -> Self {
		Self { reason: reason.into() }
	}
}

/// Configuration and request-construction failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Client configuration failed validation.
	#[error(transparent)]
	Client(#[from] crate::config::ClientConfigError),
	/// Request path cannot be joined onto the base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Caller supplied a header that is not valid HTTP.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized to JSON.")]
	BodyEncode(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Target URL of the failed call.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Transport could not assemble the outbound request (e.g. a malformed multipart part).
	#[error("Request to {url} could not be built.")]
	Request {
		/// Target URL of the failed call.
		url: String,
		/// Transport-specific builder error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// The refresh call this request was waiting on failed before the API answered.
	#[error("Token refresh failed before the API answered: {message}.")]
	RefreshInterrupted {
		/// Transport failure seen by the refreshing caller.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url: url.to_string(), source: Box::new(src) }
	}

	/// Wraps a transport-specific request construction error.
	pub fn request(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Request { url: url.to_string(), source: Box::new(src) }
	}
}

/// A 2xx response body that could not be decoded into the requested type.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON or does not match the target type.
	#[error("Response from {path} does not match the expected shape.")]
	Json {
		/// Request path relative to the base URL.
		path: String,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
