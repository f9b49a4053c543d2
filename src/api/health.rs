//! Service health.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, RequestOptions},
	http::HttpTransport,
};

/// Body of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
	/// `healthy` when the service is up.
	pub status: String,
	/// Human-readable note.
	#[serde(default)]
	pub message: Option<String>,
	/// API version string.
	#[serde(default)]
	pub api_version: Option<String>,
}
impl HealthStatus {
	/// Checks whether the service reported itself healthy.
	pub fn is_healthy(&self) -> bool {
		self.status.eq_ignore_ascii_case("healthy")
	}
}

/// Handle for `/health`; the endpoint needs no token.
#[derive(Debug)]
pub struct HealthApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> HealthApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Fetches the health report.
	pub async fn check(&self) -> Result<HealthStatus> {
		self.client.request_json("/health", RequestOptions::get()).await
	}

	/// Returns `true` when the service is reachable and reports itself healthy.
	pub async fn is_healthy(&self) -> bool {
		self.check().await.map(|status| status.is_healthy()).unwrap_or(false)
	}
}
