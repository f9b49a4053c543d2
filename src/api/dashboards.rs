//! Role-specific dashboards, returned as raw JSON.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, RequestOptions},
	http::HttpTransport,
};

/// Handle for `/dashboard/*`.
#[derive(Debug)]
pub struct DashboardsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> DashboardsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Portfolio overview for landlords.
	pub async fn landlord(&self) -> Result<JsonValue> {
		self.fetch("landlord").await
	}

	/// Lease overview for tenants.
	pub async fn tenant(&self) -> Result<JsonValue> {
		self.fetch("tenant").await
	}

	/// Platform overview for admins.
	pub async fn admin(&self) -> Result<JsonValue> {
		self.fetch("admin").await
	}

	/// Aggregate counters for the current user's role.
	pub async fn stats(&self) -> Result<JsonValue> {
		self.fetch("stats").await
	}

	/// Profile card data.
	pub async fn profile(&self) -> Result<JsonValue> {
		self.fetch("profile").await
	}

	async fn fetch(&self, board: &str) -> Result<JsonValue> {
		self.client.request_json(&format!("/dashboard/{board}"), RequestOptions::get()).await
	}
}
