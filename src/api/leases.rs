//! Leases and vacate notices.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, RequestOptions},
	http::HttpTransport,
};

/// Lease as returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lease {
	/// Numeric identifier.
	pub id: u64,
	/// Leased property.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub property_id: Option<u64>,
	/// First day of the lease (`YYYY-MM-DD`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub start_date: Option<String>,
	/// Last day of the lease (`YYYY-MM-DD`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end_date: Option<String>,
	/// Agreed monthly rent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rent_amount: Option<f64>,
	/// Lifecycle state, e.g. `active`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	/// Remaining backend fields, such as an embedded property.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, JsonValue>,
}
impl Lease {
	/// Checks whether the lease is currently running.
	pub fn is_active(&self) -> bool {
		self.status.as_deref() == Some("active")
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LeaseEnvelope {
	Wrapped { lease: Lease },
	Bare(Lease),
}
impl LeaseEnvelope {
	fn into_lease(self) -> Lease {
		match self {
			Self::Wrapped { lease } => lease,
			Self::Bare(lease) => lease,
		}
	}
}

/// Body of a new lease application.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewLease {
	/// Property to lease.
	pub property_id: u64,
	/// First day (`YYYY-MM-DD`).
	pub start_date: String,
	/// Last day (`YYYY-MM-DD`).
	pub end_date: String,
	/// Agreed monthly rent.
	pub rent_amount: f64,
}

/// Notice that a tenant will leave on `vacate_date`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VacateNotice {
	/// Move-out day (`YYYY-MM-DD`).
	pub vacate_date: String,
}
impl VacateNotice {
	/// Creates a notice for the provided day.
	pub fn new(vacate_date: impl Into<String>) -> Self {
		Self { vacate_date: vacate_date.into() }
	}
}

/// Handle for `/leases`.
#[derive(Debug)]
pub struct LeasesApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> LeasesApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Lists the leases visible to the current user.
	pub async fn list(&self) -> Result<Vec<Lease>> {
		self.client.request_json("/leases", RequestOptions::get()).await
	}

	/// Fetches one lease.
	pub async fn get(&self, id: u64) -> Result<Lease> {
		let envelope: LeaseEnvelope =
			self.client.request_json(&format!("/leases/{id}"), RequestOptions::get()).await?;

		Ok(envelope.into_lease())
	}

	/// Applies for a lease.
	pub async fn create(&self, lease: &NewLease) -> Result<Lease> {
		let envelope: LeaseEnvelope =
			self.client.request_json("/leases", RequestOptions::post().json(lease)?).await?;

		Ok(envelope.into_lease())
	}

	/// Files a vacate notice and returns the server's reply, if it sent JSON.
	pub async fn submit_vacate(
		&self,
		id: u64,
		notice: &VacateNotice,
	) -> Result<Option<JsonValue>> {
		let options = RequestOptions::put().json(notice)?;

		self.client.request(&format!("/leases/{id}/vacate"), options).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn lease_keeps_embedded_property() {
		let body = r#"{"lease":{"id":9,"property_id":3,"start_date":"2026-01-01","end_date":"2026-12-31","rent_amount":1500,"status":"active","property":{"name":"Loft"}}}"#;
		let lease = serde_json::from_str::<LeaseEnvelope>(body)
			.expect("Wrapped lease should decode.")
			.into_lease();

		assert!(lease.is_active());
		assert_eq!(lease.rent_amount, Some(1500.0));
		assert_eq!(lease.extra["property"]["name"], "Loft");
	}
}
