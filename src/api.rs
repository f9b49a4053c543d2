//! Typed wrappers over the rental API's resource endpoints.
//!
//! Each accessor on [`ApiClient`] returns a lightweight handle borrowing the client, so calls
//! read as `client.leases().list()` and share the client's refresh coordination.

mod dashboards;
mod health;
mod leases;
mod notifications;
mod payments;
mod properties;
mod repairs;
mod users;

pub use dashboards::DashboardsApi;
pub use health::{HealthApi, HealthStatus};
pub use leases::{Lease, LeasesApi, NewLease, VacateNotice};
pub use notifications::{Notification, NotificationsApi};
pub use payments::{
	Payment, PaymentProgress, PaymentRequest, PaymentStatus, PaymentType, PaymentsApi,
};
pub use properties::{Picture, PropertiesApi, Property, PropertyForm, PropertyStatus};
pub use repairs::{RepairCategory, RepairPriority, RepairRequest, RepairsApi};
pub use users::{ProfileUpdate, UsersApi};

// self
use crate::{client::ApiClient, http::HttpTransport};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Property listings, including picture uploads.
	pub fn properties(&self) -> PropertiesApi<'_, T> {
		PropertiesApi::new(self)
	}

	/// Leases and vacate notices.
	pub fn leases(&self) -> LeasesApi<'_, T> {
		LeasesApi::new(self)
	}

	/// Rent and deposit payments, plus rent reminders.
	pub fn payments(&self) -> PaymentsApi<'_, T> {
		PaymentsApi::new(self)
	}

	/// In-app notifications.
	pub fn notifications(&self) -> NotificationsApi<'_, T> {
		NotificationsApi::new(self)
	}

	/// Tenant repair requests.
	pub fn repairs(&self) -> RepairsApi<'_, T> {
		RepairsApi::new(self)
	}

	/// Role-specific dashboards.
	pub fn dashboards(&self) -> DashboardsApi<'_, T> {
		DashboardsApi::new(self)
	}

	/// Profile and account administration.
	pub fn users(&self) -> UsersApi<'_, T> {
		UsersApi::new(self)
	}

	/// Service health.
	pub fn health(&self) -> HealthApi<'_, T> {
		HealthApi::new(self)
	}
}
