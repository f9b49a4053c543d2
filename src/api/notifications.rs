//! In-app notifications.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, RequestOptions},
	http::HttpTransport,
};

/// Notification as returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
	/// Numeric identifier.
	pub id: u64,
	/// Machine-readable kind, e.g. `payment_received` or `repair_update`.
	#[serde(default)]
	pub notification_type: String,
	/// Headline.
	#[serde(default)]
	pub title: String,
	/// Message text.
	#[serde(default)]
	pub body: String,
	/// Whether the user has seen it.
	#[serde(default)]
	pub is_read: bool,
	/// Creation timestamp as sent by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	/// Kind-specific details.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<JsonValue>,
}
impl Notification {
	/// Checks whether the notification concerns a payment.
	pub fn is_payment(&self) -> bool {
		self.notification_type.contains("payment")
	}

	/// Checks whether the notification concerns a repair request.
	pub fn is_repair(&self) -> bool {
		self.notification_type.contains("repair")
	}
}

#[derive(Deserialize)]
struct NotificationFeed {
	#[serde(default)]
	notifications: Vec<Notification>,
}

/// Handle for `/notifications`.
#[derive(Debug)]
pub struct NotificationsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> NotificationsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Lists the current user's notifications, newest first as the server orders them.
	pub async fn list(&self) -> Result<Vec<Notification>> {
		let feed: NotificationFeed =
			self.client.request_json("/notifications", RequestOptions::get()).await?;

		Ok(feed.notifications)
	}

	/// Marks one notification as read.
	pub async fn mark_read(&self, id: u64) -> Result<()> {
		self.client.request(&format!("/notifications/{id}"), RequestOptions::patch()).await?;

		Ok(())
	}
}
