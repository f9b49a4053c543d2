//! Rent and deposit payments, plus landlord rent reminders.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, RequestOptions},
	http::HttpTransport,
};

/// What a payment settles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
	/// Monthly rent.
	#[default]
	Rent,
	/// Security deposit.
	Deposit,
	/// Type string this client does not recognize.
	#[serde(other)]
	Unknown,
}

/// Processing state of a payment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
	/// Waiting for the payer to confirm on their phone.
	#[default]
	Pending,
	/// Money received.
	Success,
	/// Declined or timed out.
	Failed,
	/// Status string this client does not recognize.
	#[serde(other)]
	Unknown,
}
impl PaymentStatus {
	/// Checks whether the payment reached a terminal state.
	pub fn is_final(self) -> bool {
		matches!(self, Self::Success | Self::Failed)
	}
}

/// Mobile-money payment request for a lease.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaymentRequest {
	/// Lease being paid for.
	pub lease_id: u64,
	/// Amount to charge.
	pub amount: f64,
	/// What the payment settles.
	pub payment_type: PaymentType,
	/// Phone number that receives the payment prompt.
	pub phone_number: String,
}

/// Reply to [`PaymentsApi::initiate`] and [`PaymentsApi::status`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PaymentProgress {
	/// Identifier to poll with.
	#[serde(default)]
	pub payment_id: Option<u64>,
	/// Current state.
	pub status: PaymentStatus,
	/// Remaining backend fields.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, JsonValue>,
}

/// Recorded payment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
	/// Numeric identifier.
	pub id: u64,
	/// Amount paid.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub amount: Option<f64>,
	/// What the payment settled.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payment_type: Option<PaymentType>,
	/// Payment channel, e.g. `mpesa`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub method: Option<String>,
	/// Provider transaction reference.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transaction_id: Option<String>,
	/// Processing state.
	#[serde(default)]
	pub status: PaymentStatus,
	/// Creation timestamp as sent by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	/// Remaining backend fields.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, JsonValue>,
}

#[derive(Deserialize)]
struct PaymentHistory {
	#[serde(default)]
	payments: Vec<Payment>,
}

#[derive(Deserialize)]
struct Acknowledgement {
	#[serde(default)]
	message: Option<String>,
}

/// Handle for `/payments` and `/reminders`.
#[derive(Debug)]
pub struct PaymentsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> PaymentsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Starts a payment; poll [`PaymentsApi::status`] until it is final.
	pub async fn initiate(&self, payment: &PaymentRequest) -> Result<PaymentProgress> {
		self.client.request_json("/payments/initiate", RequestOptions::post().json(payment)?).await
	}

	/// Reads the processing state of a payment.
	pub async fn status(&self, payment_id: u64) -> Result<PaymentProgress> {
		self.client
			.request_json(&format!("/payments/status/{payment_id}"), RequestOptions::get())
			.await
	}

	/// Fetches a recorded payment.
	pub async fn get(&self, payment_id: u64) -> Result<Payment> {
		self.client.request_json(&format!("/payments/{payment_id}"), RequestOptions::get()).await
	}

	/// Lists the payments made against a lease.
	pub async fn for_lease(&self, lease_id: u64) -> Result<Vec<Payment>> {
		let history: PaymentHistory = self
			.client
			.request_json(&format!("/payments/lease/{lease_id}"), RequestOptions::get())
			.await?;

		Ok(history.payments)
	}

	/// Landlord payment summary, as raw JSON.
	pub async fn landlord_summary(&self) -> Result<JsonValue> {
		self.client.request_json("/landlord/payments/dashboard", RequestOptions::get()).await
	}

	/// Sends rent reminders to tenants with rent due; returns the server's message, if any.
	pub async fn send_rent_reminders(&self) -> Result<Option<String>> {
		let options = RequestOptions::post().json_value(JsonValue::Object(Default::default()));
		let reply: Option<Acknowledgement> =
			self.client.request_json("/reminders/rent", options).await?;

		Ok(reply.and_then(|reply| reply.message))
	}
}
