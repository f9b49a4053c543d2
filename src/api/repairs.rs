//! Repair requests filed by tenants.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, RequestOptions},
	http::HttpTransport,
};

/// Trade a repair belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairCategory {
	/// Anything else.
	#[default]
	General,
	/// Pipes, taps, drains.
	Plumbing,
	/// Wiring, sockets, lights.
	Electrical,
	/// Heating, ventilation, air conditioning.
	Hvac,
	/// Fitted appliances.
	Appliances,
	/// Walls, roof, floors.
	Structural,
	/// Pest control.
	PestControl,
}

/// How soon a repair is needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairPriority {
	/// Whenever convenient.
	Low,
	/// Regular queue.
	#[default]
	Normal,
	/// Soon.
	High,
	/// Safety or habitability issue.
	Urgent,
}

/// Body of a repair request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RepairRequest {
	/// Property needing the repair.
	pub property_id: u64,
	/// Short summary.
	pub title: String,
	/// Details for the landlord.
	pub description: String,
	/// Trade.
	pub category: RepairCategory,
	/// Urgency.
	pub priority: RepairPriority,
}
impl RepairRequest {
	/// Creates a general, normal-priority request.
	pub fn new(property_id: u64, title: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			property_id,
			title: title.into(),
			description: description.into(),
			category: RepairCategory::default(),
			priority: RepairPriority::default(),
		}
	}

	/// Sets the trade.
	pub fn category(mut self, category: RepairCategory) -> Self {
		self.category = category;

		self
	}

	/// Sets the urgency.
	pub fn priority(mut self, priority: RepairPriority) -> Self {
		self.priority = priority;

		self
	}
}

/// Handle for `/repairs`.
#[derive(Debug)]
pub struct RepairsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> RepairsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Files a repair request and returns the server's reply, if it sent JSON.
	pub async fn submit(&self, request: &RepairRequest) -> Result<Option<JsonValue>> {
		self.client.request("/repairs", RequestOptions::post().json(request)?).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_defaults_and_wire_names() {
		let request = RepairRequest::new(3, "Leaking tap", "Kitchen tap drips all night.")
			.category(RepairCategory::PestControl)
			.priority(RepairPriority::Urgent);

		assert_eq!(
			serde_json::to_value(&request).expect("Repair request should serialize."),
			serde_json::json!({
				"property_id": 3,
				"title": "Leaking tap",
				"description": "Kitchen tap drips all night.",
				"category": "pest_control",
				"priority": "urgent"
			})
		);
		assert_eq!(RepairRequest::new(1, "a", "b").priority, RepairPriority::Normal);
	}
}
