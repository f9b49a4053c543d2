//! Own-profile management and admin user administration.

// self
use crate::{
	_prelude::*,
	auth::UserProfile,
	client::{ApiClient, RequestOptions},
	http::HttpTransport,
};

#[derive(Deserialize)]
struct UserEnvelope {
	user: UserProfile,
}

#[derive(Deserialize)]
struct UserList {
	users: Vec<UserProfile>,
}

/// Editable profile fields; unset fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
	/// Given name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Family name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// Contact phone number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone_number: Option<String>,
}

/// Handle for `/auth/profile` and `/auth/users`.
#[derive(Debug)]
pub struct UsersApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> UsersApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Fetches the current user's profile from the server.
	pub async fn profile(&self) -> Result<UserProfile> {
		let envelope: UserEnvelope =
			self.client.request_json("/auth/profile", RequestOptions::get()).await?;

		Ok(envelope.user)
	}

	/// Updates the current user's profile.
	pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
		let envelope: UserEnvelope =
			self.client.request_json("/auth/profile", RequestOptions::put().json(update)?).await?;

		Ok(envelope.user)
	}

	/// Lists every account; admin only.
	pub async fn list(&self) -> Result<Vec<UserProfile>> {
		let list: UserList = self.client.request_json("/auth/users", RequestOptions::get()).await?;

		Ok(list.users)
	}

	/// Activates or deactivates an account; admin only.
	pub async fn set_active(&self, user_id: &str, active: bool) -> Result<UserProfile> {
		let options = RequestOptions::patch().json_value(serde_json::json!({ "is_active": active }));
		let envelope: UserEnvelope =
			self.client.request_json(&format!("/auth/users/{user_id}"), options).await?;

		Ok(envelope.user)
	}
}
