//! Login and refresh payloads plus the user profile persisted alongside the tokens.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Account role assigned by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// Owns properties and issues leases.
	Landlord,
	/// Rents a property under a lease.
	Tenant,
	/// Operates the platform.
	Admin,
	/// Role string this client does not recognize.
	#[serde(other)]
	Unknown,
}

/// User blob stored under the `user` key after login or refresh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Login e-mail address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Account role.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<Role>,
	/// Public username.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// Remaining backend fields, kept verbatim.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, JsonValue>,
}

/// Authenticated session returned by [`ApiClient::login`](crate::client::ApiClient::login).
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
	/// Profile of the logged-in user, when the backend returned one.
	pub user: Option<UserProfile>,
	/// Whether the backend issued a refresh token.
	pub refreshable: bool,
}

/// Token payload returned by the login and refresh endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenGrant {
	/// Newly issued access token.
	pub access_token: TokenSecret,
	/// Refresh token, present at login and when the backend rotates it.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Full user object, when returned.
	#[serde(default)]
	pub user: Option<UserProfile>,
	#[serde(default)]
	email: Option<String>,
	#[serde(default)]
	role: Option<Role>,
}
impl TokenGrant {
	/// Returns the user profile, synthesizing one from the flat `email`/`role` fields the login
	/// endpoint uses when no `user` object is present.
	pub fn profile(&self) -> Option<UserProfile> {
		if let Some(user) = &self.user {
			return Some(user.clone());
		}
		if self.email.is_none() && self.role.is_none() {
			return None;
		}

		Some(UserProfile { email: self.email.clone(), role: self.role, ..Default::default() })
	}
}

/// Login bodies come either bare or wrapped in `{message, data}`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum GrantEnvelope {
	Wrapped { data: TokenGrant },
	Bare(TokenGrant),
}
impl GrantEnvelope {
	pub(crate) fn into_grant(self) -> TokenGrant {
		match self {
			Self::Wrapped { data } => data,
			Self::Bare(grant) => grant,
		}
	}
}

/// Credentials posted to the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
	/// Account e-mail.
	pub email: String,
	/// Account password.
	pub password: String,
}
impl LoginRequest {
	/// Creates a new login request.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Account details posted to the registration endpoint.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
	/// Public username.
	pub username: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Login e-mail.
	pub email: String,
	/// Contact phone number.
	pub phone_number: String,
	/// National identity number.
	pub national_id: String,
	/// Requested role.
	pub role: Role,
	/// Account password.
	pub password: String,
}
impl Debug for RegisterRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegisterRequest")
			.field("username", &self.username)
			.field("email", &self.email)
			.field("role", &self.role)
			.finish_non_exhaustive()
	}
}
