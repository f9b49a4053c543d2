//! Storage contracts and built-in store implementations for session credentials.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, UserProfile},
};

/// Boxed future returned by every [`CredentialStore`] operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key-value contract backing the persisted session (browser storage in the web client).
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if present.
	fn get(&self, key: StoreKey) -> StoreFuture<'_, Option<String>>;

	/// Persists or replaces the value stored under `key`.
	fn set(&self, key: StoreKey, value: String) -> StoreFuture<'_, ()>;

	/// Removes `key`; deleting a missing key is not an error.
	fn delete(&self, key: StoreKey) -> StoreFuture<'_, ()>;

	/// Removes every session key.
	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			for key in StoreKey::ALL {
				self.delete(key).await?;
			}

			Ok(())
		})
	}
}
impl dyn CredentialStore {
	/// Returns the stored access token.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>, StoreError> {
		Ok(self.get(StoreKey::AccessToken).await?.map(TokenSecret::from))
	}

	/// Returns the stored refresh token.
	pub async fn refresh_token(&self) -> Result<Option<TokenSecret>, StoreError> {
		Ok(self.get(StoreKey::RefreshToken).await?.map(TokenSecret::from))
	}

	/// Returns the stored user profile.
	pub async fn user(&self) -> Result<Option<UserProfile>, StoreError> {
		match self.get(StoreKey::User).await? {
			Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
				StoreError::Serialization { message: format!("Stored user is malformed: {e}") }
			}),
			None => Ok(None),
		}
	}

	/// Writes whichever session parts are provided, leaving the others untouched.
	pub async fn save_session(
		&self,
		access: &TokenSecret,
		refresh: Option<&TokenSecret>,
		user: Option<&UserProfile>,
	) -> Result<(), StoreError> {
		self.set(StoreKey::AccessToken, access.expose().to_owned()).await?;

		if let Some(refresh) = refresh {
			self.set(StoreKey::RefreshToken, refresh.expose().to_owned()).await?;
		}
		if let Some(user) = user {
			let raw = serde_json::to_string(user).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize user: {e}"),
			})?;

			self.set(StoreKey::User, raw).await?;
		}

		Ok(())
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Keys persisted by the client; names match the web client's storage keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoreKey {
	/// Short-lived bearer credential.
	#[serde(rename = "accessToken")]
	AccessToken,
	/// Long-lived credential exchanged for new access tokens.
	#[serde(rename = "refreshToken")]
	RefreshToken,
	/// JSON-encoded [`UserProfile`].
	#[serde(rename = "user")]
	User,
}
impl StoreKey {
	/// Every key making up a session.
	pub const ALL: [StoreKey; 3] = [Self::AccessToken, Self::RefreshToken, Self::User];

	/// Returns the storage key string.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "accessToken",
			Self::RefreshToken => "refreshToken",
			Self::User => "user",
		}
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
