//! The authenticated client facade plus its request, refresh, and session operations.

pub mod options;
pub mod refresh;

mod request;
mod session;

pub use options::*;
pub use refresh::*;

// self
use crate::{
	_prelude::*,
	auth::{NoopSessionListener, SessionListener},
	client::refresh::RefreshGate,
	config::ClientConfig,
	http::HttpTransport,
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Issues bearer-authenticated calls against the rental API.
///
/// The client owns the transport, the credential store, and the refresh gate. Clones share all
/// of them, so every clone joins the same refresh when a token expires: at most one refresh
/// call is in flight per client family, and callers rejected while it runs are queued and
/// replayed once it settles.
pub struct ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Store holding the access token, refresh token, and user profile.
	pub store: Arc<dyn CredentialStore>,
	/// Base URL and auth endpoint paths.
	pub config: ClientConfig,
	/// Notified whenever a refresh fails and the session is cleared.
	pub listener: Arc<dyn SessionListener>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_gate: Arc<RefreshGate>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		store: Arc<dyn CredentialStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			config,
			listener: Arc::new(NoopSessionListener),
			refresh_metrics: Default::default(),
			refresh_gate: Default::default(),
		}
	}

	/// Sets or replaces the listener told about expired sessions.
	pub fn with_session_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
		self.listener = listener;

		self
	}

	/// Returns `true` while a token refresh is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.refresh_gate.is_refreshing()
	}

	/// Number of callers currently parked behind the in-flight refresh.
	pub fn pending_refresh_waiters(&self) -> usize {
		self.refresh_gate.pending()
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Self {
		Self::with_transport(config, store, ReqwestTransport::default())
	}

	/// Creates a reqwest-backed client whose base URL comes from the environment.
	///
	/// See [`ClientConfig::from_env`] for the variable consulted and its fallback.
	pub fn from_env(store: Arc<dyn CredentialStore>) -> Result<Self> {
		let config = ClientConfig::from_env().map_err(crate::error::ConfigError::from)?;

		Ok(Self::new(config, store))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
			listener: self.listener.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_gate: self.refresh_gate.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("endpoints", &self.config.endpoints)
			.field("refreshing", &self.is_refreshing())
			.finish()
	}
}
