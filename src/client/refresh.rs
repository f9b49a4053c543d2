//! Access-token refresh with single-flight coordination and replay of queued callers.
//!
//! The first caller rejected with 401 becomes the refresh leader; callers rejected while the
//! leader runs park on the refresh gate in arrival order. Once the leader has an outcome it
//! releases every parked caller with the same result before replaying its own request.
//!
//! A refresh the API rejects, or one that cannot start for lack of a refresh token, ends the
//! session: stored credentials are wiped once, the
//! [`SessionListener`](crate::auth::SessionListener) hears about it once, and every caller gets
//! [`Error::AuthExpired`]. A refresh call that fails in transport keeps the session and fails
//! every caller with [`Error::Network`].

mod gate;
mod metrics;

pub use metrics::RefreshMetrics;

pub(crate) use gate::RefreshGate;

// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, session::GrantEnvelope},
	client::{ApiClient, request},
	error::{SessionExpired, TransportError},
	http::{ApiRequest, HttpTransport, Payload},
	obs::{self, CallKind, RefreshCause},
};
use gate::{Admission, RefreshFailure, RefreshOutcome};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Forces a refresh and returns the new access token.
	///
	/// Joins the refresh already in flight when there is one instead of starting another.
	pub async fn refresh_access_token(&self) -> Result<TokenSecret> {
		self.coordinate(None).await
	}

	/// Returns a token to replay a request whose `sent` token was rejected on `path`.
	pub(crate) async fn recover_unauthorized(
		&self,
		path: &str,
		sent: Option<&TokenSecret>,
	) -> Result<TokenSecret> {
		self.coordinate(Some(Rejected { path, sent })).await
	}

	async fn coordinate(&self, rejected: Option<Rejected<'_>>) -> Result<TokenSecret> {
		match self.refresh_gate.admit() {
			Admission::Waiter(receiver) => {
				if let Some(rejected) = &rejected {
					obs::unauthorized(rejected.path, true);
				}

				gate::wait(receiver).await.map_err(RefreshFailure::into_error)
			},
			Admission::Leader(lease) => {
				if let Some(rejected) = &rejected {
					obs::unauthorized(rejected.path, false);
				}

				let outcome = match self.settled_elsewhere(rejected.as_ref()).await {
					Some(settled) => settled.map_err(RefreshFailure::into_error),
					None => self.refresh_session().await,
				};

				obs::record_refresh_released(lease.settle(&shared_outcome(&outcome)));

				outcome
			},
		}
	}

	/// Settles a 401 without a refresh call when the store changed under the request.
	///
	/// A different stored token means another refresh or a login replaced it while the request
	/// was in flight. A missing token after one was sent means the session already ended, and
	/// whoever ended it has already cleared the store and notified the listener.
	async fn settled_elsewhere(&self, rejected: Option<&Rejected<'_>>) -> Option<RefreshOutcome> {
		let rejected = rejected?;
		let current = self.store.access_token().await.ok()?;

		match (rejected.sent, current) {
			(Some(sent), Some(current)) if sent == &current => None,
			(_, Some(current)) => {
				obs::stale_token_recovered();
				self.refresh_metrics.record_stale();

				Some(Ok(current))
			},
			(Some(_), None) =>
				Some(Err(RefreshFailure::expired("session ended while the request was in flight"))),
			(None, None) => None,
		}
	}

	/// Runs the refresh call and persists the new token pair.
	async fn refresh_session(&self) -> Result<TokenSecret> {
		obs::observe(CallKind::Refresh, "refresh_session", async {
			self.refresh_metrics.record_attempt();

			match self.exchange_refresh_token().await {
				Ok(token) => {
					self.refresh_metrics.record_success();

					Ok(token)
				},
				Err(ExchangeFailure::Unreachable(e)) => {
					self.refresh_metrics.record_failure();
					obs::record_refresh_failure(RefreshCause::Unreachable);
					obs::refresh_unreachable(&e, self.refresh_gate.pending());

					Err(e.into())
				},
				Err(ExchangeFailure::Rejected(reason)) => Err(self.expire(reason).await.into()),
			}
		})
		.await
	}

	async fn exchange_refresh_token(&self) -> std::result::Result<TokenSecret, ExchangeFailure> {
		let refresh = self
			.store
			.refresh_token()
			.await
			.map_err(|e| format!("refresh token could not be read: {}", describe(e)))?
			.ok_or_else(|| "no refresh token is available".to_owned())?;
		let path = self.config.endpoints.refresh.as_str();
		let url = self.config.endpoint(path).map_err(describe)?;
		let mut headers = ::http::HeaderMap::new();

		headers.insert(
			::http::header::CONTENT_TYPE,
			::http::HeaderValue::from_static("application/json"),
		);

		if self.config.refresh_token_in_header {
			headers.insert(
				::http::header::AUTHORIZATION,
				request::bearer_value(&refresh).map_err(describe)?,
			);
		}

		let body = serde_json::to_vec(&serde_json::json!({ "refresh_token": refresh.expose() }))
			.map_err(|e| format!("refresh body could not be encoded: {}", describe(e)))?;
		let response = self
			.transport
			.execute(ApiRequest {
				method: ::http::Method::POST,
				url,
				headers,
				payload: Payload::Bytes(body),
			})
			.await
			.map_err(ExchangeFailure::Unreachable)?;

		if !response.status().is_success() {
			return Err(format!(
				"refresh rejected with {}: {}",
				response.status().as_u16(),
				request::error_message(&response)
			)
			.into());
		}

		let grant = request::decode::<GrantEnvelope>(path, response.body())
			.map_err(|e| format!("refresh response is malformed: {}", describe(e)))?
			.into_grant();
		let profile = grant.profile();

		self.store
			.save_session(&grant.access_token, grant.refresh_token.as_ref(), profile.as_ref())
			.await
			.map_err(|e| format!("refreshed tokens could not be stored: {}", describe(e)))?;

		Ok(grant.access_token)
	}

	/// Ends the session after a failed refresh; runs once per failed refresh, never per waiter.
	async fn expire(&self, reason: String) -> SessionExpired {
		self.refresh_metrics.record_failure();
		obs::record_refresh_failure(RefreshCause::Expired);

		if let Err(e) = self.store.clear().await {
			obs::cleanup_failed(&e);
		}

		obs::refresh_failed(&reason, self.refresh_gate.pending());
		self.listener.session_expired(&reason);

		SessionExpired::new(reason)
	}
}

/// The request that triggered a refresh.
struct Rejected<'a> {
	path: &'a str,
	sent: Option<&'a TokenSecret>,
}

/// Why a refresh call produced no token.
enum ExchangeFailure {
	/// The call failed in transport; the session may still be valid.
	Unreachable(TransportError),
	/// The session cannot be renewed.
	Rejected(String),
}
impl From<String> for ExchangeFailure {
	fn from(reason: String) -> Self {
		Self::Rejected(reason)
	}
}

/// Outcome handed to parked callers; transport failures stay non-expiring.
fn shared_outcome(outcome: &Result<TokenSecret>) -> RefreshOutcome {
	match outcome {
		Ok(token) => Ok(token.clone()),
		Err(Error::Network(e)) => Err(RefreshFailure::Unreachable(describe(e))),
		Err(Error::AuthExpired { reason }) => Err(RefreshFailure::expired(reason.clone())),
		Err(e) => Err(RefreshFailure::expired(describe(e))),
	}
}

/// Error text without the trailing period, for embedding in a longer reason.
fn describe(e: impl Display) -> String {
	let text = e.to_string();

	text.trim_end_matches('.').to_owned()
}
