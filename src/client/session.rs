//! Login, logout, and registration, plus read-only views of the stored session.

// self
use crate::{
	_prelude::*,
	auth::{
		LoginRequest, RegisterRequest, Session, TokenSecret, UserProfile, session::GrantEnvelope,
	},
	client::{ApiClient, request},
	http::{ApiRequest, HttpResponse, HttpTransport, Payload},
	obs::{self, CallKind},
	store::StoreKey,
};

#[derive(Deserialize)]
struct Registered {
	user: UserProfile,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges e-mail + password for a token pair and stores the new session.
	///
	/// The call never carries a bearer token and a 401 here is reported as-is instead of
	/// triggering a refresh.
	pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
		obs::observe(CallKind::Login, "login", self.authenticate(email, password)).await
	}

	/// Revokes the current token server-side and clears local credentials.
	///
	/// Local credentials are cleared even when the server call fails; that failure is returned
	/// afterwards.
	pub async fn logout(&self) -> Result<()> {
		obs::observe(CallKind::Logout, "logout", async {
			let remote = match self.store.access_token().await {
				Ok(Some(token)) => self.revoke(&token).await,
				Ok(None) => Ok(()),
				Err(e) => Err(e.into()),
			};

			self.store.clear().await?;

			remote
		})
		.await
	}

	/// Creates a new account and returns the user the backend stored.
	///
	/// Registration does not log the user in.
	pub async fn register(&self, account: &RegisterRequest) -> Result<UserProfile> {
		let path = self.config.endpoints.register.as_str();
		let response = self.send_unauthenticated(path, account).await?;

		Ok(request::decode::<Registered>(path, response.body())?.user)
	}

	/// Returns the user profile stored at login, if any.
	pub async fn current_user(&self) -> Result<Option<UserProfile>> {
		Ok(self.store.user().await?)
	}

	/// Checks whether both an access token and a user profile are stored.
	pub async fn is_authenticated(&self) -> Result<bool> {
		let token = self.store.access_token().await?;

		Ok(token.is_some() && self.store.user().await?.is_some())
	}

	async fn authenticate(&self, email: &str, password: &str) -> Result<Session> {
		let path = self.config.endpoints.login.as_str();
		let response =
			self.send_unauthenticated(path, &LoginRequest::new(email, password)).await?;
		let grant = request::decode::<GrantEnvelope>(path, response.body())?.into_grant();
		let user = grant.profile();
		let store = self.store.as_ref();

		store.save_session(&grant.access_token, grant.refresh_token.as_ref(), user.as_ref()).await?;

		if grant.refresh_token.is_none() {
			store.delete(StoreKey::RefreshToken).await?;
		}
		if user.is_none() {
			store.delete(StoreKey::User).await?;
		}

		Ok(Session { user, refreshable: grant.refresh_token.is_some() })
	}

	async fn revoke(&self, token: &TokenSecret) -> Result<()> {
		let path = self.config.endpoints.logout.as_str();
		let mut headers = ::http::HeaderMap::new();

		headers.insert(::http::header::AUTHORIZATION, request::bearer_value(token)?);

		let response = self
			.transport
			.execute(ApiRequest {
				method: ::http::Method::POST,
				url: self.config.endpoint(path)?,
				headers,
				payload: Payload::Empty,
			})
			.await?;

		request::ensure_success(&::http::Method::POST, path, response).map(|_| ())
	}

	async fn send_unauthenticated<B>(&self, path: &str, body: &B) -> Result<HttpResponse>
	where
		B: ?Sized + Serialize,
	{
		let mut headers = ::http::HeaderMap::new();

		headers.insert(
			::http::header::CONTENT_TYPE,
			::http::HeaderValue::from_static("application/json"),
		);

		let body = serde_json::to_vec(body).map_err(crate::error::ConfigError::BodyEncode)?;
		let response = self
			.transport
			.execute(ApiRequest {
				method: ::http::Method::POST,
				url: self.config.endpoint(path)?,
				headers,
				payload: Payload::Bytes(body),
			})
			.await?;

		request::ensure_success(&::http::Method::POST, path, response)
	}
}
