//! Client configuration: the API base URL and the auth endpoint paths.
//!
//! [`ClientConfig`] is immutable once built. Use [`ClientConfig::builder`] to override endpoint
//! paths, or [`ClientConfig::from_env`] to pick the base URL up from `RENTAL_API_BASE_URL`.

/// Builder API for assembling client configurations.
pub mod builder;

pub use builder::*;

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable consulted by [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "RENTAL_API_BASE_URL";
/// Base URL used when [`BASE_URL_ENV`] is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Auth endpoint paths, relative to the base URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEndpoints {
	/// Exchanges e-mail + password for a token pair.
	pub login: String,
	/// Revokes the current access token server-side.
	pub logout: String,
	/// Exchanges a refresh token for a new access token.
	pub refresh: String,
	/// Creates a new account.
	pub register: String,
}
impl Default for AuthEndpoints {
	fn default() -> Self {
		Self {
			login: "/auth/login".into(),
			logout: "/auth/logout".into(),
			refresh: "/auth/refresh".into(),
			register: "/auth/register".into(),
		}
	}
}

/// Immutable configuration consumed by [`ApiClient`](crate::client::ApiClient).
///
/// Deserialization runs through [`ClientConfigBuilder::build`], so a loaded configuration is
/// validated the same way as a built one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClientConfig")]
pub struct ClientConfig {
	/// Base URL every request path is appended to.
	pub base_url: Url,
	/// Auth endpoint paths.
	pub endpoints: AuthEndpoints,
	/// Also send the refresh token as the bearer header of the refresh call.
	pub refresh_token_in_header: bool,
}
impl ClientConfig {
	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Builds a default configuration from [`BASE_URL_ENV`], falling back to
	/// [`DEFAULT_BASE_URL`].
	pub fn from_env() -> Result<Self, ClientConfigError> {
		let raw = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());

		Self::parse(&raw)
	}

	/// Parses `base_url` and builds a default configuration around it.
	pub fn parse(base_url: &str) -> Result<Self, ClientConfigError> {
		let url = Url::parse(base_url.trim()).map_err(|source| {
			ClientConfigError::InvalidBaseUrl { url: base_url.to_owned(), source }
		})?;

		Self::builder(url).build()
	}

	/// Resolves `path` (optionally carrying a query string) against the base URL, keeping any
	/// path prefix the base URL has.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let base = self.base_url.as_str().trim_end_matches('/');
		let joined = if path.starts_with('/') {
			format!("{base}{path}")
		} else {
			format!("{base}/{path}")
		};

		Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
	}

	/// Checks whether `path` targets the refresh endpoint, ignoring any query string.
	pub fn is_refresh_path(&self, path: &str) -> bool {
		let bare = path.split(['?', '#']).next().unwrap_or(path);

		normalize_path(bare) == normalize_path(&self.endpoints.refresh)
	}
}

/// Unvalidated shape of a serialized [`ClientConfig`].
#[derive(Deserialize)]
struct RawClientConfig {
	base_url: Url,
	#[serde(default)]
	endpoints: AuthEndpoints,
	#[serde(default)]
	refresh_token_in_header: bool,
}
impl TryFrom<RawClientConfig> for ClientConfig {
	type Error = ClientConfigError;

	fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
		let mut builder =
			Self::builder(raw.base_url).refresh_token_in_header(raw.refresh_token_in_header);

		builder.endpoints = raw.endpoints;

		builder.build()
	}
}

fn normalize_path(path: &str) -> &str {
	let trimmed = path.trim_start_matches('/').trim_end_matches('/');

	if trimmed.is_empty() { "/" } else { trimmed }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(base: &str) -> ClientConfig {
		ClientConfig::parse(base).expect("Test base URL should be valid.")
	}

	#[test]
	fn endpoint_joins_paths_and_keeps_prefix() {
		let root = config("http://localhost:5000");
		let prefixed = config("https://api.example.com/v1/");

		assert_eq!(
			root.endpoint("/leases").expect("Root join should succeed.").as_str(),
			"http://localhost:5000/leases"
		);
		assert_eq!(
			prefixed.endpoint("/leases/7/vacate").expect("Prefixed join should succeed.").as_str(),
			"https://api.example.com/v1/leases/7/vacate"
		);
		assert_eq!(
			prefixed.endpoint("properties?page=2").expect("Query join should succeed.").as_str(),
			"https://api.example.com/v1/properties?page=2"
		);
	}

	#[test]
	fn refresh_path_detection_ignores_slashes_and_query() {
		let config = config("http://127.0.0.1:5000");

		assert!(config.is_refresh_path("/auth/refresh"));
		assert!(config.is_refresh_path("auth/refresh/"));
		assert!(config.is_refresh_path("/auth/refresh?x=1"));
		assert!(!config.is_refresh_path("/auth/refresh-status"));
		assert!(!config.is_refresh_path("/leases"));
	}

	#[test]
	fn deserialization_is_validated() {
		let loaded =
			serde_json::from_str::<ClientConfig>(r#"{"base_url":"http://localhost:5000"}"#)
				.expect("Loopback config should load.");

		assert_eq!(loaded.endpoints, AuthEndpoints::default());
		assert!(!loaded.refresh_token_in_header);

		let remote =
			serde_json::from_str::<ClientConfig>(r#"{"base_url":"http://api.example.com"}"#)
				.expect_err("Plain HTTP to a remote host must fail.");
		let relative = serde_json::from_str::<ClientConfig>(
			r#"{"base_url":"https://api.example.com","endpoints":{"login":"/auth/login","logout":"/auth/logout","refresh":"auth/refresh","register":"/auth/register"}}"#,
		);

		assert!(remote.to_string().contains("HTTPS"));
		assert!(relative.is_err());
	}

	#[test]
	fn serialized_config_loads_back() {
		let config = config("https://api.example.com/v1");
		let raw = serde_json::to_string(&config).expect("Config should serialize.");

		let loaded = serde_json::from_str::<ClientConfig>(&raw).expect("Config should load.");

		assert_eq!(loaded, config);
	}

	#[test]
	fn parse_reports_invalid_urls() {
		let err = ClientConfig::parse("not a url").expect_err("Garbage should not parse.");

		assert!(matches!(err, ClientConfigError::InvalidBaseUrl { .. }));
	}
}
