// self
use crate::{
	_prelude::*,
	config::{AuthEndpoints, ClientConfig},
};

/// Errors raised while constructing or validating client configurations.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// Base URL cannot be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Raw value that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL must use HTTPS unless it points at a loopback host.
	#[error("The base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Base URL that failed validation.
		url: String,
	},
	/// Query strings and fragments belong on request paths, not the base URL.
	#[error("The base URL must not carry a query or fragment: {url}.")]
	BaseUrlHasQuery {
		/// Base URL that failed validation.
		url: String,
	},
	/// Endpoint paths must be absolute.
	#[error("The {endpoint} endpoint path must start with `/`: {path}.")]
	InvalidEndpointPath {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Offending path.
		path: String,
	},
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Base URL every request path is appended to.
	pub base_url: Url,
	/// Auth endpoint paths.
	pub endpoints: AuthEndpoints,
	/// Also send the refresh token as the bearer header of the refresh call.
	pub refresh_token_in_header: bool,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided base URL and default auth paths.
	pub fn new(base_url: Url) -> Self {
		Self { base_url, endpoints: AuthEndpoints::default(), refresh_token_in_header: false }
	}

	/// Sets the login path.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.login = path.into();

		self
	}

	/// Sets the logout path.
	pub fn logout_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.logout = path.into();

		self
	}

	/// Sets the refresh path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.refresh = path.into();

		self
	}

	/// Sets the registration path.
	pub fn register_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.register = path.into();

		self
	}

	/// Sends the refresh token as `Authorization: Bearer` on refresh calls, in addition to the
	/// JSON body, for backends that read it from the header.
	pub fn refresh_token_in_header(mut self, enabled: bool) -> Self {
		self.refresh_token_in_header = enabled;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let config = ClientConfig {
			base_url: self.base_url,
			endpoints: self.endpoints,
			refresh_token_in_header: self.refresh_token_in_header,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ClientConfig {
	fn validate(&self) -> Result<(), ClientConfigError> {
		validate_base_url(&self.base_url)?;
		validate_path("login", &self.endpoints.login)?;
		validate_path("logout", &self.endpoints.logout)?;
		validate_path("refresh", &self.endpoints.refresh)?;
		validate_path("register", &self.endpoints.register)?;

		Ok(())
	}
}

fn validate_base_url(url: &Url) -> Result<(), ClientConfigError> {
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ClientConfigError::BaseUrlHasQuery { url: url.to_string() });
	}

	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ClientConfigError::InsecureBaseUrl { url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

fn validate_path(endpoint: &'static str, path: &str) -> Result<(), ClientConfigError> {
	if path.starts_with('/') {
		Ok(())
	} else {
		Err(ClientConfigError::InvalidEndpointPath { endpoint, path: path.to_owned() })
	}
}
