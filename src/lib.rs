//! Typed client for the rental management API.
//!
//! [`client::ApiClient`] attaches the stored bearer token to every call. When the API answers
//! 401 it runs a single refresh per client, parks concurrent callers until that refresh
//! settles, and replays each rejected request once with the new token. Sessions live in a
//! pluggable [`store::CredentialStore`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::ApiClient,
		config::ClientConfig,
		http::ReqwestTransport,
		store::{CredentialStore, MemoryStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApiClient<ReqwestTransport>;

	/// Builds a reqwest transport that ignores proxy settings from the environment so
	/// `httpmock` servers on loopback are always reached directly.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		ReqwestTransport::from_builder(ReqwestClient::builder().no_proxy())
			.expect("Failed to build Reqwest client for tests.")
	}

	/// Parses a mock server base URL into a default client configuration.
	pub fn test_config(base_url: &str) -> ClientConfig {
		ClientConfig::builder(
			Url::parse(base_url).expect("Mock server base URL should parse successfully."),
		)
		.build()
		.expect("Mock server client configuration should be valid.")
	}

	/// Constructs an [`ApiClient`] pointed at `base_url` that shares `store` with the caller
	/// and uses the reqwest transport configured for integration tests.
	pub fn build_reqwest_test_client(base_url: &str, store: &MemoryStore) -> ReqwestTestClient {
		let store: Arc<dyn CredentialStore> = Arc::new(store.clone());

		ApiClient::with_transport(test_config(base_url), store, test_reqwest_transport())
	}
}

mod _prelude {
	pub use std::{
		collections::{HashMap, VecDeque},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
