//! Demonstrates a tenant session against a mock API: login, an expired access token that is
//! refreshed behind the scenes, and the dashboard call replayed with the new token.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use rental_client::{
	client::ApiClient,
	config::ClientConfig,
	http::ReqwestTransport,
	reqwest::Client,
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200).header("content-type", "application/json").body(
				"{\"message\":\"Success\",\"data\":{\"access_token\":\"stale-access\",\"refresh_token\":\"demo-refresh\",\"email\":\"tenant@example.com\",\"role\":\"tenant\"}}",
			);
		})
		.await;
	let expired_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/dashboard/tenant").header("authorization", "Bearer stale-access");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"msg\":\"Token has expired\"}");
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"fresh-access\"}");
		})
		.await;
	let dashboard_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/dashboard/tenant").header("authorization", "Bearer fresh-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"leases\":[{\"id\":1,\"status\":\"active\",\"rent_amount\":1500}],\"payments_due\":0}",
			);
		})
		.await;
	let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
	let config = ClientConfig::parse(&server.base_url())?;
	let transport = ReqwestTransport::from_builder(Client::builder().no_proxy())?;
	let client = <ApiClient<ReqwestTransport>>::with_transport(config, store, transport);
	let session = client.login("tenant@example.com", "demo-password").await?;

	println!("Logged in as {:?}.", session.user.and_then(|user| user.email));

	let dashboard = client.dashboards().tenant().await?;

	println!("Tenant dashboard: {dashboard}.");
	println!("Refreshes performed: {}.", client.refresh_metrics.attempts());

	login_mock.assert_async().await;
	expired_mock.assert_async().await;
	refresh_mock.assert_async().await;
	dashboard_mock.assert_async().await;

	Ok(())
}
