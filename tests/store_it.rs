#![cfg(feature = "reqwest")]

// std
use std::{env, fs, process, time::SystemTime};
// crates.io
use httpmock::prelude::*;
// self
use rental_client::{
	_preludet::*,
	client::ApiClient,
	store::{CredentialStore, FileStore, MemoryStore, StoreKey},
};

fn temp_path(tag: &str) -> std::path::PathBuf {
	let nanos = SystemTime::now()
		.duration_since(SystemTime::UNIX_EPOCH)
		.expect("System clock should be after the Unix epoch.")
		.as_nanos();

	env::temp_dir().join(format!("rental_client_{tag}_{}_{nanos}.json", process::id()))
}

#[tokio::test]
async fn file_store_session_survives_restart() {
	let server = MockServer::start_async().await;
	let path = temp_path("session");
	let _login = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"A1\",\"refresh_token\":\"R1\",\"user\":{\"email\":\"jo@example.com\",\"role\":\"admin\"}}");
		})
		.await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/dashboard/profile").header("authorization", "Bearer A1");
			then.status(200).header("content-type", "application/json").body("{\"ok\":true}");
		})
		.await;

	{
		let store: Arc<dyn CredentialStore> =
			Arc::new(FileStore::open(&path).expect("File store should open."));
		let client = ApiClient::with_transport(
			test_config(&server.base_url()),
			store,
			test_reqwest_transport(),
		);

		client.login("jo@example.com", "pw").await.expect("Login should succeed.");
	}

	let store: Arc<dyn CredentialStore> =
		Arc::new(FileStore::open(&path).expect("File store should reopen."));
	let client =
		ApiClient::with_transport(test_config(&server.base_url()), store, test_reqwest_transport());

	assert!(client.is_authenticated().await.expect("Store read should succeed."));

	client.dashboards().profile().await.expect("Stored token should be reused.");
	profile.assert_async().await;
	client.logout().await.expect_err("No logout route is mocked.");

	assert!(!client.is_authenticated().await.expect("Store read should succeed."));

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
	});
}

#[tokio::test]
async fn memory_store_clones_share_state() {
	let store = MemoryStore::default();
	let shared: Arc<dyn CredentialStore> = Arc::new(store.clone());

	shared.set(StoreKey::AccessToken, "T1".into()).await.expect("Write should succeed.");

	assert_eq!(store.snapshot(StoreKey::AccessToken).as_deref(), Some("T1"));

	shared.clear().await.expect("Clear should succeed.");

	assert!(store.is_empty());
	assert_eq!(store.clear_count(), 1);
}
