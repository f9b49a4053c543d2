//! Demonstrates a landlord creating a listing with pictures through a multipart upload.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use rental_client::{
	api::{Picture, PropertyForm, PropertyStatus},
	client::ApiClient,
	config::ClientConfig,
	http::ReqwestTransport,
	reqwest::Client,
	store::{CredentialStore, MemoryStore, StoreKey},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let upload_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/properties")
				.header("authorization", "Bearer landlord-access")
				.body_includes("Garden Cottage");
			then.status(201).header("content-type", "application/json").body(
				"{\"message\":\"Property created successfully\",\"property\":{\"id\":42,\"name\":\"Garden Cottage\",\"location\":\"Karen\",\"rent\":2500.0,\"status\":\"vacant\",\"pictures\":[\"/uploads/front.jpg\",\"/uploads/garden.jpg\"]}}",
			);
		})
		.await;
	let store: Arc<dyn CredentialStore> =
		Arc::new(MemoryStore::seeded([(StoreKey::AccessToken, "landlord-access")]));
	let config = ClientConfig::parse(&server.base_url())?;
	let transport = ReqwestTransport::from_builder(Client::builder().no_proxy())?;
	let client = <ApiClient<ReqwestTransport>>::with_transport(config, store, transport);
	let form = PropertyForm::new()
		.name("Garden Cottage")
		.location("Karen")
		.rent(2500.0)
		.status(PropertyStatus::Vacant)
		.picture(Picture::new("front.jpg", vec![0xFF, 0xD8, 0xFF]))
		.picture(Picture::new("garden.jpg", vec![0xFF, 0xD8, 0xFF]));
	let property = client.properties().create(&form).await?;

	println!("Created property #{} with pictures {:?}.", property.id, property.pictures);

	upload_mock.assert_async().await;

	Ok(())
}
