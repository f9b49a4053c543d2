#![cfg(feature = "reqwest")]

// std
use std::{
	io,
	sync::atomic::{AtomicUsize, Ordering},
	time::Duration,
};
// self
use rental_client::{
	_preludet::*,
	auth::SessionListener,
	client::{ApiClient, RequestOptions},
	config::ClientConfig,
	error::TransportError,
	http::{ApiRequest, HttpResponse, HttpTransport, MultipartForm, Payload, TransportFuture},
	store::{CredentialStore, MemoryStore, StoreKey},
};

type Effect = Pin<Box<dyn Future<Output = ()> + Send>>;

enum Reply {
	Status(u16, &'static str),
	/// Runs the effect while the request is in flight, then answers.
	After(Effect, u16, &'static str),
	Reset { after: Duration },
	Hang,
}

type Responder = dyn Fn(&ApiRequest) -> Reply + Send + Sync;

struct FakeTransport {
	seen: Mutex<Vec<ApiRequest>>,
	responder: Box<Responder>,
}
impl FakeTransport {
	fn new(responder: impl Fn(&ApiRequest) -> Reply + Send + Sync + 'static) -> Arc<Self> {
		Arc::new(Self { seen: Mutex::new(Vec::new()), responder: Box::new(responder) })
	}

	fn seen(&self) -> Vec<ApiRequest> {
		self.seen.lock().clone()
	}
}
impl HttpTransport for FakeTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let reply = (self.responder)(&request);

		self.seen.lock().push(request);

		Box::pin(async move {
			match reply {
				Reply::Status(status, body) => Ok(json_response(status, body)),
				Reply::After(effect, status, body) => {
					effect.await;

					Ok(json_response(status, body))
				},
				Reply::Reset { after } => {
					tokio::time::sleep(after).await;

					Err(TransportError::Io(io::Error::new(
						io::ErrorKind::ConnectionReset,
						"connection reset",
					)))
				},
				Reply::Hang => std::future::pending().await,
			}
		})
	}
}

#[derive(Default)]
struct CountingListener(AtomicUsize);
impl CountingListener {
	fn calls(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}
}
impl SessionListener for CountingListener {
	fn session_expired(&self, _: &str) {
		self.0.fetch_add(1, Ordering::SeqCst);
	}
}

fn json_response(status: u16, body: &str) -> HttpResponse {
	let mut response = HttpResponse::new(body.as_bytes().to_vec());

	*response.status_mut() =
		::http::StatusCode::from_u16(status).expect("Scripted status should be valid.");

	response.headers_mut().insert(
		::http::header::CONTENT_TYPE,
		::http::HeaderValue::from_static("application/json"),
	);

	response
}

fn client_with(
	transport: Arc<FakeTransport>,
	store: &MemoryStore,
	config: ClientConfig,
) -> ApiClient<FakeTransport> {
	let store: Arc<dyn CredentialStore> = Arc::new(store.clone());

	ApiClient::with_transport(config, store, transport)
}

fn default_config() -> ClientConfig {
	test_config("http://127.0.0.1:5000")
}

#[tokio::test]
async fn requests_without_token_carry_no_authorization() {
	let transport = FakeTransport::new(|_| Reply::Status(200, "{}"));
	let store = MemoryStore::default();
	let client = client_with(transport.clone(), &store, default_config());

	client.request("/health", RequestOptions::get()).await.expect("Request should succeed.");
	client
		.request("/leases", RequestOptions::post().json_value(serde_json::json!({ "a": 1 })))
		.await
		.expect("Request should succeed.");

	let seen = transport.seen();

	assert_eq!(seen.len(), 2);
	assert!(seen.iter().all(|request| request.bearer().is_none()));
	assert!(seen[0].headers.get(::http::header::CONTENT_TYPE).is_none());
	assert!(matches!(seen[0].payload, Payload::Empty));
	assert_eq!(seen[1].headers[::http::header::CONTENT_TYPE], "application/json");
	assert_eq!(seen[1].url.as_str(), "http://127.0.0.1:5000/leases");
}

#[tokio::test]
async fn stored_token_is_attached_exactly_once() {
	let transport = FakeTransport::new(|_| Reply::Status(200, "[]"));
	let store = MemoryStore::seeded([(StoreKey::AccessToken, "T1")]);
	let client = client_with(transport.clone(), &store, default_config());
	let options = RequestOptions::get()
		.header("Authorization", "Bearer spoofed")
		.header("X-Trace", "abc");

	client.request("/leases", options).await.expect("Request should succeed.");

	let request = &transport.seen()[0];

	assert_eq!(request.headers.get_all(::http::header::AUTHORIZATION).iter().count(), 1);
	assert_eq!(request.bearer(), Some("T1"));
	assert_eq!(request.headers["x-trace"], "abc");
}

#[tokio::test]
async fn multipart_bodies_leave_content_type_to_transport() {
	let transport = FakeTransport::new(|_| Reply::Status(201, "{}"));
	let store = MemoryStore::seeded([(StoreKey::AccessToken, "T1")]);
	let client = client_with(transport.clone(), &store, default_config());
	let form = MultipartForm::new().text("name", "Loft").file("pictures", "a.png", vec![1]);

	client
		.request("/properties", RequestOptions::post().multipart(form.clone()))
		.await
		.expect("Upload should succeed.");

	let request = &transport.seen()[0];

	assert!(request.headers.get(::http::header::CONTENT_TYPE).is_none());
	assert!(matches!(&request.payload, Payload::Multipart(sent) if sent == &form));
}

#[tokio::test]
async fn refresh_call_can_carry_refresh_token_as_bearer() {
	let transport = FakeTransport::new(|request| match request.url.path() {
		"/api/auth/refresh" => Reply::Status(200, "{\"access_token\":\"T2\"}"),
		_ if request.bearer() == Some("T1") => Reply::Status(401, "{}"),
		_ => Reply::Status(200, "{\"ok\":true}"),
	});
	let store = MemoryStore::seeded([(StoreKey::AccessToken, "T1"), (StoreKey::RefreshToken, "R1")]);
	let config = ClientConfig::builder(
		Url::parse("http://127.0.0.1:5000/api").expect("Test URL should parse."),
	)
	.refresh_token_in_header(true)
	.build()
	.expect("Config should build.");
	let client = client_with(transport.clone(), &store, config);
	let body =
		client.request("/leases", RequestOptions::get()).await.expect("Replay should succeed.");

	assert_eq!(body, Some(serde_json::json!({ "ok": true })));

	let seen = transport.seen();
	let refresh = &seen[1];

	assert_eq!(seen.len(), 3);
	assert_eq!(refresh.method, ::http::Method::POST);
	assert_eq!(refresh.bearer(), Some("R1"));
	assert!(matches!(
		&refresh.payload,
		Payload::Bytes(bytes) if bytes.as_slice() == b"{\"refresh_token\":\"R1\"}"
	));
	assert_eq!(seen[2].bearer(), Some("T2"));
}

#[tokio::test]
async fn replay_sends_identical_json_bytes() {
	let transport = FakeTransport::new(|request| match request.url.path() {
		"/auth/refresh" => Reply::Status(200, "{\"access_token\":\"T2\"}"),
		_ if request.bearer() == Some("T1") => Reply::Status(401, "{}"),
		_ => Reply::Status(200, "{}"),
	});
	let store = MemoryStore::seeded([(StoreKey::AccessToken, "T1"), (StoreKey::RefreshToken, "R1")]);
	let client = client_with(transport.clone(), &store, default_config());
	let options =
		RequestOptions::put().json_value(serde_json::json!({ "vacate_date": "2026-11-30" }));

	client.request("/leases/7/vacate", options).await.expect("Replay should succeed.");

	let seen = transport.seen();
	let (first, replay) = (&seen[0], &seen[2]);

	assert_eq!(first.method, replay.method);
	assert_eq!(first.url, replay.url);
	assert!(matches!(
		(&first.payload, &replay.payload),
		(Payload::Bytes(a), Payload::Bytes(b)) if a == b
	));
	assert!(seen.iter().filter(|request| request.url.path() != "/auth/refresh").all(|request| {
		request.headers.get_all(::http::header::AUTHORIZATION).iter().count() == 1
	}));
}

#[tokio::test]
async fn abandoned_refresh_releases_waiters() {
	let transport = FakeTransport::new(|request| match request.url.path() {
		"/auth/refresh" => Reply::Hang,
		_ => Reply::Status(401, "{}"),
	});
	let store = MemoryStore::seeded([(StoreKey::AccessToken, "T1"), (StoreKey::RefreshToken, "R1")]);
	let client = client_with(transport, &store, default_config());
	let leader = tokio::spawn({
		let client = client.clone();

		async move { client.request("/leases", RequestOptions::get()).await }
	});

	wait_until(|| client.is_refreshing()).await;

	let waiter = tokio::spawn({
		let client = client.clone();

		async move { client.request("/properties", RequestOptions::get()).await }
	});

	wait_until(|| client.pending_refresh_waiters() == 1).await;
	leader.abort();

	let err = waiter
		.await
		.expect("Waiter task should not panic.")
		.expect_err("Waiter must not hang once the leader is gone.");

	assert!(err.is_auth_expired());
	assert!(!client.is_refreshing());
	assert_eq!(store.snapshot(StoreKey::RefreshToken).as_deref(), Some("R1"));
}

#[tokio::test]
async fn refresh_transport_failure_keeps_session() {
	let transport = FakeTransport::new(|request| match request.url.path() {
		"/auth/refresh" => Reply::Reset { after: Duration::from_millis(300) },
		_ => Reply::Status(401, "{}"),
	});
	let store = MemoryStore::seeded([(StoreKey::AccessToken, "T1"), (StoreKey::RefreshToken, "R1")]);
	let listener = Arc::new(CountingListener::default());
	let client = client_with(transport, &store, default_config())
		.with_session_listener(listener.clone());
	let leader = tokio::spawn({
		let client = client.clone();

		async move { client.request("/leases", RequestOptions::get()).await }
	});

	wait_until(|| client.is_refreshing()).await;

	let waiter = tokio::spawn({
		let client = client.clone();

		async move { client.request("/properties", RequestOptions::get()).await }
	});

	wait_until(|| client.pending_refresh_waiters() == 1).await;

	let leader_err = leader
		.await
		.expect("Leader task should not panic.")
		.expect_err("Leader should see the transport failure.");
	let waiter_err = waiter
		.await
		.expect("Waiter task should not panic.")
		.expect_err("Waiter should share the transport failure.");

	assert!(matches!(leader_err, Error::Network(TransportError::Io(_))), "{leader_err:?}");
	assert!(
		matches!(waiter_err, Error::Network(TransportError::RefreshInterrupted { .. })),
		"{waiter_err:?}"
	);
	assert_eq!(store.snapshot(StoreKey::AccessToken).as_deref(), Some("T1"));
	assert_eq!(store.snapshot(StoreKey::RefreshToken).as_deref(), Some("R1"));
	assert_eq!(store.clear_count(), 0);
	assert_eq!(listener.calls(), 0);
	assert_eq!(client.refresh_metrics.failures(), 1);
	assert!(!client.is_refreshing());
}

#[tokio::test]
async fn token_rotated_in_flight_is_replayed_without_refresh() {
	let store = MemoryStore::seeded([(StoreKey::AccessToken, "T1"), (StoreKey::RefreshToken, "R1")]);
	let rotator = store.clone();
	let transport = FakeTransport::new(move |request| match (request.url.path(), request.bearer()) {
		("/auth/refresh", _) => Reply::Status(200, "{\"access_token\":\"T9\"}"),
		(_, Some("T1")) => {
			let rotator = rotator.clone();

			Reply::After(
				Box::pin(async move {
					rotator
						.set(StoreKey::AccessToken, "T2".into())
						.await
						.expect("Rotating the stored token should succeed.");
				}),
				401,
				"{}",
			)
		},
		_ => Reply::Status(200, "{\"ok\":true}"),
	});
	let client = client_with(transport.clone(), &store, default_config());
	let body =
		client.request("/leases", RequestOptions::get()).await.expect("Replay should succeed.");

	assert_eq!(body, Some(serde_json::json!({ "ok": true })));

	let seen = transport.seen();

	assert_eq!(seen.len(), 2);
	assert!(seen.iter().all(|request| request.url.path() != "/auth/refresh"));
	assert_eq!(seen[1].bearer(), Some("T2"));
	assert_eq!(client.refresh_metrics.stale_recoveries(), 1);
	assert_eq!(client.refresh_metrics.attempts(), 0);
	assert_eq!(store.snapshot(StoreKey::AccessToken).as_deref(), Some("T2"));
}

#[tokio::test]
async fn session_ended_in_flight_is_not_cleared_twice() {
	let store = MemoryStore::seeded([(StoreKey::AccessToken, "T1"), (StoreKey::RefreshToken, "R1")]);
	let ender = store.clone();
	let transport = FakeTransport::new(move |request| match request.url.path() {
		"/auth/refresh" => Reply::Status(200, "{\"access_token\":\"T9\"}"),
		_ => {
			let ender = ender.clone();

			Reply::After(
				Box::pin(async move {
					ender.clear().await.expect("Ending the session should succeed.");
				}),
				401,
				"{}",
			)
		},
	});
	let listener = Arc::new(CountingListener::default());
	let client = client_with(transport.clone(), &store, default_config())
		.with_session_listener(listener.clone());
	let err = client
		.request("/leases", RequestOptions::get())
		.await
		.expect_err("An ended session cannot be replayed.");

	assert!(
		matches!(err, Error::AuthExpired { ref reason } if reason.contains("session ended")),
		"{err:?}"
	);
	assert_eq!(transport.seen().len(), 1);
	assert_eq!(store.clear_count(), 1);
	assert_eq!(listener.calls(), 0);
	assert_eq!(client.refresh_metrics.attempts(), 0);
	assert!(!client.is_refreshing());
}

async fn wait_until(condition: impl Fn() -> bool) {
	for _ in 0..200 {
		if condition() {
			return;
		}

		tokio::time::sleep(Duration::from_millis(5)).await;
	}

	panic!("Condition was not reached in time.");
}
