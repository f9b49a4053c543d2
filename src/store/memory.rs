//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// self
use crate::{
	_prelude::*,
	store::{CredentialStore, StoreFuture, StoreKey},
};

type StoreMap = Arc<RwLock<HashMap<StoreKey, String>>>;

/// Thread-safe storage backend that keeps the session in-process for tests and demos.
///
/// Clones share the same map, so a test can hand one clone to the client and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	map: StoreMap,
	clears: Arc<AtomicUsize>,
}
impl MemoryStore {
	/// Creates a store pre-populated with the provided entries.
	pub fn seeded<I, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (StoreKey, V)>,
		V: Into<String>,
	{
		let store = Self::default();

		store.map.write().extend(entries.into_iter().map(|(key, value)| (key, value.into())));

		store
	}

	/// Synchronous read used by assertions.
	pub fn snapshot(&self, key: StoreKey) -> Option<String> {
		self.map.read().get(&key).cloned()
	}

	/// Returns how many times the whole session was cleared.
	pub fn clear_count(&self) -> usize {
		self.clears.load(Ordering::SeqCst)
	}

	/// Returns `true` when no session key is stored.
	pub fn is_empty(&self) -> bool {
		self.map.read().is_empty()
	}
}
impl CredentialStore for MemoryStore {
	fn get(&self, key: StoreKey) -> StoreFuture<'_, Option<String>> {
		let map = self.map.clone();

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}

	fn set(&self, key: StoreKey, value: String) -> StoreFuture<'_, ()> {
		let map = self.map.clone();

		Box::pin(async move {
			map.write().insert(key, value);

			Ok(())
		})
	}

	fn delete(&self, key: StoreKey) -> StoreFuture<'_, ()> {
		let map = self.map.clone();

		Box::pin(async move {
			map.write().remove(&key);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let map = self.map.clone();
		let clears = self.clears.clone();

		Box::pin(async move {
			map.write().clear();
			clears.fetch_add(1, Ordering::SeqCst);

			Ok(())
		})
	}
}
