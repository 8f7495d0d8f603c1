//! Thread-safe in-memory [`CredentialStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::IssuedCredential,
	cache::{CacheKey, CredentialStore, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<CacheKey, IssuedCredential>>>;

/// Storage backend that keeps credentials in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of cached credentials.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Whether the store holds no credentials.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl CredentialStore for MemoryStore {
	fn load<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, Option<IssuedCredential>> {
		let found = self.0.read().get(key).cloned();

		Box::pin(async move { Ok(found) })
	}

	fn save(&self, key: CacheKey, credential: IssuedCredential) -> StoreFuture<'_, ()> {
		self.0.write().insert(key, credential);

		Box::pin(async { Ok(()) })
	}

	fn remove<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, Option<IssuedCredential>> {
		let removed = self.0.write().remove(key);

		Box::pin(async move { Ok(removed) })
	}
}
