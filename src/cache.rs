//! Optional caching decorator around the token and ticket fetchers.
//!
//! [`CachingClient`] keys cached credentials by application identity + credential kind,
//! tracks expiry from the provider's `expires_in`, and refetches once a credential enters the
//! preemptive window. A per-key singleflight guard lets concurrent callers share one
//! in-flight fetch instead of stampeding the provider, which rate limits both endpoints.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AppId, CredentialKind, IssuedCredential},
	client::Client,
	error::RemoteApiError,
	http::JssdkHttpClient,
	signature::{SignatureRequest, SignatureResult},
};

// Provider codes meaning the access token is invalid or expired.
const STALE_TOKEN_ERRCODES: [i64; 3] = [40001, 40014, 42001];

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for cached credentials.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the credential stored under `key`, if present.
	fn load<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, Option<IssuedCredential>>;

	/// Persists or replaces the credential stored under `key`.
	fn save(&self, key: CacheKey, credential: IssuedCredential) -> StoreFuture<'_, ()>;

	/// Drops the credential stored under `key`, returning it.
	fn remove<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, Option<IssuedCredential>>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Credential store failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a cached credential.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
	/// Application the credential belongs to.
	pub app_id: AppId,
	/// Which credential is cached.
	pub kind: CredentialKind,
}
impl CacheKey {
	/// Builds a key for `app_id` + `kind`.
	pub fn new(app_id: &AppId, kind: CredentialKind) -> Self {
		Self { app_id: app_id.clone(), kind }
	}
}

/// [`Client`] decorator that reuses access tokens and tickets until they near expiry.
pub struct CachingClient<C>
where
	C: ?Sized + JssdkHttpClient,
{
	/// Wrapped client performing the actual fetches.
	pub client: Client<C>,
	/// Backend holding cached credentials.
	pub store: Arc<dyn CredentialStore>,
	/// Credentials with less remaining lifetime than this are refetched.
	pub preemptive_window: Duration,
	guards: Arc<Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>>,
}
impl<C> CachingClient<C>
where
	C: ?Sized + JssdkHttpClient,
{
	const DEFAULT_PREEMPTIVE_WINDOW: Duration = Duration::seconds(60);

	/// Wraps `client` with an in-memory store.
	pub fn new(client: Client<C>) -> Self {
		Self::with_store(client, Arc::new(MemoryStore::default()))
	}

	/// Wraps `client` with the provided store.
	pub fn with_store(client: Client<C>, store: Arc<dyn CredentialStore>) -> Self {
		Self {
			client,
			store,
			preemptive_window: Self::DEFAULT_PREEMPTIVE_WINDOW,
			guards: Default::default(),
		}
	}

	/// Overrides the preemptive window (defaults to 60 seconds).
	pub fn with_preemptive_window(mut self, window: Duration) -> Self {
		self.preemptive_window = if window.is_negative() { Duration::ZERO } else { window };

		self
	}

	/// Returns a cached access token, fetching a fresh one when missing or near expiry.
	pub async fn access_token(&self) -> Result<IssuedCredential> {
		self.cached(CredentialKind::AccessToken, || self.client.request_access_token()).await
	}

	/// Returns a cached ticket, fetching a fresh one (and a token, if needed) when missing or
	/// near expiry.
	///
	/// A ticket rejection that reports a stale access token evicts the cached token so the
	/// next call starts over; the failing call itself is not retried.
	pub async fn ticket(&self) -> Result<IssuedCredential> {
		self.cached(CredentialKind::Ticket, || async {
			let access_token = self.access_token().await?;

			match self.client.request_ticket(&access_token.secret).await {
				Err(Error::RemoteApi(err)) if is_stale_token(&err) => {
					let key = self.key(CredentialKind::AccessToken);

					self.store.remove(&key).await?;

					Err(err.into())
				},
				other => other,
			}
		})
		.await
	}

	/// Signs `request` with the cached ticket.
	pub async fn sign(&self, request: &SignatureRequest) -> Result<SignatureResult> {
		let ticket = self.ticket().await?;

		Ok(self.client.sign_with_ticket(&ticket.secret, request))
	}

	/// Cached counterpart of [`Client::build_signature`].
	pub async fn build_signature(
		&self,
		nonce: impl Into<String>,
		timestamp: impl Into<String>,
		url: impl Into<String>,
	) -> Result<SignatureResult> {
		self.sign(&SignatureRequest::new(nonce, timestamp, url)).await
	}

	/// Drops both cached credentials for this application.
	pub async fn invalidate(&self) -> Result<()> {
		for kind in [CredentialKind::Ticket, CredentialKind::AccessToken] {
			let key = self.key(kind);

			self.store.remove(&key).await?;
		}

		Ok(())
	}

	/// Determines whether a cached credential should be refetched at `now`.
	pub fn should_refresh(&self, credential: &IssuedCredential, now: OffsetDateTime) -> bool {
		if credential.is_expired_at(now) {
			return true;
		}

		credential.expires_at() - now <= self.preemptive_window
	}

	async fn cached<F, Fut>(&self, kind: CredentialKind, fetch: F) -> Result<IssuedCredential>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<IssuedCredential>>,
	{
		let key = self.key(kind);
		let guard = self.guard(&key);
		let _singleflight = guard.lock().await;
		let now = OffsetDateTime::now_utc();

		if let Some(current) =
			self.store.load(&key).await?.filter(|credential| !self.should_refresh(credential, now))
		{
			return Ok(current);
		}

		let fresh = fetch().await?;

		self.store.save(key, fresh.clone()).await?;

		Ok(fresh)
	}

	fn key(&self, kind: CredentialKind) -> CacheKey {
		CacheKey::new(&self.client.credentials.app_id, kind)
	}

	fn guard(&self, key: &CacheKey) -> Arc<AsyncMutex<()>> {
		let mut guards = self.guards.lock();

		guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
impl<C> Clone for CachingClient<C>
where
	C: ?Sized + JssdkHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			client: self.client.clone(),
			store: self.store.clone(),
			preemptive_window: self.preemptive_window,
			guards: self.guards.clone(),
		}
	}
}
impl<C> Debug for CachingClient<C>
where
	C: ?Sized + JssdkHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachingClient")
			.field("client", &self.client)
			.field("preemptive_window", &self.preemptive_window)
			.finish()
	}
}

fn is_stale_token(err: &RemoteApiError) -> bool {
	err.errcode.is_some_and(|code| STALE_TOKEN_ERRCODES.contains(&code))
}
