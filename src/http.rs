//! Transport primitives for the token and ticket endpoints.
//!
//! [`JssdkHttpClient`] is the client's only dependency on an HTTP stack. Implementations
//! issue a bare GET (no body, no custom headers), read the whole body before resolving, and
//! leave status codes uninterpreted: the provider reports failures inside a `200 OK` JSON
//! payload, so classification happens in [`response`](crate::response).

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, auth::CredentialKind, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`JssdkHttpClient::get`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports able to perform the provider's GET requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared behind
/// an [`Arc`] by several clients, and the returned future must be `Send` so callers can drive
/// it from any executor.
pub trait JssdkHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Performs one GET request against `url`; `endpoint` labels transport failures.
	fn get(&self, endpoint: CredentialKind, url: Url) -> HttpFuture<'_>;
}

/// Fully-read response returned by a [`JssdkHttpClient`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code; informational only.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// No timeout is configured here. Callers that need deadlines build their own
/// [`ReqwestClient`] and pass it to [`ReqwestHttpClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client with reqwest's default configuration, surfacing TLS backend failures.
	pub fn try_new() -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().build()?))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl JssdkHttpClient for ReqwestHttpClient {
	fn get(&self, endpoint: CredentialKind, url: Url) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.get(url)
				.send()
				.await
				.map_err(|e| TransportError::network(endpoint, e))?;
			let status = response.status().as_u16();
			let body = response
				.bytes()
				.await
				.map_err(|e| TransportError::network(endpoint, e))?
				.to_vec();

			Ok(HttpResponse { status, body })
		})
	}
}
