//! Token fetcher, ticket fetcher, and the signature orchestrator that chains them.
//!
//! Every operation runs one sequential call path: fetch the access token, fetch the ticket
//! with it, then sign. The first failure aborts the run; there are no retries and no partial
//! results. Nothing is cached here; wrap the client in
//! [`CachingClient`](crate::cache::CachingClient) to reuse credentials across calls.

// self
use crate::{
	_prelude::*,
	auth::{CredentialKind, CredentialSecret, Credentials, IssuedCredential},
	endpoint::Endpoints,
	error::TransportError,
	http::JssdkHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
	response::{self, AccessTokenResponse, TicketResponse},
	signature::{self, SignatureRequest, SignatureResult},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestJssdkClient = Client<ReqwestHttpClient>;

/// Signing client bound to one application's credentials.
///
/// The client holds no mutable state: credentials and endpoints are fixed at construction and
/// the transport is shared behind an [`Arc`], so clones are cheap and may be used from any
/// number of tasks.
pub struct Client<C>
where
	C: ?Sized + JssdkHttpClient,
{
	/// Application identifier + secret.
	pub credentials: Credentials,
	/// Token and ticket endpoints.
	pub endpoints: Endpoints,
	/// Transport used for every outbound request.
	pub http_client: Arc<C>,
}
impl<C> Client<C>
where
	C: ?Sized + JssdkHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(credentials: Credentials, http_client: impl Into<Arc<C>>) -> Self {
		Self { credentials, endpoints: Endpoints::default(), http_client: http_client.into() }
	}

	/// Replaces the provider endpoints.
	pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Issues one GET against the token endpoint and returns the raw body.
	///
	/// Status codes are not interpreted; a provider error payload is returned as-is.
	pub async fn fetch_access_token(&self) -> Result<Vec<u8>, TransportError> {
		let url = self.endpoints.access_token_url(&self.credentials);

		self.fetch(CallKind::AccessToken, CredentialKind::AccessToken, url).await
	}

	/// Issues one GET against the ticket endpoint and returns the raw body.
	pub async fn fetch_ticket(&self, access_token: &str) -> Result<Vec<u8>, TransportError> {
		let url = self.endpoints.ticket_url(access_token);

		self.fetch(CallKind::Ticket, CredentialKind::Ticket, url).await
	}

	/// Fetches and decodes a fresh access token.
	pub async fn request_access_token(&self) -> Result<IssuedCredential> {
		observe(CallKind::AccessToken, "request", async {
			let body = self.fetch_access_token().await?;

			decode::<AccessTokenResponse>(CallKind::AccessToken, &body)
		})
		.await
	}

	/// Fetches and decodes a fresh `jsapi` ticket using `access_token`.
	pub async fn request_ticket(
		&self,
		access_token: &CredentialSecret,
	) -> Result<IssuedCredential> {
		observe(CallKind::Ticket, "request", async {
			let body = self.fetch_ticket(access_token.expose()).await?;

			decode::<TicketResponse>(CallKind::Ticket, &body)
		})
		.await
	}

	/// Runs token → ticket → signature for the provided parameters.
	pub async fn build_signature(
		&self,
		nonce: impl Into<String>,
		timestamp: impl Into<String>,
		url: impl Into<String>,
	) -> Result<SignatureResult> {
		self.sign(&SignatureRequest::new(nonce, timestamp, url)).await
	}

	/// Same as [`Self::build_signature`] for a prepared request.
	pub async fn sign(&self, request: &SignatureRequest) -> Result<SignatureResult> {
		observe(CallKind::Signature, "sign", async {
			let access_token = self.request_access_token().await?;
			let ticket = self.request_ticket(&access_token.secret).await?;

			Ok::<_, Error>(self.sign_with_ticket(&ticket.secret, request))
		})
		.await
	}

	/// Signs `request` with an already obtained ticket; performs no I/O.
	pub fn sign_with_ticket(
		&self,
		ticket: &CredentialSecret,
		request: &SignatureRequest,
	) -> SignatureResult {
		signature::sign(&self.credentials.app_id, ticket.expose(), request)
	}

	async fn fetch(
		&self,
		kind: CallKind,
		endpoint: CredentialKind,
		url: Url,
	) -> Result<Vec<u8>, TransportError> {
		let span = CallSpan::new(kind, "fetch");
		let response = span.instrument(self.http_client.get(endpoint, url)).await?;

		span.in_scope(|| obs::record_response(kind, response.status, response.body.len()));

		Ok(response.body)
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Creates a client for the public WeChat API backed by a default reqwest transport.
	///
	/// Fails when `app_id` is not a valid identifier or the TLS backend cannot initialize.
	pub fn new(app_id: impl AsRef<str>, app_secret: impl Into<String>) -> Result<Self> {
		let credentials = Credentials::new(app_id, app_secret)?;
		let http_client = ReqwestHttpClient::try_new()?;

		Ok(Self::with_http_client(credentials, http_client))
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + JssdkHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			credentials: self.credentials.clone(),
			endpoints: self.endpoints.clone(),
			http_client: self.http_client.clone(),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + JssdkHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("app_id", &self.credentials.app_id)
			.field("endpoints", &self.endpoints)
			.finish()
	}
}

fn decode<P>(kind: CallKind, body: &[u8]) -> Result<IssuedCredential>
where
	P: response::ProviderPayload,
{
	CallSpan::new(kind, "decode").in_scope(|| response::parse_credential::<P>(body))
}

async fn observe<T, Fut>(kind: CallKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = CallSpan::new(kind, stage);

	obs::record_call_outcome(kind, CallOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
		Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
	}

	result
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::VecDeque;
	// self
	use super::*;
	use crate::{
		error::{MalformedResponseError, RemoteApiError},
		http::{HttpFuture, HttpResponse},
	};

	enum Scripted {
		Body(&'static str),
		Fail,
	}

	#[derive(Default)]
	struct ScriptedHttpClient {
		script: Mutex<VecDeque<Scripted>>,
		requests: Mutex<Vec<(CredentialKind, String)>>,
	}
	impl ScriptedHttpClient {
		fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
			Self { script: Mutex::new(script.into_iter().collect()), ..Default::default() }
		}

		fn requests(&self) -> Vec<(CredentialKind, String)> {
			self.requests.lock().clone()
		}
	}
	impl JssdkHttpClient for ScriptedHttpClient {
		fn get(&self, endpoint: CredentialKind, url: Url) -> HttpFuture<'_> {
			self.requests.lock().push((endpoint, url.to_string()));

			let next = self.script.lock().pop_front();

			Box::pin(async move {
				match next {
					Some(Scripted::Body(body)) =>
						Ok(HttpResponse { status: 200, body: body.as_bytes().to_vec() }),
					Some(Scripted::Fail) | None => Err(TransportError::network(
						endpoint,
						std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
					)),
				}
			})
		}
	}

	fn client(http: Arc<ScriptedHttpClient>) -> Client<ScriptedHttpClient> {
		let credentials =
			Credentials::new("wx-app", "app-secret").expect("Credentials fixture should be valid.");

		Client::with_http_client(credentials, http)
	}

	#[tokio::test]
	async fn build_signature_chains_token_ticket_and_digest() {
		let http = Arc::new(ScriptedHttpClient::new([
			Scripted::Body(r#"{"access_token":"TOKEN","expires_in":7200}"#),
			Scripted::Body(r#"{"errcode":0,"errmsg":"ok","ticket":"abc123","expires_in":7200}"#),
		]));
		let result = client(http.clone())
			.build_signature("xyz789", "1600000000", "https://example.com/page")
			.await
			.expect("Signature run should succeed.");

		assert_eq!(result.app_id.as_ref(), "wx-app");
		assert_eq!(result.nonce, "xyz789");
		assert_eq!(result.timestamp, "1600000000");
		assert_eq!(result.signature, "187661226950f38972b45f033bc0be8baca9211b");
		assert_eq!(
			http.requests(),
			vec![
				(
					CredentialKind::AccessToken,
					"https://api.weixin.qq.com/cgi-bin/token?grant_type=client_credential&appid=wx-app&secret=app-secret"
						.to_owned(),
				),
				(
					CredentialKind::Ticket,
					"https://api.weixin.qq.com/cgi-bin/ticket/getticket?access_token=TOKEN&type=jsapi"
						.to_owned(),
				),
			],
		);
	}

	#[tokio::test]
	async fn token_error_payload_skips_ticket_endpoint() {
		let http = Arc::new(ScriptedHttpClient::new([Scripted::Body(
			r#"{"errcode":40125,"errmsg":"invalid appsecret"}"#,
		)]));
		let err = client(http.clone())
			.build_signature("n", "1", "https://example.com")
			.await
			.expect_err("Error payload should abort the run.");

		match err {
			Error::RemoteApi(RemoteApiError { endpoint, errcode, message }) => {
				assert_eq!(endpoint, CredentialKind::AccessToken);
				assert_eq!(errcode, Some(40125));
				assert_eq!(message, "invalid appsecret");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}

		assert_eq!(http.requests().len(), 1, "Ticket endpoint must not be called.");
	}

	#[tokio::test]
	async fn transport_failures_surface_without_signature() {
		let http = Arc::new(ScriptedHttpClient::new([
			Scripted::Body(r#"{"access_token":"TOKEN"}"#),
			Scripted::Fail,
		]));
		let err = client(http.clone())
			.build_signature("n", "1", "https://example.com")
			.await
			.expect_err("Ticket transport failure should abort the run.");

		assert!(matches!(
			err,
			Error::Transport(TransportError::Network { endpoint: CredentialKind::Ticket, .. })
		));
		assert_eq!(http.requests().len(), 2);
	}

	#[tokio::test]
	async fn malformed_ticket_body_is_reported() {
		let http = Arc::new(ScriptedHttpClient::new([
			Scripted::Body(r#"{"access_token":"TOKEN"}"#),
			Scripted::Body("<html>bad gateway</html>"),
		]));
		let err = client(http)
			.build_signature("n", "1", "https://example.com")
			.await
			.expect_err("Non-JSON ticket body should abort the run.");

		assert!(matches!(
			err,
			Error::MalformedResponse(MalformedResponseError::Json {
				endpoint: CredentialKind::Ticket,
				..
			})
		));
	}

	#[tokio::test]
	async fn fetchers_return_raw_bodies() {
		let http = Arc::new(ScriptedHttpClient::new([
			Scripted::Body(r#"{"errmsg":"raw"}"#),
			Scripted::Body("not json"),
		]));
		let client = client(http);

		assert_eq!(
			client.fetch_access_token().await.expect("Token fetch should succeed."),
			br#"{"errmsg":"raw"}"#.to_vec(),
		);
		assert_eq!(
			client.fetch_ticket("TOKEN").await.expect("Ticket fetch should succeed."),
			b"not json".to_vec(),
		);
	}

	#[test]
	fn debug_output_hides_secret() {
		let rendered = format!("{:?}", client(Arc::new(ScriptedHttpClient::default())));

		assert!(rendered.contains("AppId(wx-app)"));
		assert!(!rendered.contains("app-secret"));
	}
}
