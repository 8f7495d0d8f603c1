//! Demonstrates signing a page for `wx.config` against a mock provider, first with the plain
//! client and then through the caching decorator so repeated signatures reuse one ticket.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use wechat_jssdk::{
	auth::Credentials,
	cache::CachingClient,
	client::Client,
	endpoint::Endpoints,
	http::ReqwestHttpClient,
	reqwest,
	signature::SignatureRequest,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/token")
				.query_param("grant_type", "client_credential")
				.query_param("appid", "wx-demo");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"expires_in\":7200}");
		})
		.await;
	let ticket_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/ticket/getticket")
				.query_param("access_token", "demo-access")
				.query_param("type", "jsapi");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"ticket\":\"demo-ticket\",\"expires_in\":7200}",
			);
		})
		.await;
	let endpoints = Endpoints::builder()
		.token_endpoint(Url::parse(&server.url("/cgi-bin/token"))?)
		.ticket_endpoint(Url::parse(&server.url("/cgi-bin/ticket/getticket"))?)
		.build()?;
	let http_client = ReqwestHttpClient::with_client(
		reqwest::Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let credentials = Credentials::new("wx-demo", "demo-secret")?;
	let client = <Client<ReqwestHttpClient>>::with_http_client(credentials, http_client)
		.with_endpoints(endpoints);
	let one_shot =
		client.build_signature("Wm3WZYTPz0wzccnW", "1414587457", "https://example.com/page").await?;

	println!("One-shot wx.config payload: {}.", serde_json::to_string(&one_shot)?);

	let cached = CachingClient::new(client);

	for page in ["https://example.com/a", "https://example.com/b?tab=2"] {
		let result = cached.sign(&SignatureRequest::generate(page)).await?;

		println!("{page} -> signature {} (nonce {}).", result.signature, result.nonce);
	}

	// One fetch for the one-shot run plus one shared by both cached signatures.
	token_mock.assert_calls_async(2).await;
	ticket_mock.assert_calls_async(2).await;

	Ok(())
}
