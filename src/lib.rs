//! WeChat JS-SDK signing client: fetch an access token and a `jsapi` ticket, then sign pages
//! for `wx.config` with a deterministic SHA-1 signature.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod obs;
pub mod response;
pub mod signature;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		client::Client,
		endpoint::Endpoints,
		http::ReqwestHttpClient,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds endpoints that point at the `/cgi-bin/token` and `/cgi-bin/ticket/getticket`
	/// paths of a mock server base URL.
	pub fn test_endpoints(base_url: &str) -> Endpoints {
		let base = base_url.trim_end_matches('/');

		Endpoints::builder()
			.token_endpoint(
				Url::parse(&format!("{base}/cgi-bin/token"))
					.expect("Mock token endpoint should parse successfully."),
			)
			.ticket_endpoint(
				Url::parse(&format!("{base}/cgi-bin/ticket/getticket"))
					.expect("Mock ticket endpoint should parse successfully."),
			)
			.build()
			.expect("Mock endpoints should build successfully.")
	}

	/// Constructs a [`Client`] wired to the reqwest transport used across integration tests.
	pub fn build_reqwest_test_client(
		base_url: &str,
		app_id: &str,
		app_secret: &str,
	) -> ReqwestTestClient {
		let credentials =
			Credentials::new(app_id, app_secret).expect("Test credentials should be valid.");

		Client::with_http_client(credentials, test_reqwest_http_client())
			.with_endpoints(test_endpoints(base_url))
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
