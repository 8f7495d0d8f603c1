//! Join-string construction and SHA-1 signing for `wx.config`.
//!
//! Both sides recompute the join string independently, so field order and separators are
//! fixed and values are inserted without escaping.

// crates.io
use rand::{Rng, distr::Alphanumeric};
use sha1::{Digest, Sha1};
// self
use crate::{_prelude::*, auth::AppId};

const NONCE_LEN: usize = 16;

/// Caller-supplied parameters for one signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRequest {
	/// Random string; uniqueness per request is the caller's responsibility.
	pub nonce: String,
	/// Unix timestamp rendered as a string.
	pub timestamp: String,
	/// Full URL of the page calling `wx.config`, used verbatim.
	pub url: String,
}
impl SignatureRequest {
	/// Creates a request from explicit values.
	pub fn new(
		nonce: impl Into<String>,
		timestamp: impl Into<String>,
		url: impl Into<String>,
	) -> Self {
		Self { nonce: nonce.into(), timestamp: timestamp.into(), url: url.into() }
	}

	/// Creates a request with a random alphanumeric nonce and the current Unix timestamp.
	pub fn generate(url: impl Into<String>) -> Self {
		let nonce = random_nonce(NONCE_LEN);
		let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();

		Self { nonce, timestamp, url: url.into() }
	}

	/// Renders the join string for `ticket`.
	pub fn join_string(&self, ticket: &str) -> String {
		join_string(ticket, &self.nonce, &self.timestamp, &self.url)
	}
}

/// Parameters handed to the front-end `wx.config` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResult {
	/// Application identifier.
	#[serde(rename = "appId")]
	pub app_id: AppId,
	/// Nonce echoed from the request.
	#[serde(rename = "nonceStr")]
	pub nonce: String,
	/// Lowercase hexadecimal SHA-1 digest (40 characters).
	pub signature: String,
	/// Timestamp echoed from the request.
	pub timestamp: String,
}

/// Formats `jsapi_ticket=<ticket>&noncestr=<nonce>&timestamp=<timestamp>&url=<url>`.
pub fn join_string(ticket: &str, nonce: &str, timestamp: &str, url: &str) -> String {
	format!("jsapi_ticket={ticket}&noncestr={nonce}&timestamp={timestamp}&url={url}")
}

/// SHA-1 of the UTF-8 bytes of `join`, rendered as lowercase hex.
pub fn digest(join: &str) -> String {
	let mut hasher = Sha1::new();

	hasher.update(join.as_bytes());

	hex::encode(hasher.finalize())
}

/// Signs `request` with `ticket` on behalf of `app_id`.
pub fn sign(app_id: &AppId, ticket: &str, request: &SignatureRequest) -> SignatureResult {
	SignatureResult {
		app_id: app_id.clone(),
		nonce: request.nonce.clone(),
		signature: digest(&request.join_string(ticket)),
		timestamp: request.timestamp.clone(),
	}
}

fn random_nonce(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}
