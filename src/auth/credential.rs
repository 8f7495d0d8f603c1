//! Application credentials and provider-issued credential records.

// self
use crate::{
	_prelude::*,
	auth::{AppId, AppSecret, CredentialSecret, IdentifierError},
};

/// Identifier + secret pair supplied once per client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	/// Public application identifier.
	pub app_id: AppId,
	/// Application secret; never logged.
	pub app_secret: AppSecret,
}
impl Credentials {
	/// Validates the identifier and pairs it with the secret.
	pub fn new(
		app_id: impl AsRef<str>,
		app_secret: impl Into<String>,
	) -> Result<Self, IdentifierError> {
		Ok(Self { app_id: AppId::new(app_id)?, app_secret: AppSecret::new(app_secret) })
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("app_id", &self.app_id)
			.field("app_secret", &self.app_secret)
			.finish()
	}
}

/// Kind of short-lived credential issued by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
	/// Bearer token returned by the token endpoint.
	AccessToken,
	/// `jsapi` ticket returned by the ticket endpoint.
	Ticket,
}
impl CredentialKind {
	/// Returns a stable label suitable for keys, spans, and metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			CredentialKind::AccessToken => "access_token",
			CredentialKind::Ticket => "ticket",
		}
	}
}
impl Display for CredentialKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Access token or ticket together with the validity window the provider reported.
///
/// The core client never checks expiry; the data is carried so callers (or
/// [`CachingClient`](crate::cache::CachingClient)) can.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCredential {
	/// Which credential this is.
	pub kind: CredentialKind,
	/// Credential value.
	pub secret: CredentialSecret,
	/// Local instant the response was decoded.
	pub issued_at: OffsetDateTime,
	/// Lifetime reported via `expires_in`, if present.
	pub expires_in: Option<Duration>,
}
impl IssuedCredential {
	/// Lifetime the provider documents for both tokens and tickets.
	pub const DEFAULT_LIFETIME: Duration = Duration::seconds(7200);

	/// Creates a record issued now.
	pub fn new(kind: CredentialKind, secret: CredentialSecret, expires_in: Option<Duration>) -> Self {
		Self { kind, secret, issued_at: OffsetDateTime::now_utc(), expires_in }
	}

	/// Overrides the issued-at instant.
	pub fn with_issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = instant;

		self
	}

	/// Expiry instant, falling back to [`Self::DEFAULT_LIFETIME`] when the provider omitted it.
	///
	/// Lifetimes past the representable range saturate at the maximum instant.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.issued_at.saturating_add(self.expires_in.unwrap_or(Self::DEFAULT_LIFETIME))
	}

	/// Whether the credential is expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn credentials_debug_hides_secret() {
		let credentials =
			Credentials::new("wx-app", "app-secret").expect("Credentials fixture should be valid.");
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("AppId(wx-app)"));
		assert!(!rendered.contains("app-secret"));
	}

	#[test]
	fn expiry_uses_reported_lifetime_or_default() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let reported = IssuedCredential::new(
			CredentialKind::Ticket,
			CredentialSecret::new("ticket"),
			Some(Duration::minutes(30)),
		)
		.with_issued_at(issued);
		let defaulted =
			IssuedCredential::new(CredentialKind::AccessToken, CredentialSecret::new("token"), None)
				.with_issued_at(issued);

		assert_eq!(reported.expires_at(), macros::datetime!(2025-01-01 00:30 UTC));
		assert_eq!(defaulted.expires_at(), macros::datetime!(2025-01-01 02:00 UTC));
		assert!(!reported.is_expired_at(macros::datetime!(2025-01-01 00:29 UTC)));
		assert!(reported.is_expired_at(macros::datetime!(2025-01-01 00:30 UTC)));
	}

	#[test]
	fn oversized_lifetime_saturates_instead_of_overflowing() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let credential = IssuedCredential::new(
			CredentialKind::AccessToken,
			CredentialSecret::new("token"),
			Some(Duration::seconds(i64::MAX)),
		)
		.with_issued_at(issued);
		let expires_at = credential.expires_at();

		assert!(expires_at > issued);
		assert!(!credential.is_expired_at(macros::datetime!(9999-12-31 00:00 UTC)));
	}
}
