//! Typed decoding of token and ticket responses.
//!
//! The provider answers both endpoints with a JSON object. Success carries the credential
//! field (`access_token` or `ticket`); failure carries `errcode`/`errmsg`. Decoding
//! distinguishes three cases for every consumed field: present with the right type, absent
//! (or `null`), and present with the wrong type. The last one is a
//! [`MalformedResponseError`], never a panic.

// crates.io
use serde::{Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::{CredentialKind, CredentialSecret, IssuedCredential},
	error::{MalformedResponseError, RemoteApiError},
};

/// Body returned by the access token endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AccessTokenResponse {
	/// Access token on success.
	pub access_token: Option<String>,
	/// Lifetime in seconds.
	#[serde(default, deserialize_with = "lenient_i64")]
	pub expires_in: Option<i64>,
	/// Provider error code.
	#[serde(default, deserialize_with = "lenient_i64")]
	pub errcode: Option<i64>,
	/// Provider error message.
	pub errmsg: Option<String>,
}

/// Body returned by the ticket endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TicketResponse {
	/// `jsapi` ticket on success.
	pub ticket: Option<String>,
	/// Lifetime in seconds.
	#[serde(default, deserialize_with = "lenient_i64")]
	pub expires_in: Option<i64>,
	/// Provider error code (`0` alongside a ticket).
	#[serde(default, deserialize_with = "lenient_i64")]
	pub errcode: Option<i64>,
	/// Provider error message (`"ok"` alongside a ticket).
	pub errmsg: Option<String>,
}

/// Shared view over the two response shapes.
pub trait ProviderPayload
where
	Self: DeserializeOwned,
{
	/// Credential the payload carries.
	const KIND: CredentialKind;
	/// Name of the success field.
	const FIELD: &'static str;

	/// Splits the payload into its consumed fields.
	fn into_parts(self) -> PayloadParts;
}
impl ProviderPayload for AccessTokenResponse {
	const FIELD: &'static str = "access_token";
	const KIND: CredentialKind = CredentialKind::AccessToken;

	fn into_parts(self) -> PayloadParts {
		PayloadParts {
			value: self.access_token,
			expires_in: self.expires_in,
			errcode: self.errcode,
			errmsg: self.errmsg,
		}
	}
}
impl ProviderPayload for TicketResponse {
	const FIELD: &'static str = "ticket";
	const KIND: CredentialKind = CredentialKind::Ticket;

	fn into_parts(self) -> PayloadParts {
		PayloadParts {
			value: self.ticket,
			expires_in: self.expires_in,
			errcode: self.errcode,
			errmsg: self.errmsg,
		}
	}
}

/// Fields consumed from either response shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PayloadParts {
	/// Success field value.
	pub value: Option<String>,
	/// Lifetime in seconds.
	pub expires_in: Option<i64>,
	/// Provider error code.
	pub errcode: Option<i64>,
	/// Provider error message.
	pub errmsg: Option<String>,
}

/// Parses `body` as a JSON object and decodes it into `P`.
pub fn decode<P>(body: &[u8]) -> Result<P, MalformedResponseError>
where
	P: ProviderPayload,
{
	let json_err = |source| MalformedResponseError::Json { endpoint: P::KIND, source };
	let mut de = serde_json::Deserializer::from_slice(body);
	let object: Map<String, Value> =
		serde_path_to_error::deserialize(&mut de).map_err(json_err)?;

	de.end()
		.map_err(|source| MalformedResponseError::TrailingData { endpoint: P::KIND, source })?;

	serde_path_to_error::deserialize(Value::Object(object)).map_err(json_err)
}

/// Decodes `body` and resolves it into an issued credential or the provider's error.
pub fn parse_credential<P>(body: &[u8]) -> Result<IssuedCredential>
where
	P: ProviderPayload,
{
	let parts = decode::<P>(body)?.into_parts();

	match (parts.value, parts.errmsg) {
		(Some(value), _) => {
			let expires_in = parts.expires_in.filter(|secs| *secs > 0).map(Duration::seconds);

			Ok(IssuedCredential::new(P::KIND, CredentialSecret::new(value), expires_in))
		},
		(None, Some(message)) =>
			Err(RemoteApiError { endpoint: P::KIND, errcode: parts.errcode, message }.into()),
		(None, None) => Err(MalformedResponseError::MissingErrorMessage {
			endpoint: P::KIND,
			field: P::FIELD,
		}
		.into()),
	}
}

// Numeric fields the flow does not depend on; tolerate strings and drop anything else.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;

	Ok(value.and_then(|v| {
		v.as_i64().or_else(|| v.as_str().and_then(|raw| raw.trim().parse().ok()))
	}))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn access_token_success_carries_lifetime() {
		let credential = parse_credential::<AccessTokenResponse>(
			br#"{"access_token":"ACCESS","expires_in":7200}"#,
		)
		.expect("Token payload should decode.");

		assert_eq!(credential.kind, CredentialKind::AccessToken);
		assert_eq!(credential.secret.expose(), "ACCESS");
		assert_eq!(credential.expires_in, Some(Duration::seconds(7200)));
	}

	#[test]
	fn ticket_success_ignores_ok_errmsg() {
		let credential = parse_credential::<TicketResponse>(
			br#"{"errcode":0,"errmsg":"ok","ticket":"TICKET","expires_in":"7200"}"#,
		)
		.expect("Ticket payload should decode.");

		assert_eq!(credential.secret.expose(), "TICKET");
		assert_eq!(credential.expires_in, Some(Duration::seconds(7200)));
	}

	#[test]
	fn errmsg_becomes_remote_api_error() {
		let err = parse_credential::<AccessTokenResponse>(
			br#"{"errcode":40013,"errmsg":"invalid appid"}"#,
		)
		.expect_err("Error payload should be rejected.");

		match err {
			Error::RemoteApi(RemoteApiError { endpoint, errcode, message }) => {
				assert_eq!(endpoint, CredentialKind::AccessToken);
				assert_eq!(errcode, Some(40013));
				assert_eq!(message, "invalid appid");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn missing_errmsg_is_malformed() {
		let err = parse_credential::<TicketResponse>(br#"{"errcode":-1}"#)
			.expect_err("Payload without ticket or errmsg should be rejected.");

		assert!(matches!(
			err,
			Error::MalformedResponse(MalformedResponseError::MissingErrorMessage {
				endpoint: CredentialKind::Ticket,
				field: "ticket",
			})
		));
	}

	#[test]
	fn wrong_typed_errmsg_reports_field_path() {
		let err = decode::<AccessTokenResponse>(br#"{"errcode":40001,"errmsg":42}"#)
			.expect_err("Numeric errmsg should be rejected.");

		match err {
			MalformedResponseError::Json { endpoint, source } => {
				assert_eq!(endpoint, CredentialKind::AccessToken);
				assert_eq!(source.path().to_string(), "errmsg");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn non_object_bodies_are_malformed() {
		let bodies: [&[u8]; 4] =
			[b"not json", b"[\"ACCESS\",7200]", b"\"ACCESS\"", b"{} trailing"];

		for body in bodies {
			let err = parse_credential::<AccessTokenResponse>(body)
				.expect_err("Non-object body should be rejected.");

			assert!(matches!(err, Error::MalformedResponse(_)), "Unexpected error: {err:?}.");
		}
	}

	#[test]
	fn null_fields_count_as_absent() {
		let err = parse_credential::<AccessTokenResponse>(
			br#"{"access_token":null,"errmsg":"access_token missing"}"#,
		)
		.expect_err("Null access token should fall through to errmsg.");

		assert!(matches!(err, Error::RemoteApi(_)));
	}
}
