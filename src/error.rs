//! Client-level error types shared across fetchers, decoding, and signing.

// self
use crate::{
	_prelude::*,
	auth::{CredentialKind, IdentifierError},
	endpoint::EndpointError,
};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential cache failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::cache::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, unreadable body).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded into the expected shape.
	#[error(transparent)]
	MalformedResponse(#[from] MalformedResponseError),
	/// Provider answered with an error payload instead of the requested credential.
	#[error(transparent)]
	RemoteApi(#[from] RemoteApiError),
}

/// Configuration and validation failures raised while assembling a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Application identifier failed validation.
	#[error("Application identifier is invalid.")]
	InvalidAppId(#[from] IdentifierError),
	/// Endpoint configuration failed validation.
	#[error("Endpoint configuration is invalid.")]
	InvalidEndpoint(#[from] EndpointError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
impl From<IdentifierError> for Error {
	fn from(e: IdentifierError) -> Self {
		ConfigError::from(e).into()
	}
}
impl From<EndpointError> for Error {
	fn from(e: EndpointError) -> Self {
		ConfigError::from(e).into()
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint that was being called.
		endpoint: CredentialKind,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling a provider endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: CredentialKind,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// The provider's response body did not match the expected JSON shape.
#[derive(Debug, ThisError)]
pub enum MalformedResponseError {
	/// Body is not a JSON object, or a known field carries the wrong type.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	Json {
		/// Endpoint that produced the body.
		endpoint: CredentialKind,
		/// Structured parsing failure, including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A JSON object was followed by more data.
	#[error("The {endpoint} endpoint returned trailing data after the JSON object.")]
	TrailingData {
		/// Endpoint that produced the body.
		endpoint: CredentialKind,
		/// Underlying parser failure.
		#[source]
		source: serde_json::Error,
	},
	/// Body lacks both the success field and an `errmsg` explaining why.
	#[error("The {endpoint} endpoint response has neither `{field}` nor `errmsg`.")]
	MissingErrorMessage {
		/// Endpoint that produced the body.
		endpoint: CredentialKind,
		/// Success field that was expected.
		field: &'static str,
	},
}

/// Well-formed provider error payload (`errcode` + `errmsg`).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("The {endpoint} endpoint rejected the request: {message}.")]
pub struct RemoteApiError {
	/// Endpoint that rejected the request.
	pub endpoint: CredentialKind,
	/// Provider error code, when supplied.
	pub errcode: Option<i64>,
	/// Provider error message.
	pub message: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn remote_api_error_carries_provider_message() {
		let err: Error = RemoteApiError {
			endpoint: CredentialKind::AccessToken,
			errcode: Some(40013),
			message: "invalid appid".into(),
		}
		.into();

		assert!(matches!(err, Error::RemoteApi(RemoteApiError { errcode: Some(40013), .. })));
		assert_eq!(
			err.to_string(),
			"The access_token endpoint rejected the request: invalid appid."
		);
	}

	#[test]
	fn store_error_converts_with_source() {
		let store_error = crate::cache::StoreError::Backend { message: "cache offline".into() };
		let err: Error = store_error.clone().into();

		assert!(matches!(err, Error::Storage(_)));
		assert!(err.to_string().contains("cache offline"));

		let source = StdError::source(&err)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn transport_error_exposes_source() {
		let io = std::io::Error::other("connection reset");
		let err: Error = TransportError::network(CredentialKind::Ticket, io).into();

		assert_eq!(err.to_string(), "Network error occurred while calling the ticket endpoint.");

		let source = StdError::source(&err)
			.expect("Transport error should expose the underlying failure as its source.");

		assert_eq!(source.to_string(), "connection reset");
	}
}
