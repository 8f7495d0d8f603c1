//! Provider endpoint configuration owned by each client.
//!
//! [`Endpoints::default`] targets the public WeChat API. Tests and proxies can point the client
//! elsewhere through [`Endpoints::builder`], which enforces HTTPS the same way for every
//! endpoint. Request URLs are rendered from fixed query templates; values are substituted
//! verbatim and only characters the URL parser cannot carry are percent-encoded.

// self
use crate::{_prelude::*, auth::Credentials};

const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.weixin.qq.com/cgi-bin/token";
const DEFAULT_TICKET_ENDPOINT: &str = "https://api.weixin.qq.com/cgi-bin/ticket/getticket";

/// Errors raised while constructing or validating endpoints.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum EndpointError {
	/// Token endpoint was not configured.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Ticket endpoint was not configured.
	#[error("Missing ticket endpoint.")]
	MissingTicketEndpoint,
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoints carry their own query; the client owns it.
	#[error("The {endpoint} endpoint must not carry a query string: {url}.")]
	UnexpectedQuery {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Token + ticket endpoint pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// Access token endpoint (`grant_type=client_credential`).
	pub token: Url,
	/// `jsapi` ticket endpoint.
	pub ticket: Url,
}
impl Endpoints {
	/// Creates a new builder with no endpoints set.
	pub fn builder() -> EndpointsBuilder {
		EndpointsBuilder::default()
	}

	/// Renders `<token>?grant_type=client_credential&appid=<appid>&secret=<secret>`.
	pub fn access_token_url(&self, credentials: &Credentials) -> Url {
		let mut url = self.token.clone();
		let query = format!(
			"grant_type=client_credential&appid={}&secret={}",
			credentials.app_id,
			credentials.app_secret.expose()
		);

		url.set_query(Some(&query));

		url
	}

	/// Renders `<ticket>?access_token=<token>&type=jsapi`.
	pub fn ticket_url(&self, access_token: &str) -> Url {
		let mut url = self.ticket.clone();

		url.set_query(Some(&format!("access_token={access_token}&type=jsapi")));

		url
	}

	fn validate(&self) -> Result<(), EndpointError> {
		validate_endpoint("token", &self.token)?;
		validate_endpoint("ticket", &self.ticket)?;

		Ok(())
	}
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			token: Url::parse(DEFAULT_TOKEN_ENDPOINT)
				.expect("Default token endpoint should be a valid URL."),
			ticket: Url::parse(DEFAULT_TICKET_ENDPOINT)
				.expect("Default ticket endpoint should be a valid URL."),
		}
	}
}

/// Builder for [`Endpoints`] values.
#[derive(Debug, Default)]
pub struct EndpointsBuilder {
	/// Token endpoint.
	pub token_endpoint: Option<Url>,
	/// Ticket endpoint.
	pub ticket_endpoint: Option<Url>,
}
impl EndpointsBuilder {
	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the ticket endpoint.
	pub fn ticket_endpoint(mut self, url: Url) -> Self {
		self.ticket_endpoint = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting endpoints.
	pub fn build(self) -> Result<Endpoints, EndpointError> {
		let token = self.token_endpoint.ok_or(EndpointError::MissingTokenEndpoint)?;
		let ticket = self.ticket_endpoint.ok_or(EndpointError::MissingTicketEndpoint)?;
		let endpoints = Endpoints { token, ticket };

		endpoints.validate()?;

		Ok(endpoints)
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), EndpointError> {
	if url.scheme() != "https" {
		return Err(EndpointError::InsecureEndpoint { endpoint: name, url: url.to_string() });
	}
	if url.query().is_some() {
		return Err(EndpointError::UnexpectedQuery { endpoint: name, url: url.to_string() });
	}

	Ok(())
}
