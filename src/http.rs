//! Transport primitives for the authorized licensing request.
//!
//! [`LicenseHttpClient`] is the crate's only dependency on an HTTP stack. The fetch service
//! hands it an absolute URL plus the bearer credential and receives the raw status and body
//! back; status classification and JSON decoding stay in [`fetch`](crate::fetch) so every
//! transport gets the same error taxonomy.

// self
use crate::{_prelude::*, auth::AccessCredential, error::TransportError};
#[cfg(feature = "reqwest")]
use reqwest::header::{ACCEPT, HeaderValue};

/// Boxed future returned by [`LicenseHttpClient::get_authorized`].
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports able to issue a bearer-authorized GET.
///
/// Implementations must perform exactly one request per call, must not retry, and must
/// return any HTTP response (including 4xx/5xx) as an [`HttpReply`]. Only failures where no
/// response arrived become a [`TransportError`].
pub trait LicenseHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `GET url` with `Authorization: Bearer <credential>`.
	fn get_authorized<'a>(
		&'a self,
		url: &'a Url,
		credential: &'a AccessCredential,
	) -> HttpFuture<'a, HttpReply>;
}

/// Status and body of an HTTP response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpReply {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpReply {
	/// Creates a reply from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
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
impl LicenseHttpClient for ReqwestHttpClient {
	fn get_authorized<'a>(
		&'a self,
		url: &'a Url,
		credential: &'a AccessCredential,
	) -> HttpFuture<'a, HttpReply> {
		Box::pin(async move {
			let response = self
				.0
				.get(url.clone())
				.bearer_auth(credential.expose())
				.header(ACCEPT, HeaderValue::from_static("application/json"))
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(HttpReply { status, body })
		})
	}
}
