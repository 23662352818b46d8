//! Authorized fetch service for the licensing summary.
//!
//! [`LicenseFetcher::fetch`] reads the credential from a borrowed [`Session`] snapshot,
//! issues exactly one `GET /api/licenses` through the configured [`LicenseHttpClient`], and
//! classifies the reply. It never retries, never caches, and never mutates the session: an
//! expired credential comes back as [`FetchError::Unauthorized`] for the caller to act on.

mod metrics;

pub use metrics::FetchMetrics;

// self
use crate::{
	_prelude::*,
	auth::Session,
	config::{self, ClientConfig},
	error::{ConfigError, TransportError},
	http::{HttpReply, LicenseHttpClient},
	license::LicenseSummary,
	obs::{OpKind, OpOutcome, OpSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

type BodyError = serde_path_to_error::Error<serde_json::Error>;

/// Failures of a single licensing request.
///
/// The type is `Clone` so it can live inside
/// [`FetchState::Failed`](crate::view::FetchState::Failed); sources are shared behind `Arc`.
#[derive(Clone, Debug, ThisError)]
pub enum FetchError {
	/// The session is absent; no request was sent.
	#[error("No account is signed in.")]
	NotAuthenticated,
	/// The endpoint rejected the credential (HTTP 401 or 403).
	#[error("Licensing endpoint rejected the credential with HTTP {status}.")]
	Unauthorized {
		/// HTTP status code (401 or 403).
		status: u16,
	},
	/// Any other non-2xx status.
	#[error("Licensing endpoint returned HTTP {status_code}.")]
	ServerError {
		/// HTTP status code.
		status_code: u16,
	},
	/// No response arrived.
	#[error("Licensing endpoint could not be reached.")]
	Transport {
		/// Underlying transport failure.
		#[source]
		source: Arc<TransportError>,
	},
	/// A 2xx response whose body is not a licensing summary.
	#[error("Licensing endpoint returned a malformed body at `{}`.", .source.path())]
	InvalidResponse {
		/// Structured decoding failure, including the JSON path.
		#[source]
		source: Arc<BodyError>,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl FetchError {
	/// Returns true when the caller should prompt for (re-)authentication.
	pub fn requires_sign_in(&self) -> bool {
		matches!(self, Self::NotAuthenticated | Self::Unauthorized { .. })
	}

	/// HTTP status of the response that caused the failure, when one arrived.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Unauthorized { status } | Self::InvalidResponse { status, .. } => Some(*status),
			Self::ServerError { status_code } => Some(*status_code),
			Self::NotAuthenticated | Self::Transport { .. } => None,
		}
	}
}
impl From<TransportError> for FetchError {
	fn from(e: TransportError) -> Self {
		Self::Transport { source: Arc::new(e) }
	}
}

/// Issues the bearer-authorized licensing request.
pub struct LicenseFetcher<C>
where
	C: ?Sized + LicenseHttpClient,
{
	/// HTTP client used for every licensing request.
	pub http_client: Arc<C>,
	/// Absolute licensing endpoint URL.
	pub endpoint: Url,
	/// Shared counters for requests that reached the transport.
	pub metrics: Arc<FetchMetrics>,
}
impl<C> LicenseFetcher<C>
where
	C: ?Sized + LicenseHttpClient,
{
	/// Creates a fetcher targeting `api_base` + `/api/licenses` through `http_client`.
	pub fn with_http_client(
		api_base: Url,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			http_client: http_client.into(),
			endpoint: config::licenses_url(&api_base)?,
			metrics: Default::default(),
		})
	}

	/// Creates a fetcher for the API base in `config`.
	pub fn from_config(
		config: &ClientConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			http_client: http_client.into(),
			endpoint: config.licenses_url()?,
			metrics: Default::default(),
		})
	}

	/// Fetches the licensing summary for the session's account.
	///
	/// Sends nothing when the session is absent.
	pub async fn fetch(&self, session: &Session) -> Result<LicenseSummary, FetchError> {
		let span = OpSpan::new(OpKind::Fetch, "license_fetch");
		let result = span
			.instrument(async move {
				let credential = session.credential().ok_or(FetchError::NotAuthenticated)?;

				self.metrics.record_attempt();

				let outcome = self
					.http_client
					.get_authorized(&self.endpoint, credential)
					.await
					.map_err(FetchError::from)
					.and_then(|reply| decode_reply(&reply));

				self.metrics.record_outcome(&outcome);

				outcome
			})
			.await;

		match &result {
			Ok(_) => span.record(OpOutcome::Success),
			Err(_err) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_err, status = ?_err.status(), "license fetch failed");

				span.record(OpOutcome::Failure)
			},
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl LicenseFetcher<ReqwestHttpClient> {
	/// Creates a fetcher with a default reqwest transport for the API base in `config`.
	pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
		Self::from_config(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for LicenseFetcher<C>
where
	C: ?Sized + LicenseHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			endpoint: self.endpoint.clone(),
			metrics: self.metrics.clone(),
		}
	}
}
impl<C> Debug for LicenseFetcher<C>
where
	C: ?Sized + LicenseHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LicenseFetcher")
			.field("endpoint", &self.endpoint.as_str())
			.field("attempts", &self.metrics.attempts())
			.finish()
	}
}

/// Maps an HTTP reply onto the fetch outcome.
pub fn decode_reply(reply: &HttpReply) -> Result<LicenseSummary, FetchError> {
	match reply.status {
		status if reply.is_success() => {
			let mut de = serde_json::Deserializer::from_slice(&reply.body);

			serde_path_to_error::deserialize(&mut de)
				.map_err(|source| FetchError::InvalidResponse { source: Arc::new(source), status })
		},
		status @ (401 | 403) => Err(FetchError::Unauthorized { status }),
		status_code => Err(FetchError::ServerError { status_code }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{AccessCredential, AccountId, AuthenticatedAccount},
		http::HttpFuture,
	};

	#[derive(Default)]
	struct CountingClient {
		calls: Mutex<Vec<String>>,
	}
	impl LicenseHttpClient for CountingClient {
		fn get_authorized<'a>(
			&'a self,
			url: &'a Url,
			credential: &'a AccessCredential,
		) -> HttpFuture<'a, HttpReply> {
			Box::pin(async move {
				self.calls.lock().push(format!("{url} {}", credential.expose()));

				Ok(HttpReply::new(200, r#"{"total":1,"types":{"E3":1}}"#))
			})
		}
	}

	fn fetcher(client: Arc<CountingClient>) -> LicenseFetcher<CountingClient> {
		LicenseFetcher::with_http_client(
			Url::parse("https://api.example.com/").expect("API base fixture should parse."),
			client,
		)
		.expect("Fetcher fixture should build.")
	}

	#[tokio::test]
	async fn absent_session_sends_nothing() {
		let client = Arc::new(CountingClient::default());
		let fetcher = fetcher(client.clone());
		let err = fetcher
			.fetch(&Session::Absent)
			.await
			.expect_err("Absent session should not be authorized.");

		assert!(matches!(err, FetchError::NotAuthenticated));
		assert!(err.requires_sign_in());
		assert!(client.calls.lock().is_empty());
		assert_eq!(fetcher.metrics.attempts(), 0);
	}

	#[tokio::test]
	async fn active_session_sends_one_request_with_its_credential() {
		let client = Arc::new(CountingClient::default());
		let fetcher = fetcher(client.clone());
		let session = Session::Active(AuthenticatedAccount::new(
			AccountId::new("account-a").expect("Account fixture should be valid."),
			AccessCredential::new("token-a"),
		));
		let summary = fetcher.fetch(&session).await.expect("Scripted reply should decode.");

		assert_eq!(summary, LicenseSummary::new(1, [("E3", 1)]));
		assert_eq!(*client.calls.lock(), ["https://api.example.com/api/licenses token-a"]);
		assert_eq!(fetcher.metrics.attempts(), 1);
		assert_eq!(fetcher.metrics.successes(), 1);
	}

	#[test]
	fn statuses_map_onto_the_taxonomy() {
		assert!(matches!(
			decode_reply(&HttpReply::new(401, Vec::new())),
			Err(FetchError::Unauthorized { status: 401 })
		));
		assert!(matches!(
			decode_reply(&HttpReply::new(403, "{\"error\":\"Forbidden\"}")),
			Err(FetchError::Unauthorized { status: 403 })
		));
		assert!(matches!(
			decode_reply(&HttpReply::new(404, "{\"error\":\"Endpoint not found\"}")),
			Err(FetchError::ServerError { status_code: 404 })
		));
		assert!(matches!(
			decode_reply(&HttpReply::new(500, Vec::new())),
			Err(FetchError::ServerError { status_code: 500 })
		));
	}

	#[test]
	fn malformed_success_bodies_report_the_json_path() {
		let err = decode_reply(&HttpReply::new(200, r#"{"total":3,"types":{"E3":"three"}}"#))
			.expect_err("String counts should be rejected.");

		match &err {
			FetchError::InvalidResponse { source, status } => {
				assert_eq!(*status, 200);
				assert_eq!(source.path().to_string(), "types.E3");
			},
			other => panic!("Unexpected error: {other:?}"),
		}

		assert_eq!(err.status(), Some(200));
		assert!(!err.requires_sign_in());
		assert!(matches!(
			decode_reply(&HttpReply::new(204, Vec::new())),
			Err(FetchError::InvalidResponse { status: 204, .. })
		));
	}

	#[test]
	fn transport_errors_keep_their_source() {
		let err = FetchError::from(TransportError::Io(std::io::Error::other("connection reset")));

		assert!(StdError::source(&err).is_some());
		assert_eq!(err.status(), None);
	}
}
