//! Crate-level error types shared across the session store, fetch service, and controller.

// self
use crate::{_prelude::*, fetch::FetchError, provider::ProviderError, store::InteractiveOp};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Licensing request failure.
	#[error(transparent)]
	Fetch(#[from] FetchError),

	/// Provider could not enumerate its cached accounts at startup.
	#[error("Identity provider failed to initialize.")]
	InitializeFailed {
		/// Provider-reported failure.
		#[source]
		source: ProviderError,
	},
	/// Interactive sign-in failed or was dismissed.
	#[error("Sign-in failed.")]
	LoginFailed {
		/// Provider-reported failure.
		#[source]
		source: ProviderError,
	},
	/// Interactive sign-out failed or was dismissed.
	#[error("Sign-out failed.")]
	LogoutFailed {
		/// Provider-reported failure.
		#[source]
		source: ProviderError,
	},
	/// Another interactive operation is still pending on the same store.
	#[error("An interactive {operation} is already in progress.")]
	OperationInProgress {
		/// Operation currently holding the interactive guard.
		operation: InteractiveOp,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A required configuration field was not supplied.
	#[error("Configuration field `{field}` is required.")]
	MissingField {
		/// Field name.
		field: &'static str,
	},
	/// A required environment variable is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingVar {
		/// Variable name.
		name: &'static str,
	},
	/// A configured URL cannot be parsed.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Configuration field that failed to parse.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A configured URL uses a scheme the crate cannot talk to.
	#[error("The {field} URL must use {expected}: {url}.")]
	UnsupportedScheme {
		/// Configuration field that failed validation.
		field: &'static str,
		/// Accepted scheme(s).
		expected: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// Client or tenant identifier is malformed.
	#[error("Configured identifier is invalid.")]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
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

/// Transport-level failures (network, IO) raised before any HTTP response arrives.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the licensing endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the licensing endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn provider_failures_keep_their_source() {
		let err = Error::LoginFailed { source: ProviderError::Cancelled };

		assert_eq!(err.to_string(), "Sign-in failed.");

		let source =
			StdError::source(&err).expect("Login failure should expose the provider error.");

		assert_eq!(source.to_string(), ProviderError::Cancelled.to_string());
	}

	#[test]
	fn operation_in_progress_names_the_pending_operation() {
		let err = Error::OperationInProgress { operation: InteractiveOp::Logout };

		assert_eq!(err.to_string(), "An interactive logout is already in progress.");
	}

	#[test]
	fn fetch_errors_convert_transparently() {
		let err: Error = FetchError::ServerError { status_code: 502 }.into();

		assert!(matches!(err, Error::Fetch(FetchError::ServerError { status_code: 502 })));
		assert_eq!(err.to_string(), FetchError::ServerError { status_code: 502 }.to_string());
	}
}
