// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{fetch::FetchError, license::LicenseSummary};

/// Thread-safe counters for licensing requests that reached the transport.
///
/// Failures are counted once in [`FetchMetrics::failures`] and again in the bucket that
/// explains them, so a dashboard can tell an expired credential from an unreachable backend
/// without parsing logs.
#[derive(Debug, Default)]
pub struct FetchMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	unauthorized: AtomicU64,
	server_error: AtomicU64,
	transport: AtomicU64,
	invalid_response: AtomicU64,
}
impl FetchMetrics {
	/// Requests handed to the HTTP client.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Requests that produced a [`LicenseSummary`].
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Requests that ended in any fetch error.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Requests rejected with 401/403.
	pub fn unauthorized(&self) -> u64 {
		self.unauthorized.load(Ordering::Relaxed)
	}

	/// Requests answered with any other non-2xx status.
	pub fn server_errors(&self) -> u64 {
		self.server_error.load(Ordering::Relaxed)
	}

	/// Requests that never got a response.
	pub fn transport_failures(&self) -> u64 {
		self.transport.load(Ordering::Relaxed)
	}

	/// 2xx responses whose body did not decode.
	pub fn invalid_responses(&self) -> u64 {
		self.invalid_response.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_outcome(&self, outcome: &Result<LicenseSummary, FetchError>) {
		let err = match outcome {
			Ok(_) => {
				self.success.fetch_add(1, Ordering::Relaxed);

				return;
			},
			Err(err) => err,
		};

		self.failure.fetch_add(1, Ordering::Relaxed);

		let bucket = match err {
			FetchError::Unauthorized { .. } => &self.unauthorized,
			FetchError::ServerError { .. } => &self.server_error,
			FetchError::Transport { .. } => &self.transport,
			FetchError::InvalidResponse { .. } => &self.invalid_response,
			// Never sent, so never counted as an attempt either.
			FetchError::NotAuthenticated => return,
		};

		bucket.fetch_add(1, Ordering::Relaxed);
	}
}
