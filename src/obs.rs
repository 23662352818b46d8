//! Optional observability helpers for session and fetch operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `storefront_session.op` with the `op`,
//!   `stage` (call site), and `outcome` fields, plus debug/warn events on state transitions.
//! - Enable `metrics` to increment the `storefront_session_op_total` counter for every
//!   attempt/success/failure/drop, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Startup account enumeration.
	Initialize,
	/// Interactive sign-in.
	Login,
	/// Interactive sign-out.
	Logout,
	/// Authorized licensing request.
	Fetch,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Initialize => "initialize",
			OpKind::Login => "login",
			OpKind::Logout => "logout",
			OpKind::Fetch => "fetch",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Intent ignored by a re-entrancy guard.
	Dropped,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
			OpOutcome::Dropped => "dropped",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
