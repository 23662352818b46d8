//! Fetch lifecycle and the renderable states derived from it.

// self
use crate::{
	_prelude::*,
	auth::Session,
	fetch::FetchError,
	license::LicenseSummary,
	store::InteractiveOp,
};

/// Lifecycle of the licensing request owned by the controller.
#[derive(Clone, Debug, Default)]
pub enum FetchState {
	/// Nothing fetched since startup or the last sign-out.
	#[default]
	Idle,
	/// A request is outstanding.
	InFlight,
	/// The last request produced a summary.
	Succeeded(LicenseSummary),
	/// The last request failed; no earlier summary is kept.
	Failed(FetchError),
}
impl FetchState {
	/// Returns true while a request is outstanding.
	pub fn is_in_flight(&self) -> bool {
		matches!(self, Self::InFlight)
	}

	/// Summary of the last successful request, if it is still current.
	pub fn summary(&self) -> Option<&LicenseSummary> {
		match self {
			Self::Succeeded(summary) => Some(summary),
			_ => None,
		}
	}

	/// Error of the last failed request, if it is still current.
	pub fn error(&self) -> Option<&FetchError> {
		match self {
			Self::Failed(err) => Some(err),
			_ => None,
		}
	}
}

/// Renderable state, one variant per distinct screen.
#[derive(Clone, Debug)]
pub enum ViewState {
	/// Nobody is signed in.
	SignedOut,
	/// Signed in, nothing fetched yet.
	NeverFetched,
	/// Signed in, request outstanding.
	Loading,
	/// Signed in, summary available.
	Loaded(LicenseSummary),
	/// Signed in, last request failed.
	FetchFailed(FetchError),
}

/// Result of handing an intent to the controller.
#[derive(Clone, Debug)]
pub enum IntentOutcome {
	/// The intent ran and its result is reflected in the published state.
	Applied,
	/// The intent was ignored because an equivalent operation is outstanding.
	Dropped,
	/// A refresh finished after a sign-out reset the state; its result was discarded.
	Superseded,
	/// A refresh could not start.
	Rejected(FetchError),
}
impl IntentOutcome {
	/// Returns true for [`IntentOutcome::Applied`].
	pub fn is_applied(&self) -> bool {
		matches!(self, Self::Applied)
	}
}

/// Read-only state published to observers.
#[derive(Clone, Debug, Default)]
pub struct ViewSnapshot {
	/// Current session.
	pub session: Session,
	/// Current fetch lifecycle state.
	pub fetch_state: FetchState,
	/// Completion time of the last successful request in this session.
	pub last_refreshed_at: Option<OffsetDateTime>,
	/// Interactive operation the session store is waiting on, if any.
	pub interactive: Option<InteractiveOp>,
}
impl ViewSnapshot {
	/// Derives the renderable state.
	pub fn view(&self) -> ViewState {
		if !self.session.is_active() {
			return ViewState::SignedOut;
		}

		match &self.fetch_state {
			FetchState::Idle => ViewState::NeverFetched,
			FetchState::InFlight => ViewState::Loading,
			FetchState::Succeeded(summary) => ViewState::Loaded(summary.clone()),
			FetchState::Failed(err) => ViewState::FetchFailed(err.clone()),
		}
	}

	/// Returns true when a refresh intent would start a request.
	pub fn can_refresh(&self) -> bool {
		self.session.is_active() && !self.fetch_state.is_in_flight()
	}

	/// Returns true when sign-in or sign-out controls should be enabled.
	pub fn can_authenticate(&self) -> bool {
		self.interactive.is_none()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{AccessCredential, AccountId, AuthenticatedAccount};

	fn active() -> Session {
		Session::Active(AuthenticatedAccount::new(
			AccountId::new("account-a").expect("Account fixture should be valid."),
			AccessCredential::new("token-a"),
		))
	}

	#[test]
	fn signed_out_wins_over_any_fetch_state() {
		let snapshot = ViewSnapshot {
			fetch_state: FetchState::Succeeded(LicenseSummary::new(1, [("E3", 1)])),
			..Default::default()
		};

		assert!(matches!(snapshot.view(), ViewState::SignedOut));
		assert!(!snapshot.can_refresh());
	}

	#[test]
	fn each_fetch_state_maps_to_one_view() {
		let mut snapshot = ViewSnapshot { session: active(), ..Default::default() };

		assert!(matches!(snapshot.view(), ViewState::NeverFetched));
		assert!(snapshot.can_refresh(), "First fetch must be reachable from Idle.");

		snapshot.fetch_state = FetchState::InFlight;

		assert!(matches!(snapshot.view(), ViewState::Loading));
		assert!(!snapshot.can_refresh());

		snapshot.fetch_state = FetchState::Succeeded(LicenseSummary::new(2, [("E5", 2)]));

		assert!(matches!(snapshot.view(), ViewState::Loaded(summary) if summary.total == 2));

		snapshot.fetch_state = FetchState::Failed(FetchError::Unauthorized { status: 401 });

		assert!(matches!(
			snapshot.view(),
			ViewState::FetchFailed(FetchError::Unauthorized { status: 401 })
		));
		assert!(snapshot.can_refresh());
		assert!(snapshot.fetch_state.summary().is_none());
		assert!(snapshot.fetch_state.error().is_some());
	}

	#[test]
	fn interactive_operations_disable_auth_controls() {
		let snapshot =
			ViewSnapshot { interactive: Some(InteractiveOp::Login), ..Default::default() };

		assert!(!snapshot.can_authenticate());
		assert!(ViewSnapshot::default().can_authenticate());
	}
}
