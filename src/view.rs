//! View state controller: turns user intents into session and fetch operations and folds
//! their outcomes into an observable [`ViewSnapshot`].
//!
//! The controller exclusively owns [`FetchState`]. A refresh intent checks and sets
//! `InFlight` before its first suspension point, so a second refresh issued while one is
//! outstanding is dropped without a network call. Every refresh carries a generation
//! number; a sign-out (or a switch to another account) bumps it, and a completion whose
//! generation no longer matches is discarded instead of overwriting the reset state.
//!
//! The fetch state is tied to the [`SessionStore::epoch`] it was produced under. Whenever
//! the controller reads or updates it and finds the epoch moved, it resets to
//! [`FetchState::Idle`] first. Sessions changed directly through the store therefore never
//! show the previous account's data either.

mod observer;
mod state;

pub use observer::*;
pub use state::*;

// crates.io
use parking_lot::MutexGuard;
// self
use crate::{
	_prelude::*,
	auth::Session,
	fetch::{FetchError, LicenseFetcher},
	http::LicenseHttpClient,
	obs::{self, OpKind, OpOutcome},
	store::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Controller specialized for the crate's default reqwest transport.
pub type ReqwestViewController = ViewController<ReqwestHttpClient>;

#[derive(Debug, Default)]
struct FetchSlot {
	state: FetchState,
	generation: u64,
	epoch: u64,
	last_refreshed_at: Option<OffsetDateTime>,
}
impl FetchSlot {
	fn reset(&mut self) {
		self.state = FetchState::Idle;
		self.generation += 1;
		self.last_refreshed_at = None;
	}

	fn follow(&mut self, epoch: u64) {
		if self.epoch != epoch {
			self.reset();
			self.epoch = epoch;
		}
	}
}

/// Mediates login/logout/refresh intents and publishes the resulting state.
pub struct ViewController<C>
where
	C: ?Sized + LicenseHttpClient,
{
	store: Arc<SessionStore>,
	fetcher: LicenseFetcher<C>,
	fetch: Mutex<FetchSlot>,
	observers: RwLock<Observers>,
}
impl<C> ViewController<C>
where
	C: ?Sized + LicenseHttpClient,
{
	/// Creates a controller over a shared session store and a fetcher.
	pub fn new(store: Arc<SessionStore>, fetcher: LicenseFetcher<C>) -> Self {
		Self {
			store,
			fetcher,
			fetch: Mutex::new(FetchSlot::default()),
			observers: RwLock::new(Observers::default()),
		}
	}

	/// Session store driven by this controller.
	pub fn store(&self) -> &Arc<SessionStore> {
		&self.store
	}

	/// Fetcher used for refresh intents.
	pub fn fetcher(&self) -> &LicenseFetcher<C> {
		&self.fetcher
	}

	/// Current fetch lifecycle state.
	pub fn fetch_state(&self) -> FetchState {
		self.slot().0.state.clone()
	}

	/// Consistent snapshot of everything a renderer needs.
	pub fn snapshot(&self) -> ViewSnapshot {
		let (session, fetch_state, last_refreshed_at) = {
			let (slot, session) = self.slot();

			(session, slot.state.clone(), slot.last_refreshed_at)
		};

		ViewSnapshot {
			session,
			fetch_state,
			last_refreshed_at,
			interactive: self.store.interactive_pending(),
		}
	}

	/// Registers an observer notified after every published change.
	pub fn subscribe(&self, observer: Arc<dyn ViewObserver>) -> SubscriptionId {
		self.observers.write().insert(observer)
	}

	/// Removes an observer; returns false when the id was unknown.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.observers.write().remove(id)
	}

	/// Number of registered observers.
	pub fn observer_count(&self) -> usize {
		self.observers.read().len()
	}

	/// Restores any cached provider session. Makes no licensing request.
	pub async fn on_startup(&self) -> Result<IntentOutcome> {
		self.store.initialize().await?;
		self.publish();

		Ok(IntentOutcome::Applied)
	}

	/// Runs the interactive sign-in.
	///
	/// Success publishes the new session and leaves the fetch state alone unless the account
	/// changed, in which case the previous account's data is reset. A sign-in or sign-out
	/// already in progress makes this a silent drop. Provider failures are returned and leave
	/// every state unchanged.
	pub async fn on_login_intent(&self) -> Result<IntentOutcome> {
		match self.store.login().await {
			Ok(_) => {
				// Drops the previous account's data when the account changed.
				self.slot();
				self.publish();

				Ok(IntentOutcome::Applied)
			},
			Err(Error::OperationInProgress { .. }) => Ok(IntentOutcome::Dropped),
			Err(e) => Err(e),
		}
	}

	/// Runs the interactive sign-out and resets the fetch state to [`FetchState::Idle`].
	///
	/// A refresh still outstanding when the sign-out lands is superseded: its result is
	/// discarded.
	pub async fn on_logout_intent(&self) -> Result<IntentOutcome> {
		match self.store.logout().await {
			Ok(()) => {
				self.slot().0.reset();
				self.publish();

				Ok(IntentOutcome::Applied)
			},
			Err(Error::OperationInProgress { .. }) => Ok(IntentOutcome::Dropped),
			Err(e) => Err(e),
		}
	}

	/// Fetches the licensing summary for the current session.
	///
	/// - Dropped while another refresh is outstanding.
	/// - Rejected with [`FetchError::NotAuthenticated`] while signed out; the fetch state is
	///   left untouched and nothing is sent.
	/// - Otherwise moves to `InFlight`, publishes, awaits the fetch, and publishes
	///   `Succeeded` or `Failed`. Failures are never retried here.
	pub async fn on_refresh_intent(&self) -> IntentOutcome {
		let (session, generation) = {
			let (mut slot, session) = self.slot();

			if slot.state.is_in_flight() {
				#[cfg(feature = "tracing")]
				tracing::debug!("refresh dropped; a request is already in flight");

				obs::record_op_outcome(OpKind::Fetch, OpOutcome::Dropped);

				return IntentOutcome::Dropped;
			}

			if !session.is_active() {
				return IntentOutcome::Rejected(FetchError::NotAuthenticated);
			}

			slot.state = FetchState::InFlight;
			slot.generation += 1;

			(session, slot.generation)
		};

		self.publish();

		let result = self.fetcher.fetch(&session).await;
		let applied = {
			let (mut slot, _) = self.slot();

			if slot.generation == generation {
				match result {
					Ok(summary) => {
						slot.last_refreshed_at = Some(OffsetDateTime::now_utc());
						slot.state = FetchState::Succeeded(summary);
					},
					Err(err) => slot.state = FetchState::Failed(err),
				}

				true
			} else {
				false
			}
		};

		if applied {
			self.publish();

			IntentOutcome::Applied
		} else {
			#[cfg(feature = "tracing")]
			tracing::debug!(generation, "refresh superseded by a session change");

			IntentOutcome::Superseded
		}
	}

	/// Session the next refresh would use.
	pub fn session(&self) -> Session {
		self.store.session()
	}

	/// Locks the fetch slot after realigning it with the store's current session.
	fn slot(&self) -> (MutexGuard<'_, FetchSlot>, Session) {
		let mut slot = self.fetch.lock();
		let (session, epoch) = self.store.session_with_epoch();

		slot.follow(epoch);

		(slot, session)
	}

	fn publish(&self) {
		let listeners = self.observers.read().listeners();

		if listeners.is_empty() {
			return;
		}

		let snapshot = self.snapshot();

		for listener in listeners {
			listener.on_change(&snapshot);
		}
	}
}
impl<C> Debug for ViewController<C>
where
	C: ?Sized + LicenseHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ViewController")
			.field("store", &self.store)
			.field("fetcher", &self.fetcher)
			.field("fetch_state", &self.fetch.lock().state)
			.field("observers", &self.observer_count())
			.finish()
	}
}
