//! Session store: the single owner of the process-wide [`Session`].
//!
//! [`SessionStore`] seeds itself from the provider's cached accounts once at startup and
//! afterwards only changes on interactive sign-in/sign-out. Interactive operations are
//! serialized by a fail-fast guard: a second `login`/`logout` while one is pending returns
//! [`Error::OperationInProgress`] without touching the provider.
//!
//! Every change of the signed-in account (sign-in, sign-out, switching accounts, restoring a
//! cached account) bumps the store's epoch. Anything derived from the session, such as the
//! controller's fetch state, records the epoch it was produced under and is discarded once the
//! epoch moves on, no matter which caller changed the session.

// std
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{AuthenticatedAccount, Session},
	obs::{OpKind, OpSpan},
	provider::IdentityProvider,
};

/// Interactive operations guarded by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractiveOp {
	/// Interactive sign-in.
	Login,
	/// Interactive sign-out.
	Logout,
}
impl InteractiveOp {
	/// Returns a stable label suitable for messages and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			InteractiveOp::Login => "login",
			InteractiveOp::Logout => "logout",
		}
	}
}
impl Display for InteractiveOp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Holds at most one active account and mediates every provider interaction.
pub struct SessionStore {
	provider: Arc<dyn IdentityProvider>,
	session: RwLock<Session>,
	epoch: AtomicU64,
	pending: Mutex<Option<InteractiveOp>>,
	initialized: AtomicBool,
	init_gate: AsyncMutex<()>,
}
impl SessionStore {
	/// Creates an uninitialized store with an [`Session::Absent`] session.
	pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
		Self {
			provider,
			session: RwLock::new(Session::Absent),
			epoch: AtomicU64::new(0),
			pending: Mutex::new(None),
			initialized: AtomicBool::new(false),
			init_gate: AsyncMutex::new(()),
		}
	}

	/// Cloned snapshot of the current session.
	pub fn session(&self) -> Session {
		self.session.read().clone()
	}

	/// Counter bumped whenever the signed-in account changes.
	///
	/// Re-signing in as the same account (a credential refresh) keeps the epoch.
	pub fn epoch(&self) -> u64 {
		self.epoch.load(Ordering::Acquire)
	}

	/// Session snapshot together with the epoch it belongs to, read atomically.
	pub fn session_with_epoch(&self) -> (Session, u64) {
		let session = self.session.read();

		(session.clone(), self.epoch())
	}

	/// Returns true while an account is signed in.
	pub fn is_signed_in(&self) -> bool {
		self.session.read().is_active()
	}

	/// Returns true once [`SessionStore::initialize`] has completed successfully.
	pub fn is_initialized(&self) -> bool {
		self.initialized.load(Ordering::Acquire)
	}

	/// Interactive operation currently holding the guard, if any.
	pub fn interactive_pending(&self) -> Option<InteractiveOp> {
		*self.pending.lock()
	}

	/// Adopts the provider's first cached account, if any.
	///
	/// Only the first successful call does work; later calls return the current session. A
	/// session established by an earlier `login` is never replaced by a cached account.
	pub async fn initialize(&self) -> Result<Session> {
		let span = OpSpan::new(OpKind::Initialize, "session_initialize");

		let result = span
			.instrument(async move {
				let _singleflight = self.init_gate.lock().await;

				if self.is_initialized() {
					return Ok(self.session());
				}

				self.provider
					.initialize()
					.await
					.map_err(|source| Error::InitializeFailed { source })?;

				let accounts = self
					.provider
					.all_accounts()
					.await
					.map_err(|source| Error::InitializeFailed { source })?;

				if let Some(first) = accounts.into_iter().next() {
					let mut session = self.session.write();

					if !session.is_active() {
						#[cfg(feature = "tracing")]
						tracing::debug!(account = %first.account, "restored cached session");

						self.transition(&mut session, Session::Active(first));
					}
				}

				self.initialized.store(true, Ordering::Release);

				Ok(self.session())
			})
			.await;

		span.record_result(&result);

		result
	}

	/// Runs the provider's interactive sign-in and activates the returned account.
	///
	/// On failure the session is left exactly as it was.
	pub async fn login(&self) -> Result<AuthenticatedAccount> {
		let span = OpSpan::new(OpKind::Login, "session_login");

		let result = span
			.instrument(async move {
				let _interactive = self.begin(InteractiveOp::Login)?;
				let signed_in = self
					.provider
					.login_interactive()
					.await
					.map_err(|source| Error::LoginFailed { source })?;

				#[cfg(feature = "tracing")]
				tracing::debug!(account = %signed_in.account, "signed in");

				self.transition(&mut self.session.write(), Session::Active(signed_in.clone()));

				Ok(signed_in)
			})
			.await;

		#[cfg(feature = "tracing")]
		if let Err(err @ Error::LoginFailed { .. }) = &result {
			tracing::warn!(error = %err, cause = ?StdError::source(err), "sign-in failed");
		}

		span.record_result(&result);

		result
	}

	/// Runs the provider's interactive sign-out and clears the session.
	///
	/// On failure the session is left exactly as it was.
	pub async fn logout(&self) -> Result<()> {
		let span = OpSpan::new(OpKind::Logout, "session_logout");

		let result = span
			.instrument(async move {
				let _interactive = self.begin(InteractiveOp::Logout)?;

				self.provider
					.logout_interactive()
					.await
					.map_err(|source| Error::LogoutFailed { source })?;

				#[cfg(feature = "tracing")]
				tracing::debug!("signed out");

				self.transition(&mut self.session.write(), Session::Absent);

				Ok(())
			})
			.await;

		#[cfg(feature = "tracing")]
		if let Err(err @ Error::LogoutFailed { .. }) = &result {
			tracing::warn!(error = %err, cause = ?StdError::source(err), "sign-out failed");
		}

		span.record_result(&result);

		result
	}

	fn transition(&self, current: &mut Session, next: Session) {
		if current.account() != next.account() {
			self.epoch.fetch_add(1, Ordering::AcqRel);
		}

		*current = next;
	}

	fn begin(&self, operation: InteractiveOp) -> Result<InteractiveGuard<'_>> {
		let mut pending = self.pending.lock();

		if let Some(current) = *pending {
			return Err(Error::OperationInProgress { operation: current });
		}

		*pending = Some(operation);

		Ok(InteractiveGuard { store: self })
	}
}
impl Debug for SessionStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionStore")
			.field("session", &*self.session.read())
			.field("epoch", &self.epoch())
			.field("pending", &self.interactive_pending())
			.field("initialized", &self.is_initialized())
			.finish()
	}
}

/// Releases the interactive slot on every exit path.
struct InteractiveGuard<'a> {
	store: &'a SessionStore,
}
impl Drop for InteractiveGuard<'_> {
	fn drop(&mut self) {
		*self.store.pending.lock() = None;
	}
}
