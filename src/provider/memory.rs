//! Scripted in-process [`IdentityProvider`] for local development and tests.

// std
use std::collections::VecDeque;
// self
use crate::{
	_prelude::*,
	auth::AuthenticatedAccount,
	provider::{IdentityProvider, ProviderError, ProviderFuture},
};

/// Number of times each provider operation was invoked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProviderCalls {
	/// `initialize` invocations.
	pub initialize: usize,
	/// `all_accounts` invocations.
	pub all_accounts: usize,
	/// `login_interactive` invocations.
	pub login: usize,
	/// `logout_interactive` invocations.
	pub logout: usize,
}

#[derive(Debug, Default)]
struct MemoryState {
	initialized: bool,
	initialize_failure: Option<ProviderError>,
	accounts: Vec<AuthenticatedAccount>,
	login_outcomes: VecDeque<Result<AuthenticatedAccount, ProviderError>>,
	logout_outcomes: VecDeque<Result<(), ProviderError>>,
	calls: ProviderCalls,
}

/// Provider that answers from a cached account list and queued interactive outcomes.
///
/// - `login_interactive` pops the next queued outcome; with nothing queued it behaves like a
///   dismissed popup and fails with [`ProviderError::Cancelled`]. A successful sign-in is
///   added to the account cache.
/// - `logout_interactive` pops the next queued outcome (defaulting to success) and clears
///   the account cache on success.
/// - `all_accounts` fails until `initialize` has run, like browser SDKs do.
///
/// Interactive calls wait on [`MemoryProvider::interactive_gate`], so a test can hold the
/// gate to keep a sign-in pending.
#[derive(Debug, Default)]
pub struct MemoryProvider {
	state: Mutex<MemoryState>,
	interactive_gate: Arc<AsyncMutex<()>>,
}
impl MemoryProvider {
	/// Seeds the cache with accounts that survive from a previous visit.
	pub fn with_accounts<I>(accounts: I) -> Self
	where
		I: IntoIterator<Item = AuthenticatedAccount>,
	{
		let provider = Self::default();

		provider.state.lock().accounts.extend(accounts);

		provider
	}

	/// Makes the next `initialize` call fail with `err`.
	pub fn fail_initialize(&self, err: ProviderError) {
		self.state.lock().initialize_failure = Some(err);
	}

	/// Queues the outcome of the next interactive sign-in.
	pub fn push_login(&self, outcome: Result<AuthenticatedAccount, ProviderError>) {
		self.state.lock().login_outcomes.push_back(outcome);
	}

	/// Queues the outcome of the next interactive sign-out.
	pub fn push_logout(&self, outcome: Result<(), ProviderError>) {
		self.state.lock().logout_outcomes.push_back(outcome);
	}

	/// Snapshot of the cached accounts.
	pub fn accounts(&self) -> Vec<AuthenticatedAccount> {
		self.state.lock().accounts.clone()
	}

	/// Snapshot of the call counters.
	pub fn calls(&self) -> ProviderCalls {
		self.state.lock().calls
	}

	/// Gate every interactive call waits on before resolving.
	pub fn interactive_gate(&self) -> Arc<AsyncMutex<()>> {
		self.interactive_gate.clone()
	}

	fn remember(accounts: &mut Vec<AuthenticatedAccount>, signed_in: &AuthenticatedAccount) {
		match accounts.iter_mut().find(|cached| cached.account == signed_in.account) {
			Some(cached) => cached.credential = signed_in.credential.clone(),
			None => accounts.push(signed_in.clone()),
		}
	}
}
impl IdentityProvider for MemoryProvider {
	fn initialize(&self) -> ProviderFuture<'_, ()> {
		Box::pin(async move {
			let mut state = self.state.lock();

			state.calls.initialize += 1;

			if let Some(err) = state.initialize_failure.take() {
				return Err(err);
			}

			state.initialized = true;

			Ok(())
		})
	}

	fn all_accounts(&self) -> ProviderFuture<'_, Vec<AuthenticatedAccount>> {
		Box::pin(async move {
			let mut state = self.state.lock();

			state.calls.all_accounts += 1;

			if !state.initialized {
				return Err(ProviderError::Unavailable {
					message: "provider cache has not been initialized".into(),
				});
			}

			Ok(state.accounts.clone())
		})
	}

	fn login_interactive(&self) -> ProviderFuture<'_, AuthenticatedAccount> {
		Box::pin(async move {
			self.state.lock().calls.login += 1;

			let _surface = self.interactive_gate.lock().await;
			let mut state = self.state.lock();
			let outcome = state.login_outcomes.pop_front().unwrap_or(Err(ProviderError::Cancelled));

			if let Ok(signed_in) = &outcome {
				Self::remember(&mut state.accounts, signed_in);
			}

			outcome
		})
	}

	fn logout_interactive(&self) -> ProviderFuture<'_, ()> {
		Box::pin(async move {
			self.state.lock().calls.logout += 1;

			let _surface = self.interactive_gate.lock().await;
			let mut state = self.state.lock();
			let outcome = state.logout_outcomes.pop_front().unwrap_or(Ok(()));

			if outcome.is_ok() {
				state.accounts.clear();
			}

			outcome
		})
	}
}
