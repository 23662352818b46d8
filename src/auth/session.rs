//! In-memory session model: who is signed in and with which credential.

// self
use crate::{
	_prelude::*,
	auth::{AccessCredential, AccountId},
};

/// Account identity paired with the credential the provider issued for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedAccount {
	/// Provider-issued account identifier.
	pub account: AccountId,
	/// Bearer credential used to authorize downstream requests.
	pub credential: AccessCredential,
}
impl AuthenticatedAccount {
	/// Pairs an account identifier with its credential.
	pub fn new(account: AccountId, credential: AccessCredential) -> Self {
		Self { account, credential }
	}
}

/// Whether a user is currently authenticated, and as whom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
	/// Nobody is signed in.
	#[default]
	Absent,
	/// Exactly one account is signed in.
	Active(AuthenticatedAccount),
}
impl Session {
	/// Returns true for [`Session::Active`].
	pub fn is_active(&self) -> bool {
		matches!(self, Self::Active(_))
	}

	/// Signed-in account identifier, if any.
	pub fn account(&self) -> Option<&AccountId> {
		match self {
			Self::Active(active) => Some(&active.account),
			Self::Absent => None,
		}
	}

	/// Credential of the signed-in account, if any.
	pub fn credential(&self) -> Option<&AccessCredential> {
		match self {
			Self::Active(active) => Some(&active.credential),
			Self::Absent => None,
		}
	}
}
impl From<AuthenticatedAccount> for Session {
	fn from(account: AuthenticatedAccount) -> Self {
		Self::Active(account)
	}
}
impl From<Option<AuthenticatedAccount>> for Session {
	fn from(account: Option<AuthenticatedAccount>) -> Self {
		account.map_or(Self::Absent, Self::Active)
	}
}
