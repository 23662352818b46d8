//! Identity provider capability interface and the built-in scripted provider.
//!
//! The crate never talks to an identity provider directly. Everything it needs (startup
//! account enumeration, interactive sign-in, interactive sign-out) goes through
//! [`IdentityProvider`], so a browser SDK bridge, a device-code client, or the in-process
//! [`MemoryProvider`] can sit behind the same [`SessionStore`](crate::store::SessionStore).

pub mod memory;

pub use memory::{MemoryProvider, ProviderCalls};

// self
use crate::{_prelude::*, auth::AuthenticatedAccount};

/// Boxed future returned by every [`IdentityProvider`] operation.
pub type ProviderFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, ProviderError>> + 'a + Send>>;

/// Capability interface over an identity provider SDK.
///
/// Interactive operations open a provider-controlled surface (popup, browser tab) and only
/// resolve once the user finishes or dismisses it. A dismissal must resolve as
/// [`ProviderError::Cancelled`] rather than leaving the future pending.
pub trait IdentityProvider
where
	Self: Send + Sync,
{
	/// Prepares the provider's local cache. Safe to call more than once.
	fn initialize(&self) -> ProviderFuture<'_, ()>;

	/// Lists accounts with a usable cached session, in the provider's stable order.
	fn all_accounts(&self) -> ProviderFuture<'_, Vec<AuthenticatedAccount>>;

	/// Runs the interactive sign-in and returns the signed-in account.
	fn login_interactive(&self) -> ProviderFuture<'_, AuthenticatedAccount>;

	/// Runs the interactive sign-out.
	fn logout_interactive(&self) -> ProviderFuture<'_, ()>;
}

/// Error type produced by [`IdentityProvider`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderError {
	/// The user dismissed the provider surface before finishing.
	#[error("The user dismissed the provider prompt.")]
	Cancelled,
	/// The provider refused the request (consent denied, account blocked, ...).
	#[error("Provider rejected the request: {message}.")]
	Rejected {
		/// Human-readable error payload.
		message: String,
	},
	/// The provider could not be reached or is not ready.
	#[error("Provider is unavailable: {message}.")]
	Unavailable {
		/// Human-readable error payload.
		message: String,
	},
}
impl ProviderError {
	/// Returns true when the failure came from the user rather than the provider.
	pub fn is_cancellation(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn provider_error_messages_carry_payloads() {
		let err = ProviderError::Rejected { message: "AADSTS65001 consent required".into() };

		assert_eq!(err.to_string(), "Provider rejected the request: AADSTS65001 consent required.");
		assert!(!err.is_cancellation());
		assert!(ProviderError::Cancelled.is_cancellation());
	}

	#[test]
	fn provider_error_serializes_with_variant_tags() {
		let payload = serde_json::to_string(&ProviderError::Cancelled)
			.expect("ProviderError should serialize to JSON.");

		assert_eq!(payload, "\"Cancelled\"");

		let round_trip: ProviderError = serde_json::from_str(&payload)
			.expect("Serialized provider error should deserialize from JSON.");

		assert_eq!(round_trip, ProviderError::Cancelled);
	}
}
