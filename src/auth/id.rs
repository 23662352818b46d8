//! Strongly typed identifiers for accounts, client registrations, and tenants.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 256;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (account, client, tenant).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (account, client, tenant).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (account, client, tenant).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { AccountId, "Provider-issued identifier for a signed-in account.", "Account" }
def_id! { ClientId, "Client registration identifier issued by the identity provider.", "Client" }
def_id! { TenantId, "Directory (tenant) identifier used to derive the provider authority.", "Tenant" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(AccountId::new(" account-1").is_err(), "Leading whitespace must be rejected.");
		assert!(AccountId::new("account-1 ").is_err(), "Trailing whitespace must be rejected.");

		let account = AccountId::new("00000000-0000-0000-0000-000000000001.tenant-a")
			.expect("Account fixture should be valid.");

		assert_eq!(account.as_ref(), "00000000-0000-0000-0000-000000000001.tenant-a");
		assert!(ClientId::new("").is_err());
		assert!(TenantId::new("with space").is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let account: AccountId = serde_json::from_str("\"account-42\"")
			.expect("Account should deserialize successfully.");

		assert_eq!(account.as_ref(), "account-42");
		assert_eq!(
			serde_json::to_string(&account).expect("Account should serialize."),
			"\"account-42\""
		);
		assert!(serde_json::from_str::<AccountId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<AccountId>("\"\"").is_err());
	}

	#[test]
	fn length_limits_and_debug_labels() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		AccountId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert_eq!(
			AccountId::new(&too_long),
			Err(IdentifierError::TooLong { kind: "Account", max: IDENTIFIER_MAX_LEN })
		);

		let tenant = TenantId::new("contoso").expect("Tenant fixture should be valid.");

		assert_eq!(format!("{tenant:?}"), "Tenant(contoso)");
		assert_eq!(tenant.to_string(), "contoso");
	}
}
