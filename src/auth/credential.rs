//! Bearer credential wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Opaque bearer token issued by the identity provider.
///
/// The value may expire independently of the session that holds it; the crate never inspects
/// it and only forwards it in the `Authorization` header.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCredential(String);
impl AccessCredential {
	/// Wraps a new credential string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true when the provider handed back an empty token.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for AccessCredential {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AccessCredential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessCredential").field(&"<redacted>").finish()
	}
}
impl Display for AccessCredential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
