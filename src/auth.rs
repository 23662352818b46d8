//! Auth-domain identifiers, credentials, and the session model.

pub mod credential;
pub mod id;
pub mod session;

pub use credential::*;
pub use id::*;
pub use session::*;
