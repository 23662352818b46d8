//! Session lifecycle and authorized license retrieval for storefront clients: one active
//! identity per store, one guarded fetch per controller, and an observable view state for
//! whatever renders it.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod license;
pub mod obs;
pub mod provider;
pub mod store;
pub mod view;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{AccessCredential, AccountId, AuthenticatedAccount},
		fetch::LicenseFetcher,
		http::ReqwestHttpClient,
		provider::{IdentityProvider, MemoryProvider},
		store::SessionStore,
		view::ViewController,
	};

	/// Controller type alias used by reqwest-backed integration tests.
	pub type ReqwestTestController = ViewController<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds an authenticated account fixture.
	pub fn test_account(account: &str, token: &str) -> AuthenticatedAccount {
		AuthenticatedAccount::new(
			AccountId::new(account).expect("Account fixture identifier should be valid."),
			AccessCredential::new(token),
		)
	}

	/// Builds a reqwest-backed fetcher targeting `api_base`.
	pub fn build_reqwest_test_fetcher(api_base: &str) -> LicenseFetcher<ReqwestHttpClient> {
		let api_base = Url::parse(api_base).expect("Mock API base should parse successfully.");

		LicenseFetcher::with_http_client(api_base, test_reqwest_http_client())
			.expect("Licensing endpoint should resolve against the mock API base.")
	}

	/// Constructs a [`ViewController`] backed by the provided in-memory provider and a reqwest
	/// fetcher pointed at `api_base`.
	pub fn build_reqwest_test_controller(
		api_base: &str,
		provider: Arc<MemoryProvider>,
	) -> (ReqwestTestController, Arc<SessionStore>) {
		let provider: Arc<dyn IdentityProvider> = provider;
		let store = Arc::new(SessionStore::new(provider));
		let controller = ViewController::new(store.clone(), build_reqwest_test_fetcher(api_base));

		(controller, store)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
