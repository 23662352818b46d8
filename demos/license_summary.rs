//! Drives the view controller through sign-in, refresh, and sign-out against a mocked
//! licensing backend, printing every published view state.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use storefront_session::{
	auth::{AccessCredential, AccountId, AuthenticatedAccount, ClientId, TenantId},
	config::ClientConfig,
	fetch::LicenseFetcher,
	http::ReqwestHttpClient,
	provider::{IdentityProvider, MemoryProvider},
	reqwest::Client,
	store::SessionStore,
	view::{ViewController, ViewSnapshot, ViewState},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let licenses_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/licenses").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"total\":125,\"types\":{\"Azure AD Premium P1\":45,\"Azure AD Premium P2\":60,\"Microsoft 365 E3\":20}}",
			);
		})
		.await;
	let config = ClientConfig::builder(ClientId::new("demo-client")?)
		.tenant(TenantId::new("contoso")?)
		.redirect_uri(Url::parse("http://localhost:5173")?)
		.api_base(Url::parse(&server.base_url())?)
		.build()?;
	let provider = Arc::new(MemoryProvider::default());
	let store = Arc::new(SessionStore::new(provider.clone() as Arc<dyn IdentityProvider>));
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let controller =
		ViewController::new(store, LicenseFetcher::from_config(&config, http_client)?);

	controller.subscribe(Arc::new(|snapshot: &ViewSnapshot| match snapshot.view() {
		ViewState::SignedOut => println!("Signed out."),
		ViewState::NeverFetched => println!("Signed in; no licenses loaded yet."),
		ViewState::Loading => println!("Loading licenses..."),
		ViewState::Loaded(summary) => {
			println!("Total licenses: {}.", summary.total);

			for (name, count) in summary.iter() {
				println!("  {name}: {count}");
			}
		},
		ViewState::FetchFailed(err) => println!("Failed to load licenses: {err}"),
	}));
	controller.on_startup().await?;
	provider.push_login(Ok(AuthenticatedAccount::new(
		AccountId::new("demo-user@contoso.example")?,
		AccessCredential::new("demo-access"),
	)));
	controller.on_login_intent().await?;
	controller.on_refresh_intent().await;
	controller.on_logout_intent().await?;

	licenses_mock.assert_async().await;

	Ok(())
}
