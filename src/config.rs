//! Client configuration: provider registration, authority, redirect target, and API base.
//!
//! Values normally come from the environment (see [`ClientConfig::from_env`]) or from a
//! serialized document; both paths go through [`ClientConfigBuilder::build`] so the same
//! validation applies everywhere.

/// Builder API for assembling client configuration.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::ClientId, error::ConfigError};

/// Environment variable holding the client registration identifier.
pub const ENV_CLIENT_ID: &str = "STOREFRONT_CLIENT_ID";
/// Environment variable holding the directory tenant used to derive the authority.
pub const ENV_TENANT_ID: &str = "STOREFRONT_TENANT_ID";
/// Environment variable holding an explicit authority URL (wins over the tenant).
pub const ENV_AUTHORITY: &str = "STOREFRONT_AUTHORITY";
/// Environment variable holding the post-login redirect target.
pub const ENV_REDIRECT_URI: &str = "STOREFRONT_REDIRECT_URI";
/// Environment variable holding the licensing API base URL.
pub const ENV_API_BASE: &str = "STOREFRONT_API_BASE";

/// Licensing endpoint path, resolved against [`ClientConfig::api_base`].
pub const LICENSES_PATH: &str = "api/licenses";

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClientConfigBuilder")]
pub struct ClientConfig {
	/// Client registration identifier.
	pub client_id: ClientId,
	/// Issuer endpoint of the identity provider.
	pub authority: Url,
	/// Post-login return target.
	pub redirect_uri: Url,
	/// Base URL of the licensing backend; always ends with `/`.
	pub api_base: Url,
}
impl ClientConfig {
	/// Creates a new builder for the provided client identifier.
	pub fn builder(client_id: ClientId) -> ClientConfigBuilder {
		ClientConfigBuilder::new(client_id)
	}

	/// Loads configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads configuration through `lookup`, which maps a variable name to its value.
	///
	/// Empty values count as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
		let client_id = var(ENV_CLIENT_ID).ok_or(ConfigError::MissingVar { name: ENV_CLIENT_ID })?;
		let mut builder = Self::builder(ClientId::new(client_id.trim())?);

		builder = match (var(ENV_AUTHORITY), var(ENV_TENANT_ID)) {
			(Some(authority), _) => builder.authority(parse_url("authority", &authority)?),
			(None, Some(tenant)) => builder.tenant(tenant.trim().parse()?),
			(None, None) => return Err(ConfigError::MissingVar { name: ENV_TENANT_ID }),
		};

		let redirect =
			var(ENV_REDIRECT_URI).ok_or(ConfigError::MissingVar { name: ENV_REDIRECT_URI })?;

		builder = builder.redirect_uri(parse_url("redirect", &redirect)?);

		if let Some(api_base) = var(ENV_API_BASE) {
			builder = builder.api_base(parse_url("API base", &api_base)?);
		}

		builder.build()
	}

	/// Absolute URL of the licensing endpoint.
	pub fn licenses_url(&self) -> Result<Url, ConfigError> {
		licenses_url(&self.api_base)
	}
}

/// Resolves [`LICENSES_PATH`] against `api_base`, keeping any path prefix the base carries.
pub fn licenses_url(api_base: &Url) -> Result<Url, ConfigError> {
	let mut base = api_base.clone();

	if !base.path().ends_with('/') {
		let path = format!("{}/", base.path());

		base.set_path(&path);
	}

	base.join(LICENSES_PATH).map_err(|source| ConfigError::InvalidUrl { field: "licenses", source })
}

pub(crate) fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { field, source })
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> =
			vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

		move |name| vars.get(name).cloned()
	}

	#[test]
	fn env_lookup_derives_authority_from_tenant() {
		let config = ClientConfig::from_lookup(lookup(&[
			(ENV_CLIENT_ID, "11111111-2222-3333-4444-555555555555"),
			(ENV_TENANT_ID, "contoso.onmicrosoft.com"),
			(ENV_REDIRECT_URI, "http://localhost:5173"),
		]))
		.expect("Environment fixture should produce a valid configuration.");

		assert_eq!(config.client_id.as_ref(), "11111111-2222-3333-4444-555555555555");
		assert_eq!(
			config.authority.as_str(),
			"https://login.microsoftonline.com/contoso.onmicrosoft.com"
		);
		assert_eq!(config.redirect_uri.as_str(), "http://localhost:5173/");
		assert_eq!(config.api_base.as_str(), DEFAULT_API_BASE);
		assert_eq!(
			config.licenses_url().expect("Licenses URL should resolve.").as_str(),
			"http://localhost:7071/api/licenses"
		);
	}

	#[test]
	fn explicit_authority_wins_over_tenant() {
		let config = ClientConfig::from_lookup(lookup(&[
			(ENV_CLIENT_ID, "client"),
			(ENV_TENANT_ID, "ignored"),
			(ENV_AUTHORITY, "https://login.example.com/tenant-b"),
			(ENV_REDIRECT_URI, "https://app.example.com/"),
			(ENV_API_BASE, "https://api.example.com/storefront"),
		]))
		.expect("Environment fixture should produce a valid configuration.");

		assert_eq!(config.authority.as_str(), "https://login.example.com/tenant-b");
		assert_eq!(config.api_base.as_str(), "https://api.example.com/storefront/");
		assert_eq!(
			config.licenses_url().expect("Licenses URL should resolve.").as_str(),
			"https://api.example.com/storefront/api/licenses"
		);
	}

	#[test]
	fn env_lookup_reports_missing_and_blank_values() {
		let err = ClientConfig::from_lookup(lookup(&[(ENV_CLIENT_ID, "  ")]))
			.expect_err("Blank client identifier should count as missing.");

		assert!(matches!(err, ConfigError::MissingVar { name: ENV_CLIENT_ID }));

		let err = ClientConfig::from_lookup(lookup(&[
			(ENV_CLIENT_ID, "client"),
			(ENV_REDIRECT_URI, "https://app.example.com/"),
		]))
		.expect_err("Missing tenant and authority should be rejected.");

		assert!(matches!(err, ConfigError::MissingVar { name: ENV_TENANT_ID }));

		let err = ClientConfig::from_lookup(lookup(&[
			(ENV_CLIENT_ID, "client"),
			(ENV_TENANT_ID, "tenant"),
			(ENV_REDIRECT_URI, "not a url"),
		]))
		.expect_err("Malformed redirect should be rejected.");

		assert!(matches!(err, ConfigError::InvalidUrl { field: "redirect", .. }));
	}

	#[test]
	fn config_deserializes_through_the_builder() {
		let config: ClientConfig = serde_json::from_str(
			r#"{
				"client_id": "client",
				"tenant": "contoso",
				"redirect_uri": "https://app.example.com/",
				"api_base": "https://api.example.com"
			}"#,
		)
		.expect("Serialized configuration should deserialize.");

		assert_eq!(config.authority.as_str(), "https://login.microsoftonline.com/contoso");
		assert_eq!(config.api_base.as_str(), "https://api.example.com/");

		let err = serde_json::from_str::<ClientConfig>(
			r#"{
				"client_id": "client",
				"authority": "http://login.example.com/",
				"redirect_uri": "https://app.example.com/"
			}"#,
		)
		.expect_err("Insecure authority should fail deserialization.");

		assert!(err.to_string().contains("https"));
	}
}
