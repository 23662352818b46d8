// self
use crate::{
	_prelude::*,
	auth::{ClientId, TenantId},
	config::{ClientConfig, parse_url},
	error::ConfigError,
};

/// API base used when none is configured; matches the licensing backend's local port.
pub const DEFAULT_API_BASE: &str = "http://localhost:7071/";

const AUTHORITY_HOST: &str = "https://login.microsoftonline.com/";

/// Builds the multi-tenant directory authority URL for `tenant`.
pub fn authority_for_tenant(tenant: &TenantId) -> Result<Url, ConfigError> {
	parse_url("authority", &format!("{AUTHORITY_HOST}{tenant}"))
}

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Debug, Deserialize)]
pub struct ClientConfigBuilder {
	/// Client registration identifier.
	pub client_id: ClientId,
	/// Explicit authority; takes precedence over `tenant`.
	#[serde(default)]
	pub authority: Option<Url>,
	/// Tenant used to derive the authority when none is set explicitly.
	#[serde(default)]
	pub tenant: Option<TenantId>,
	/// Post-login return target.
	#[serde(default)]
	pub redirect_uri: Option<Url>,
	/// Licensing backend base URL; defaults to [`DEFAULT_API_BASE`].
	#[serde(default)]
	pub api_base: Option<Url>,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided client identifier.
	pub fn new(client_id: ClientId) -> Self {
		Self { client_id, authority: None, tenant: None, redirect_uri: None, api_base: None }
	}

	/// Sets the authority explicitly.
	pub fn authority(mut self, url: Url) -> Self {
		self.authority = Some(url);

		self
	}

	/// Derives the authority from a directory tenant.
	pub fn tenant(mut self, tenant: TenantId) -> Self {
		self.tenant = Some(tenant);

		self
	}

	/// Sets the post-login redirect target.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Overrides the licensing API base URL.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let authority = match (self.authority, self.tenant) {
			(Some(authority), _) => authority,
			(None, Some(tenant)) => authority_for_tenant(&tenant)?,
			(None, None) => return Err(ConfigError::MissingField { field: "authority" }),
		};
		let redirect_uri =
			self.redirect_uri.ok_or(ConfigError::MissingField { field: "redirect_uri" })?;
		let mut api_base = match self.api_base {
			Some(url) => url,
			None => parse_url("API base", DEFAULT_API_BASE)?,
		};

		validate_https("authority", &authority)?;
		validate_http("redirect", &redirect_uri)?;
		validate_http("API base", &api_base)?;

		if !api_base.path().ends_with('/') {
			let path = format!("{}/", api_base.path());

			api_base.set_path(&path);
		}

		Ok(ClientConfig { client_id: self.client_id, authority, redirect_uri, api_base })
	}
}
impl TryFrom<ClientConfigBuilder> for ClientConfig {
	type Error = ConfigError;

	fn try_from(builder: ClientConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}
impl From<ClientConfig> for ClientConfigBuilder {
	fn from(config: ClientConfig) -> Self {
		Self {
			client_id: config.client_id,
			authority: Some(config.authority),
			tenant: None,
			redirect_uri: Some(config.redirect_uri),
			api_base: Some(config.api_base),
		}
	}
}

fn validate_https(field: &'static str, url: &Url) -> Result<(), ConfigError> {
	if url.scheme() != "https" {
		Err(ConfigError::UnsupportedScheme { field, expected: "https", url: url.to_string() })
	} else {
		Ok(())
	}
}

fn validate_http(field: &'static str, url: &Url) -> Result<(), ConfigError> {
	if matches!(url.scheme(), "http" | "https") && url.has_host() {
		Ok(())
	} else {
		Err(ConfigError::UnsupportedScheme {
			field,
			expected: "http or https",
			url: url.to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("URL fixture should parse.")
	}

	fn client() -> ClientId {
		ClientId::new("client").expect("Client fixture should be valid.")
	}

	#[test]
	fn builder_requires_authority_and_redirect() {
		let err = ClientConfig::builder(client())
			.redirect_uri(url("https://app.example.com/"))
			.build()
			.expect_err("Missing authority should be rejected.");

		assert!(matches!(err, ConfigError::MissingField { field: "authority" }));

		let err = ClientConfig::builder(client())
			.authority(url("https://login.example.com/tenant"))
			.build()
			.expect_err("Missing redirect should be rejected.");

		assert!(matches!(err, ConfigError::MissingField { field: "redirect_uri" }));
	}

	#[test]
	fn builder_rejects_insecure_authority_and_odd_schemes() {
		let err = ClientConfig::builder(client())
			.authority(url("http://login.example.com/tenant"))
			.redirect_uri(url("https://app.example.com/"))
			.build()
			.expect_err("Plain HTTP authority should be rejected.");

		assert!(matches!(
			err,
			ConfigError::UnsupportedScheme { field: "authority", expected: "https", .. }
		));

		let err = ClientConfig::builder(client())
			.authority(url("https://login.example.com/tenant"))
			.redirect_uri(url("https://app.example.com/"))
			.api_base(url("ftp://files.example.com/"))
			.build()
			.expect_err("Non-HTTP API base should be rejected.");

		assert!(matches!(err, ConfigError::UnsupportedScheme { field: "API base", .. }));
	}

	#[test]
	fn tenant_and_redirect_are_enough_for_a_local_backend() {
		let config = ClientConfig::builder(client())
			.tenant(TenantId::new("contoso").expect("Tenant fixture should be valid."))
			.redirect_uri(url("http://localhost:5173"))
			.api_base(url("http://127.0.0.1:40123"))
			.build()
			.expect("Tenant, redirect, and API base should be sufficient.");

		assert_eq!(config.authority.as_str(), "https://login.microsoftonline.com/contoso");
		assert_eq!(
			config.licenses_url().expect("Licenses URL should resolve.").as_str(),
			"http://127.0.0.1:40123/api/licenses"
		);
	}

	#[test]
	fn config_round_trips_into_a_builder() {
		let config = ClientConfig::builder(client())
			.tenant(TenantId::new("contoso").expect("Tenant fixture should be valid."))
			.redirect_uri(url("http://localhost:5173/"))
			.build()
			.expect("Builder fixture should succeed.");
		let rebuilt = ClientConfigBuilder::from(config.clone())
			.build()
			.expect("Rebuilding a valid configuration should succeed.");

		assert_eq!(rebuilt, config);
	}
}
