use crate::config::toml_config::TomlConfig;
use crate::core::inventory::DEFAULT_CATEGORIES;
use crate::domain::expiry::ExpiryPolicy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

/// Values given on the command line or through the environment.
/// They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub critical_max_days: Option<i64>,
    pub warning_max_days: Option<i64>,
    pub page_size: Option<u32>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub token: Option<String>,
    pub items_collection: String,
    pub images_collection: String,
    pub timeout_seconds: u64,
    pub page_size: u32,
    pub policy: ExpiryPolicy,
    pub categories: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&TomlConfig::default(), Overrides::default())
    }
}

impl Settings {
    pub fn resolve(file: &TomlConfig, overrides: Overrides) -> Self {
        let file_policy = file.expiry_policy();
        let token = overrides
            .token
            .or_else(|| file.backend.token.clone())
            .filter(|t| !t.trim().is_empty());

        Self {
            base_url: overrides
                .base_url
                .unwrap_or_else(|| file.base_url().to_string()),
            token,
            items_collection: file.items_collection().to_string(),
            images_collection: file.images_collection().to_string(),
            timeout_seconds: file.timeout_seconds(),
            page_size: overrides.page_size.unwrap_or_else(|| file.page_size()),
            policy: ExpiryPolicy {
                critical_max_days: overrides
                    .critical_max_days
                    .unwrap_or(file_policy.critical_max_days),
                warning_max_days: overrides
                    .warning_max_days
                    .unwrap_or(file_policy.warning_max_days),
            },
            categories: file.display.categories.clone().unwrap_or_else(|| {
                DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
            }),
        }
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn items_collection(&self) -> &str {
        &self.items_collection
    }

    fn images_collection(&self) -> &str {
        &self.images_collection
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_non_empty_string("items_collection", &self.items_collection)?;
        validation::validate_non_empty_string("images_collection", &self.images_collection)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validation::validate_range("page_size", self.page_size, 1, 500)?;
        self.policy.check()
    }
}
