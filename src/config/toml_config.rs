use crate::domain::expiry::{ExpiryPolicy, DEFAULT_CRITICAL_MAX_DAYS, DEFAULT_WARNING_MAX_DAYS};
use crate::domain::ports::DEFAULT_PAGE_SIZE;
use crate::utils::error::{PantryError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8090";
pub const DEFAULT_ITEMS_COLLECTION: &str = "items";
pub const DEFAULT_IMAGES_COLLECTION: &str = "item_images";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub expiry: ExpiryConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub items_collection: Option<String>,
    pub images_collection: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpiryConfig {
    pub critical_max_days: Option<i64>,
    pub warning_max_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub categories: Option<Vec<String>>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PantryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PantryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${POCKETBASE_URL})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PantryError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url(&self) -> &str {
        self.backend.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn items_collection(&self) -> &str {
        self.backend
            .items_collection
            .as_deref()
            .unwrap_or(DEFAULT_ITEMS_COLLECTION)
    }

    pub fn images_collection(&self) -> &str {
        self.backend
            .images_collection
            .as_deref()
            .unwrap_or(DEFAULT_IMAGES_COLLECTION)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.backend.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn page_size(&self) -> u32 {
        self.backend.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy {
            critical_max_days: self
                .expiry
                .critical_max_days
                .unwrap_or(DEFAULT_CRITICAL_MAX_DAYS),
            warning_max_days: self
                .expiry
                .warning_max_days
                .unwrap_or(DEFAULT_WARNING_MAX_DAYS),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_url("backend.base_url", self.base_url())?;
        crate::utils::validation::validate_non_empty_string(
            "backend.items_collection",
            self.items_collection(),
        )?;
        crate::utils::validation::validate_non_empty_string(
            "backend.images_collection",
            self.images_collection(),
        )?;
        crate::utils::validation::validate_positive_number(
            "backend.timeout_seconds",
            self.timeout_seconds(),
            1,
        )?;
        crate::utils::validation::validate_range("backend.page_size", self.page_size(), 1, 500)?;
        self.expiry_policy().check()
    }
}
