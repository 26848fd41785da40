use crate::config::AppConfig;
use crate::core::normalize::ColumnRule;
use crate::core::payload::SchemaVariant;
use crate::utils::error::{MigrateError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub input: InputConfig,
    pub payload: PayloadConfig,
    pub submission: Option<SubmissionConfig>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Usually `"${SKEY}"`; falls back to the process environment when absent
    /// or unresolved.
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub column_rule: ColumnRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadConfig {
    pub schema: SchemaVariant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    pub pacing_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MigrateError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MigrateError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SKEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn resolve(&self) -> Result<AppConfig> {
        let secret_key = match &self.api.secret_key {
            Some(value) if !value.trim().is_empty() && !value.starts_with("${") => value.clone(),
            _ => crate::config::secret_key_from_env()?,
        };

        Ok(AppConfig {
            base_url: self.api.base_url.clone(),
            secret_key,
            input_path: self.input.path.clone(),
            output_path: self.output.path.clone(),
            schema_variant: self.payload.schema,
            column_rule: self.input.column_rule,
            pacing_ms: self
                .submission
                .as_ref()
                .and_then(|s| s.pacing_ms)
                .unwrap_or(1000),
            dry_run: false,
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_url("api.base_url", &self.api.base_url)?;
        crate::utils::validation::validate_path("input.path", &self.input.path)?;
        crate::utils::validation::validate_path("output.path", &self.output.path)?;
        Ok(())
    }
}
