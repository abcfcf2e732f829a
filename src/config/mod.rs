//! 统一配置系统
//!
//! 提供TOML/JSON配置文件、环境变量覆盖和校验
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod commands;
pub mod hooks;

pub use commands::CommandConfig;
pub use hooks::HookConfig;

use crate::impl_default;

/// 桥接层配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 桥接层主配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// 宿主配置档名称，对扩展代码可见
    #[serde(default = "default_profile")]
    pub profile: String,

    /// 命令注册配置
    #[serde(default)]
    pub commands: CommandConfig,

    /// 钩子配置
    #[serde(default)]
    pub hooks: HookConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_profile() -> String {
    "default".to_string()
}

impl_default!(BridgeConfig {
    profile: default_profile(),
    commands: CommandConfig::default(),
    hooks: HookConfig::default(),
    logging: LoggingConfig::default(),
});

impl BridgeConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("BRIDGE_PROFILE") {
            if !val.is_empty() {
                self.profile = val;
            }
        }

        if let Ok(val) = env::var("BRIDGE_LOG_LEVEL") {
            if let Some(level) = LogLevel::parse(&val) {
                self.logging.level = level;
            }
        }
        if let Ok(val) = env::var("BRIDGE_LOG_ANSI") {
            self.logging.ansi = val.parse().unwrap_or(self.logging.ansi);
        }

        if let Ok(val) = env::var("BRIDGE_COMMANDS_MAX_PARAMETERS") {
            if let Ok(max) = val.parse() {
                self.commands.max_parameters = max;
            }
        }
        if let Ok(val) = env::var("BRIDGE_COMMANDS_EXPAND_SELECTORS") {
            self.commands.expand_selectors =
                val.parse().unwrap_or(self.commands.expand_selectors);
        }

        if let Ok(val) = env::var("BRIDGE_HOOKS_TRACE_DISPATCH") {
            self.hooks.trace_dispatch = val.parse().unwrap_or(self.hooks.trace_dispatch);
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.profile.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "profile must not be empty".to_string(),
            ));
        }
        self.commands.validate()?;
        self.hooks.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. `BRIDGE_CONFIG` 指定的文件
    /// 2. ./bridge.toml
    /// 3. ./bridge.json
    /// 4. 使用默认配置
    ///
    /// 找到的配置都会再应用环境变量覆盖。
    pub fn load_or_default() -> Self {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = env::var_os("BRIDGE_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        candidates.push(PathBuf::from("bridge.toml"));
        candidates.push(PathBuf::from("bridge.json"));

        let mut config = candidates
            .iter()
            .find_map(|path| {
                let loaded = match path.extension().and_then(|e| e.to_str()) {
                    Some("json") => Self::from_json_file(path),
                    _ => Self::from_toml_file(path),
                };
                match loaded {
                    Ok(config) => {
                        tracing::info!(target: "bridge", path = %path.display(), "Loaded bridge config");
                        Some(config)
                    }
                    Err(ConfigError::FileError(_)) => None,
                    Err(e) => {
                        tracing::warn!(target: "bridge", path = %path.display(), "Ignoring config: {}", e);
                        None
                    }
                }
            })
            .unwrap_or_default();

        config.apply_env_overrides();
        config
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别（`RUST_LOG` 优先）
    pub level: LogLevel,

    /// 是否输出ANSI颜色
    pub ansi: bool,

    /// 是否输出事件target
    pub show_target: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    ansi: true,
    show_target: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.profile, "default");
    }

    #[test]
    fn test_toml_serialization() {
        let config = BridgeConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: BridgeConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.commands.max_parameters, parsed.commands.max_parameters);
        assert_eq!(config.logging.level, parsed.logging.level);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = BridgeConfig::from_toml_str(
            r#"
            profile = "survival"

            [hooks]
            trace_dispatch = true
            "#,
        )
        .unwrap();
        assert_eq!(parsed.profile, "survival");
        assert!(parsed.hooks.trace_dispatch);
        assert_eq!(
            parsed.commands.max_parameters,
            CommandConfig::default().max_parameters
        );
    }

    #[test]
    fn test_json_serialization() {
        let config = BridgeConfig::default();
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed = BridgeConfig::from_json_str(&json_str).unwrap();
        assert_eq!(config.profile, parsed.profile);
    }

    #[test]
    fn test_invalid_toml() {
        let err = BridgeConfig::from_toml_str("profile = [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_empty_profile_rejected() {
        let config = BridgeConfig {
            profile: "  ".to_string(),
            ..BridgeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
    }
}
