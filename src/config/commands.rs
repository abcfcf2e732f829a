use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 命令注册配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// 单个重载允许的最大参数个数
    pub max_parameters: usize,

    /// 取回消息参数时是否展开 `@s` 为调用者名称
    pub expand_selectors: bool,
}

impl_default!(CommandConfig {
    max_parameters: 32,
    expand_selectors: true,
});

impl CommandConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_parameters == 0 || self.max_parameters > 256 {
            return Err(ConfigError::ValidationError(
                "commands.max_parameters must be within 1..=256".to_string(),
            ));
        }
        Ok(())
    }
}
