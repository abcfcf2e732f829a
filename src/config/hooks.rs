use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 钩子配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// 每次命名钩子分发时输出trace事件
    pub trace_dispatch: bool,

    /// 登录钩子的默认结果（没有订阅者修改fluid时使用）
    pub default_login_result: bool,

    /// 内置独占钩子在绑定账本中登记的所有者名
    pub builtin_owner: String,
}

impl_default!(HookConfig {
    trace_dispatch: false,
    default_login_result: true,
    builtin_owner: "base".to_string(),
});

impl HookConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.builtin_owner.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "hooks.builtin_owner must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HookConfig::default();
        assert!(config.default_login_result);
        assert!(!config.trace_dispatch);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_owner_rejected() {
        let config = HookConfig {
            builtin_owner: "  ".to_string(),
            ..HookConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
