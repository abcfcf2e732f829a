//! 命令注册桥
//!
//! 把扩展代码的命令请求翻译为宿主命令子系统的注册：
//! 1. 先校验全部重载（任何一个不合法则整个请求失败，不留下部分状态）
//! 2. 为每个重载计算一次布局
//! 3. 宿主中尚无该命令时注册命令本身
//! 4. 按请求顺序追加重载，附带参数模式与实例工厂
//!
//! 同名命令的多次注册只会追加重载，不做去重。

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{compute_layout, CommandRecord, Overload, ParameterKind, RegisteredOverload};
use crate::config::CommandConfig;
use crate::core::{AllocResult, BridgeResult, SchemaError};
use crate::host::{CommandHost, CommandOrigin, CommandOutput, PermissionLevel};

/// 扩展代码的命令注册请求
#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub description: String,
    pub permission: PermissionLevel,
    pub overloads: Vec<Overload>,
}

impl CommandRequest {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        permission: PermissionLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            permission,
            overloads: Vec::new(),
        }
    }

    pub fn with_overload(mut self, overload: Overload) -> Self {
        self.overloads.push(overload);
        self
    }
}

/// 交给宿主的单个参数模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSchema {
    pub name: String,
    pub type_tag: &'static str,
    pub kind: ParameterKind,
    pub offset: usize,
}

/// 交给宿主的重载：参数模式 + 实例工厂
#[derive(Debug, Clone)]
pub struct OverloadBinding {
    overload: Arc<RegisteredOverload>,
    schema: Vec<ParameterSchema>,
}

impl OverloadBinding {
    fn new(overload: Arc<RegisteredOverload>) -> Self {
        let schema = overload
            .params()
            .iter()
            .zip(overload.layout().offsets())
            .map(|(descriptor, &offset)| ParameterSchema {
                name: descriptor.name().to_string(),
                type_tag: descriptor.type_tag(),
                kind: descriptor.kind(),
                offset,
            })
            .collect();
        Self { overload, schema }
    }

    pub fn schema(&self) -> &[ParameterSchema] {
        &self.schema
    }

    pub fn overload(&self) -> &RegisteredOverload {
        &self.overload
    }

    pub fn overload_id(&self) -> u32 {
        self.overload.id()
    }

    /// 实例工厂
    pub fn instantiate(&self) -> AllocResult<CommandRecord> {
        CommandRecord::create(Arc::clone(&self.overload))
    }
}

#[derive(Debug)]
struct CommandEntry {
    description: String,
    permission: PermissionLevel,
    overloads: Vec<Arc<RegisteredOverload>>,
}

/// 命令注册桥
#[derive(Debug)]
pub struct CommandBridge {
    config: CommandConfig,
    commands: BTreeMap<String, CommandEntry>,
    next_overload_id: u32,
}

impl CommandBridge {
    pub fn new(config: CommandConfig) -> Self {
        Self {
            config,
            commands: BTreeMap::new(),
            next_overload_id: 1,
        }
    }

    pub fn config(&self) -> &CommandConfig {
        &self.config
    }

    /// 注册命令，返回该命令经桥接层注册的重载总数
    pub fn register<H: CommandHost + ?Sized>(
        &mut self,
        host: &mut H,
        request: CommandRequest,
    ) -> BridgeResult<usize> {
        let CommandRequest {
            name,
            description,
            permission,
            overloads,
        } = request;

        if name.trim().is_empty() {
            return Err(SchemaError::EmptyCommandName.into());
        }
        if overloads.is_empty() {
            return Err(SchemaError::EmptyOverloads(name).into());
        }
        for overload in &overloads {
            overload.validate(self.config.max_parameters)?;
        }

        let mut compiled = Vec::with_capacity(overloads.len());
        let mut next_id = self.next_overload_id;
        for overload in overloads {
            let layout = compute_layout(overload.params())?;
            compiled.push(Arc::new(RegisteredOverload::new(
                next_id,
                name.clone(),
                overload,
                layout,
                self.config.expand_selectors,
            )));
            next_id = next_id.wrapping_add(1);
        }
        self.next_overload_id = next_id;

        if !host.has_command(&name) {
            host.register_command(&name, &description, permission);
            tracing::debug!(
                target: "bridge::command",
                "Registered command '{}' ({:?})",
                name,
                permission
            );
        }

        let entry = self
            .commands
            .entry(name.clone())
            .or_insert_with(|| CommandEntry {
                description,
                permission,
                overloads: Vec::new(),
            });

        for overload in compiled {
            tracing::debug!(
                target: "bridge::command",
                "Added overload {}: {}",
                overload.id(),
                overload.signature()
            );
            host.register_overload(&name, OverloadBinding::new(Arc::clone(&overload)));
            entry.overloads.push(overload);
        }

        tracing::info!(
            target: "bridge::command",
            "Command '{}' now has {} overload(s)",
            name,
            entry.overloads.len()
        );
        Ok(entry.overloads.len())
    }

    /// 注册只有一个无参数重载的命令
    pub fn register_simple<H, F>(
        &mut self,
        host: &mut H,
        name: impl Into<String>,
        description: impl Into<String>,
        permission: PermissionLevel,
        executor: F,
    ) -> BridgeResult<usize>
    where
        H: CommandHost + ?Sized,
        F: Fn(&CommandRecord, &dyn CommandOrigin, &mut dyn CommandOutput) + Send + Sync + 'static,
    {
        let request = CommandRequest::new(name, description, permission)
            .with_overload(Overload::simple(executor));
        self.register(host, request)
    }

    pub fn overload_count(&self, name: &str) -> usize {
        self.commands
            .get(name)
            .map(|entry| entry.overloads.len())
            .unwrap_or(0)
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.commands
            .get(name)
            .map(|entry| entry.description.as_str())
    }

    pub fn permission(&self, name: &str) -> Option<PermissionLevel> {
        self.commands.get(name).map(|entry| entry.permission)
    }

    /// 该命令所有重载的签名
    pub fn signatures(&self, name: &str) -> Vec<String> {
        self.commands
            .get(name)
            .map(|entry| entry.overloads.iter().map(|o| o.signature()).collect())
            .unwrap_or_default()
    }
}

impl Default for CommandBridge {
    fn default() -> Self {
        Self::new(CommandConfig::default())
    }
}
