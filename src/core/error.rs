//! 统一错误处理模块
//!
//! 提供桥接层范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **模式错误** (`SchemaError`): 注册请求不合法，注册失败且不提交任何状态
//! - **分配错误** (`AllocError`): 命令实例内存分配失败，视为致命错误
//! - **钩子错误** (`HookError`): 独占钩子冲突、命名钩子类型不一致
//! - **参数错误** (`ArgumentError`): 扩展代码按类型取回参数时不匹配
//!
//! 解析错误由宿主自己的不匹配路径上报，桥接层不处理。
//! 句柄误用（宿主已销毁对象后解引用）是调用方契约违规，属于未定义行为，
//! 不在此处建模。

use thiserror::Error;

use crate::config::ConfigError;

/// 桥接层核心错误类型
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Allocation error: {0}")]
    Alloc(#[from] AllocError),

    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    #[error("Argument error: {0}")]
    Argument(#[from] ArgumentError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bridge already initialized")]
    AlreadyInitialized,
}

/// 注册请求模式错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Command name must not be empty")]
    EmptyCommandName,

    #[error("Command '{0}' has no overloads")]
    EmptyOverloads(String),

    #[error("Parameter '{0}' has zero size")]
    ZeroSizedParameter(String),

    #[error("Parameter name must not be empty (position {0})")]
    EmptyParameterName(usize),

    #[error("Duplicate parameter name '{0}' in one overload")]
    DuplicateParameter(String),

    #[error("Rest-of-line parameter '{0}' must be the last parameter")]
    GreedyNotLast(String),

    #[error("Overload has {count} parameters, limit is {limit}")]
    TooManyParameters { count: usize, limit: usize },
}

/// 命令实例分配错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    #[error("Record layout overflow: base {base} + parameters {params} bytes")]
    LayoutOverflow { base: usize, params: usize },

    #[error("Allocator refused {size} bytes")]
    OutOfMemory { size: usize },
}

/// 钩子错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    #[error("Entry point '{0}' already has an exclusive hook")]
    Conflict(String),

    #[error("Named hook '{name}' already defined with a different signature ({existing})")]
    TypeMismatch { name: String, existing: &'static str },

    #[error("Named hook '{0}' is not defined")]
    NotDefined(String),
}

/// 按类型取回命令参数时的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Expected {expected} arguments, command has {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("Argument {index}: expected {expected}, found {found}")]
    Type {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

/// 桥接层结果类型别名
pub type BridgeResult<T> = Result<T, BridgeError>;
pub type SchemaResult<T> = Result<T, SchemaError>;
pub type AllocResult<T> = Result<T, AllocError>;
pub type HookResult<T> = Result<T, HookError>;
pub type ArgumentResult<T> = Result<T, ArgumentError>;
