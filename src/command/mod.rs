//! 命令子系统桥接
//!
//! - `parameter`: 参数描述符与封闭的参数类型集合
//! - `layout`: 命令实例布局（头部 + 紧密排列的参数槽）
//! - `record`: 命令实例的分配、构造、析构
//! - `overload` / `registry`: 重载与注册桥
//! - `args`: 按类型取回参数

pub mod args;
pub mod layout;
pub mod overload;
pub mod parameter;
pub mod record;
pub mod registry;

pub use args::{FromArgs, FromParam};
pub use layout::{compute_layout, CommandHeader, RecordLayout, HEADER_SIZE, RECORD_ALIGN};
pub use overload::{Executor, Overload, RegisteredOverload};
pub use parameter::{ParamValue, ParameterDescriptor, ParameterKind, ParseError};
pub use record::CommandRecord;
pub use registry::{CommandBridge, CommandRequest, OverloadBinding, ParameterSchema};
