//! 钩子与Fluid分发
//!
//! - `exclusive` - 独占钩子：替换入口点行为，可调用原始行为
//! - `named` - 命名钩子：有序多订阅者，可中断
//! - `fluid` - 动态作用域覆盖值
//! - `registry` - 命名钩子表与独占绑定账本

pub mod exclusive;
pub mod fluid;
pub mod named;
pub mod registry;

pub use exclusive::{HookState, Interceptor};
pub use fluid::Fluid;
pub use named::{HookFlow, NamedHook};
pub use registry::HookRegistry;
