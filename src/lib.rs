//! # Game Bridge
//!
//! An extension bridge for a running game-server process: extension code adds
//! new commands and intercepts internal entry points without touching the
//! host's own source.
//!
//! ## Features
//!
//! - **Dynamic Commands**: overloads with runtime-defined parameter lists, laid out
//!   as packed records behind a fixed host header
//! - **Hooks**: exclusive entry-point interception with access to the original,
//!   ordered multi-subscriber named hooks, dynamically scoped fluids
//! - **Foreign Handles**: identity-only handles for host objects plus one-shot
//!   per-object callbacks fired on the object's terminal event
//! - **In-process Host**: a small host engine for demos and tests
//!
//! ## Threading
//!
//! Every bridge operation runs on the host's game thread, nested in direct calls.
//! Callbacks may re-enter the bridge; no registry lock is held while extension
//! code runs.
//!
//! ### Example
//!
//! ```no_run
//! use game_bridge::prelude::*;
//! use game_bridge::host::local::{LocalHost, LocalOrigin};
//!
//! let bridge = Bridge::new(BridgeConfig::default()).unwrap();
//! let mut host = LocalHost::new();
//! bridge.install(&mut host).unwrap();
//!
//! let request = CommandRequest::new("home", "Go home", PermissionLevel::Any).with_overload(
//!     Overload::new(vec![ParameterDescriptor::text("room")], |record, origin, output| {
//!         if let Ok((room,)) = record.fetch_as::<(String,)>(origin) {
//!             output.add_message(&format!("Welcome to the {}", room));
//!             output.success();
//!         }
//!     }),
//! );
//! bridge.register_command(&mut host, request).unwrap();
//!
//! let output = host.execute("home kitchen", &LocalOrigin::console());
//! assert!(output.is_success());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: errors, logging, macros
//! - [`config`]: configuration loading
//! - [`command`]: parameter descriptors, record layout, registration
//! - [`hook`]: interceptors, named hooks, fluids
//! - [`foreign`]: foreign handles and the callback-lifetime registry
//! - [`host`]: host engine boundary and the in-process host
//! - [`api`]: extension-facing host operations
//! - [`runtime`]: bridge startup

/// Core infrastructure: errors, logging, macros
pub mod core;
/// Configuration system
pub mod config;
/// Dynamic command registration
pub mod command;
/// Hook and fluid dispatch
pub mod hook;
/// Foreign handles and callback lifetimes
pub mod foreign;
/// Host engine boundary
pub mod host;
/// Extension-facing host operations
pub mod api;
/// Bridge startup and standard hooks
pub mod runtime;

/// Commonly used types
pub mod prelude {
    pub use crate::command::{
        CommandRecord, CommandRequest, Overload, ParamValue, ParameterDescriptor, ParameterKind,
    };
    pub use crate::config::BridgeConfig;
    pub use crate::core::{BridgeError, BridgeResult};
    pub use crate::foreign::{ActorHandle, ForeignHandle, ItemHandle, PlayerHandle};
    pub use crate::hook::{Fluid, HookFlow, Interceptor, NamedHook};
    pub use crate::host::{
        BlockPos, CommandOrigin, CommandOutput, LoginRequest, PermissionLevel, Vec3,
    };
    pub use crate::runtime::Bridge;
}
