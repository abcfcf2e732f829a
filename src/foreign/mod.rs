//! 外部句柄与回调生命周期桥
//!
//! - `handle` - 宿主对象的身份句柄（无所有权）
//! - `lifetime` - 每个对象一次性的终止事件回调

pub mod handle;
pub mod lifetime;

pub use handle::{ForeignHandle, ForeignType};
pub use lifetime::{LifetimeRegistry, TerminalCallback};

use crate::host::{Actor, CommandOrigin, CommandOutput, ItemActor, ItemInstance, Player};

pub type ActorHandle = ForeignHandle<dyn Actor>;
pub type PlayerHandle = ForeignHandle<dyn Player>;
pub type ItemHandle = ForeignHandle<dyn ItemInstance>;
pub type ItemActorHandle = ForeignHandle<dyn ItemActor>;
pub type OriginHandle = ForeignHandle<dyn CommandOrigin>;
pub type OutputHandle = ForeignHandle<dyn CommandOutput>;

crate::foreign_type!(dyn Actor, "actor");
crate::foreign_type!(dyn Player, "player");
crate::foreign_type!(dyn ItemInstance, "item-instance");
crate::foreign_type!(dyn ItemActor, "item-actor");
crate::foreign_type!(dyn CommandOrigin, "command-orig");
crate::foreign_type!(dyn CommandOutput, "command-outp");
