//! 宿主引擎边界
//!
//! 桥接层只通过这里列出的能力使用宿主：命令子系统、入口点拦截、
//! 生命周期事件、服务器线程队列，以及只读/命令式的领域对象操作。
//! 领域对象永远不归桥接层所有，跨越边界时只以外部句柄的形式出现。
//!
//! `local` 子模块提供一个进程内的宿主实现，供演示程序和测试使用。

pub mod domain;
pub mod local;

pub use domain::{
    BlockPos, DimensionId, GameMode, LoginRequest, NetworkStats, OriginType, PermissionLevel,
};
pub use glam::Vec3;

use crate::command::OverloadBinding;
use crate::foreign::PlayerHandle;
use crate::hook::Interceptor;

/// 实体
pub trait Actor {
    fn name_tag(&self) -> String;
    fn position(&self) -> Vec3;
    fn dimension(&self) -> DimensionId;
    fn change_dimension(&self, dimension: DimensionId, show_credits: bool);
    fn teleport(&self, target: Vec3, dimension: DimensionId);
    fn debug_text(&self) -> Vec<String>;
}

/// 在线玩家
pub trait Player: Actor {
    fn as_actor(&self) -> &(dyn Actor + 'static);
    fn uuid(&self) -> uuid::Uuid;
    fn xuid(&self) -> String;
    fn permission_level(&self) -> PermissionLevel;
    fn spawn_position(&self) -> BlockPos;
    fn set_bed_respawn_position(&self, pos: BlockPos) -> bool;
    fn game_mode(&self) -> GameMode;
    fn is_world_builder(&self) -> bool;
    fn network_stats(&self) -> NetworkStats;
    fn open_inventory(&self);
    fn send_message(&self, message: &str);
    /// 断开连接（踢出）
    fn disconnect(&self, reason: &str);
}

/// 物品实例
pub trait ItemInstance {
    fn is_null(&self) -> bool;
    fn id(&self) -> i16;
    fn name(&self) -> String;
    fn custom_name(&self) -> Option<String>;
    fn debug_string(&self) -> String;
}

/// 掉落在世界中的物品实体
pub trait ItemActor {
    fn name(&self) -> String;
    /// 实体携带的物品实例，与实体同生命周期
    fn item_instance(&self) -> &(dyn ItemInstance + 'static);
}

/// 世界
pub trait Level {
    fn default_spawn(&self) -> BlockPos;
    /// 遍历在线玩家，回调返回 `false` 时停止
    fn for_each_player(&self, visit: &mut dyn FnMut(PlayerHandle) -> bool);
    fn suspend_player(&self, player: PlayerHandle);
    fn resume_player(&self, player: PlayerHandle);
    fn lookup_item_id(&self, name: &str) -> Option<i16>;
}

/// 命令来源
pub trait CommandOrigin {
    fn origin_type(&self) -> OriginType;
    fn name(&self) -> String;
    fn block_position(&self) -> BlockPos;
    fn world_position(&self) -> Vec3;
    fn permission_level(&self) -> PermissionLevel;
    /// 来源对应的玩家（仅玩家来源）
    fn player(&self) -> Option<PlayerHandle>;
}

/// 命令输出通道，由宿主在每次调用时提供
pub trait CommandOutput {
    fn add_message(&mut self, message: &str);
    fn success(&mut self);
    fn error(&mut self, message: &str);
}

/// 宿主命令子系统
pub trait CommandHost {
    fn has_command(&self, name: &str) -> bool;
    fn register_command(&mut self, name: &str, description: &str, permission: PermissionLevel);
    fn register_overload(&mut self, name: &str, binding: OverloadBinding);
}

/// 宿主的生命周期通知
pub trait LifecycleEvents {
    fn on_player_joined(&mut self, callback: Box<dyn Fn(PlayerHandle)>);
    fn on_player_left(&mut self, callback: Box<dyn Fn(PlayerHandle)>);
}

/// 桥接层需要拦截的宿主入口点
pub trait HostEntryPoints {
    /// 白名单检查（登录）
    fn whitelist_check(&self) -> &Interceptor<LoginRequest, bool>;
}

/// 服务器线程队列：投递后即忘，同一队列内FIFO
pub trait ServerThreadQueue {
    fn queue_for_server_thread(&self, job: Box<dyn FnOnce() + Send>);
}
