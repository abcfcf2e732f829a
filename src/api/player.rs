//! 玩家与世界操作

use crate::foreign::PlayerHandle;
use crate::host::{BlockPos, GameMode, Level, NetworkStats, PermissionLevel};

/// 床重生点
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn spawn_point(player: PlayerHandle) -> BlockPos {
    player.as_ref().spawn_position()
}

/// 设置床重生点，宿主拒绝时返回 `false`
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn set_spawn_point(player: PlayerHandle, pos: BlockPos) -> bool {
    player.as_ref().set_bed_respawn_position(pos)
}

/// 踢出玩家
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn kick(player: PlayerHandle, reason: &str) {
    tracing::info!(target: "bridge::api", "Kicking {:?}: {}", player, reason);
    player.as_ref().disconnect(reason);
}

/// 给玩家发送消息
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn send_message(player: PlayerHandle, message: &str) {
    player.as_ref().send_message(message);
}

/// 命令权限级别
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn permission_level(player: PlayerHandle) -> PermissionLevel {
    player.as_ref().permission_level()
}

/// 玩家UUID
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn uuid(player: PlayerHandle) -> uuid::Uuid {
    player.as_ref().uuid()
}

/// 玩家XUID
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn xuid(player: PlayerHandle) -> String {
    player.as_ref().xuid()
}

/// 网络统计
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn network_stats(player: PlayerHandle) -> NetworkStats {
    player.as_ref().network_stats()
}

/// 当前延迟
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn ping(player: PlayerHandle) -> i32 {
    network_stats(player).ping
}

/// 平均延迟
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn avg_ping(player: PlayerHandle) -> i32 {
    network_stats(player).avg_ping
}

/// 当前丢包率
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn packet_loss(player: PlayerHandle) -> f32 {
    network_stats(player).packet_loss
}

/// 平均丢包率
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn avg_packet_loss(player: PlayerHandle) -> f32 {
    network_stats(player).avg_packet_loss
}

/// 打开玩家背包
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn open_inventory(player: PlayerHandle) {
    player.as_ref().open_inventory();
}

/// 是否生存模式
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn is_survival(player: PlayerHandle) -> bool {
    player.as_ref().game_mode() == GameMode::Survival
}

/// 是否创造模式
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn is_creative(player: PlayerHandle) -> bool {
    player.as_ref().game_mode() == GameMode::Creative
}

/// 是否冒险模式
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn is_adventure(player: PlayerHandle) -> bool {
    player.as_ref().game_mode() == GameMode::Adventure
}

/// 是否世界建造者
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn is_world_builder(player: PlayerHandle) -> bool {
    player.as_ref().is_world_builder()
}

/// 暂停玩家（不再接收世界更新）
pub fn suspend(level: &dyn Level, player: PlayerHandle) {
    level.suspend_player(player);
}

pub fn resume(level: &dyn Level, player: PlayerHandle) {
    level.resume_player(player);
}

/// 世界默认出生点
pub fn level_spawn(level: &dyn Level) -> BlockPos {
    level.default_spawn()
}

/// 遍历在线玩家，`visit` 返回 `false` 时停止
pub fn for_each_player<F>(level: &dyn Level, mut visit: F)
where
    F: FnMut(PlayerHandle) -> bool,
{
    level.for_each_player(&mut visit);
}

/// 在线玩家句柄列表
pub fn players(level: &dyn Level) -> Vec<PlayerHandle> {
    let mut out = Vec::new();
    for_each_player(level, |player| {
        out.push(player);
        true
    });
    out
}
