//! 宿主领域值类型
//!
//! 只包含跨越桥接边界按值传递的小型数据：坐标、维度、权限、网络统计等。

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// 方块坐标
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ORIGIN: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// 世界坐标所在的方块（向下取整）
    pub fn from_vec3(pos: Vec3) -> Self {
        let floored = pos.floor();
        Self {
            x: floored.x as i32,
            y: floored.y as i32,
            z: floored.z as i32,
        }
    }

    /// 方块最小角的世界坐标
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// 方块中心的世界坐标
    pub fn center(self) -> Vec3 {
        self.to_vec3() + Vec3::splat(0.5)
    }
}

impl From<Vec3> for BlockPos {
    fn from(pos: Vec3) -> Self {
        Self::from_vec3(pos)
    }
}

/// 维度ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DimensionId(pub i32);

impl DimensionId {
    pub const OVERWORLD: DimensionId = DimensionId(0);
    pub const NETHER: DimensionId = DimensionId(1);
    pub const THE_END: DimensionId = DimensionId(2);
}

/// 命令权限级别
///
/// 级别有序：高级别可以执行低级别的命令。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum PermissionLevel {
    #[default]
    Any = 0,
    GameMasters = 1,
    Admin = 2,
    Host = 3,
    Owner = 4,
}

impl PermissionLevel {
    /// 从扩展代码传入的原始数值转换，超出范围的值取最近的合法级别
    pub fn from_raw(level: i32) -> Self {
        match level {
            i32::MIN..=0 => PermissionLevel::Any,
            1 => PermissionLevel::GameMasters,
            2 => PermissionLevel::Admin,
            3 => PermissionLevel::Host,
            _ => PermissionLevel::Owner,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// 游戏模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

/// 命令来源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginType {
    Player = 0,
    Block = 1,
    MinecartBlock = 2,
    DevConsole = 3,
    Test = 4,
    AutomationPlayer = 5,
    ClientAutomation = 6,
    DedicatedServer = 7,
    Entity = 8,
    Virtual = 9,
}

impl OriginType {
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// 玩家连接的网络统计
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkStats {
    pub ping: i32,
    pub avg_ping: i32,
    pub max_bps: i32,
    pub packet_loss: f32,
    pub avg_packet_loss: f32,
}

/// 登录请求（白名单检查入口点的参数）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub uuid: uuid::Uuid,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_pos_floor() {
        assert_eq!(
            BlockPos::from_vec3(Vec3::new(1.7, -0.2, -3.0)),
            BlockPos::new(1, -1, -3)
        );
    }

    #[test]
    fn test_block_pos_center() {
        let center = BlockPos::new(2, 64, -5).center();
        assert_eq!(center, Vec3::new(2.5, 64.5, -4.5));
    }

    #[test]
    fn test_permission_order() {
        assert!(PermissionLevel::Admin > PermissionLevel::GameMasters);
        assert_eq!(PermissionLevel::from_raw(-4), PermissionLevel::Any);
        assert_eq!(PermissionLevel::from_raw(9), PermissionLevel::Owner);
        assert_eq!(PermissionLevel::from_raw(2).as_raw(), 2);
    }
}
