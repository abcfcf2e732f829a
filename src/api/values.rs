//! 坐标与UUID值的转换

use crate::host::{BlockPos, Vec3};
use uuid::Uuid;

/// 世界坐标转方块坐标（向下取整）
pub fn vec3_to_block_pos(pos: Vec3) -> BlockPos {
    BlockPos::from_vec3(pos)
}

/// 方块坐标转世界坐标（方块角点）
pub fn block_pos_to_vec3(pos: BlockPos) -> Vec3 {
    pos.to_vec3()
}

/// 方块中心的世界坐标
pub fn block_pos_center(pos: BlockPos) -> Vec3 {
    pos.center()
}

/// 解析UUID字符串，格式不对时返回 `None`
pub fn parse_uuid(text: &str) -> Option<Uuid> {
    Uuid::parse_str(text.trim()).ok()
}

/// 连字符小写格式
pub fn uuid_to_string(uuid: &Uuid) -> String {
    uuid.hyphenated().to_string()
}

pub fn uuid_eq(a: &Uuid, b: &Uuid) -> bool {
    a == b
}
