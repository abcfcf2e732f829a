//! 面向扩展代码的宿主操作
//!
//! 所有接收句柄并解引用的函数都是 `unsafe fn`，调用方必须保证：
//!
//! # Safety
//!
//! 句柄指向的宿主对象在调用期间仍然存活。宿主销毁对象后（例如玩家离开之后）
//! 再使用句柄调用这些函数是未定义行为。需要在对象销毁时收到通知，
//! 用 `Bridge::on_player_left` 注册一次性回调。

pub mod actor;
pub mod item;
pub mod item_actor;
pub mod output;
pub mod player;
pub mod values;

pub use values::{
    block_pos_center, block_pos_to_vec3, parse_uuid, uuid_eq, uuid_to_string, vec3_to_block_pos,
};
