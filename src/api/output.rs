//! 命令来源与输出
//!
//! 来源和输出只在命令执行期间有效，所以这里直接使用宿主借出的引用。

use crate::foreign::PlayerHandle;
use crate::host::{BlockPos, CommandOrigin, CommandOutput, OriginType, Vec3};

pub fn origin_type(origin: &dyn CommandOrigin) -> OriginType {
    origin.origin_type()
}

pub fn origin_name(origin: &dyn CommandOrigin) -> String {
    origin.name()
}

pub fn origin_block_position(origin: &dyn CommandOrigin) -> BlockPos {
    origin.block_position()
}

pub fn origin_world_position(origin: &dyn CommandOrigin) -> Vec3 {
    origin.world_position()
}

/// 来源玩家；非玩家来源返回 `None`
pub fn origin_player(origin: &dyn CommandOrigin) -> Option<PlayerHandle> {
    match origin.origin_type() {
        OriginType::Player => origin.player(),
        _ => None,
    }
}

pub fn add_message(output: &mut dyn CommandOutput, message: &str) {
    output.add_message(message);
}

/// 标记成功，可附带一条消息
pub fn success(output: &mut dyn CommandOutput, message: Option<&str>) {
    if let Some(message) = message {
        output.add_message(message);
    }
    output.success();
}

pub fn error(output: &mut dyn CommandOutput, message: &str) {
    output.error(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::local::{LocalHost, LocalOrigin, OutputBuffer};

    #[test]
    fn test_origin_queries() {
        let console = LocalOrigin::console();
        assert_eq!(origin_type(&console), OriginType::DedicatedServer);
        assert_eq!(origin_player(&console), None);
        assert_eq!(origin_name(&console), "Server");

        let mut host = LocalHost::new();
        let steve = host.join("steve", uuid::Uuid::new_v4());
        let origin = LocalOrigin::for_player(host.player("steve").unwrap());
        assert_eq!(origin_type(&origin), OriginType::Player);
        assert_eq!(origin_player(&origin), Some(steve));
        assert_eq!(
            origin_block_position(&origin),
            BlockPos::from_vec3(origin_world_position(&origin))
        );
    }

    #[test]
    fn test_output_helpers() {
        let mut output = OutputBuffer::default();
        add_message(&mut output, "one");
        success(&mut output, Some("two"));
        assert!(output.is_success());
        assert_eq!(output.messages(), &["one".to_string(), "two".to_string()]);

        error(&mut output, "broken");
        assert!(!output.is_success());
    }
}
