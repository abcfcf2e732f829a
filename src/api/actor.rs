//! 实体操作

use crate::foreign::{ActorHandle, PlayerHandle};
use crate::host::{DimensionId, Vec3};

/// 实体位置
///
/// # Safety
///
/// `actor` 指向的实体在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn position(actor: ActorHandle) -> Vec3 {
    actor.as_ref().position()
}

/// 实体所在维度
///
/// # Safety
///
/// `actor` 指向的实体在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn dimension(actor: ActorHandle) -> DimensionId {
    actor.as_ref().dimension()
}

/// 实体名称
///
/// # Safety
///
/// `actor` 指向的实体在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn name(actor: ActorHandle) -> String {
    actor.as_ref().name_tag()
}

/// 传送到目标位置（可以跨维度）
///
/// # Safety
///
/// `actor` 指向的实体在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn teleport(actor: ActorHandle, target: Vec3, dimension: DimensionId) {
    tracing::debug!(
        target: "bridge::api",
        "Teleport {:?} to {} in {:?}",
        actor,
        target,
        dimension
    );
    actor.as_ref().teleport(target, dimension);
}

/// 切换维度
///
/// # Safety
///
/// `actor` 指向的实体在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn change_dimension(actor: ActorHandle, dimension: DimensionId, show_credits: bool) {
    actor.as_ref().change_dimension(dimension, show_credits);
}

/// 调试信息
///
/// # Safety
///
/// `actor` 指向的实体在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn debug_text(actor: ActorHandle) -> Vec<String> {
    actor.as_ref().debug_text()
}

/// 两个句柄是否指向同一个实体（只比较身份，不需要解引用）
pub fn same(a: ActorHandle, b: ActorHandle) -> bool {
    a == b
}

/// 玩家的实体视图
///
/// # Safety
///
/// `player` 指向的玩家在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn from_player(player: PlayerHandle) -> ActorHandle {
    ActorHandle::from_ref(player.as_ref().as_actor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::local::LocalHost;

    #[test]
    fn test_actor_view_of_player() {
        let mut host = LocalHost::new();
        let steve = host.join("steve", uuid::Uuid::new_v4());
        let alex = host.join("alex", uuid::Uuid::new_v4());

        unsafe {
            let actor = from_player(steve);
            assert_eq!(name(actor), "steve");
            assert_eq!(actor.addr(), steve.addr());
            assert!(same(actor, from_player(steve)));
            assert!(!same(actor, from_player(alex)));

            teleport(actor, Vec3::new(1.0, 70.0, 2.0), DimensionId::NETHER);
            assert_eq!(position(actor), Vec3::new(1.0, 70.0, 2.0));
            assert_eq!(dimension(actor), DimensionId::NETHER);

            change_dimension(actor, DimensionId::THE_END, true);
            assert_eq!(dimension(actor), DimensionId::THE_END);
            assert_eq!(debug_text(actor)[0], "name: steve");
        }
    }
}
