//! 掉落物实体操作

use crate::foreign::{ItemActorHandle, ItemHandle};

/// 掉落物实体名称
///
/// # Safety
///
/// `actor` 指向的实体在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn name(actor: ItemActorHandle) -> String {
    actor.as_ref().name()
}

/// 实体携带的物品实例
///
/// 返回的句柄与实体同生命周期：实体被宿主销毁后不得再使用。
///
/// # Safety
///
/// `actor` 指向的实体在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn to_item_instance(actor: ItemActorHandle) -> ItemHandle {
    ItemHandle::from_ref(actor.as_ref().item_instance())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::item;
    use crate::foreign::ForeignHandle;
    use crate::host::local::{LocalItem, LocalItemActor};
    use crate::host::{ItemActor, Vec3};

    #[test]
    fn test_item_actor_name() {
        let plain = LocalItemActor::new(LocalItem::new(264, "diamond"), Vec3::ZERO);
        let named = LocalItemActor::new(
            LocalItem::new(297, "bread").with_custom_name("Lunch"),
            Vec3::new(1.0, 64.0, 1.0),
        );

        unsafe {
            assert_eq!(name(ItemActorHandle::from_ref(&plain)), "diamond");
            assert_eq!(name(ItemActorHandle::from_ref(&named)), "Lunch");
        }
    }

    #[test]
    fn test_to_item_instance() {
        let dropped = LocalItemActor::new(LocalItem::new(264, "diamond"), Vec3::ZERO);
        let handle = ItemActorHandle::from_ref(&dropped);

        let instance = unsafe { to_item_instance(handle) };
        assert_eq!(instance, ItemHandle::from_ref(dropped.item_instance()));
        unsafe {
            assert_eq!(item::id(instance), 264);
            assert_eq!(item::name(instance), "diamond");
        }
        // 同一个实体每次取到的物品句柄相同
        assert_eq!(unsafe { to_item_instance(handle) }, instance);
    }

    #[test]
    fn test_item_actor_tag() {
        assert_eq!(ForeignHandle::<dyn ItemActor>::tag(), "item-actor");
    }
}
