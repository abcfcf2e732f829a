//! 物品操作

use crate::foreign::ItemHandle;
use crate::host::Level;

/// 是否为空物品
///
/// # Safety
///
/// `item` 为空句柄，或指向的物品实例在调用期间仍然存活，见[模块约定](super)。
pub unsafe fn is_null(item: ItemHandle) -> bool {
    item.is_null() || item.as_ref().is_null()
}

/// 显示名称，有自定义名称时优先
///
/// # Safety
///
/// `item` 指向的物品实例在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn name(item: ItemHandle) -> String {
    let item = item.as_ref();
    item.custom_name().unwrap_or_else(|| item.name())
}

/// 物品ID
///
/// # Safety
///
/// `item` 指向的物品实例在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn id(item: ItemHandle) -> i16 {
    item.as_ref().id()
}

/// 调试字符串
///
/// # Safety
///
/// `item` 指向的物品实例在调用期间必须仍然存活，见[模块约定](super)。
pub unsafe fn debug_string(item: ItemHandle) -> String {
    item.as_ref().debug_string()
}

/// 按名称查物品ID（接受 `minecraft:` 前缀）
pub fn lookup_id(level: &dyn Level, name: &str) -> Option<i16> {
    level.lookup_item_id(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::local::{LocalHost, LocalItem};

    #[test]
    fn test_item_queries() {
        let bread = LocalItem::new(297, "bread");
        let named = LocalItem::new(264, "diamond").with_custom_name("Shiny");
        let air = LocalItem::null();

        unsafe {
            let handle = ItemHandle::from_ref(&bread);
            assert!(!is_null(handle));
            assert_eq!(id(handle), 297);
            assert_eq!(name(handle), "bread");

            assert_eq!(name(ItemHandle::from_ref(&named)), "Shiny");
            assert_eq!(debug_string(ItemHandle::from_ref(&named)), "diamond(264) \"Shiny\"");
            assert!(is_null(ItemHandle::from_ref(&air)));
        }
    }

    #[test]
    fn test_lookup() {
        let host = LocalHost::new();
        assert_eq!(lookup_id(&host, "bread"), Some(297));
        assert_eq!(lookup_id(&host, "minecraft:stone"), Some(1));
        assert_eq!(lookup_id(&host, "nothing"), None);
    }
}
