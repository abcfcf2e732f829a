//! 外部对象句柄
//!
//! 对宿主对象地址的不透明包装。句柄不持有所有权，只表示身份：
//! 两个句柄相等当且仅当地址相同，与对象内容无关。

use std::fmt;
use std::hash::{Hash, Hasher};

/// 宿主对象类型的标签名，供日志和扩展代码区分句柄种类
pub trait ForeignType {
    const TAG: &'static str;
}

/// 宿主对象的身份句柄
///
/// 创建是 O(1) 的纯结构操作，永不失败，也不会在宿主侧分配任何状态。
/// 宿主销毁底层对象之后，句柄仍可以比较、哈希、作为注册表的键，
/// 但绝不能再解引用。
pub struct ForeignHandle<T: ?Sized> {
    ptr: *const T,
}

impl<T: ?Sized> ForeignHandle<T> {
    /// 包装宿主对象地址
    pub fn wrap(ptr: *const T) -> Self {
        Self { ptr }
    }

    /// 从宿主借出的引用创建句柄
    pub fn from_ref(object: &T) -> Self {
        Self {
            ptr: object as *const T,
        }
    }

    /// 对象地址（胖指针只取数据部分）
    pub fn addr(&self) -> usize {
        self.ptr.cast::<()>() as usize
    }

    pub fn is_null(&self) -> bool {
        self.ptr.cast::<()>().is_null()
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr
    }

    /// 解引用句柄
    ///
    /// # Safety
    ///
    /// 句柄必须非空，且宿主尚未销毁底层对象。宿主销毁对象后解引用是
    /// 未定义行为：这是调用方契约违规，不是可恢复的错误。返回的引用不得
    /// 保存到当前请求的动态范围之外。
    pub unsafe fn as_ref<'a>(&self) -> &'a T {
        debug_assert!(!self.is_null(), "dereferencing a null foreign handle");
        &*self.ptr
    }

    /// 句柄种类标签
    pub fn tag() -> &'static str
    where
        T: ForeignType,
    {
        T::TAG
    }
}

impl<T: ?Sized> Clone for ForeignHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ForeignHandle<T> {}

impl<T: ?Sized> PartialEq for ForeignHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<T: ?Sized> Eq for ForeignHandle<T> {}

impl<T: ?Sized> Hash for ForeignHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for ForeignHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForeignHandle({:#x})", self.addr())
    }
}

// 句柄只是一个地址，解引用本身是unsafe的，并且只允许在游戏主线程上进行。
unsafe impl<T: ?Sized> Send for ForeignHandle<T> {}
unsafe impl<T: ?Sized> Sync for ForeignHandle<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Block {
        id: u32,
    }

    crate::foreign_type!(Block, "block");

    #[test]
    fn test_same_address_equal() {
        let block = Block { id: 7 };
        let h1 = ForeignHandle::from_ref(&block);
        let h2 = ForeignHandle::wrap(&block as *const Block);
        assert_eq!(h1, h2);
        assert_eq!(unsafe { h1.as_ref() }.id, 7);
    }

    #[test]
    fn test_identical_contents_not_equal() {
        let a = Block { id: 1 };
        let b = Block { id: 1 };
        let ha = ForeignHandle::from_ref(&a);
        let hb = ForeignHandle::from_ref(&b);
        assert_ne!(ha, hb);

        let set: HashSet<_> = [ha, hb, ha].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_null_and_tag() {
        let null = ForeignHandle::<Block>::wrap(std::ptr::null());
        assert!(null.is_null());
        assert_eq!(null.addr(), 0);
        assert_eq!(ForeignHandle::<Block>::tag(), "block");
    }

    #[test]
    fn test_trait_object_identity() {
        trait Named {
            fn name(&self) -> &str;
        }
        impl Named for Block {
            fn name(&self) -> &str {
                "block"
            }
        }

        let block = Block { id: 3 };
        let h1 = ForeignHandle::<dyn Named>::from_ref(&block);
        let h2 = ForeignHandle::<dyn Named>::from_ref(&block);
        assert_eq!(h1, h2);
        assert_eq!(h1.addr(), &block as *const Block as usize);
        assert_eq!(unsafe { h1.as_ref() }.name(), "block");
    }
}
