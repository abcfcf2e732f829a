//! 回调生命周期注册表
//!
//! 每个宿主对象最多挂一个一次性回调，在对象的终止事件（例如玩家离开）
//! 触发时调用并移除。注册表在注册时取得回调的唯一所有权，
//! 在触发或被替换时恰好释放一次。

use parking_lot::Mutex;
use std::collections::HashMap;

use super::ForeignHandle;

/// 终止事件回调
pub type TerminalCallback = Box<dyn FnOnce() + Send>;

/// 对象身份到待触发回调的映射
///
/// 触发时先移除条目并释放锁，再调用回调，所以回调内部可以重入注册表
/// （例如为另一个对象注册新的回调）。
pub struct LifetimeRegistry {
    entries: Mutex<HashMap<usize, TerminalCallback>>,
}

crate::impl_default_and_new!(LifetimeRegistry {
    entries: Mutex::new(HashMap::new()),
});

impl LifetimeRegistry {
    /// 注册终止回调，替换该对象已有的回调
    ///
    /// 返回是否替换了旧回调。旧回调在锁外释放，不会被调用。
    pub fn register_on_terminal<T: ?Sized>(
        &self,
        key: ForeignHandle<T>,
        callback: TerminalCallback,
    ) -> bool {
        let previous = self.entries.lock().insert(key.addr(), callback);
        let replaced = previous.is_some();
        drop(previous);

        tracing::debug!(target: "bridge::foreign", key = ?key, replaced, "Terminal callback registered");
        replaced
    }

    /// 触发对象的终止事件
    ///
    /// 有条目时调用一次并移除，返回 `true`；没有条目时什么都不做。
    pub fn fire_terminal<T: ?Sized>(&self, key: ForeignHandle<T>) -> bool {
        let callback = self.entries.lock().remove(&key.addr());
        match callback {
            Some(callback) => {
                tracing::debug!(target: "bridge::foreign", key = ?key, "Firing terminal callback");
                callback();
                true
            }
            None => false,
        }
    }

    /// 对象是否有待触发的回调
    pub fn is_pending<T: ?Sized>(&self, key: ForeignHandle<T>) -> bool {
        self.entries.lock().contains_key(&key.addr())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Player {
        _name: &'static str,
    }

    #[test]
    fn test_fire_once() {
        let registry = LifetimeRegistry::new();
        let player = Player { _name: "steve" };
        let key = ForeignHandle::from_ref(&player);
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        registry.register_on_terminal(
            key,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert!(registry.is_pending(key));

        assert!(registry.fire_terminal(key));
        assert!(!registry.fire_terminal(key));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_replace_keeps_latest() {
        let registry = LifetimeRegistry::new();
        let player = Player { _name: "alex" };
        let key = ForeignHandle::from_ref(&player);
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let first = log.clone();
        assert!(!registry.register_on_terminal(key, Box::new(move || first.lock().push("first"))));
        let second = log.clone();
        assert!(registry.register_on_terminal(key, Box::new(move || second.lock().push("second"))));
        assert_eq!(registry.len(), 1);

        registry.fire_terminal(key);
        assert_eq!(*log.lock(), vec!["second"]);
    }

    #[test]
    fn test_replaced_callback_is_released() {
        let registry = LifetimeRegistry::new();
        let player = Player { _name: "sam" };
        let key = ForeignHandle::from_ref(&player);
        let token = Arc::new(());

        let held = token.clone();
        registry.register_on_terminal(key, Box::new(move || drop(held)));
        assert_eq!(Arc::strong_count(&token), 2);

        registry.register_on_terminal(key, Box::new(|| {}));
        assert_eq!(Arc::strong_count(&token), 1);
    }

    #[test]
    fn test_fire_without_entry_is_noop() {
        let registry = LifetimeRegistry::new();
        let player = Player { _name: "nobody" };
        assert!(!registry.fire_terminal(ForeignHandle::from_ref(&player)));
    }

    #[test]
    fn test_reentrant_registration() {
        let registry = Arc::new(LifetimeRegistry::new());
        let a = Player { _name: "a" };
        let b = Player { _name: "b" };
        let key_a = ForeignHandle::from_ref(&a);
        let key_b = ForeignHandle::from_ref(&b);
        let fired_b = Arc::new(AtomicUsize::new(0));

        let inner = registry.clone();
        let counter = fired_b.clone();
        registry.register_on_terminal(
            key_a,
            Box::new(move || {
                inner.register_on_terminal(
                    key_b,
                    Box::new(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        assert!(registry.fire_terminal(key_a));
        assert!(registry.is_pending(key_b));
        assert!(registry.fire_terminal(key_b));
        assert_eq!(fired_b.load(Ordering::SeqCst), 1);
    }
}
