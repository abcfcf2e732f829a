//! Fluid：动态作用域的单槽覆盖值
//!
//! 被拦截的调用进入时压入一个"未设置"槽，钩子体可以 `set`，
//! 分发结束后外层调用恰好读取一次栈顶（已设置的值或默认值）并弹出。
//! 弹出由 `scopeguard` 保证，钩子体panic时也会恢复外层的值。

use parking_lot::Mutex;
use scopeguard::ScopeGuard;
use std::fmt;

/// 动态作用域覆盖单元
pub struct Fluid<T> {
    name: String,
    stack: Mutex<Vec<Option<T>>>,
}

impl<T> Fluid<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stack: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 在一个新作用域内运行 `body`，返回作用域结束时的值
    pub fn scope<F>(&self, default: T, body: F) -> T
    where
        F: FnOnce(),
    {
        self.stack.lock().push(None);
        let guard = scopeguard::guard(&self.stack, |stack| {
            stack.lock().pop();
        });

        body();

        let top = ScopeGuard::into_inner(guard).lock().pop().flatten();
        top.unwrap_or(default)
    }

    /// 设置当前作用域的值
    ///
    /// # Panics
    ///
    /// 在任何 `scope` 之外调用时panic。
    pub fn set(&self, value: T) {
        let applied = match self.stack.lock().last_mut() {
            Some(top) => {
                *top = Some(value);
                true
            }
            None => false,
        };
        assert!(
            applied,
            "fluid '{}' set outside of its intercepted call",
            self.name
        );
    }

    /// 当前作用域是否已设置
    pub fn is_set(&self) -> bool {
        matches!(self.stack.lock().last(), Some(Some(_)))
    }

    /// 嵌套深度
    pub fn depth(&self) -> usize {
        self.stack.lock().len()
    }
}

impl<T: Clone> Fluid<T> {
    /// 当前作用域已设置的值
    pub fn get(&self) -> Option<T> {
        self.stack.lock().last().cloned().flatten()
    }
}

impl<T> fmt::Debug for Fluid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fluid")
            .field("name", &self.name)
            .field("depth", &self.depth())
            .finish()
    }
}
