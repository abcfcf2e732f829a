//! 独占钩子
//!
//! 每个被拦截的宿主入口点对应一个 `Interceptor`。宿主在入口点处调用
//! `invoke(args, original)`：没有绑定替换体时直接执行原始行为，
//! 否则把参数和 `original` 交给替换体。替换体不调用 `original`
//! 就等于否决了原始行为。
//!
//! 状态：未注册 → 已注册（bind）→ 活跃（宿主第一次经过入口点），
//! 之后一直保持活跃直到进程退出。

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

use crate::core::{HookError, HookResult};

type Replacement<A, R> = Box<dyn Fn(A, &dyn Fn(A) -> R) -> R + Send + Sync>;

const UNREGISTERED: u8 = 0;
const REGISTERED: u8 = 1;
const ACTIVE: u8 = 2;

/// 入口点状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    Unregistered,
    Registered,
    Active,
}

impl fmt::Display for HookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HookState::Unregistered => "unregistered",
            HookState::Registered => "registered",
            HookState::Active => "active",
        };
        write!(f, "{}", s)
    }
}

/// 一个可拦截的宿主入口点
pub struct Interceptor<A, R> {
    symbol: &'static str,
    replacement: OnceLock<Replacement<A, R>>,
    state: AtomicU8,
}

impl<A, R> Interceptor<A, R> {
    pub const fn new(symbol: &'static str) -> Self {
        Self {
            symbol,
            replacement: OnceLock::new(),
            state: AtomicU8::new(UNREGISTERED),
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// 绑定替换体，每个入口点只能绑定一次
    pub fn bind<F>(&self, body: F) -> HookResult<()>
    where
        F: Fn(A, &dyn Fn(A) -> R) -> R + Send + Sync + 'static,
    {
        self.replacement
            .set(Box::new(body))
            .map_err(|_| HookError::Conflict(self.symbol.to_string()))?;
        self.state.store(REGISTERED, Ordering::Release);

        tracing::debug!(target: "bridge::hook", "Bound exclusive hook on '{}'", self.symbol);
        Ok(())
    }

    /// 宿主到达入口点
    pub fn invoke(&self, args: A, original: &dyn Fn(A) -> R) -> R {
        match self.replacement.get() {
            Some(body) => {
                if self
                    .state
                    .compare_exchange(REGISTERED, ACTIVE, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    tracing::debug!(target: "bridge::hook", "Hook on '{}' is now active", self.symbol);
                }
                body(args, original)
            }
            None => original(args),
        }
    }

    pub fn state(&self) -> HookState {
        match self.state.load(Ordering::Acquire) {
            UNREGISTERED => HookState::Unregistered,
            REGISTERED => HookState::Registered,
            _ => HookState::Active,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.replacement.get().is_some()
    }
}

impl<A, R> fmt::Debug for Interceptor<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("symbol", &self.symbol)
            .field("state", &self.state())
            .finish()
    }
}
