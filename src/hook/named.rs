//! 命名钩子（多订阅者）
//!
//! 订阅者按注册顺序调用，第一个返回 `Stop` 的订阅者结束分发。
//! 分发前先复制订阅者列表再释放锁，订阅者内部可以安全地重入
//! （再次分发或追加订阅）；分发期间新增的订阅者从下一次分发开始生效。

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// 订阅者的返回值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookFlow<R> {
    Continue,
    Stop(R),
}

type Subscriber<A, R> = Arc<dyn Fn(&A) -> HookFlow<R> + Send + Sync>;

/// 命名钩子
pub struct NamedHook<A, R = ()> {
    name: String,
    subscribers: Mutex<Vec<Subscriber<A, R>>>,
    trace: bool,
}

impl<A, R> NamedHook<A, R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subscribers: Mutex::new(Vec::new()),
            trace: false,
        }
    }

    /// 每次分发输出trace事件
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 追加订阅者，返回它的序号
    pub fn subscribe<F>(&self, subscriber: F) -> usize
    where
        F: Fn(&A) -> HookFlow<R> + Send + Sync + 'static,
    {
        let mut subscribers = self.subscribers.lock();
        subscribers.push(Arc::new(subscriber));
        subscribers.len() - 1
    }

    /// 追加一个从不中断分发的订阅者
    pub fn listen<F>(&self, listener: F) -> usize
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        self.subscribe(move |args| {
            listener(args);
            HookFlow::Continue
        })
    }

    /// 分发，返回中断者给出的结果
    pub fn dispatch(&self, args: &A) -> Option<R> {
        let snapshot: Vec<Subscriber<A, R>> = self.subscribers.lock().clone();

        for (index, subscriber) in snapshot.iter().enumerate() {
            if let HookFlow::Stop(result) = subscriber(args) {
                if self.trace {
                    tracing::trace!(
                        target: "bridge::hook",
                        "'{}' stopped by subscriber {} of {}",
                        self.name,
                        index,
                        snapshot.len()
                    );
                }
                return Some(result);
            }
        }

        if self.trace {
            tracing::trace!(
                target: "bridge::hook",
                "'{}' dispatched to {} subscriber(s)",
                self.name,
                snapshot.len()
            );
        }
        None
    }

    /// 分发，没有订阅者中断时返回 `default`
    pub fn dispatch_or(&self, args: &A, default: R) -> R {
        self.dispatch(args).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A, R> fmt::Debug for NamedHook<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedHook")
            .field("name", &self.name)
            .field("subscribers", &self.len())
            .finish()
    }
}
