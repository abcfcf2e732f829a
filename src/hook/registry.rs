//! 钩子注册表
//!
//! 按名称保存命名钩子（类型擦除后按签名取回），
//! 并记录每个独占入口点的绑定者，用于冲突报告与状态查询。

use parking_lot::Mutex;
use std::any::{type_name, Any};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::{HookFlow, Interceptor, NamedHook};
use crate::config::HookConfig;
use crate::core::{HookError, HookResult};

struct NamedEntry {
    hook: Arc<dyn Any + Send + Sync>,
    signature: &'static str,
}

/// 钩子注册表
pub struct HookRegistry {
    trace_dispatch: bool,
    named: Mutex<HashMap<String, NamedEntry>>,
    exclusive: Mutex<BTreeMap<&'static str, String>>,
}

impl HookRegistry {
    pub fn new(config: &HookConfig) -> Self {
        Self {
            trace_dispatch: config.trace_dispatch,
            named: Mutex::new(HashMap::new()),
            exclusive: Mutex::new(BTreeMap::new()),
        }
    }

    /// 定义命名钩子；已存在且签名相同时返回已有的钩子
    pub fn define<A, R>(&self, name: &str) -> HookResult<Arc<NamedHook<A, R>>>
    where
        A: 'static,
        R: 'static,
    {
        let mut named = self.named.lock();
        if let Some(entry) = named.get(name) {
            return downcast(name, entry);
        }

        let hook = Arc::new(NamedHook::<A, R>::new(name).with_trace(self.trace_dispatch));
        named.insert(
            name.to_string(),
            NamedEntry {
                hook: hook.clone(),
                signature: type_name::<NamedHook<A, R>>(),
            },
        );
        tracing::debug!(target: "bridge::hook", "Defined named hook '{}'", name);
        Ok(hook)
    }

    /// 取回已定义的命名钩子
    pub fn get<A, R>(&self, name: &str) -> HookResult<Arc<NamedHook<A, R>>>
    where
        A: 'static,
        R: 'static,
    {
        let named = self.named.lock();
        let entry = named
            .get(name)
            .ok_or_else(|| HookError::NotDefined(name.to_string()))?;
        downcast(name, entry)
    }

    /// 订阅已定义的命名钩子
    pub fn subscribe<A, R, F>(&self, name: &str, subscriber: F) -> HookResult<usize>
    where
        A: 'static,
        R: 'static,
        F: Fn(&A) -> HookFlow<R> + Send + Sync + 'static,
    {
        Ok(self.get::<A, R>(name)?.subscribe(subscriber))
    }

    /// 分发已定义的命名钩子（注册表锁在分发前释放）
    pub fn dispatch<A, R>(&self, name: &str, args: &A) -> HookResult<Option<R>>
    where
        A: 'static,
        R: 'static,
    {
        let hook = self.get::<A, R>(name)?;
        Ok(hook.dispatch(args))
    }

    /// 在入口点上绑定独占钩子并记账
    pub fn bind_exclusive<A, R, F>(
        &self,
        interceptor: &Interceptor<A, R>,
        owner: &str,
        body: F,
    ) -> HookResult<()>
    where
        F: Fn(A, &dyn Fn(A) -> R) -> R + Send + Sync + 'static,
    {
        let mut exclusive = self.exclusive.lock();
        if let Some(existing) = exclusive.get(interceptor.symbol()) {
            tracing::warn!(
                target: "bridge::hook",
                "'{}' tried to hook '{}', already owned by '{}'",
                owner,
                interceptor.symbol(),
                existing
            );
            return Err(HookError::Conflict(interceptor.symbol().to_string()));
        }

        interceptor.bind(body)?;
        exclusive.insert(interceptor.symbol(), owner.to_string());
        tracing::info!(
            target: "bridge::hook",
            "'{}' hooked '{}'",
            owner,
            interceptor.symbol()
        );
        Ok(())
    }

    /// 独占入口点的绑定者
    pub fn exclusive_owner(&self, symbol: &str) -> Option<String> {
        self.exclusive.lock().get(symbol).cloned()
    }

    /// 所有已定义的命名钩子名称（排序）
    pub fn named_hooks(&self) -> Vec<String> {
        let mut names: Vec<String> = self.named.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new(&HookConfig::default())
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("named", &self.named_hooks())
            .field("exclusive", &*self.exclusive.lock())
            .finish()
    }
}

fn downcast<A, R>(name: &str, entry: &NamedEntry) -> HookResult<Arc<NamedHook<A, R>>>
where
    A: 'static,
    R: 'static,
{
    Arc::clone(&entry.hook)
        .downcast::<NamedHook<A, R>>()
        .map_err(|_| HookError::TypeMismatch {
            name: name.to_string(),
            existing: entry.signature,
        })
}
