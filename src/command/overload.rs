//! 命令重载
//!
//! 一个重载 = 有序参数描述符列表 + 一个执行回调，注册后不可变。

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::{CommandRecord, ParameterDescriptor, RecordLayout};
use crate::core::{SchemaError, SchemaResult};
use crate::host::{CommandOrigin, CommandOutput};

/// 执行回调：(命令实例, 来源, 输出)
pub type Executor =
    Arc<dyn Fn(&CommandRecord, &dyn CommandOrigin, &mut dyn CommandOutput) + Send + Sync>;

/// 扩展代码提交的重载
#[derive(Clone)]
pub struct Overload {
    params: Vec<ParameterDescriptor>,
    executor: Executor,
}

impl Overload {
    pub fn new<F>(params: Vec<ParameterDescriptor>, executor: F) -> Self
    where
        F: Fn(&CommandRecord, &dyn CommandOrigin, &mut dyn CommandOutput) + Send + Sync + 'static,
    {
        Self {
            params,
            executor: Arc::new(executor),
        }
    }

    /// 无参数重载
    pub fn simple<F>(executor: F) -> Self
    where
        F: Fn(&CommandRecord, &dyn CommandOrigin, &mut dyn CommandOutput) + Send + Sync + 'static,
    {
        Self::new(Vec::new(), executor)
    }

    pub fn params(&self) -> &[ParameterDescriptor] {
        &self.params
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// 参数签名，例如 `home <target: message>`
    pub fn signature(&self, command: &str) -> String {
        let mut out = command.to_string();
        for param in &self.params {
            out.push_str(&format!(" <{}: {}>", param.name(), param.type_tag()));
        }
        out
    }

    pub(crate) fn validate(&self, max_parameters: usize) -> SchemaResult<()> {
        if self.params.len() > max_parameters {
            return Err(SchemaError::TooManyParameters {
                count: self.params.len(),
                limit: max_parameters,
            });
        }

        let mut seen = HashSet::new();
        let last = self.params.len().saturating_sub(1);
        for (index, param) in self.params.iter().enumerate() {
            if param.name().trim().is_empty() {
                return Err(SchemaError::EmptyParameterName(index));
            }
            if param.size() == 0 {
                return Err(SchemaError::ZeroSizedParameter(param.name().to_string()));
            }
            if !seen.insert(param.name()) {
                return Err(SchemaError::DuplicateParameter(param.name().to_string()));
            }
            if param.kind().is_greedy() && index != last {
                return Err(SchemaError::GreedyNotLast(param.name().to_string()));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overload")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// 已注册的重载：布局只在这里计算一次
#[derive(Debug)]
pub struct RegisteredOverload {
    id: u32,
    command: String,
    overload: Overload,
    layout: RecordLayout,
    expand_selectors: bool,
}

impl RegisteredOverload {
    pub(crate) fn new(
        id: u32,
        command: String,
        overload: Overload,
        layout: RecordLayout,
        expand_selectors: bool,
    ) -> Self {
        Self {
            id,
            command,
            overload,
            layout,
            expand_selectors,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn params(&self) -> &[ParameterDescriptor] {
        self.overload.params()
    }

    pub fn executor(&self) -> &Executor {
        self.overload.executor()
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    pub fn expand_selectors(&self) -> bool {
        self.expand_selectors
    }

    pub fn signature(&self) -> String {
        self.overload.signature(&self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> impl Fn(&CommandRecord, &dyn CommandOrigin, &mut dyn CommandOutput) + Send + Sync
    {
        |_, _, _| {}
    }

    #[test]
    fn test_valid_overload() {
        let overload = Overload::new(
            vec![
                ParameterDescriptor::position("at"),
                ParameterDescriptor::message("note"),
            ],
            noop(),
        );
        assert!(overload.validate(8).is_ok());
        assert_eq!(
            overload.signature("mark"),
            "mark <at: position> <note: message>"
        );
    }

    #[test]
    fn test_greedy_must_be_last() {
        let overload = Overload::new(
            vec![
                ParameterDescriptor::message("note"),
                ParameterDescriptor::int("count"),
            ],
            noop(),
        );
        assert_eq!(
            overload.validate(8),
            Err(SchemaError::GreedyNotLast("note".to_string()))
        );
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let dup = Overload::new(
            vec![ParameterDescriptor::int("n"), ParameterDescriptor::float("n")],
            noop(),
        );
        assert_eq!(
            dup.validate(8),
            Err(SchemaError::DuplicateParameter("n".to_string()))
        );

        let empty = Overload::new(vec![ParameterDescriptor::int(" ")], noop());
        assert_eq!(empty.validate(8), Err(SchemaError::EmptyParameterName(0)));
    }

    #[test]
    fn test_parameter_limit() {
        let params = (0..5)
            .map(|i| ParameterDescriptor::int(format!("p{}", i)))
            .collect();
        let overload = Overload::new(params, noop());
        assert_eq!(
            overload.validate(4),
            Err(SchemaError::TooManyParameters { count: 5, limit: 4 })
        );
    }
}
