//! 核心宏定义
//!
//! 提供统一的宏来减少配置和注册表类型的样板代码

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use game_bridge::impl_default;
///
/// struct HookSettings {
///     trace_dispatch: bool,
///     symbol_prefix: String,
/// }
///
/// impl_default!(HookSettings {
///     trace_dispatch: false,
///     symbol_prefix: String::new(),
/// });
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

/// 同时实现Default和new()的宏
///
/// 注册表一类的类型通常只需要空集合作为初始状态。
#[macro_export]
macro_rules! impl_default_and_new {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }

        impl $struct_name {
            pub fn new() -> Self {
                Self::default()
            }
        }
    };
}

/// 为宿主对象类型声明外部句柄标签
///
/// ```rust
/// use game_bridge::foreign_type;
///
/// struct Scoreboard;
/// foreign_type!(Scoreboard, "scoreboard");
/// assert_eq!(<Scoreboard as game_bridge::foreign::ForeignType>::TAG, "scoreboard");
/// ```
#[macro_export]
macro_rules! foreign_type {
    ($ty:ty, $tag:expr) => {
        impl $crate::foreign::ForeignType for $ty {
            const TAG: &'static str = $tag;
        }
    };
}

#[cfg(test)]
mod tests {

    struct TestTable {
        entries: Vec<u32>,
        label: String,
    }

    impl_default_and_new!(TestTable {
        entries: Vec::new(),
        label: String::from("commands"),
    });

    #[test]
    fn test_impl_default_and_new() {
        let t1 = TestTable::default();
        let t2 = TestTable::new();

        assert!(t1.entries.is_empty());
        assert_eq!(t1.label, "commands");
        assert!(t2.entries.is_empty());
        assert_eq!(t2.label, "commands");
    }
}
