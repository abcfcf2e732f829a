//! 按类型取回命令参数
//!
//! 宿主用通用方式解析完参数后，扩展代码通过 `fetch_as::<(String, i32)>()`
//! 这样的调用拿回强类型的值。

use glam::Vec3;

use super::ParamValue;
use crate::core::{ArgumentError, ArgumentResult};
use crate::host::BlockPos;

/// 单个参数值到Rust类型的转换
pub trait FromParam: Sized {
    const EXPECTED: &'static str;

    fn from_param(value: ParamValue) -> Result<Self, ParamValue>;
}

macro_rules! impl_from_param {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromParam for $ty {
            const EXPECTED: &'static str = $name;

            fn from_param(value: ParamValue) -> Result<Self, ParamValue> {
                match value {
                    ParamValue::$variant(v) => Ok(v),
                    other => Err(other),
                }
            }
        }
    };
}

impl_from_param!(String, Text, "text");
impl_from_param!(i32, Int, "int");
impl_from_param!(f32, Float, "float");
impl_from_param!(bool, Bool, "bool");
impl_from_param!(BlockPos, Position, "position");
impl_from_param!(Vec3, Vec3, "vec3");

impl FromParam for ParamValue {
    const EXPECTED: &'static str = "any";

    fn from_param(value: ParamValue) -> Result<Self, ParamValue> {
        Ok(value)
    }
}

/// 整个参数列表到元组的转换
pub trait FromArgs: Sized {
    fn from_args(values: Vec<ParamValue>) -> ArgumentResult<Self>;
}

fn convert<T: FromParam>(index: usize, value: ParamValue) -> ArgumentResult<T> {
    T::from_param(value).map_err(|found| ArgumentError::Type {
        index,
        expected: T::EXPECTED,
        found: found.type_name(),
    })
}

macro_rules! impl_from_args {
    ($count:expr; $($name:ident),*) => {
        impl<$($name: FromParam),*> FromArgs for ($($name,)*) {
            #[allow(unused_variables, unused_mut, non_snake_case)]
            fn from_args(values: Vec<ParamValue>) -> ArgumentResult<Self> {
                if values.len() != $count {
                    return Err(ArgumentError::Arity {
                        expected: $count,
                        actual: values.len(),
                    });
                }
                let mut iter = values.into_iter().enumerate();
                $(
                    let $name = match iter.next() {
                        Some((index, value)) => convert::<$name>(index, value)?,
                        None => unreachable!("arity checked above"),
                    };
                )*
                Ok(($($name,)*))
            }
        }
    };
}

impl_from_args!(0;);
impl_from_args!(1; A);
impl_from_args!(2; A, B);
impl_from_args!(3; A, B, C);
impl_from_args!(4; A, B, C, D);
impl_from_args!(5; A, B, C, D, E);
