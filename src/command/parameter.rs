//! 命令参数描述符
//!
//! 每种参数类型实现同一组能力：大小、构造、析构、解析、取值。
//! 参数类型是一个封闭集合，在注册时选定，分发开销只有一次 `match`。
//!
//! 参数槽是命令实例缓冲区中的一段字节，按声明顺序紧密排列，不保证对齐，
//! 所以所有读写都走非对齐路径：纯数据类型用 `bytemuck`，
//! 持有堆内存的 `String` 用 `read_unaligned`/`write_unaligned`。

use bytemuck::Pod;
use glam::Vec3;
use std::mem::{size_of, ManuallyDrop};
use thiserror::Error;

use crate::host::{BlockPos, CommandOrigin};

/// 参数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// 消息，吞掉剩余整行，取值时按来源展开 `@s`
    Message,
    /// 单个词
    Text,
    Int,
    Float,
    Bool,
    /// 方块坐标，支持 `~` 相对来源方块坐标
    Position,
    /// 世界坐标，支持 `~` 相对来源世界坐标
    Vec3,
}

/// 解析失败（宿主的不匹配路径）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing value for '{0}'")]
    Missing(String),

    #[error("Invalid value '{token}' for '{parameter}' ({expected})")]
    Invalid {
        parameter: String,
        token: String,
        expected: &'static str,
    },

    #[error("Unexpected '{0}' after the last parameter")]
    Trailing(String),

    #[error("Command '{command}' has no parameter #{index}")]
    OutOfRange { index: usize, command: String },
}

/// 从命令实例取回的参数值
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i32),
    Float(f32),
    Bool(bool),
    Position(BlockPos),
    Vec3(Vec3),
}

impl ParamValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Text(_) => "text",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Bool(_) => "bool",
            ParamValue::Position(_) => "position",
            ParamValue::Vec3(_) => "vec3",
        }
    }
}

impl ParameterKind {
    /// 参数槽字节数（恒大于0）
    pub const fn size(self) -> usize {
        match self {
            ParameterKind::Message | ParameterKind::Text => size_of::<String>(),
            ParameterKind::Int => size_of::<i32>(),
            ParameterKind::Float => size_of::<f32>(),
            ParameterKind::Bool => size_of::<u8>(),
            ParameterKind::Position => size_of::<BlockPos>(),
            ParameterKind::Vec3 => size_of::<Vec3>(),
        }
    }

    /// 宿主侧的类型标签
    pub const fn type_tag(self) -> &'static str {
        match self {
            ParameterKind::Message => "message",
            ParameterKind::Text => "text",
            ParameterKind::Int => "int",
            ParameterKind::Float => "float",
            ParameterKind::Bool => "bool",
            ParameterKind::Position => "position",
            ParameterKind::Vec3 => "vec3",
        }
    }

    /// 是否吞掉剩余所有词
    pub const fn is_greedy(self) -> bool {
        matches!(self, ParameterKind::Message)
    }

    const fn owns_heap(self) -> bool {
        matches!(self, ParameterKind::Message | ParameterKind::Text)
    }

    /// 在槽中构造默认值
    pub(crate) fn construct(self, slot: &mut [u8]) {
        debug_assert_eq!(slot.len(), self.size());
        if self.owns_heap() {
            // SAFETY: 槽的长度正好是 size_of::<String>()，写入不要求对齐
            unsafe { slot.as_mut_ptr().cast::<String>().write_unaligned(String::new()) };
        } else {
            slot.fill(0);
        }
    }

    /// 析构槽中的值
    ///
    /// 调用后槽内容视为未构造，必须重新 `construct` 才能再次使用。
    pub(crate) fn destruct(self, slot: &mut [u8]) {
        debug_assert_eq!(slot.len(), self.size());
        if self.owns_heap() {
            // SAFETY: 槽已由 construct 写入一个 String，这里把它移出并丢弃
            drop(unsafe { slot.as_ptr().cast::<String>().read_unaligned() });
        }
    }

    /// 把从 `tokens` 开头解析出的值写入槽，返回消耗的词数
    pub(crate) fn parse(
        self,
        slot: &mut [u8],
        name: &str,
        tokens: &[&str],
        origin: &dyn CommandOrigin,
    ) -> Result<usize, ParseError> {
        let first = *tokens
            .first()
            .ok_or_else(|| ParseError::Missing(name.to_string()))?;
        let invalid = |token: &str, expected: &'static str| ParseError::Invalid {
            parameter: name.to_string(),
            token: token.to_string(),
            expected,
        };

        match self {
            ParameterKind::Message => {
                replace_string(slot, tokens.join(" "));
                Ok(tokens.len())
            }
            ParameterKind::Text => {
                replace_string(slot, first.to_string());
                Ok(1)
            }
            ParameterKind::Int => {
                let value: i32 = first.parse().map_err(|_| invalid(first, "integer"))?;
                write_pod(slot, value);
                Ok(1)
            }
            ParameterKind::Float => {
                let value: f32 = first.parse().map_err(|_| invalid(first, "number"))?;
                write_pod(slot, value);
                Ok(1)
            }
            ParameterKind::Bool => {
                let value = match first {
                    "true" => 1u8,
                    "false" => 0u8,
                    other => return Err(invalid(other, "true or false")),
                };
                write_pod(slot, value);
                Ok(1)
            }
            ParameterKind::Position => {
                let coords = coordinate_tokens(tokens, name)?;
                let base = origin.block_position();
                let mut out = [0i32; 3];
                for (i, token) in coords.iter().enumerate() {
                    let relative_to = [base.x, base.y, base.z][i];
                    out[i] = parse_block_coord(token, relative_to)
                        .ok_or_else(|| invalid(token, "block coordinate"))?;
                }
                write_pod(slot, BlockPos::new(out[0], out[1], out[2]));
                Ok(3)
            }
            ParameterKind::Vec3 => {
                let coords = coordinate_tokens(tokens, name)?;
                let base = origin.world_position().to_array();
                let mut out = [0f32; 3];
                for (i, token) in coords.iter().enumerate() {
                    out[i] = parse_world_coord(token, base[i])
                        .ok_or_else(|| invalid(token, "coordinate"))?;
                }
                write_pod(slot, Vec3::from_array(out));
                Ok(3)
            }
        }
    }

    /// 读取槽中的值
    pub(crate) fn fetch(
        self,
        slot: &[u8],
        origin: &dyn CommandOrigin,
        expand_selectors: bool,
    ) -> ParamValue {
        match self {
            ParameterKind::Message => {
                let text = read_string(slot);
                if expand_selectors && text.contains("@s") {
                    ParamValue::Text(text.replace("@s", &origin.name()))
                } else {
                    ParamValue::Text(text)
                }
            }
            ParameterKind::Text => ParamValue::Text(read_string(slot)),
            ParameterKind::Int => ParamValue::Int(read_pod(slot)),
            ParameterKind::Float => ParamValue::Float(read_pod(slot)),
            ParameterKind::Bool => ParamValue::Bool(read_pod::<u8>(slot) != 0),
            ParameterKind::Position => ParamValue::Position(read_pod(slot)),
            ParameterKind::Vec3 => ParamValue::Vec3(read_pod(slot)),
        }
    }
}

fn write_pod<T: Pod>(slot: &mut [u8], value: T) {
    slot.copy_from_slice(bytemuck::bytes_of(&value));
}

fn read_pod<T: Pod>(slot: &[u8]) -> T {
    bytemuck::pod_read_unaligned(slot)
}

fn read_string(slot: &[u8]) -> String {
    debug_assert_eq!(slot.len(), size_of::<String>());
    // SAFETY: 槽里是已构造的 String；ManuallyDrop 防止读出的副本释放缓冲区
    let view = ManuallyDrop::new(unsafe { slot.as_ptr().cast::<String>().read_unaligned() });
    String::clone(&view)
}

fn replace_string(slot: &mut [u8], value: String) {
    debug_assert_eq!(slot.len(), size_of::<String>());
    let ptr = slot.as_mut_ptr().cast::<String>();
    // SAFETY: 槽里是已构造的 String；先移出旧值再写入新值
    unsafe {
        drop(ptr.read_unaligned());
        ptr.write_unaligned(value);
    }
}

fn coordinate_tokens<'a>(tokens: &[&'a str], name: &str) -> Result<[&'a str; 3], ParseError> {
    match tokens {
        [x, y, z, ..] => Ok([*x, *y, *z]),
        _ => Err(ParseError::Missing(name.to_string())),
    }
}

fn parse_block_coord(token: &str, relative_to: i32) -> Option<i32> {
    match token.strip_prefix('~') {
        Some("") => Some(relative_to),
        Some(offset) => block_offset(offset).and_then(|o| relative_to.checked_add(o)),
        None => block_offset(token),
    }
}

/// 整数直接使用，小数向下取整到所在方块；非有限值和超出 i32 的值无效
fn block_offset(text: &str) -> Option<i32> {
    if let Ok(value) = text.parse::<i32>() {
        return Some(value);
    }
    let value = finite_f32(text)?.floor();
    if value < i32::MIN as f32 || value >= i32::MAX as f32 {
        return None;
    }
    Some(value as i32)
}

fn parse_world_coord(token: &str, relative_to: f32) -> Option<f32> {
    match token.strip_prefix('~') {
        Some("") => Some(relative_to),
        Some(offset) => finite_f32(offset).map(|o| relative_to + o),
        None => finite_f32(token),
    }
}

fn finite_f32(text: &str) -> Option<f32> {
    text.parse::<f32>().ok().filter(|value| value.is_finite())
}

/// 参数描述符：名称加类型，创建后不可变，可以被多个重载共享
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterDescriptor {
    name: String,
    kind: ParameterKind,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn message(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Message)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Text)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Bool)
    }

    pub fn position(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Position)
    }

    pub fn vec3(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Vec3)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn size(&self) -> usize {
        self.kind.size()
    }

    pub fn type_tag(&self) -> &'static str {
        self.kind.type_tag()
    }
}
