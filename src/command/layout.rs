//! 命令实例布局
//!
//! 命令实例 = 固定大小的宿主头部 + 按声明顺序紧密排列的参数区：
//!
//! ```text
//! ┌──────────────┬─────────┬─────────┬─────┬─────────┐
//! │ CommandHeader│ param 0 │ param 1 │ ... │ param n │
//! └──────────────┴─────────┴─────────┴─────┴─────────┘
//! 0          HEADER_SIZE  +s0       +s1          total
//! ```
//!
//! 参数 i 的偏移 = HEADER_SIZE + Σ(s0..s(i-1))，总大小 = HEADER_SIZE + Σs。
//! 布局对每个重载只计算一次。

use bytemuck::{Pod, Zeroable};
use std::mem::{align_of, size_of};

use super::ParameterDescriptor;
use crate::core::{AllocError, AllocResult};

/// 宿主要求的命令实例头部
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct CommandHeader {
    /// 固定标记，用来识别桥接层创建的实例
    pub magic: u32,
    /// 所属重载的编号
    pub overload_id: u32,
    pub version_min: i32,
    pub version_max: i32,
}

impl CommandHeader {
    pub const MAGIC: u32 = 0x4742_5243;

    pub fn new(overload_id: u32) -> Self {
        Self {
            magic: Self::MAGIC,
            overload_id,
            version_min: 0,
            version_max: i32::MAX,
        }
    }
}

/// 头部大小（参数区的起点）
pub const HEADER_SIZE: usize = size_of::<CommandHeader>();

/// 实例缓冲区的对齐
pub const RECORD_ALIGN: usize = if align_of::<CommandHeader>() > 8 {
    align_of::<CommandHeader>()
} else {
    8
};

/// 计算出的实例布局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    base_size: usize,
    total_size: usize,
    offsets: Vec<usize>,
}

impl RecordLayout {
    /// 按给定基础大小和参数大小计算布局
    ///
    /// 纯函数：相同输入总是得到相同布局。只有总大小溢出时失败。
    pub fn from_sizes(base_size: usize, sizes: &[usize]) -> AllocResult<Self> {
        let mut offsets = Vec::with_capacity(sizes.len());
        let mut cursor = base_size;
        for &size in sizes {
            offsets.push(cursor);
            cursor = cursor
                .checked_add(size)
                .ok_or_else(|| AllocError::LayoutOverflow {
                    base: base_size,
                    params: sizes.iter().fold(0usize, |acc, s| acc.saturating_add(*s)),
                })?;
        }

        Ok(Self {
            base_size,
            total_size: cursor,
            offsets,
        })
    }

    pub fn base_size(&self) -> usize {
        self.base_size
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied()
    }

    pub fn param_count(&self) -> usize {
        self.offsets.len()
    }

    /// 参数 `index` 占据的字节范围
    pub fn slot_range(&self, index: usize) -> Option<std::ops::Range<usize>> {
        let start = *self.offsets.get(index)?;
        let end = self
            .offsets
            .get(index + 1)
            .copied()
            .unwrap_or(self.total_size);
        Some(start..end)
    }

    /// 按声明顺序遍历所有参数槽的字节范围
    pub fn slot_ranges(&self) -> impl Iterator<Item = std::ops::Range<usize>> + '_ {
        let ends = self
            .offsets
            .iter()
            .skip(1)
            .copied()
            .chain(std::iter::once(self.total_size));
        self.offsets.iter().copied().zip(ends).map(|(start, end)| start..end)
    }
}

/// 计算参数描述符列表的布局
pub fn compute_layout(descriptors: &[ParameterDescriptor]) -> AllocResult<RecordLayout> {
    let sizes: Vec<usize> = descriptors.iter().map(ParameterDescriptor::size).collect();
    RecordLayout::from_sizes(HEADER_SIZE, &sizes)
}
