//! 命令实例
//!
//! 每次宿主需要一个命令实例时，按重载的布局分配一块缓冲区，
//! 写入头部，再按声明顺序逐个构造参数槽。实例释放时按同样的声明顺序析构，
//! 然后归还缓冲区。
//!
//! `constructed` 记录已经构造完成的槽数量，所以构造中途失败或panic时，
//! Drop 只会析构已构造的那部分，不会碰未初始化的槽。

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;
use std::slice;
use std::sync::Arc;

use super::args::FromArgs;
use super::layout::{CommandHeader, RecordLayout, HEADER_SIZE, RECORD_ALIGN};
use super::{ParamValue, ParseError, RegisteredOverload};
use crate::core::{AllocError, AllocResult, ArgumentResult};
use crate::host::{CommandOrigin, CommandOutput};

/// 一个命令实例：头部 + 紧密排列的参数槽
pub struct CommandRecord {
    ptr: NonNull<u8>,
    alloc_layout: Layout,
    overload: Arc<RegisteredOverload>,
    constructed: usize,
}

impl CommandRecord {
    /// 分配并构造一个新实例
    pub(crate) fn create(overload: Arc<RegisteredOverload>) -> AllocResult<Self> {
        let total = overload.layout().total_size();
        let alloc_layout = Layout::from_size_align(total, RECORD_ALIGN).map_err(|_| {
            AllocError::LayoutOverflow {
                base: HEADER_SIZE,
                params: total.saturating_sub(HEADER_SIZE),
            }
        })?;

        // SAFETY: total >= HEADER_SIZE > 0
        let raw = unsafe { alloc_zeroed(alloc_layout) };
        let ptr = NonNull::new(raw).ok_or(AllocError::OutOfMemory { size: total })?;

        let mut record = Self {
            ptr,
            alloc_layout,
            overload,
            constructed: 0,
        };

        let header = CommandHeader::new(record.overload.id());
        record.bytes_mut()[..HEADER_SIZE].copy_from_slice(bytemuck::bytes_of(&header));

        let overload = Arc::clone(&record.overload);
        let slots = overload.params().iter().zip(overload.layout().slot_ranges());
        for (index, (descriptor, range)) in slots.enumerate() {
            #[cfg(test)]
            lifecycle::before_construct(index);
            descriptor.kind().construct(&mut record.bytes_mut()[range]);
            record.constructed += 1;
            tracing::trace!(
                target: "bridge::command",
                "Constructed parameter #{} '{}'",
                index,
                descriptor.name()
            );
            #[cfg(test)]
            lifecycle::record(lifecycle::Event::Construct(index));
        }

        tracing::trace!(
            target: "bridge::command",
            "Created record for '{}' (overload {}, {} bytes)",
            record.overload.command(),
            record.overload.id(),
            total
        );
        Ok(record)
    }

    pub fn header(&self) -> CommandHeader {
        bytemuck::pod_read_unaligned(&self.bytes()[..HEADER_SIZE])
    }

    pub fn overload(&self) -> &RegisteredOverload {
        &self.overload
    }

    pub fn layout(&self) -> &RecordLayout {
        self.overload.layout()
    }

    /// 缓冲区总大小
    pub fn size(&self) -> usize {
        self.alloc_layout.size()
    }

    pub fn param_count(&self) -> usize {
        self.overload.params().len()
    }

    fn bytes(&self) -> &[u8] {
        // SAFETY: ptr 指向 alloc_layout.size() 字节的已分配（且已清零）内存
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.alloc_layout.size()) }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: 同上，且 &mut self 保证独占
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.alloc_layout.size()) }
    }

    /// 宿主解析入口：从 `tokens` 开头解析第 `index` 个参数，返回消耗的词数
    ///
    /// `index` 超出参数个数时返回 [`ParseError::OutOfRange`]。
    pub fn parse_param(
        &mut self,
        index: usize,
        tokens: &[&str],
        origin: &dyn CommandOrigin,
    ) -> Result<usize, ParseError> {
        let overload = Arc::clone(&self.overload);
        let (Some(descriptor), Some(range)) = (
            overload.params().get(index),
            overload.layout().slot_range(index),
        ) else {
            return Err(ParseError::OutOfRange {
                index,
                command: overload.command().to_string(),
            });
        };
        descriptor.kind().parse(
            &mut self.bytes_mut()[range],
            descriptor.name(),
            tokens,
            origin,
        )
    }

    /// 取回第 `index` 个参数
    pub fn fetch_at(&self, index: usize, origin: &dyn CommandOrigin) -> Option<ParamValue> {
        let descriptor = self.overload.params().get(index)?;
        let range = self.overload.layout().slot_range(index)?;
        Some(descriptor.kind().fetch(
            &self.bytes()[range],
            origin,
            self.overload.expand_selectors(),
        ))
    }

    /// 按声明顺序取回全部参数
    pub fn fetch(&self, origin: &dyn CommandOrigin) -> Vec<ParamValue> {
        (0..self.param_count())
            .filter_map(|index| self.fetch_at(index, origin))
            .collect()
    }

    /// 取回全部参数并转换为元组
    pub fn fetch_as<T: FromArgs>(&self, origin: &dyn CommandOrigin) -> ArgumentResult<T> {
        T::from_args(self.fetch(origin))
    }

    /// 执行重载回调
    pub fn execute(&self, origin: &dyn CommandOrigin, output: &mut dyn CommandOutput) {
        let executor = Arc::clone(self.overload.executor());
        executor(self, origin, output);
    }
}

impl Drop for CommandRecord {
    fn drop(&mut self) {
        // 与构造相同的声明顺序析构
        let overload = Arc::clone(&self.overload);
        let slots = overload.params().iter().zip(overload.layout().slot_ranges());
        for (index, (descriptor, range)) in slots.take(self.constructed).enumerate() {
            descriptor.kind().destruct(&mut self.bytes_mut()[range]);
            tracing::trace!(
                target: "bridge::command",
                "Destructed parameter #{} '{}'",
                index,
                descriptor.name()
            );
            #[cfg(test)]
            lifecycle::record(lifecycle::Event::Destruct(index));
        }
        self.constructed = 0;

        // SAFETY: ptr 由 alloc_zeroed(alloc_layout) 分配
        unsafe { dealloc(self.ptr.as_ptr(), self.alloc_layout) };
    }
}

impl std::fmt::Debug for CommandRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRecord")
            .field("command", &self.overload.command())
            .field("overload", &self.overload.id())
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod lifecycle {
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum Event {
        Construct(usize),
        Destruct(usize),
    }

    thread_local! {
        static EVENTS: RefCell<Vec<Event>> = const { RefCell::new(Vec::new()) };
        static FAIL_AT: Cell<Option<usize>> = const { Cell::new(None) };
    }

    /// 让本线程下一次构造在第 `index` 个参数处panic
    pub(crate) fn fail_construct_at(index: usize) {
        FAIL_AT.with(|fail| fail.set(Some(index)));
    }

    pub(crate) fn before_construct(index: usize) {
        if FAIL_AT.with(|fail| fail.get()) == Some(index) {
            FAIL_AT.with(|fail| fail.set(None));
            panic!("construct failed at parameter {}", index);
        }
    }

    pub(crate) fn record(event: Event) {
        EVENTS.with(|events| events.borrow_mut().push(event));
    }

    pub(crate) fn take() -> Vec<Event> {
        EVENTS.with(|events| std::mem::take(&mut *events.borrow_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::lifecycle::{self, Event};
    use super::*;
    use crate::command::{compute_layout, Overload, ParameterDescriptor};
    use crate::host::local::{LocalOrigin, OutputBuffer};
    use crate::host::{BlockPos, Vec3};

    fn registered(params: Vec<ParameterDescriptor>) -> Arc<RegisteredOverload> {
        let layout = compute_layout(&params).unwrap();
        let overload = Overload::new(params, |record, origin, output| {
            let values = record.fetch(origin);
            output.add_message(&format!("{} values", values.len()));
            output.success();
        });
        Arc::new(RegisteredOverload::new(
            7,
            "mark".to_string(),
            overload,
            layout,
            true,
        ))
    }

    #[test]
    fn test_header_written() {
        let record = CommandRecord::create(registered(Vec::new())).unwrap();
        let header = record.header();
        assert_eq!(header.magic, CommandHeader::MAGIC);
        assert_eq!(header.overload_id, 7);
        assert_eq!(record.size(), HEADER_SIZE);
    }

    #[test]
    fn test_defaults_after_construct() {
        let origin = LocalOrigin::console();
        let record = CommandRecord::create(registered(vec![
            ParameterDescriptor::text("name"),
            ParameterDescriptor::int("count"),
            ParameterDescriptor::boolean("flag"),
            ParameterDescriptor::position("at"),
        ]))
        .unwrap();

        assert_eq!(
            record.fetch(&origin),
            vec![
                ParamValue::Text(String::new()),
                ParamValue::Int(0),
                ParamValue::Bool(false),
                ParamValue::Position(BlockPos::ORIGIN),
            ]
        );
    }

    #[test]
    fn test_parse_then_fetch_as() {
        let origin = LocalOrigin::console().at(Vec3::new(4.0, 5.0, 6.0));
        let mut record = CommandRecord::create(registered(vec![
            ParameterDescriptor::boolean("silent"),
            ParameterDescriptor::vec3("to"),
            ParameterDescriptor::message("note"),
        ]))
        .unwrap();

        let tokens = ["true", "~", "~1", "~", "see", "you"];
        let mut cursor = 0;
        for index in 0..record.param_count() {
            cursor += record
                .parse_param(index, &tokens[cursor..], &origin)
                .unwrap();
        }
        assert_eq!(cursor, tokens.len());

        let (silent, to, note) = record.fetch_as::<(bool, Vec3, String)>(&origin).unwrap();
        assert!(silent);
        assert_eq!(to, Vec3::new(4.0, 6.0, 6.0));
        assert_eq!(note, "see you");
    }

    #[test]
    fn test_construct_destruct_paired_in_order() {
        lifecycle::take();
        {
            let _record = CommandRecord::create(registered(vec![
                ParameterDescriptor::text("a"),
                ParameterDescriptor::int("b"),
                ParameterDescriptor::message("c"),
            ]))
            .unwrap();
        }
        assert_eq!(
            lifecycle::take(),
            vec![
                Event::Construct(0),
                Event::Construct(1),
                Event::Construct(2),
                Event::Destruct(0),
                Event::Destruct(1),
                Event::Destruct(2),
            ]
        );
    }

    #[test]
    fn test_execute_invokes_overload() {
        let origin = LocalOrigin::console();
        let mut output = OutputBuffer::default();
        let record =
            CommandRecord::create(registered(vec![ParameterDescriptor::int("n")])).unwrap();
        record.execute(&origin, &mut output);
        assert!(output.is_success());
        assert_eq!(output.messages(), &["1 values".to_string()]);
    }

    #[test]
    fn test_fetch_out_of_range() {
        let origin = LocalOrigin::console();
        let record = CommandRecord::create(registered(Vec::new())).unwrap();
        assert_eq!(record.fetch_at(0, &origin), None);
    }

    #[test]
    fn test_parse_out_of_range_is_an_error() {
        let origin = LocalOrigin::console();
        let mut record =
            CommandRecord::create(registered(vec![ParameterDescriptor::int("n")])).unwrap();

        assert_eq!(
            record.parse_param(3, &["1"], &origin),
            Err(ParseError::OutOfRange {
                index: 3,
                command: "mark".to_string(),
            })
        );
        assert_eq!(record.fetch_at(3, &origin), None);

        // 越界调用不影响已有参数
        assert_eq!(record.parse_param(0, &["1"], &origin), Ok(1));
        assert_eq!(record.fetch_at(0, &origin), Some(ParamValue::Int(1)));
    }

    #[test]
    fn test_construct_panic_rolls_back_built_slots() {
        let overload = registered(vec![
            ParameterDescriptor::text("a"),
            ParameterDescriptor::int("b"),
            ParameterDescriptor::message("c"),
            ParameterDescriptor::text("d"),
        ]);

        lifecycle::take();
        lifecycle::fail_construct_at(2);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            CommandRecord::create(Arc::clone(&overload))
        }));
        assert!(result.is_err());
        assert_eq!(
            lifecycle::take(),
            vec![
                Event::Construct(0),
                Event::Construct(1),
                Event::Destruct(0),
                Event::Destruct(1),
            ]
        );

        // 注入点只生效一次
        let record = CommandRecord::create(overload).unwrap();
        assert_eq!(record.param_count(), 4);
    }
}
