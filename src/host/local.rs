//! 进程内宿主
//!
//! 一个最小但完整的宿主实现：命令表（分词、按顺序匹配重载、权限检查）、
//! 登录入口点、加入/离开通知、服务器线程队列。演示程序和测试用它代替真实的游戏进程。

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use super::{
    Actor, BlockPos, CommandHost, CommandOrigin, CommandOutput, DimensionId, GameMode,
    HostEntryPoints, ItemActor, ItemInstance, Level, LifecycleEvents, LoginRequest, NetworkStats, OriginType,
    PermissionLevel, Player, ServerThreadQueue, Vec3,
};
use crate::command::{CommandRecord, OverloadBinding, ParseError};
use crate::foreign::PlayerHandle;
use crate::hook::Interceptor;

/// 建筑高度范围，超出范围的重生点会被拒绝
const WORLD_HEIGHT: std::ops::Range<i32> = -64..320;

/// 进程内玩家
#[derive(Debug)]
pub struct LocalPlayer {
    name: String,
    uuid: uuid::Uuid,
    xuid: String,
    position: Cell<Vec3>,
    dimension: Cell<DimensionId>,
    permission: Cell<PermissionLevel>,
    spawn: Cell<BlockPos>,
    game_mode: Cell<GameMode>,
    world_builder: Cell<bool>,
    stats: Cell<NetworkStats>,
    suspended: Cell<bool>,
    inventory_opened: Cell<u32>,
    messages: RefCell<Vec<String>>,
    kicked: RefCell<Option<String>>,
}

impl LocalPlayer {
    pub fn new(name: impl Into<String>, uuid: uuid::Uuid, spawn: BlockPos) -> Self {
        Self {
            name: name.into(),
            uuid,
            xuid: format!("{}", uuid.as_u128() & 0xFFFF_FFFF_FFFF),
            position: Cell::new(spawn.center()),
            dimension: Cell::new(DimensionId::OVERWORLD),
            permission: Cell::new(PermissionLevel::Any),
            spawn: Cell::new(spawn),
            game_mode: Cell::new(GameMode::Survival),
            world_builder: Cell::new(false),
            stats: Cell::new(NetworkStats::default()),
            suspended: Cell::new(false),
            inventory_opened: Cell::new(0),
            messages: RefCell::new(Vec::new()),
            kicked: RefCell::new(None),
        }
    }

    pub fn set_permission(&self, level: PermissionLevel) {
        self.permission.set(level);
    }

    pub fn set_game_mode(&self, mode: GameMode) {
        self.game_mode.set(mode);
    }

    pub fn set_world_builder(&self, value: bool) {
        self.world_builder.set(value);
    }

    pub fn set_network_stats(&self, stats: NetworkStats) {
        self.stats.set(stats);
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn kick_reason(&self) -> Option<String> {
        self.kicked.borrow().clone()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.get()
    }

    pub fn inventory_opened(&self) -> u32 {
        self.inventory_opened.get()
    }
}

impl Actor for LocalPlayer {
    fn name_tag(&self) -> String {
        self.name.clone()
    }

    fn position(&self) -> Vec3 {
        self.position.get()
    }

    fn dimension(&self) -> DimensionId {
        self.dimension.get()
    }

    fn change_dimension(&self, dimension: DimensionId, _show_credits: bool) {
        self.dimension.set(dimension);
    }

    fn teleport(&self, target: Vec3, dimension: DimensionId) {
        self.dimension.set(dimension);
        self.position.set(target);
    }

    fn debug_text(&self) -> Vec<String> {
        let pos = self.position.get();
        vec![
            format!("name: {}", self.name),
            format!("pos: {:.2} {:.2} {:.2}", pos.x, pos.y, pos.z),
            format!("dim: {}", self.dimension.get().0),
        ]
    }
}

impl Player for LocalPlayer {
    fn as_actor(&self) -> &(dyn Actor + 'static) {
        self
    }

    fn uuid(&self) -> uuid::Uuid {
        self.uuid
    }

    fn xuid(&self) -> String {
        self.xuid.clone()
    }

    fn permission_level(&self) -> PermissionLevel {
        self.permission.get()
    }

    fn spawn_position(&self) -> BlockPos {
        self.spawn.get()
    }

    fn set_bed_respawn_position(&self, pos: BlockPos) -> bool {
        if !WORLD_HEIGHT.contains(&pos.y) {
            return false;
        }
        self.spawn.set(pos);
        true
    }

    fn game_mode(&self) -> GameMode {
        self.game_mode.get()
    }

    fn is_world_builder(&self) -> bool {
        self.world_builder.get()
    }

    fn network_stats(&self) -> NetworkStats {
        self.stats.get()
    }

    fn open_inventory(&self) {
        self.inventory_opened.set(self.inventory_opened.get() + 1);
    }

    fn send_message(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn disconnect(&self, reason: &str) {
        *self.kicked.borrow_mut() = Some(reason.to_string());
    }
}

/// 进程内物品实例
#[derive(Debug, Clone, Default)]
pub struct LocalItem {
    id: i16,
    name: String,
    custom_name: Option<String>,
}

impl LocalItem {
    pub fn new(id: i16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            custom_name: None,
        }
    }

    /// 空物品（空气）
    pub fn null() -> Self {
        Self::default()
    }

    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }
}

impl ItemInstance for LocalItem {
    fn is_null(&self) -> bool {
        self.id == 0
    }

    fn id(&self) -> i16 {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn custom_name(&self) -> Option<String> {
        self.custom_name.clone()
    }

    fn debug_string(&self) -> String {
        match &self.custom_name {
            Some(custom) => format!("{}({}) \"{}\"", self.name, self.id, custom),
            None => format!("{}({})", self.name, self.id),
        }
    }
}

/// 进程内掉落物实体
#[derive(Debug, Clone)]
pub struct LocalItemActor {
    item: LocalItem,
    position: Vec3,
}

impl LocalItemActor {
    pub fn new(item: LocalItem, position: Vec3) -> Self {
        Self { item, position }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

impl ItemActor for LocalItemActor {
    /// 实体名：有自定义名称时用自定义名称，否则是物品名
    fn name(&self) -> String {
        self.item.custom_name.clone().unwrap_or_else(|| self.item.name.clone())
    }

    fn item_instance(&self) -> &(dyn ItemInstance + 'static) {
        &self.item
    }
}

/// 进程内命令来源
#[derive(Debug, Clone)]
pub struct LocalOrigin {
    origin_type: OriginType,
    name: String,
    block: BlockPos,
    world: Vec3,
    permission: PermissionLevel,
    player: Option<PlayerHandle>,
}

impl LocalOrigin {
    /// 服务器控制台
    pub fn console() -> Self {
        Self {
            origin_type: OriginType::DedicatedServer,
            name: "Server".to_string(),
            block: BlockPos::ORIGIN,
            world: Vec3::ZERO,
            permission: PermissionLevel::Owner,
            player: None,
        }
    }

    /// 以玩家身份执行
    pub fn for_player(player: &(dyn Player + 'static)) -> Self {
        let world = player.position();
        Self {
            origin_type: OriginType::Player,
            name: player.name_tag(),
            block: BlockPos::from_vec3(world),
            world,
            permission: player.permission_level(),
            player: Some(PlayerHandle::from_ref(player)),
        }
    }

    /// 移动到指定世界坐标
    pub fn at(mut self, world: Vec3) -> Self {
        self.world = world;
        self.block = BlockPos::from_vec3(world);
        self
    }

    pub fn with_permission(mut self, permission: PermissionLevel) -> Self {
        self.permission = permission;
        self
    }
}

impl CommandOrigin for LocalOrigin {
    fn origin_type(&self) -> OriginType {
        self.origin_type
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn block_position(&self) -> BlockPos {
        self.block
    }

    fn world_position(&self) -> Vec3 {
        self.world
    }

    fn permission_level(&self) -> PermissionLevel {
        self.permission
    }

    fn player(&self) -> Option<PlayerHandle> {
        match self.origin_type {
            OriginType::Player => self.player,
            _ => None,
        }
    }
}

/// 收集命令输出
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    messages: Vec<String>,
    errors: Vec<String>,
    success: bool,
}

impl OutputBuffer {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_success(&self) -> bool {
        self.success && self.errors.is_empty()
    }
}

impl CommandOutput for OutputBuffer {
    fn add_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn success(&mut self) {
        self.success = true;
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

type Job = Box<dyn FnOnce() + Send>;

/// 服务器线程队列（FIFO）
#[derive(Debug)]
pub struct LocalQueue {
    sender: Sender<Job>,
    receiver: Receiver<Job>,
}

impl LocalQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// 在当前（服务器）线程上执行所有排队的任务，返回执行数量
    pub fn drain(&self) -> usize {
        let mut count = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            count += 1;
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for LocalQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerThreadQueue for LocalQueue {
    fn queue_for_server_thread(&self, job: Box<dyn FnOnce() + Send>) {
        // 接收端与发送端同属一个队列，发送不会失败
        let _ = self.sender.send(job);
    }
}

struct HostCommand {
    description: String,
    permission: PermissionLevel,
    overloads: Vec<OverloadBinding>,
}

/// 进程内宿主引擎
pub struct LocalHost {
    commands: BTreeMap<String, HostCommand>,
    players: Vec<Box<LocalPlayer>>,
    joined: Vec<Box<dyn Fn(PlayerHandle)>>,
    left: Vec<Box<dyn Fn(PlayerHandle)>>,
    login: Interceptor<LoginRequest, bool>,
    whitelist: BTreeSet<String>,
    whitelist_checks: Cell<u32>,
    items: BTreeMap<String, i16>,
    default_spawn: BlockPos,
    queue: LocalQueue,
}

impl LocalHost {
    pub const LOGIN_SYMBOL: &'static str = "Whitelist::isAllowed";

    pub fn new() -> Self {
        let items = [("air", 0), ("stone", 1), ("dirt", 3), ("diamond", 264), ("bread", 297)]
            .into_iter()
            .map(|(name, id)| (name.to_string(), id))
            .collect();

        Self {
            commands: BTreeMap::new(),
            players: Vec::new(),
            joined: Vec::new(),
            left: Vec::new(),
            login: Interceptor::new(Self::LOGIN_SYMBOL),
            whitelist: BTreeSet::new(),
            whitelist_checks: Cell::new(0),
            items,
            default_spawn: BlockPos::new(0, 64, 0),
            queue: LocalQueue::new(),
        }
    }

    /// 加入白名单；白名单为空时所有人都允许登录
    pub fn allow(&mut self, name: impl Into<String>) {
        self.whitelist.insert(name.into());
    }

    /// 原始白名单检查被调用的次数
    pub fn whitelist_checks(&self) -> u32 {
        self.whitelist_checks.get()
    }

    fn whitelist_allows(&self, request: &LoginRequest) -> bool {
        self.whitelist_checks.set(self.whitelist_checks.get() + 1);
        self.whitelist.is_empty() || self.whitelist.contains(&request.name)
    }

    /// 登录检查（经过可拦截的入口点）
    pub fn login(&self, uuid: uuid::Uuid, name: &str) -> bool {
        let request = LoginRequest {
            uuid,
            name: name.to_string(),
        };
        let allowed = self
            .login
            .invoke(request, &|request: LoginRequest| self.whitelist_allows(&request));
        tracing::debug!(target: "bridge::host", "Login '{}': {}", name, allowed);
        allowed
    }

    /// 登录成功后加入
    pub fn connect(&mut self, name: &str) -> Option<PlayerHandle> {
        let uuid = uuid::Uuid::new_v4();
        if !self.login(uuid, name) {
            return None;
        }
        Some(self.join(name, uuid))
    }

    /// 玩家加入（不经过登录检查）
    pub fn join(&mut self, name: &str, uuid: uuid::Uuid) -> PlayerHandle {
        self.players
            .push(Box::new(LocalPlayer::new(name, uuid, self.default_spawn)));
        let handle = match self.players.last() {
            Some(player) => PlayerHandle::from_ref(&**player),
            None => unreachable!("player was just pushed"),
        };

        tracing::info!(target: "bridge::host", "{} joined", name);
        for callback in &self.joined {
            callback(handle);
        }
        handle
    }

    /// 玩家离开：先通知，再销毁玩家对象
    pub fn leave(&mut self, player: PlayerHandle) -> bool {
        let Some(index) = self.position_of(player) else {
            return false;
        };

        for callback in &self.left {
            callback(player);
        }
        let removed = self.players.remove(index);
        tracing::info!(target: "bridge::host", "{} left", removed.name);
        true
    }

    /// 按名称查找在线玩家
    pub fn player(&self, name: &str) -> Option<&LocalPlayer> {
        self.players
            .iter()
            .find(|player| player.name == name)
            .map(|player| &**player)
    }

    pub fn players(&self) -> impl Iterator<Item = &LocalPlayer> {
        self.players.iter().map(|player| &**player)
    }

    fn position_of(&self, handle: PlayerHandle) -> Option<usize> {
        self.players
            .iter()
            .position(|player| PlayerHandle::from_ref(&**player) == handle)
    }

    fn local_player(&self, handle: PlayerHandle) -> Option<&LocalPlayer> {
        self.position_of(handle).map(|index| &*self.players[index])
    }

    pub fn queue(&self) -> &LocalQueue {
        &self.queue
    }

    /// 一个服务器刻：执行排队任务
    pub fn tick(&self) -> usize {
        self.queue.drain()
    }

    pub fn overload_count(&self, name: &str) -> usize {
        self.commands
            .get(name)
            .map(|command| command.overloads.len())
            .unwrap_or(0)
    }

    pub fn bindings(&self, name: &str) -> &[OverloadBinding] {
        self.commands
            .get(name)
            .map(|command| command.overloads.as_slice())
            .unwrap_or(&[])
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.commands
            .get(name)
            .map(|command| command.description.as_str())
    }

    /// 执行一行命令
    pub fn execute(&self, line: &str, origin: &dyn CommandOrigin) -> OutputBuffer {
        let mut output = OutputBuffer::default();
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let Some((name, args)) = tokens.split_first() else {
            output.error("Empty command");
            return output;
        };
        let Some(command) = self.commands.get(*name) else {
            output.error(&format!("Unknown command: {}", name));
            return output;
        };
        if origin.permission_level() < command.permission {
            output.error("You do not have permission to use this command");
            return output;
        }

        let mut last_error = None;
        for binding in &command.overloads {
            let mut record = match binding.instantiate() {
                Ok(record) => record,
                Err(err) => {
                    tracing::error!(target: "bridge::host", "Cannot create '{}': {}", name, err);
                    output.error(&err.to_string());
                    return output;
                }
            };

            match match_overload(&mut record, args, origin) {
                Ok(()) => {
                    record.execute(origin, &mut output);
                    return output;
                }
                Err(err) => last_error = Some(err),
            }
        }

        match last_error {
            Some(err) => output.error(&format!("Syntax error: {}", err)),
            None => output.error(&format!("Command '{}' has no overloads", name)),
        }
        output
    }
}

fn match_overload(
    record: &mut CommandRecord,
    args: &[&str],
    origin: &dyn CommandOrigin,
) -> Result<(), ParseError> {
    let mut cursor = 0;
    for index in 0..record.param_count() {
        cursor += record.parse_param(index, &args[cursor..], origin)?;
    }
    match args.get(cursor) {
        Some(extra) => Err(ParseError::Trailing(extra.to_string())),
        None => Ok(()),
    }
}

impl Default for LocalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHost for LocalHost {
    fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    fn register_command(&mut self, name: &str, description: &str, permission: PermissionLevel) {
        self.commands.insert(
            name.to_string(),
            HostCommand {
                description: description.to_string(),
                permission,
                overloads: Vec::new(),
            },
        );
    }

    fn register_overload(&mut self, name: &str, binding: OverloadBinding) {
        match self.commands.get_mut(name) {
            Some(command) => command.overloads.push(binding),
            None => tracing::warn!(
                target: "bridge::host",
                "Overload for unknown command '{}' ignored",
                name
            ),
        }
    }
}

impl LifecycleEvents for LocalHost {
    fn on_player_joined(&mut self, callback: Box<dyn Fn(PlayerHandle)>) {
        self.joined.push(callback);
    }

    fn on_player_left(&mut self, callback: Box<dyn Fn(PlayerHandle)>) {
        self.left.push(callback);
    }
}

impl HostEntryPoints for LocalHost {
    fn whitelist_check(&self) -> &Interceptor<LoginRequest, bool> {
        &self.login
    }
}

impl Level for LocalHost {
    fn default_spawn(&self) -> BlockPos {
        self.default_spawn
    }

    fn for_each_player(&self, visit: &mut dyn FnMut(PlayerHandle) -> bool) {
        for player in &self.players {
            if !visit(PlayerHandle::from_ref(&**player)) {
                break;
            }
        }
    }

    fn suspend_player(&self, player: PlayerHandle) {
        if let Some(player) = self.local_player(player) {
            player.suspended.set(true);
        }
    }

    fn resume_player(&self, player: PlayerHandle) {
        if let Some(player) = self.local_player(player) {
            player.suspended.set(false);
        }
    }

    fn lookup_item_id(&self, name: &str) -> Option<i16> {
        let name = name.strip_prefix("minecraft:").unwrap_or(name);
        self.items.get(name).copied()
    }
}

impl ServerThreadQueue for LocalHost {
    fn queue_for_server_thread(&self, job: Box<dyn FnOnce() + Send>) {
        self.queue.queue_for_server_thread(job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandBridge, CommandRequest, Overload, ParameterDescriptor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn host_with_echo() -> LocalHost {
        let mut host = LocalHost::new();
        let mut bridge = CommandBridge::default();
        let request = CommandRequest::new("echo", "Repeat text", PermissionLevel::GameMasters)
            .with_overload(Overload::new(
                vec![ParameterDescriptor::int("times"), ParameterDescriptor::text("word")],
                |record, origin, out| {
                    if let Ok((times, word)) = record.fetch_as::<(i32, String)>(origin) {
                        for _ in 0..times {
                            out.add_message(&word);
                        }
                        out.success();
                    }
                },
            ));
        bridge.register(&mut host, request).unwrap();
        host
    }

    #[test]
    fn test_execute_matches_overload() {
        let host = host_with_echo();
        let output = host.execute("/echo 2 hi", &LocalOrigin::console());
        assert!(output.is_success());
        assert_eq!(output.messages(), &["hi".to_string(), "hi".to_string()]);
    }

    #[test]
    fn test_execute_reports_syntax_errors() {
        let host = host_with_echo();
        let origin = LocalOrigin::console();

        let output = host.execute("echo two hi", &origin);
        assert!(!output.is_success());
        assert!(output.errors()[0].starts_with("Syntax error"));

        let output = host.execute("echo 1 hi there", &origin);
        assert!(output.errors()[0].contains("there"));

        let output = host.execute("missing", &origin);
        assert_eq!(output.errors(), &["Unknown command: missing".to_string()]);
    }

    #[test]
    fn test_permission_checked() {
        let mut host = host_with_echo();
        let handle = host.join("alex", uuid::Uuid::new_v4());
        let origin = LocalOrigin::for_player(host.player("alex").unwrap());
        assert_eq!(origin.player(), Some(handle));

        let output = host.execute("echo 1 hi", &origin);
        assert!(!output.is_success());

        let admin = origin.with_permission(PermissionLevel::Admin);
        assert!(host.execute("echo 1 hi", &admin).is_success());
    }

    #[test]
    fn test_join_and_leave_notify() {
        let mut host = LocalHost::new();
        let joined = Arc::new(AtomicUsize::new(0));
        let left = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&joined);
        host.on_player_joined(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let counter = Arc::clone(&left);
        host.on_player_left(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let handle = host.join("steve", uuid::Uuid::new_v4());
        assert_eq!(joined.load(Ordering::SeqCst), 1);
        assert!(host.leave(handle));
        assert!(!host.leave(handle));
        assert_eq!(left.load(Ordering::SeqCst), 1);
        assert!(host.player("steve").is_none());
    }

    #[test]
    fn test_whitelist_original() {
        let mut host = LocalHost::new();
        host.allow("steve");
        assert!(host.login(uuid::Uuid::new_v4(), "steve"));
        assert!(!host.login(uuid::Uuid::new_v4(), "herobrine"));
        assert_eq!(host.whitelist_checks(), 2);
        assert!(host.connect("herobrine").is_none());
    }

    #[test]
    fn test_queue_fifo() {
        let host = LocalHost::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for i in 0..3 {
            let order = Arc::clone(&order);
            host.queue_for_server_thread(Box::new(move || order.lock().push(i)));
        }
        assert_eq!(host.queue().pending(), 3);
        assert_eq!(host.tick(), 3);
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_item_lookup() {
        let host = LocalHost::new();
        assert_eq!(host.lookup_item_id("minecraft:diamond"), Some(264));
        assert_eq!(host.lookup_item_id("unobtainium"), None);
        assert!(LocalItem::null().is_null());
        assert_eq!(
            LocalItem::new(264, "diamond").with_custom_name("Shiny").debug_string(),
            "diamond(264) \"Shiny\""
        );
    }
}
