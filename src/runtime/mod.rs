//! 桥接层运行时
//!
//! `Bridge` 持有进程级状态：命令注册桥、钩子注册表、回调生命周期注册表，
//! 以及内置的标准钩子：
//!
//! - `player-joined` / `player-left`：玩家加入、离开的命名钩子
//! - `player-login`：登录检查的命名钩子，订阅者通过 `login-result` fluid 给出结果
//! - 登录入口点上的独占钩子：从不调用原始白名单检查，结果完全由 fluid 决定
//!
//! 所有状态只在游戏主线程上修改；锁只用于满足 `Sync`，回调执行时不持有任何锁。

use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

use crate::command::{CommandBridge, CommandRecord, CommandRequest};
use crate::config::BridgeConfig;
use crate::core::{init_logging, BridgeError, BridgeResult};
use crate::foreign::{LifetimeRegistry, PlayerHandle};
use crate::hook::{Fluid, HookRegistry, NamedHook};
use crate::host::{
    CommandHost, CommandOrigin, CommandOutput, HostEntryPoints, LifecycleEvents, LoginRequest,
    PermissionLevel,
};

pub const PLAYER_JOINED: &str = "player-joined";
pub const PLAYER_LEFT: &str = "player-left";
pub const PLAYER_LOGIN: &str = "player-login";
pub const LOGIN_RESULT: &str = "login-result";

/// 桥接层
pub struct Bridge {
    config: BridgeConfig,
    commands: Mutex<CommandBridge>,
    hooks: HookRegistry,
    lifetimes: Arc<LifetimeRegistry>,
    login_result: Arc<Fluid<bool>>,
    player_joined: Arc<NamedHook<PlayerHandle>>,
    player_left: Arc<NamedHook<PlayerHandle>>,
    player_login: Arc<NamedHook<LoginRequest>>,
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> BridgeResult<Arc<Self>> {
        config.validate()?;

        let hooks = HookRegistry::new(&config.hooks);
        let player_joined = hooks.define::<PlayerHandle, ()>(PLAYER_JOINED)?;
        let player_left = hooks.define::<PlayerHandle, ()>(PLAYER_LEFT)?;
        let player_login = hooks.define::<LoginRequest, ()>(PLAYER_LOGIN)?;

        Ok(Arc::new(Self {
            commands: Mutex::new(CommandBridge::new(config.commands.clone())),
            hooks,
            lifetimes: Arc::new(LifetimeRegistry::new()),
            login_result: Arc::new(Fluid::new(LOGIN_RESULT)),
            player_joined,
            player_left,
            player_login,
            config,
        }))
    }

    /// 把标准钩子接到宿主上
    pub fn install<H>(&self, host: &mut H) -> BridgeResult<()>
    where
        H: LifecycleEvents + HostEntryPoints + ?Sized,
    {
        // 独占绑定最先进行，冲突时不留下任何生命周期回调
        let fluid = Arc::clone(&self.login_result);
        let login = Arc::clone(&self.player_login);
        let default = self.config.hooks.default_login_result;
        self.hooks.bind_exclusive(
            host.whitelist_check(),
            &self.config.hooks.builtin_owner,
            move |request, _original| {
                fluid.scope(default, || {
                    login.dispatch(&request);
                })
            },
        )?;

        let joined = Arc::clone(&self.player_joined);
        host.on_player_joined(Box::new(move |player| {
            joined.dispatch(&player);
        }));

        let left = Arc::clone(&self.player_left);
        host.on_player_left(Box::new(move |player| {
            left.dispatch(&player);
        }));

        // 先分发 player-left，再触发该玩家的一次性回调
        let lifetimes = Arc::clone(&self.lifetimes);
        host.on_player_left(Box::new(move |player| {
            lifetimes.fire_terminal(player);
        }));

        tracing::info!(
            target: "bridge",
            "Bridge installed (profile '{}')",
            self.config.profile
        );
        Ok(())
    }

    /// 注册命令
    pub fn register_command<H>(&self, host: &mut H, request: CommandRequest) -> BridgeResult<usize>
    where
        H: CommandHost + ?Sized,
    {
        self.commands.lock().register(host, request)
    }

    /// 注册无参数命令
    pub fn register_simple_command<H, F>(
        &self,
        host: &mut H,
        name: &str,
        description: &str,
        permission: PermissionLevel,
        executor: F,
    ) -> BridgeResult<usize>
    where
        H: CommandHost + ?Sized,
        F: Fn(&CommandRecord, &dyn CommandOrigin, &mut dyn CommandOutput) + Send + Sync + 'static,
    {
        self.commands
            .lock()
            .register_simple(host, name, description, permission, executor)
    }

    pub fn overload_count(&self, name: &str) -> usize {
        self.commands.lock().overload_count(name)
    }

    /// 玩家离开时执行一次 `callback`；同一玩家重复注册时只保留最新的回调
    pub fn on_player_left<F>(&self, player: PlayerHandle, callback: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.lifetimes.register_on_terminal(player, Box::new(callback))
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn profile(&self) -> &str {
        &self.config.profile
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn lifetimes(&self) -> &LifetimeRegistry {
        &self.lifetimes
    }

    pub fn login_result(&self) -> &Fluid<bool> {
        &self.login_result
    }

    pub fn player_joined(&self) -> &NamedHook<PlayerHandle> {
        &self.player_joined
    }

    pub fn player_left(&self) -> &NamedHook<PlayerHandle> {
        &self.player_left
    }

    pub fn player_login(&self) -> &NamedHook<LoginRequest> {
        &self.player_login
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("profile", &self.config.profile)
            .field("hooks", &self.hooks)
            .field("pending_callbacks", &self.lifetimes.len())
            .finish()
    }
}

static BRIDGE: OnceLock<Arc<Bridge>> = OnceLock::new();

/// 初始化进程级桥接层（日志 + 全局实例），只能调用一次
pub fn init(config: BridgeConfig) -> BridgeResult<Arc<Bridge>> {
    if BRIDGE.get().is_some() {
        return Err(BridgeError::AlreadyInitialized);
    }

    init_logging(&config.logging);
    let bridge = Bridge::new(config)?;
    BRIDGE
        .set(Arc::clone(&bridge))
        .map_err(|_| BridgeError::AlreadyInitialized)?;
    Ok(bridge)
}

/// 全局实例
pub fn bridge() -> Option<Arc<Bridge>> {
    BRIDGE.get().cloned()
}
