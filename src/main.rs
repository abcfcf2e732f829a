//! 演示：在进程内宿主上安装桥接层，注册命令并模拟几次登录

use game_bridge::command::{CommandRequest, Overload, ParameterDescriptor};
use game_bridge::config::BridgeConfig;
use game_bridge::core::BridgeResult;
use game_bridge::foreign::PlayerHandle;
use game_bridge::hook::HookFlow;
use game_bridge::host::local::{LocalHost, LocalOrigin};
use game_bridge::host::{BlockPos, LoginRequest, PermissionLevel, Vec3};
use game_bridge::{api, runtime};

fn run() -> BridgeResult<()> {
    let bridge = runtime::init(BridgeConfig::load_or_default())?;
    let mut host = LocalHost::new();
    bridge.install(&mut host)?;

    let request = CommandRequest::new("home", "Teleport to a saved room", PermissionLevel::Any)
        .with_overload(Overload::new(
            vec![ParameterDescriptor::text("room")],
            |record, origin, output| match record.fetch_as::<(String,)>(origin) {
                Ok((room,)) => {
                    output.add_message(&format!("{} is going to the {}", origin.name(), room));
                    output.success();
                }
                Err(err) => output.error(&err.to_string()),
            },
        ))
        .with_overload(Overload::new(
            vec![ParameterDescriptor::position("at")],
            |record, origin, output| match record.fetch_as::<(BlockPos,)>(origin) {
                Ok((at,)) => {
                    let center = api::block_pos_center(at);
                    output.add_message(&format!("Home set to {}", center));
                    output.success();
                }
                Err(err) => output.error(&err.to_string()),
            },
        ));
    bridge.register_command(&mut host, request)?;

    let banned = "griefer";
    let login_bridge = bridge.clone();
    bridge.player_login().subscribe(move |request: &LoginRequest| {
        if request.name == banned {
            login_bridge.login_result().set(false);
            return HookFlow::Stop(());
        }
        HookFlow::Continue
    });

    for name in ["steve", banned] {
        match host.connect(name) {
            Some(player) => {
                tracing::info!(target: "bridge", "{} joined as {:?}", name, player);
                bridge.on_player_left(player, move || {
                    tracing::info!(target: "bridge", "Goodbye, {}", name);
                });
            }
            None => tracing::warn!(target: "bridge", "{} was refused", name),
        }
    }

    let console = LocalOrigin::console().at(Vec3::new(12.3, 64.0, -8.7));
    for line in ["home kitchen", "/home ~ ~1 ~", "home"] {
        let output = host.execute(line, &console);
        for message in output.messages() {
            println!("{}", message);
        }
        for error in output.errors() {
            eprintln!("{}", error);
        }
    }

    let steve = host.player("steve").map(|player| PlayerHandle::from_ref(player));
    if let Some(steve) = steve {
        host.leave(steve);
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Bridge failed to start: {}", e);
        std::process::exit(1);
    }
}
