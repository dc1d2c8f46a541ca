//! # Room Sim
//!
//! 无渲染的房间模拟器：按场景脚本回放输入，把房间事件以 JSON 行输出。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p room-sim -- run --scenario scenario.json
//! cargo run -p room-sim -- run --scenario scenario.json --layout layout.json --seed 42 -v
//! cargo run -p room-sim -- check-config config.json
//! cargo run -p room-sim -- dump-config config.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, info};

use room_runtime::{Room, RoomConfig, RoomLayout, VirtualAudio};

use room_sim::layout::default_layout;
use room_sim::scenario::{Player, Scenario};

#[derive(Parser)]
#[command(name = "room-sim")]
#[command(about = "房间模拟器 - 回放输入脚本并输出房间事件")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 回放场景脚本
    Run {
        /// 场景脚本（JSON）
        #[arg(short, long)]
        scenario: PathBuf,

        /// 房间配置（默认：config.json，不存在时使用默认值）
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,

        /// 房间布局（默认：内置布局）
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// 随机种子（覆盖配置）
        #[arg(long)]
        seed: Option<u64>,
    },

    /// 检查配置文件
    CheckConfig {
        /// 配置文件路径
        path: PathBuf,
    },

    /// 写出默认配置
    DumpConfig {
        /// 输出路径
        path: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = real_main(cli.command) {
        eprintln!("room-sim error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            scenario,
            config,
            layout,
            seed,
        } => run(&scenario, &config, layout.as_deref(), seed),
        Commands::CheckConfig { path } => check_config(&path),
        Commands::DumpConfig { path } => {
            RoomConfig::default()
                .save(&path)
                .with_context(|| format!("写出配置失败: {}", path.display()))?;
            info!(path = %path.display(), "默认配置已写出");
            Ok(())
        }
    }
}

fn run(scenario: &Path, config: &Path, layout: Option<&Path>, seed: Option<u64>) -> anyhow::Result<()> {
    let mut config = RoomConfig::load(config)?;
    if seed.is_some() {
        config.random_seed = seed;
    }

    let layout = match layout {
        Some(path) => RoomLayout::load(path)
            .with_context(|| format!("读取布局失败: {}", path.display()))?,
        None => default_layout(config.locker.cases_count),
    };
    let scenario = Scenario::load(scenario)?;

    let mut audio = VirtualAudio::new();
    let mut room = Room::new(&layout, &config, &mut audio)?;
    let records = Player::new(&mut room, scenario.frame).play(&scenario.steps)?;

    for record in &records {
        println!("{}", serde_json::to_string(record)?);
    }

    for (clip, count) in audio.play_counts() {
        info!(clip = %clip, count, "音效播放次数");
    }
    for kind in room.kinds() {
        if let Some(object) = room.object(kind) {
            info!(object = %kind, input_enabled = object.is_input_enabled(), "对象状态");
        }
    }
    Ok(())
}

fn check_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("配置文件不存在: {}", path.display());
    }
    let config = RoomConfig::load(path)?;
    config.validate()?;

    eprintln!("配置有效: {}", path.display());
    eprintln!("  抽屉数量: {}", config.locker.cases_count);
    eprintln!("  全局音量: {}", config.global_volume);
    Ok(())
}
