//! # xtask - 开发辅助工具
//!
//! 本地质量门禁与房间数据检查。
//!
//! ## 命令
//!
//! - `check-all`: 依次运行 fmt、clippy、test
//! - `cov-runtime`: room-runtime 覆盖率报告
//! - `config-check [path]`: 房间配置能解析并通过验证
//! - `scenario-check [dir]`: 场景脚本能解析，并能在默认房间里完整回放

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use room_runtime::{Room, RoomConfig, VirtualAudio};
use room_sim::layout::default_layout;
use room_sim::scenario::{Player, Scenario};
use walkdir::WalkDir;

/// 门禁步骤：每项都是一条 cargo 子命令
const GATE: &[&[&str]] = &[
    &["fmt", "--all", "--", "--check"],
    &["clippy", "--workspace", "--all-targets"],
    &["test", "--workspace"],
];

const COVERAGE: &[&str] = &["llvm-cov", "-p", "room-runtime", "--all-features", "--html"];

/// 运行 `cargo <args>`，失败时带上完整命令行
fn cargo(args: &[&str]) -> anyhow::Result<()> {
    let line = format!("cargo {}", args.join(" "));
    eprintln!("\n==> {line}");

    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{line} 失败: {status}");
    }
    Ok(())
}

fn has_llvm_cov() -> bool {
    Command::new("cargo")
        .args(["llvm-cov", "--version"])
        .status()
        .is_ok_and(|s| s.success())
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => GATE.iter().try_for_each(|step| cargo(step))?,
        "cov-runtime" => {
            if !has_llvm_cov() {
                anyhow::bail!(
                    "找不到 cargo llvm-cov，请先运行：\n  \
                     cargo install cargo-llvm-cov\n  \
                     rustup component add llvm-tools-preview"
                );
            }
            cargo(COVERAGE)?;
            eprintln!("\n覆盖率报告: target/llvm-cov/html/index.html");
        }
        "config-check" => {
            let path = args.next().unwrap_or_else(|| "config.json".to_string());
            config_check(Path::new(&path))?;
        }
        "scenario-check" => {
            let dir = args
                .next()
                .map_or_else(|| PathBuf::from("room-sim/scenarios"), PathBuf::from);
            scenario_check(&dir)?;
        }
        "help" | "-h" | "--help" => print_help(),
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command> [arg]

COMMANDS:
  check-all                门禁检查（fmt、clippy、test）
  cov-runtime              room-runtime 覆盖率报告
  config-check [path]      检查房间配置（默认 config.json）
  scenario-check [dir]     检查并试跑场景脚本（默认 room-sim/scenarios/）

别名见 .cargo/config.toml（cargo check-all、cargo config-check 等）。
"#
    );
}

/// 检查配置：能解析且通过验证
fn config_check(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("配置文件不存在: {}", path.display());
    }

    let config = RoomConfig::load(path)?;
    config.validate()?;
    eprintln!("✓ {} 有效", path.display());
    Ok(())
}

/// 检查场景目录（递归）下的每个 JSON
fn scenario_check(dir: &Path) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("场景目录不存在: {}", dir.display());
    }

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();

    let config = RoomConfig::default();
    let mut failed = 0;
    for file in &files {
        match Scenario::load(file).and_then(|scenario| replay(&scenario, &config)) {
            Ok(events) => eprintln!("  ✓ {} ({events} 个事件)", file.display()),
            Err(e) => {
                eprintln!("  ✗ {}: {e:#}", file.display());
                failed += 1;
            }
        }
    }

    eprintln!("\n检查了 {} 个场景，{} 个失败", files.len(), failed);
    if failed > 0 {
        anyhow::bail!("场景检查发现错误");
    }
    Ok(())
}

/// 在默认布局的房间里回放场景，返回记录到的事件数
fn replay(scenario: &Scenario, config: &RoomConfig) -> anyhow::Result<usize> {
    let layout = default_layout(config.locker.cases_count);

    let mut audio = VirtualAudio::new();
    let mut room = Room::new(&layout, config, &mut audio)?;
    let records = Player::new(&mut room, scenario.frame).play(&scenario.steps)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped_scenarios() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../room-sim/scenarios")
    }

    #[test]
    fn test_shipped_scenarios_pass() {
        scenario_check(&shipped_scenarios()).unwrap();
    }

    #[test]
    fn test_replay_counts_events() {
        let scenario = Scenario::from_json(
            r#"{ "steps": [
                { "action": "show" },
                { "action": "wait", "seconds": 3.0 },
                { "action": "click", "object": "locker", "part": "case01" },
                { "action": "wait", "seconds": 1.0 }
            ] }"#,
        )
        .unwrap();

        let events = replay(&scenario, &RoomConfig::default()).unwrap();
        assert!(events > 0);
    }

    /// 只有 `steps` 数组但步骤无法识别的文件也要报错
    #[test]
    fn test_unknown_step_fails_check() {
        let dir = std::env::temp_dir().join(format!("xtask-scenarios-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("bad.json"), r#"{ "steps": [{ "action": "teleport" }] }"#).unwrap();

        let result = scenario_check(&dir);
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_dir_fails() {
        assert!(scenario_check(Path::new("no/such/scenarios")).is_err());
    }
}
