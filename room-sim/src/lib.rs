//! # Room Sim 库
//!
//! 场景脚本与内置布局。`room-sim` 可执行文件和 `xtask scenario-check` 共用。

pub mod layout;
pub mod scenario;
