//! # 场景脚本
//!
//! 以 JSON 描述的一串输入步骤，按固定帧长回放到 `Room` 上。
//!
//! ```json
//! {
//!   "frame": 0.05,
//!   "steps": [
//!     { "action": "show" },
//!     { "action": "wait", "seconds": 2.0 },
//!     { "action": "click", "object": "locker", "part": "case02" },
//!     { "action": "wait", "seconds": 1.0 }
//!   ]
//! }
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use room_runtime::{Hit, PointerInput, Room, RoomEvent, RoomObjectKind};

fn default_frame() -> f32 {
    0.05
}

/// 场景脚本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// 每帧时长（秒）
    #[serde(default = "default_frame")]
    pub frame: f32,
    pub steps: Vec<Step>,
}

/// 指针命中的零件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub object: RoomObjectKind,
    pub part: String,
}

/// 单个步骤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// 播放展示动画
    Show,
    /// 按名称点击零件
    Click { object: RoomObjectKind, part: String },
    /// 指针输入；`target` 是宿主射线检测的结果
    Pointer {
        input: PointerInput,
        #[serde(default)]
        target: Option<Target>,
    },
    /// 点击调试面板按钮
    DebugPress { object: RoomObjectKind, label: String },
    /// 选择调试面板列表项
    DebugSelect {
        object: RoomObjectKind,
        label: String,
        index: usize,
    },
    /// 修改调试面板数值
    DebugNumber {
        object: RoomObjectKind,
        label: String,
        value: f32,
    },
    /// 修改调试面板二维值
    DebugVector2 {
        object: RoomObjectKind,
        label: String,
        x: f32,
        y: f32,
    },
    /// 全局音量
    Volume { value: f32 },
    /// 音效开关
    Sound { enabled: bool },
    /// 音效调试标记
    Helpers { visible: bool },
    /// 推进时间
    Wait { seconds: f32 },
}

/// 回放时记录的事件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// 事件发生的模拟时间（秒）
    pub time: f32,
    pub event: RoomEvent,
}

impl Scenario {
    /// 从 JSON 文件读取
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("读取场景失败: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("解析场景失败: {}", path.display()))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        if scenario.frame <= 0.0 {
            anyhow::bail!("frame 必须大于 0，当前为 {}", scenario.frame);
        }
        Ok(scenario)
    }
}

/// 回放器
pub struct Player<'a> {
    room: &'a mut Room,
    frame: f32,
    time: f32,
    records: Vec<Record>,
}

impl<'a> Player<'a> {
    pub fn new(room: &'a mut Room, frame: f32) -> Self {
        Self {
            room,
            frame,
            time: 0.0,
            records: Vec::new(),
        }
    }

    /// 回放全部步骤，返回事件记录
    pub fn play(mut self, steps: &[Step]) -> anyhow::Result<Vec<Record>> {
        for (index, step) in steps.iter().enumerate() {
            debug!(index, step = ?step, "执行步骤");
            self.apply(step)
                .with_context(|| format!("第 {} 步执行失败", index + 1))?;
        }
        info!(time = self.time, events = self.records.len(), "场景回放结束");
        Ok(self.records)
    }

    fn apply(&mut self, step: &Step) -> anyhow::Result<()> {
        match step {
            Step::Show => self.room.show(),
            Step::Click { object, part } => self.room.click(*object, part)?,
            Step::Pointer { input, target } => {
                let hit = target.as_ref().map(|t| Hit {
                    object: t.object,
                    part: t.part.clone(),
                });
                let picker = move |_x: f32, _y: f32| hit.clone();
                self.room.on_pointer(*input, &picker);
            }
            Step::DebugPress { object, label } => {
                let accepted = self.menu(*object)?.press(label);
                report(accepted, *object, label);
            }
            Step::DebugSelect { object, label, index } => {
                let accepted = self.menu(*object)?.select(label, *index);
                report(accepted, *object, label);
            }
            Step::DebugNumber { object, label, value } => {
                let accepted = self.menu(*object)?.set_number(label, *value);
                report(accepted, *object, label);
            }
            Step::DebugVector2 { object, label, x, y } => {
                let accepted = self.menu(*object)?.set_vector2(label, *x, *y);
                report(accepted, *object, label);
            }
            Step::Volume { value } => self.room.set_global_volume(*value),
            Step::Sound { enabled: true } => self.room.enable_sound(),
            Step::Sound { enabled: false } => self.room.disable_sound(),
            Step::Helpers { visible: true } => self.room.show_sound_helpers(),
            Step::Helpers { visible: false } => self.room.hide_sound_helpers(),
            Step::Wait { seconds } => self.wait(*seconds),
        }
        Ok(())
    }

    fn menu(&mut self, kind: RoomObjectKind) -> anyhow::Result<&mut room_runtime::DebugMenu> {
        self.room
            .object_mut(kind)
            .map(|o| o.debug_menu_mut())
            .with_context(|| format!("房间中没有对象: {kind}"))
    }

    fn wait(&mut self, seconds: f32) {
        let frames = (seconds / self.frame).round().max(1.0) as usize;
        for _ in 0..frames {
            self.time += self.frame;
            for event in self.room.update(self.frame) {
                self.records.push(Record {
                    time: self.time,
                    event,
                });
            }
        }
    }
}

fn report(accepted: bool, object: RoomObjectKind, label: &str) {
    if !accepted {
        warn!(object = %object, label = label, "调试面板控件不可用");
    }
}
