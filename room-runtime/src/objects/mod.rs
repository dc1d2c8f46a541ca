//! # Objects 模块
//!
//! 房间中的可交互对象。
//!
//! ## 结构
//!
//! - `InteractiveObject`: 所有对象实现的能力接口（展示、点击、描边、音效、更新）
//! - `ObjectCore`: 共享的零件注册表、补间引擎、延迟调用、命令总线与调试面板
//! - 各对象（`Locker`、`Window` ...）在核心之上实现自己的状态机
//!
//! 对象只由 `update(dt)` 推进，所有回调都以事件的形式在 `update` 内分派。

mod base;

pub mod air_conditioner;
pub mod floor_lamp;
pub mod keyboard;
pub mod locker;
pub mod mouse;
pub mod notebook;
pub mod window;

use serde::{Deserialize, Serialize};

use crate::config::RoomConfig;
use crate::debug_menu::DebugMenu;
use crate::error::RoomResult;
use crate::event::{EventSender, RoomEvent};
use crate::part::{PartId, PartRegistry, PartSource};
use crate::sound::{AudioBackend, SoundController};

pub use air_conditioner::AirConditioner;
pub use base::ObjectCore;
pub use floor_lamp::FloorLamp;
pub use keyboard::Keyboard;
pub use locker::Locker;
pub use mouse::Mouse;
pub use notebook::Notebook;
pub use window::Window;

/// 房间对象类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomObjectKind {
    Locker,
    Keyboard,
    Notebook,
    FloorLamp,
    AirConditioner,
    Window,
    Mouse,
}

impl RoomObjectKind {
    /// 所有类型（房间默认展示顺序）
    pub const ALL: [RoomObjectKind; 7] = [
        RoomObjectKind::Locker,
        RoomObjectKind::FloorLamp,
        RoomObjectKind::Notebook,
        RoomObjectKind::Keyboard,
        RoomObjectKind::Mouse,
        RoomObjectKind::Window,
        RoomObjectKind::AirConditioner,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RoomObjectKind::Locker => "locker",
            RoomObjectKind::Keyboard => "keyboard",
            RoomObjectKind::Notebook => "notebook",
            RoomObjectKind::FloorLamp => "floor_lamp",
            RoomObjectKind::AirConditioner => "air_conditioner",
            RoomObjectKind::Window => "window",
            RoomObjectKind::Mouse => "mouse",
        }
    }

    /// 调试面板标题
    pub fn title(&self) -> &'static str {
        match self {
            RoomObjectKind::Locker => "Locker",
            RoomObjectKind::Keyboard => "Keyboard",
            RoomObjectKind::Notebook => "Notebook",
            RoomObjectKind::FloorLamp => "Floor lamp",
            RoomObjectKind::AirConditioner => "Air conditioner",
            RoomObjectKind::Window => "Window",
            RoomObjectKind::Mouse => "Mouse",
        }
    }
}

impl std::fmt::Display for RoomObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 可开合部件的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenState {
    #[default]
    Closed,
    /// 过渡状态，补间完成后变为 Opened 或 Closed
    Moving,
    Opened,
}

impl std::fmt::Display for OpenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            OpenState::Closed => "Closed",
            OpenState::Moving => "Moving",
            OpenState::Opened => "Opened",
        };
        f.write_str(text)
    }
}

/// 移动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    /// 打开
    Out,
    /// 关闭
    In,
}

impl MoveDirection {
    /// 出发时的静止状态
    pub fn start_state(&self) -> OpenState {
        match self {
            MoveDirection::Out => OpenState::Closed,
            MoveDirection::In => OpenState::Opened,
        }
    }

    /// 移动完成后的状态
    pub fn end_state(&self) -> OpenState {
        match self {
            MoveDirection::Out => OpenState::Opened,
            MoveDirection::In => OpenState::Closed,
        }
    }

    /// 中途打断时的反向移动
    ///
    /// `previous` 是开始移动前的静止状态。
    pub fn reversed_from(previous: OpenState) -> MoveDirection {
        if previous == OpenState::Opened {
            MoveDirection::Out
        } else {
            MoveDirection::In
        }
    }
}

/// 电源状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    #[default]
    Off,
    On,
}

impl PowerState {
    pub fn toggled(&self) -> PowerState {
        match self {
            PowerState::Off => PowerState::On,
            PowerState::On => PowerState::Off,
        }
    }
}

/// 构造对象时的上下文
pub struct ObjectContext<'a> {
    /// 静态配置
    pub config: &'a RoomConfig,
    /// 音频后端
    pub audio: &'a mut dyn AudioBackend,
    /// 房间事件发送端
    pub events: EventSender<RoomEvent>,
}

/// 可交互对象
pub trait InteractiveObject {
    /// 对象类型
    fn kind(&self) -> RoomObjectKind;

    /// 播放展示动画
    ///
    /// 先重置对象（取消进行中的补间与延迟调用），
    /// `delay` 秒后开始下落，结束时发出 `ShowAnimationComplete`。
    fn show_with_animation(&mut self, delay: f32);

    /// 点击零件
    ///
    /// 输入被禁用或零件不可交互时静默忽略。
    fn on_click(&mut self, part: PartId);

    /// 悬停 / 点击时需要描边的零件
    fn meshes_for_outline(&self, part: PartId) -> Vec<PartId>;

    /// 推进一帧
    fn update(&mut self, dt: f32);

    /// 零件注册表
    fn parts(&self) -> &PartRegistry;

    /// 是否接受输入
    fn is_input_enabled(&self) -> bool;

    /// 锁定 / 解锁输入
    fn set_input_enabled(&mut self, enabled: bool);

    fn debug_menu(&self) -> &DebugMenu;

    fn debug_menu_mut(&mut self) -> &mut DebugMenu;

    /// 音效控制器（没有音效的对象返回 None）
    fn sounds(&self) -> Option<&SoundController> {
        None
    }

    fn on_volume_changed(&mut self, _volume: f32) {}

    fn enable_sound(&mut self) {}

    fn disable_sound(&mut self) {}

    fn show_sound_helpers(&mut self) {}

    fn hide_sound_helpers(&mut self) {}
}

/// 按类型创建对象
pub fn create_object(
    kind: RoomObjectKind,
    sources: &[PartSource],
    ctx: &mut ObjectContext<'_>,
) -> RoomResult<Box<dyn InteractiveObject>> {
    Ok(match kind {
        RoomObjectKind::Locker => Box::new(Locker::new(sources, ctx)?),
        RoomObjectKind::Keyboard => Box::new(Keyboard::new(sources, ctx)?),
        RoomObjectKind::Notebook => Box::new(Notebook::new(sources, ctx)?),
        RoomObjectKind::FloorLamp => Box::new(FloorLamp::new(sources, ctx)?),
        RoomObjectKind::AirConditioner => Box::new(AirConditioner::new(sources, ctx)?),
        RoomObjectKind::Window => Box::new(Window::new(sources, ctx)?),
        RoomObjectKind::Mouse => Box::new(Mouse::new(sources, ctx)?),
    })
}

/// 实现 `InteractiveObject` 中只转发到 `ObjectCore` 的部分
macro_rules! delegate_core {
    () => {
        fn parts(&self) -> &$crate::part::PartRegistry {
            &self.core.parts
        }

        fn is_input_enabled(&self) -> bool {
            self.core.is_input_enabled()
        }

        fn set_input_enabled(&mut self, enabled: bool) {
            self.core.set_input_enabled(enabled);
        }

        fn debug_menu(&self) -> &$crate::debug_menu::DebugMenu {
            &self.core.debug
        }

        fn debug_menu_mut(&mut self) -> &mut $crate::debug_menu::DebugMenu {
            &mut self.core.debug
        }

        fn update(&mut self, dt: f32) {
            $crate::objects::base::Behavior::step(self, dt);
        }
    };
}

pub(crate) use delegate_core;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_direction() {
        assert_eq!(MoveDirection::reversed_from(OpenState::Opened), MoveDirection::Out);
        assert_eq!(MoveDirection::reversed_from(OpenState::Closed), MoveDirection::In);
        assert_eq!(MoveDirection::Out.end_state(), OpenState::Opened);
        assert_eq!(MoveDirection::In.start_state(), OpenState::Opened);
    }

    #[test]
    fn test_kind_serde_matches_name() {
        for kind in RoomObjectKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }
}
