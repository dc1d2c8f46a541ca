//! # Window 模块
//!
//! 可开合的窗户。
//!
//! 打开：把手转到位 → 窗扇转开；关闭：窗扇转回 → 把手复位。
//! 两段补间串行执行，任意时刻最多一个在播放。
//!
//! 打开方式：
//! - `Horizontally`: 平开（绕 Y 轴）
//! - `Vertically`: 内倒（绕 X 轴）
//! - `Both`: 每次从关闭状态打开时交替使用，从平开开始

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::animation::{EasingFunction, Property, TweenEvent, TweenId, TweenSpec, TweenTarget};
use crate::config::WindowConfig;
use crate::error::RoomResult;
use crate::event::{ObjectCommand, RoomEvent};
use crate::part::{PartDecl, PartId, PartSource};

use super::base::{Behavior, ObjectCore};
use super::{InteractiveObject, MoveDirection, ObjectContext, OpenState, RoomObjectKind};

pub const FRAME: &str = "window_frame";
pub const SASH: &str = "window";
pub const HANDLE: &str = "window_handle";

pub const PARTS: &[PartDecl] = &[
    PartDecl::inactive(FRAME),
    PartDecl::active(SASH),
    PartDecl::active(HANDLE),
];

/// 一次打开使用的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowOpenType {
    Horizontally,
    Vertically,
}

impl WindowOpenType {
    fn property(&self) -> Property {
        match self {
            WindowOpenType::Horizontally => Property::RotationY,
            WindowOpenType::Vertically => Property::RotationX,
        }
    }

    fn other(&self) -> WindowOpenType {
        match self {
            WindowOpenType::Horizontally => WindowOpenType::Vertically,
            WindowOpenType::Vertically => WindowOpenType::Horizontally,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            WindowOpenType::Horizontally => "Horizontally",
            WindowOpenType::Vertically => "Vertically",
        }
    }
}

/// 配置的打开方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowOpenMode {
    /// 交替
    #[default]
    Both,
    Horizontally,
    Vertically,
}

impl WindowOpenMode {
    fn first_type(&self) -> WindowOpenType {
        match self {
            WindowOpenMode::Vertically => WindowOpenType::Vertically,
            WindowOpenMode::Both | WindowOpenMode::Horizontally => WindowOpenType::Horizontally,
        }
    }
}

/// 补间标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTween {
    Fall,
    Handle(MoveDirection),
    Sash(MoveDirection),
}

/// 窗户
pub struct Window {
    core: ObjectCore<WindowTween, ()>,
    config: WindowConfig,
    sash: PartId,
    handle: PartId,
    state: OpenState,
    previous_state: OpenState,
    tween: Option<TweenId>,
    /// 本次（或上一次）打开使用的方式
    open_type: WindowOpenType,
    /// `Both` 模式下下一次打开使用的方式
    next_type: WindowOpenType,
}

impl Window {
    pub fn new(sources: &[PartSource], ctx: &mut ObjectContext<'_>) -> RoomResult<Self> {
        let config = ctx.config.window.clone();
        let mut core = ObjectCore::new(RoomObjectKind::Window, sources, PARTS, ctx)?;
        let sash = core.parts.require("window", SASH)?;
        let handle = core.parts.require("window", HANDLE)?;

        let selected = match config.open_mode {
            WindowOpenMode::Both => 0,
            WindowOpenMode::Horizontally => 1,
            WindowOpenMode::Vertically => 2,
        };
        let options: Vec<_> = [
            ("Both", WindowOpenMode::Both),
            ("Horizontally", WindowOpenMode::Horizontally),
            ("Vertically", WindowOpenMode::Vertically),
        ]
        .into_iter()
        .map(|(label, mode)| (label.to_string(), ObjectCommand::ChangeOpenType { mode }))
        .collect();

        core.debug
            .add_monitor("Open type", "")
            .add_list("Active type", options, selected)
            .add_monitor("State", "")
            .add_button("Change state", ObjectCommand::ChangeState)
            .add_number("Window speed", config.rotation_speed, (5.0, 100.0), |speed| {
                ObjectCommand::SetSpeed { speed }
            })
            .add_number(
                "Handle speed",
                config.handle_rotation_speed,
                (30.0, 900.0),
                |speed| ObjectCommand::SetHandleSpeed { speed },
            )
            .add_number(
                "Horizontal open angle",
                config.horizontal_open_angle,
                (1.0, 90.0),
                |angle| ObjectCommand::SetOpenAngle {
                    open_type: WindowOpenType::Horizontally,
                    angle,
                },
            )
            .add_number(
                "Vertical open angle",
                config.vertical_open_angle,
                (1.0, 90.0),
                |angle| ObjectCommand::SetOpenAngle {
                    open_type: WindowOpenType::Vertically,
                    angle,
                },
            );

        let first = config.open_mode.first_type();
        let mut window = Self {
            core,
            config,
            sash,
            handle,
            state: OpenState::Closed,
            previous_state: OpenState::Closed,
            tween: None,
            open_type: first,
            next_type: first,
        };
        window.refresh_monitors();
        Ok(window)
    }

    pub fn state(&self) -> OpenState {
        self.state
    }

    pub fn open_type(&self) -> WindowOpenType {
        self.open_type
    }

    pub fn open_mode(&self) -> WindowOpenMode {
        self.config.open_mode
    }

    /// 窗扇在当前打开方式下的角度（度）
    pub fn sash_angle(&self) -> f32 {
        self.angle(self.sash, self.open_type.property())
    }

    /// 把手角度（度）
    pub fn handle_angle(&self) -> f32 {
        self.angle(self.handle, Property::RotationZ)
    }

    fn angle(&self, id: PartId, property: Property) -> f32 {
        self.core
            .parts
            .get(id)
            .map_or(0.0, |p| (p.transform.get(property) - p.start.get(property)).to_degrees())
    }

    /// 切换窗户状态（移动中打断并反向）
    pub fn change_state(&mut self) {
        match self.state {
            OpenState::Moving => {
                let direction = MoveDirection::reversed_from(self.previous_state);
                self.move_window(direction);
            }
            OpenState::Opened => self.move_window(MoveDirection::In),
            OpenState::Closed => self.move_window(MoveDirection::Out),
        }
    }

    /// 修改打开方式（只在关闭时接受）
    pub fn change_open_mode(&mut self, mode: WindowOpenMode) -> bool {
        if self.state != OpenState::Closed {
            debug!(mode = ?mode, "窗户未关闭，忽略打开方式修改");
            return false;
        }

        self.config.open_mode = mode;
        self.open_type = mode.first_type();
        self.next_type = self.open_type;
        info!(mode = ?mode, "修改窗户打开方式");
        self.refresh_monitors();
        true
    }

    fn move_window(&mut self, direction: MoveDirection) {
        if let Some(id) = self.tween.take() {
            self.core.tweens.stop(id);
        }
        if self.state == direction.end_state() {
            return;
        }
        self.previous_state = direction.start_state();

        match direction {
            MoveDirection::Out => {
                if self.state == OpenState::Closed {
                    self.open_type = match self.config.open_mode {
                        WindowOpenMode::Both => {
                            let current = self.next_type;
                            self.next_type = current.other();
                            current
                        }
                        _ => self.config.open_mode.first_type(),
                    };
                }
                self.start_handle(MoveDirection::Out);
            }
            MoveDirection::In => self.start_sash(MoveDirection::In),
        }
    }

    fn start_handle(&mut self, direction: MoveDirection) {
        let target = match direction {
            MoveDirection::Out => self.config.handle_open_angle,
            MoveDirection::In => 0.0,
        };
        let duration = (self.handle_angle() - target).abs() / self.config.handle_rotation_speed;
        self.start_rotation(
            self.handle,
            Property::RotationZ,
            target,
            duration,
            WindowTween::Handle(direction),
        );
    }

    fn start_sash(&mut self, direction: MoveDirection) {
        let target = match (direction, self.open_type) {
            (MoveDirection::In, _) => 0.0,
            (MoveDirection::Out, WindowOpenType::Horizontally) => self.config.horizontal_open_angle,
            (MoveDirection::Out, WindowOpenType::Vertically) => self.config.vertical_open_angle,
        };
        let duration = (self.sash_angle() - target).abs() / self.config.rotation_speed;
        self.start_rotation(
            self.sash,
            self.open_type.property(),
            target,
            duration,
            WindowTween::Sash(direction),
        );
    }

    fn start_rotation(&mut self, id: PartId, property: Property, degrees: f32, duration: f32, tag: WindowTween) {
        let start = self.core.parts.get(id).map_or(0.0, |p| p.start.get(property));
        let spec = TweenSpec::new(TweenTarget::new(id, property), start + degrees.to_radians(), duration)
            .with_easing(EasingFunction::EaseInOutSine);
        self.tween = Some(self.core.tweens.start(spec, tag));
    }

    fn set_state(&mut self, state: OpenState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.core.events.post(RoomEvent::WindowStateChanged {
            state,
            open_type: self.open_type,
        });
        self.refresh_monitors();
    }

    fn refresh_monitors(&mut self) {
        let closed = self.state == OpenState::Closed;
        let debug = &mut self.core.debug;
        debug.update_monitor("State", self.state.to_string());
        debug.update_monitor("Open type", self.open_type.label());
        debug.set_control_disabled("Active type", !closed);
    }

    /// 展示前复位
    fn reset(&mut self) {
        self.state = OpenState::Closed;
        self.previous_state = OpenState::Closed;
        self.tween = None;
        self.open_type = self.config.open_mode.first_type();
        self.next_type = self.open_type;

        for property in [Property::RotationX, Property::RotationY] {
            self.core.parts.restore(self.sash, property);
        }
        self.core.parts.restore(self.handle, Property::RotationZ);
        self.refresh_monitors();
    }
}

impl Behavior for Window {
    type Tween = WindowTween;
    type Action = ();

    fn core_mut(&mut self) -> &mut ObjectCore<WindowTween, ()> {
        &mut self.core
    }

    fn on_command(&mut self, command: ObjectCommand) {
        match command {
            ObjectCommand::ChangeState | ObjectCommand::SwitchOn => self.change_state(),
            ObjectCommand::ChangeOpenType { mode } => {
                self.change_open_mode(mode);
            }
            ObjectCommand::SetSpeed { speed } if speed > 0.0 => self.config.rotation_speed = speed,
            ObjectCommand::SetHandleSpeed { speed } if speed > 0.0 => {
                self.config.handle_rotation_speed = speed;
            }
            ObjectCommand::SetOpenAngle { open_type, angle } if angle > 0.0 => match open_type {
                WindowOpenType::Horizontally => self.config.horizontal_open_angle = angle,
                WindowOpenType::Vertically => self.config.vertical_open_angle = angle,
            },
            other => debug!(command = ?other, "窗户不处理该命令"),
        }
    }

    fn on_tween(&mut self, event: TweenEvent<WindowTween>) {
        if self.tween != Some(event.id()) {
            return;
        }

        match (event, event.tag()) {
            (TweenEvent::Started { .. }, WindowTween::Handle(MoveDirection::Out))
            | (TweenEvent::Started { .. }, WindowTween::Sash(MoveDirection::In)) => {
                self.set_state(OpenState::Moving);
            }
            (TweenEvent::Completed { .. }, WindowTween::Handle(MoveDirection::Out)) => {
                self.start_sash(MoveDirection::Out);
            }
            (TweenEvent::Completed { .. }, WindowTween::Sash(MoveDirection::Out)) => {
                self.tween = None;
                self.previous_state = OpenState::Opened;
                self.set_state(OpenState::Opened);
            }
            (TweenEvent::Completed { .. }, WindowTween::Sash(MoveDirection::In)) => {
                self.start_handle(MoveDirection::In);
            }
            (TweenEvent::Completed { .. }, WindowTween::Handle(MoveDirection::In)) => {
                self.tween = None;
                self.previous_state = OpenState::Closed;
                self.set_state(OpenState::Closed);
            }
            _ => {}
        }
    }
}

impl InteractiveObject for Window {
    fn kind(&self) -> RoomObjectKind {
        RoomObjectKind::Window
    }

    fn show_with_animation(&mut self, delay: f32) {
        self.core.begin_reveal();
        self.reset();

        let ids = self.core.all_parts();
        self.core.raise(&ids, delay);
        for id in ids {
            self.core.fall(id, delay, WindowTween::Fall);
        }

        let fall = self.core.start.object_fall_down_time;
        self.core.complete_reveal_at(delay + fall);
    }

    fn on_click(&mut self, part: PartId) {
        if self.core.accepts_click(part) {
            self.change_state();
        }
    }

    fn meshes_for_outline(&self, _part: PartId) -> Vec<PartId> {
        vec![self.sash, self.handle]
    }

    super::delegate_core!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;
    use crate::event::EventBus;
    use crate::sound::VirtualAudio;
    use glam::Vec3;

    fn window() -> (Window, EventBus<RoomEvent>) {
        let config = RoomConfig::default();
        let bus = EventBus::new();
        let mut audio = VirtualAudio::new();
        let mut ctx = ObjectContext {
            config: &config,
            audio: &mut audio,
            events: bus.sender(),
        };
        let sources = vec![
            PartSource::new(FRAME, Vec3::new(3.0, 2.0, 0.0)),
            PartSource::new(SASH, Vec3::new(3.0, 2.0, 0.0)),
            PartSource::new(HANDLE, Vec3::new(3.0, 2.0, 0.4)),
        ];
        (Window::new(&sources, &mut ctx).unwrap(), bus)
    }

    /// 推进足够长的时间直到静止
    fn settle(window: &mut Window) {
        for _ in 0..200 {
            window.update(0.05);
        }
    }

    #[test]
    fn test_open_then_close() {
        let (mut window, _bus) = window();

        window.change_state();
        settle(&mut window);
        assert_eq!(window.state(), OpenState::Opened);
        assert!((window.handle_angle() - 90.0).abs() < 1e-3);
        assert!((window.sash_angle() - 60.0).abs() < 1e-3);

        window.change_state();
        settle(&mut window);
        assert_eq!(window.state(), OpenState::Closed);
        assert!(window.sash_angle().abs() < 1e-3);
        assert!(window.handle_angle().abs() < 1e-3);
    }

    #[test]
    fn test_both_mode_alternates() {
        let (mut window, _bus) = window();

        let mut types = Vec::new();
        for _ in 0..3 {
            window.change_state();
            settle(&mut window);
            types.push(window.open_type());
            window.change_state();
            settle(&mut window);
        }

        assert_eq!(
            types,
            vec![
                WindowOpenType::Horizontally,
                WindowOpenType::Vertically,
                WindowOpenType::Horizontally,
            ]
        );
    }

    #[test]
    fn test_open_type_change_only_when_closed() {
        let (mut window, _bus) = window();

        window.change_state();
        window.update(0.05);
        assert_eq!(window.state(), OpenState::Moving);
        assert!(!window.change_open_mode(WindowOpenMode::Vertically));
        assert!(window.debug_menu().entries().iter().any(|e| e.label == "Active type" && e.disabled));

        settle(&mut window);
        window.change_state();
        settle(&mut window);
        assert!(window.change_open_mode(WindowOpenMode::Vertically));
        assert_eq!(window.debug_menu().monitor("Open type"), Some("Vertically"));
    }

    #[test]
    fn test_interrupt_reverses() {
        let (mut window, _bus) = window();

        window.change_state();
        window.update(0.1);
        assert_eq!(window.state(), OpenState::Moving);

        window.change_state();
        settle(&mut window);
        assert_eq!(window.state(), OpenState::Closed);
    }

    /// 调试面板调快把手：把手在更短时间内转到位
    #[test]
    fn test_handle_speed_control() {
        let (mut window, _bus) = window();

        assert!(window.debug_menu_mut().set_number("Handle speed", 900.0));
        window.update(0.05);

        // 90 度 / 900 度每秒 = 0.1 秒
        window.change_state();
        for _ in 0..3 {
            window.update(0.05);
        }
        assert!((window.handle_angle() - 90.0).abs() < 1e-3);
        assert_eq!(window.state(), OpenState::Moving);

        // 超出范围的值被限制
        assert!(window.debug_menu_mut().set_number("Handle speed", 5000.0));
        window.update(0.05);
        assert_eq!(window.config.handle_rotation_speed, 900.0);
    }

    /// 连续两次打断：第二次打断应恢复原来的打开方向
    #[test]
    fn test_double_interrupt_resumes_opening() {
        let (mut window, _bus) = window();

        window.change_state();
        window.update(0.1);
        window.change_state();
        window.update(0.05);
        assert_eq!(window.state(), OpenState::Moving);

        window.change_state();
        settle(&mut window);
        assert_eq!(window.state(), OpenState::Opened);
    }
}
