//! # Mouse 模块
//!
//! 桌面上的鼠标：点击时左键按下再弹起；位置限制在可移动区域内。
//!
//! 位置以相对载入位置的偏移保存，区域尺寸变化后重新限制。

use glam::Vec2;
use tracing::debug;

use crate::animation::{EasingFunction, Property, TweenEvent, TweenId, TweenSpec, TweenTarget};
use crate::config::MouseConfig;
use crate::error::RoomResult;
use crate::event::{ObjectCommand, RoomEvent};
use crate::part::{PartDecl, PartId, PartSource};

use super::base::{Behavior, ObjectCore};
use super::{InteractiveObject, ObjectContext, RoomObjectKind};

pub const BODY: &str = "mouse_body";
pub const LEFT_KEY: &str = "mouse_left_key";

pub const PARTS: &[PartDecl] = &[PartDecl::active(BODY), PartDecl::active(LEFT_KEY)];

/// 补间标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseTween {
    Fall,
    KeyDown,
    KeyUp,
}

/// 鼠标
pub struct Mouse {
    core: ObjectCore<MouseTween, ()>,
    config: MouseConfig,
    body: PartId,
    left_key: PartId,
    /// 相对载入位置的 (x, z) 偏移
    offset: Vec2,
    key_tween: Option<TweenId>,
}

impl Mouse {
    pub fn new(sources: &[PartSource], ctx: &mut ObjectContext<'_>) -> RoomResult<Self> {
        let config = ctx.config.mouse.clone();
        let mut core = ObjectCore::new(RoomObjectKind::Mouse, sources, PARTS, ctx)?;
        let body = core.parts.require("mouse", BODY)?;
        let left_key = core.parts.require("mouse", LEFT_KEY)?;

        let area = &config.moving_area;
        core.debug
            .add_vector2("Area size", (area.width, area.height), (0.1, 5.0), |width, height| {
                ObjectCommand::AreaChanged { width, height }
            })
            .add_vector2("Current position", (0.0, 0.0), (-1.0, 1.0), |x, z| {
                ObjectCommand::PositionChanged { x, z }
            });

        Ok(Self {
            core,
            config,
            body,
            left_key,
            offset: Vec2::ZERO,
            key_tween: None,
        })
    }

    /// 可移动区域半尺寸
    fn half_area(&self) -> Vec2 {
        Vec2::new(self.config.moving_area.width, self.config.moving_area.height) * 0.5
    }

    /// 相对载入位置的偏移
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// 鼠标世界坐标 (x, z)
    pub fn world_position(&self) -> Vec2 {
        let position = self.core.parts.position(self.body);
        Vec2::new(position.x, position.z)
    }

    /// 按区域内的归一化坐标移动（-1..=1）
    pub fn set_normalized_position(&mut self, x: f32, z: f32) {
        let half = self.half_area();
        self.set_offset(Vec2::new(x, z) * half);
    }

    /// 修改可移动区域并重新限制位置
    pub fn set_area(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            debug!(width, height, "区域尺寸无效，忽略");
            return;
        }
        self.config.moving_area.width = width;
        self.config.moving_area.height = height;
        self.set_offset(self.offset);
    }

    fn set_offset(&mut self, offset: Vec2) {
        let half = self.half_area();
        self.offset = offset.clamp(-half, half);

        for id in [self.body, self.left_key] {
            if let Some(part) = self.core.parts.get_mut(id) {
                part.transform.position.x = part.start.position.x + self.offset.x;
                part.transform.position.z = part.start.position.z + self.offset.y;
            }
        }

        let world = self.world_position();
        self.core.events.post(RoomEvent::MousePositionChanged {
            x: world.x,
            z: world.y,
        });

        let normalized = self.offset / half;
        self.core
            .debug
            .refresh_vector2("Current position", normalized.x, normalized.y);
    }

    /// 按下左键
    pub fn press_left_key(&mut self) {
        if let Some(id) = self.key_tween.take() {
            self.core.tweens.stop(id);
        }
        self.start_key_tween(MouseTween::KeyDown);
    }

    fn start_key_tween(&mut self, tag: MouseTween) {
        let Some(key) = self.core.parts.get(self.left_key) else {
            return;
        };
        let rest = key.start.position.y;
        let to = match tag {
            MouseTween::KeyDown => rest - self.config.key_press_depth,
            _ => rest,
        };
        let spec = TweenSpec::new(
            TweenTarget::new(self.left_key, Property::PositionY),
            to,
            self.config.key_press_time,
        )
        .with_easing(EasingFunction::EaseOutQuad);
        self.key_tween = Some(self.core.tweens.start(spec, tag));
    }

    /// 左键是否处于按下 / 弹起过程中
    pub fn is_key_animating(&self) -> bool {
        self.key_tween.is_some()
    }

    /// 左键相对静止位置的下沉量
    pub fn key_depth(&self) -> f32 {
        self.core
            .parts
            .get(self.left_key)
            .map_or(0.0, |p| p.start.position.y - p.transform.position.y)
    }
}

impl Behavior for Mouse {
    type Tween = MouseTween;
    type Action = ();

    fn core_mut(&mut self) -> &mut ObjectCore<MouseTween, ()> {
        &mut self.core
    }

    fn on_command(&mut self, command: ObjectCommand) {
        match command {
            ObjectCommand::PositionChanged { x, z } => self.set_normalized_position(x, z),
            ObjectCommand::AreaChanged { width, height } => self.set_area(width, height),
            ObjectCommand::SwitchOn => self.press_left_key(),
            other => debug!(command = ?other, "鼠标不处理该命令"),
        }
    }

    fn on_tween(&mut self, event: TweenEvent<MouseTween>) {
        if self.key_tween != Some(event.id()) {
            return;
        }
        if let TweenEvent::Completed { tag, .. } = event {
            self.key_tween = None;
            if tag == MouseTween::KeyDown {
                self.start_key_tween(MouseTween::KeyUp);
            }
        }
    }
}

impl InteractiveObject for Mouse {
    fn kind(&self) -> RoomObjectKind {
        RoomObjectKind::Mouse
    }

    fn show_with_animation(&mut self, delay: f32) {
        self.core.begin_reveal();
        self.key_tween = None;

        let ids = self.core.all_parts();
        self.core.raise(&ids, delay);
        for id in ids {
            self.core.fall(id, delay, MouseTween::Fall);
        }

        let fall = self.core.start.object_fall_down_time;
        self.core.complete_reveal_at(delay + fall);
    }

    fn on_click(&mut self, part: PartId) {
        if self.core.accepts_click(part) {
            self.press_left_key();
        }
    }

    fn meshes_for_outline(&self, _part: PartId) -> Vec<PartId> {
        vec![self.body, self.left_key]
    }

    super::delegate_core!();
}
