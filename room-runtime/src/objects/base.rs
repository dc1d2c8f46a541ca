//! # Base 模块
//!
//! 所有对象共享的核心：零件、补间、延迟调用、命令总线、调试面板、
//! 输入开关，以及展示动画的公共步骤。

use tracing::{debug, info};

use crate::animation::{Property, TweenEngine, TweenEvent, TweenId, TweenSpec, TweenTarget};
use crate::config::StartAnimationConfig;
use crate::debug_menu::DebugMenu;
use crate::error::RoomResult;
use crate::event::{EventBus, EventSender, ObjectCommand, RoomEvent};
use crate::part::{PartDecl, PartId, PartRegistry, PartSource};
use crate::timer::DelayedCalls;

use super::{ObjectContext, RoomObjectKind};

/// 展示动画的公共步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealStep {
    /// 延迟结束，对象出现
    Appear,
    /// 所有动画结束，恢复交互
    Complete,
}

/// 对象核心
///
/// - `T`: 补间标签
/// - `A`: 延迟调用动作
pub struct ObjectCore<T, A> {
    pub kind: RoomObjectKind,
    pub parts: PartRegistry,
    pub tweens: TweenEngine<T>,
    pub timers: DelayedCalls<A>,
    /// 调试面板 / UI 发给对象的命令
    pub commands: EventBus<ObjectCommand>,
    /// 发给场景控制器的事件
    pub events: EventSender<RoomEvent>,
    pub debug: DebugMenu,
    /// 展示动画配置
    pub start: StartAnimationConfig,
    reveal: DelayedCalls<RevealStep>,
    input_enabled: bool,
    /// 展示动画进行中（与外部锁定输入区分）
    revealing: bool,
    locked: bool,
}

impl<T, A> std::fmt::Debug for ObjectCore<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectCore")
            .field("kind", &self.kind)
            .field("parts", &self.parts.len())
            .field("tweens", &self.tweens.active_count())
            .field("timers", &self.timers.pending())
            .field("input_enabled", &self.input_enabled)
            .finish()
    }
}

impl<T, A> ObjectCore<T, A> {
    /// 建立对象核心
    ///
    /// # 错误
    /// 声明的零件缺失时返回 `RoomError::MissingPart`
    pub fn new(
        kind: RoomObjectKind,
        sources: &[PartSource],
        decls: &[PartDecl],
        ctx: &ObjectContext<'_>,
    ) -> RoomResult<Self> {
        let parts = PartRegistry::build(kind.name(), sources, decls)?;
        let commands = EventBus::new();
        let debug = DebugMenu::new(kind.title(), commands.sender());

        Ok(Self {
            kind,
            parts,
            tweens: TweenEngine::new(),
            timers: DelayedCalls::new(),
            commands,
            events: ctx.events.clone(),
            debug,
            start: ctx.config.start_animation.clone(),
            reveal: DelayedCalls::new(),
            input_enabled: true,
            revealing: false,
            locked: false,
        })
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// 外部锁定 / 解锁输入（展示动画期间保持禁用）
    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.locked = !enabled;
        self.input_enabled = enabled && !self.revealing;
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    /// 展示动画第一步：禁用交互并取消所有进行中的动画
    ///
    /// 之后由对象自己把子部件恢复到基线。
    pub fn begin_reveal(&mut self) {
        self.input_enabled = false;
        self.revealing = true;
        self.debug.disable();
        self.tweens.stop_all();
        self.timers.cancel_all();
        self.reveal.cancel_all();

        let dropped = self.commands.drain().len();
        if dropped > 0 {
            debug!(object = %self.kind, dropped, "展示动画开始，丢弃未处理的命令");
        }
        info!(object = %self.kind, "开始展示动画");
    }

    /// 把零件抬高到下落起点并隐藏对象，`delay` 秒后出现
    pub fn raise(&mut self, ids: &[PartId], delay: f32) {
        let offset = self.start.start_position_y;
        for id in ids {
            if let Some(part) = self.parts.get_mut(*id) {
                part.transform.position.y = part.start.position.y + offset;
            }
        }
        self.parts.set_visible(false);
        self.reveal.call(delay, RevealStep::Appear);
    }

    /// 零件下落到载入位置
    pub fn fall(&mut self, id: PartId, delay: f32, tag: T) -> Option<TweenId> {
        let to = self.parts.get(id)?.start.position.y;
        let spec = TweenSpec::new(
            TweenTarget::new(id, Property::PositionY),
            to,
            self.start.object_fall_down_time,
        )
        .with_easing(self.start.fall_down_easing)
        .with_delay(delay);
        Some(self.tweens.start(spec, tag))
    }

    /// 在 `at` 秒后结束展示动画
    ///
    /// 时间由调用方按各段延迟与时长计算，不等待补间完成。
    pub fn complete_reveal_at(&mut self, at: f32) {
        self.reveal.call(at, RevealStep::Complete);
    }

    fn apply_reveal(&mut self, step: RevealStep) {
        match step {
            RevealStep::Appear => self.parts.set_visible(true),
            RevealStep::Complete => {
                self.revealing = false;
                self.input_enabled = !self.locked;
                self.debug.enable();
                self.events.post(RoomEvent::ShowAnimationComplete { kind: self.kind });
                info!(object = %self.kind, "展示动画完成");
            }
        }
    }

    /// 所有零件（用于整体描边）
    pub fn all_parts(&self) -> Vec<PartId> {
        self.parts.ids()
    }

    /// 零件是否可交互
    pub fn is_active_part(&self, id: PartId) -> bool {
        self.parts.get(id).is_some_and(|p| p.active)
    }

    /// 点击前的公共检查
    pub fn accepts_click(&self, id: PartId) -> bool {
        if !self.input_enabled {
            debug!(object = %self.kind, part = %id, "输入已禁用，忽略点击");
            return false;
        }
        if !self.is_active_part(id) {
            debug!(object = %self.kind, part = %id, "零件不可交互，忽略点击");
            return false;
        }
        true
    }
}

/// 对象的事件分派
///
/// `step` 每帧按固定顺序分派：命令 → 展示步骤 → 延迟调用 → 补间事件。
pub(crate) trait Behavior {
    type Tween: Copy;
    type Action;

    fn core_mut(&mut self) -> &mut ObjectCore<Self::Tween, Self::Action>;

    fn on_command(&mut self, command: ObjectCommand);

    fn on_action(&mut self, _action: Self::Action) {}

    fn on_tween(&mut self, _event: TweenEvent<Self::Tween>) {}

    fn step(&mut self, dt: f32) {
        let commands = self.core_mut().commands.drain();
        for command in commands {
            debug!(command = ?command, "处理命令");
            self.on_command(command);
        }

        let core = self.core_mut();
        for step in core.reveal.update(dt) {
            core.apply_reveal(step);
        }

        let actions = self.core_mut().timers.update(dt);
        for action in actions {
            self.on_action(action);
        }

        let core = self.core_mut();
        let events = core.tweens.update(dt, &mut core.parts);
        for event in events {
            self.on_tween(event);
        }
    }
}
