//! # Locker 模块
//!
//! 带多个抽屉的柜子。
//!
//! ## 抽屉状态机
//!
//! ```text
//!            move(Out)               完成
//! Closed ───────────────▶ Moving ─────────▶ Opened
//!    ▲                      │  ▲               │
//!    │        完成           │  │  move(In)     │
//!    └──────────────────────┘  └───────────────┘
//! ```
//!
//! - 每个抽屉同时最多一个补间，新的移动总是先停止旧补间
//! - 移动时长 = 剩余距离 / 速度，中途打断后速度保持一致
//! - 移动中再次点击会按 `previous_state` 反向（打断并反转）
//!
//! ## 展示动画
//!
//! 柜体从高处落下；抽屉从 `case_start_position_z` 处由 0 缩放到 1，
//! 缩放完成后滑入载入位置。

mod sequence;

pub use sequence::{CaseStart, CasesAnimationMode, GroupAnimation, schedule};

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::animation::{EasingFunction, Property, TweenEvent, TweenId, TweenSpec, TweenTarget};
use crate::config::LockerConfig;
use crate::error::{RoomError, RoomResult};
use crate::event::{ObjectCommand, RoomEvent};
use crate::part::{PartDecl, PartId, PartRegistry, PartSource};
use crate::sound::SoundController;

use super::base::{Behavior, ObjectCore};
use super::{InteractiveObject, MoveDirection, ObjectContext, OpenState, RoomObjectKind};

/// 柜体零件名
pub const BODY: &str = "body";

/// 抽屉零件名（下标从 0 开始，名称从 01 开始）
pub fn case_name(index: usize) -> String {
    format!("case{:02}", index + 1)
}

/// 从零件名解析抽屉下标
///
/// # 错误
/// 名称不是 `caseNN`（NN >= 1）时返回 `RoomError::InvalidCaseName`
pub fn parse_case_index(name: &str) -> RoomResult<usize> {
    name.strip_prefix("case")
        .and_then(|digits| digits.parse::<usize>().ok())
        .and_then(|number| number.checked_sub(1))
        .ok_or_else(|| RoomError::InvalidCaseName {
            name: name.to_string(),
        })
}

/// 补间标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockerTween {
    /// 展示：柜体下落
    BodyFall,
    /// 展示：抽屉缩放
    CaseScale(usize),
    /// 展示：抽屉滑入
    CaseSlide(usize),
    /// 抽屉开合
    CaseMove {
        case: usize,
        direction: MoveDirection,
        play_sound: bool,
    },
}

/// 延迟调用动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockerAction {
    PlayCloseSound(usize),
}

/// 抽屉
#[derive(Debug, Clone, PartialEq)]
pub struct LockerCase {
    /// 抽屉下标
    pub id: usize,
    /// 对应零件
    pub part: PartId,
    pub state: OpenState,
    /// 开始移动前的静止状态（打断反转用）
    pub previous_state: OpenState,
    /// 当前开合补间
    tween: Option<TweenId>,
}

impl LockerCase {
    fn new(id: usize, part: PartId) -> Self {
        Self {
            id,
            part,
            state: OpenState::Closed,
            previous_state: OpenState::Closed,
            tween: None,
        }
    }

    /// 当前开合补间
    pub fn tween(&self) -> Option<TweenId> {
        self.tween
    }
}

/// 柜子
pub struct Locker {
    core: ObjectCore<LockerTween, LockerAction>,
    config: LockerConfig,
    body: PartId,
    cases: Vec<LockerCase>,
    sounds: SoundController,
    animation: CasesAnimationMode,
    rng: StdRng,
}

impl Locker {
    /// 创建柜子
    ///
    /// # 错误
    /// - 柜体或任一抽屉零件缺失
    /// - 抽屉名称无法解析或与声明顺序不一致
    /// - 音频后端缺少开 / 关音效
    pub fn new(sources: &[PartSource], ctx: &mut ObjectContext<'_>) -> RoomResult<Self> {
        let config = ctx.config.locker.clone();

        let mut decls = vec![PartDecl::active(BODY)];
        decls.extend((0..config.cases_count).map(|i| PartDecl::named(case_name(i), true)));

        let mut core = ObjectCore::new(RoomObjectKind::Locker, sources, &decls, ctx)?;
        let body = core.parts.require("locker", BODY)?;
        let cases = register_cases(&mut core.parts, config.cases_count)?;

        let anchors: Vec<Vec3> = cases.iter().map(|c| core.parts.position(c.part)).collect();
        let sound_config = ctx.config.sounds.for_kind(RoomObjectKind::Locker);
        let sounds = SoundController::new(
            "locker",
            &mut *ctx.audio,
            &sound_config,
            ctx.config.global_volume,
            &anchors,
            ("open-case", "close-case"),
            Vec3::new(0.0, 0.0, config.sound_offset_z),
        )?;

        let rng = match ctx.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut locker = Self {
            core,
            animation: config.animation,
            config,
            body,
            cases,
            sounds,
            rng,
        };
        locker.init_debug_menu();

        info!(cases = locker.cases.len(), "柜子初始化完成");
        Ok(locker)
    }

    fn init_debug_menu(&mut self) {
        let mut options = vec![(
            "Random".to_string(),
            ObjectCommand::ChangeAllCasesAnimation {
                mode: CasesAnimationMode::Random,
            },
        )];
        options.extend(GroupAnimation::ALL.iter().map(|a| {
            (
                a.label().to_string(),
                ObjectCommand::ChangeAllCasesAnimation {
                    mode: CasesAnimationMode::Fixed(*a),
                },
            )
        }));
        let selected = match self.animation {
            CasesAnimationMode::Random => 0,
            CasesAnimationMode::Fixed(a) => {
                GroupAnimation::ALL.iter().position(|x| *x == a).map_or(0, |i| i + 1)
            }
        };

        let menu = &mut self.core.debug;
        for case in &self.cases {
            menu.add_button(
                &format!("Push case {}", case.id + 1),
                ObjectCommand::PushCase { case: case.id },
            );
        }
        menu.add_button("Push all cases", ObjectCommand::PushAllCases)
            .add_list("All cases animation", options, selected)
            .add_number("Case speed", self.config.case_move_speed, (0.1, 10.0), |speed| {
                ObjectCommand::SetSpeed { speed }
            })
            .add_monitor("Cases", "");

        self.refresh_monitor();
    }

    // ========== 查询 ==========

    pub fn cases(&self) -> &[LockerCase] {
        &self.cases
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn case_state(&self, case: usize) -> Option<OpenState> {
        self.cases.get(case).map(|c| c.state)
    }

    pub fn previous_state(&self, case: usize) -> Option<OpenState> {
        self.cases.get(case).map(|c| c.previous_state)
    }

    /// 抽屉当前 z
    pub fn case_position_z(&self, case: usize) -> Option<f32> {
        let part = self.cases.get(case)?.part;
        self.core.parts.get(part).map(|p| p.transform.position.z)
    }

    /// 抽屉载入时的 z
    pub fn case_start_z(&self, case: usize) -> Option<f32> {
        let part = self.cases.get(case)?.part;
        self.core.parts.get(part).map(|p| p.start.position.z)
    }

    /// 抽屉当前开合补间的时长
    pub fn case_move_duration(&self, case: usize) -> Option<f32> {
        let id = self.cases.get(case)?.tween?;
        self.core.tweens.get(id).map(|t| t.duration)
    }

    pub fn animation_mode(&self) -> CasesAnimationMode {
        self.animation
    }

    pub fn set_animation_mode(&mut self, mode: CasesAnimationMode) {
        debug!(mode = ?mode, "修改成组动画");
        self.animation = mode;
    }

    /// 修改抽屉移动速度（已开始的补间不受影响）
    pub fn set_case_move_speed(&mut self, speed: f32) {
        if speed > 0.0 {
            self.config.case_move_speed = speed;
        }
    }

    pub fn sound_controller(&self) -> &SoundController {
        &self.sounds
    }

    // ========== 操作 ==========

    /// 切换一个抽屉
    ///
    /// 移动中再次切换会停止当前补间并反向。
    pub fn push_case(&mut self, case: usize) {
        let Some(current) = self.cases.get_mut(case) else {
            debug!(case, "抽屉不存在，忽略");
            return;
        };

        match current.state {
            OpenState::Moving => {
                let direction = MoveDirection::reversed_from(current.previous_state);
                self.move_case(case, direction, 0.0, true);
            }
            OpenState::Opened => self.move_case(case, MoveDirection::In, 0.0, true),
            OpenState::Closed => self.move_case(case, MoveDirection::Out, 0.0, true),
        }
    }

    /// 打开 / 关闭所有抽屉
    ///
    /// 全部关闭时播放成组动画，否则同时关闭所有抽屉，
    /// 只在关闭时长结束后播放一次 0 号抽屉的关闭音效。
    pub fn push_all_cases(&mut self) {
        let all_closed = self.cases.iter().all(|c| c.state == OpenState::Closed);

        if all_closed {
            let animation = self.animation.pick(&mut self.rng);
            self.play_group_animation(animation);
        } else {
            for case in 0..self.cases.len() {
                self.move_case(case, MoveDirection::In, 0.0, false);
            }

            let time = self.config.case_move_distance / self.config.case_move_speed;
            self.core.timers.call(time, LockerAction::PlayCloseSound(0));
        }
    }

    /// 按成组动画打开所有抽屉
    pub fn play_group_animation(&mut self, animation: GroupAnimation) {
        debug!(animation = ?animation, "播放成组动画");
        let starts = schedule(
            animation,
            self.cases.len(),
            self.config.case_move_speed,
            self.config.all_cases_animation_delay_coefficient,
        );
        for start in starts {
            self.move_case(start.case, MoveDirection::Out, start.delay, true);
        }
    }

    /// 移动一个抽屉
    ///
    /// 已处于目标静止状态时不做任何事（但旧补间仍会被停止）。
    /// 开始移动时 `previous_state` 记为出发的静止状态，供打断反转使用。
    pub fn move_case(&mut self, case: usize, direction: MoveDirection, delay: f32, play_sound: bool) {
        let Some(current) = self.cases.get_mut(case) else {
            return;
        };

        if let Some(id) = current.tween.take() {
            self.core.tweens.stop(id);
        }

        if current.state == direction.end_state() {
            return;
        }

        let Some(part) = self.core.parts.get(current.part) else {
            return;
        };
        let start_z = part.start.position.z;
        let end_z = match direction {
            MoveDirection::Out => start_z + self.config.case_move_distance,
            MoveDirection::In => start_z,
        };
        let duration = (part.transform.position.z - end_z).abs() / self.config.case_move_speed;

        let spec = TweenSpec::new(TweenTarget::new(current.part, Property::PositionZ), end_z, duration)
            .with_easing(EasingFunction::EaseOutSine)
            .with_delay(delay);
        let id = self.core.tweens.start(
            spec,
            LockerTween::CaseMove {
                case,
                direction,
                play_sound,
            },
        );
        current.tween = Some(id);
        current.previous_state = direction.start_state();
        debug!(case, direction = ?direction, duration, delay, "抽屉开始移动");
    }

    // ========== 内部 ==========

    fn set_case_state(&mut self, case: usize, state: OpenState) {
        let Some(current) = self.cases.get_mut(case) else {
            return;
        };
        current.state = state;
        self.core.events.post(RoomEvent::CaseStateChanged { case, state });
        self.refresh_monitor();
    }

    fn refresh_monitor(&mut self) {
        let text = self
            .cases
            .iter()
            .map(|c| c.state.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.core.debug.update_monitor("Cases", text);
    }

    fn sync_case_sound(&mut self, case: usize) {
        if let Some(current) = self.cases.get(case) {
            let position = self.core.parts.position(current.part);
            self.sounds.sync_position(case, position);
        }
    }

    /// 展示前把抽屉恢复到基线
    fn reset(&mut self) {
        for case in &mut self.cases {
            case.state = OpenState::Closed;
            case.previous_state = OpenState::Closed;
            case.tween = None;
            self.core.parts.restore(case.part, Property::PositionZ);
        }
        for case in 0..self.cases.len() {
            self.sync_case_sound(case);
        }
        self.refresh_monitor();
    }

    fn set_position_for_show_animation(&mut self, delay: f32) {
        self.core.raise(&[self.body], delay);

        let start_z = self.config.case_start_position_z;
        for case in &self.cases {
            if let Some(part) = self.core.parts.get_mut(case.part) {
                part.transform.position.z = start_z;
                part.transform.scale = Vec3::ZERO;
            }
        }
    }

    fn start_slide(&mut self, case: usize) {
        let Some(current) = self.cases.get(case) else {
            return;
        };
        let Some(part) = self.core.parts.get(current.part) else {
            return;
        };
        let spec = TweenSpec::new(
            TweenTarget::new(current.part, Property::PositionZ),
            part.start.position.z,
            self.config.case_slide_time,
        )
        .with_easing(self.core.start.scale_easing);
        self.core.tweens.start(spec, LockerTween::CaseSlide(case));
    }
}

/// 缓存抽屉下标并与声明顺序核对
fn register_cases(parts: &mut PartRegistry, count: usize) -> RoomResult<Vec<LockerCase>> {
    let mut cases = Vec::with_capacity(count);

    for declared in 0..count {
        let name = case_name(declared);
        let id = parts.require("locker", &name)?;
        let part = parts.get_mut(id).ok_or_else(|| RoomError::MissingPart {
            object: "locker".to_string(),
            part: name.clone(),
        })?;

        let parsed = parse_case_index(&part.name)?;
        if parsed != declared {
            return Err(RoomError::CaseIndexMismatch {
                name: part.name.clone(),
                parsed,
                declared,
            });
        }
        part.case_id = Some(parsed);
        cases.push(LockerCase::new(parsed, id));
    }

    Ok(cases)
}

impl Behavior for Locker {
    type Tween = LockerTween;
    type Action = LockerAction;

    fn core_mut(&mut self) -> &mut ObjectCore<LockerTween, LockerAction> {
        &mut self.core
    }

    fn on_command(&mut self, command: ObjectCommand) {
        match command {
            ObjectCommand::PushCase { case } => self.push_case(case),
            ObjectCommand::PushAllCases => self.push_all_cases(),
            ObjectCommand::ChangeAllCasesAnimation { mode } => self.set_animation_mode(mode),
            ObjectCommand::SetSpeed { speed } => self.set_case_move_speed(speed),
            other => debug!(command = ?other, "柜子不处理该命令"),
        }
    }

    fn on_action(&mut self, action: LockerAction) {
        match action {
            LockerAction::PlayCloseSound(case) => self.sounds.play_close(case),
        }
    }

    fn on_tween(&mut self, event: TweenEvent<LockerTween>) {
        match event.tag() {
            LockerTween::CaseMove {
                case,
                direction,
                play_sound,
            } => {
                // 已被替换的补间不再影响状态
                if self.cases.get(case).and_then(|c| c.tween) != Some(event.id()) {
                    return;
                }

                match event {
                    TweenEvent::Started { .. } => {
                        self.set_case_state(case, OpenState::Moving);
                        if play_sound {
                            self.sounds.play_open(case);
                        }
                    }
                    TweenEvent::Updated { .. } => self.sync_case_sound(case),
                    TweenEvent::Completed { .. } => {
                        let state = direction.end_state();
                        if let Some(current) = self.cases.get_mut(case) {
                            current.previous_state = state;
                            current.tween = None;
                        }
                        self.set_case_state(case, state);
                        debug!(case, state = %state, "抽屉移动完成");

                        if play_sound && state == OpenState::Closed {
                            self.sounds.play_close(case);
                        }
                    }
                }
            }
            LockerTween::CaseScale(case) => {
                if matches!(event, TweenEvent::Completed { .. }) {
                    self.start_slide(case);
                }
            }
            LockerTween::CaseSlide(case) => self.sync_case_sound(case),
            LockerTween::BodyFall => {}
        }
    }
}

impl InteractiveObject for Locker {
    fn kind(&self) -> RoomObjectKind {
        RoomObjectKind::Locker
    }

    fn show_with_animation(&mut self, delay: f32) {
        self.core.begin_reveal();
        self.reset();
        self.set_position_for_show_animation(delay);

        let fall = self.core.start.object_fall_down_time;
        self.core.fall(self.body, delay, LockerTween::BodyFall);

        for case in &self.cases {
            let spec = TweenSpec::new(
                TweenTarget::new(case.part, Property::Scale),
                1.0,
                self.config.case_scale_time,
            )
            .with_easing(EasingFunction::EaseOutBack)
            .with_delay(delay + fall * 0.5 + case.id as f32 * self.config.case_stagger);
            self.core.tweens.start(spec, LockerTween::CaseScale(case.id));
        }

        let total = fall * 0.5
            + self.cases.len() as f32 * self.config.case_stagger
            + self.config.case_scale_time
            + self.config.case_slide_time;
        self.core.complete_reveal_at(delay + total);
    }

    fn on_click(&mut self, part: PartId) {
        if !self.core.accepts_click(part) {
            return;
        }

        if part == self.body {
            self.push_all_cases();
            return;
        }

        if let Some(case) = self.core.parts.get(part).and_then(|p| p.case_id) {
            self.push_case(case);
        }
    }

    fn meshes_for_outline(&self, part: PartId) -> Vec<PartId> {
        if part == self.body {
            return self.core.all_parts();
        }

        self.core
            .parts
            .get(part)
            .and_then(|p| p.case_id)
            .and_then(|case| self.cases.get(case))
            .map(|c| vec![c.part])
            .unwrap_or_default()
    }

    fn sounds(&self) -> Option<&SoundController> {
        Some(&self.sounds)
    }

    fn on_volume_changed(&mut self, volume: f32) {
        self.sounds.on_volume_changed(volume);
    }

    fn enable_sound(&mut self) {
        self.sounds.enable();
    }

    fn disable_sound(&mut self) {
        self.sounds.disable();
    }

    fn show_sound_helpers(&mut self) {
        self.sounds.show_helpers();
    }

    fn hide_sound_helpers(&mut self) {
        self.sounds.hide_helpers();
    }

    super::delegate_core!();
}
