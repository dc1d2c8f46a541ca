//! # Air Conditioner 模块
//!
//! 空调：点击切换电源，开机时导风板打开，关机时关闭。
//!
//! 导风板的转动时长与剩余角度成正比；转动中切换电源会停止当前补间，
//! 从当前位置转向新目标。

use glam::Vec3;
use tracing::{debug, info};

use crate::animation::{EasingFunction, Property, TweenEvent, TweenId, TweenSpec, TweenTarget};
use crate::config::AirConditionerConfig;
use crate::error::RoomResult;
use crate::event::{ObjectCommand, RoomEvent};
use crate::part::{PartDecl, PartId, PartSource};
use crate::sound::SoundController;

use super::base::{Behavior, ObjectCore};
use super::{InteractiveObject, MoveDirection, ObjectContext, OpenState, PowerState, RoomObjectKind};

pub const BODY: &str = "air_conditioner_body";
pub const DOOR: &str = "air_conditioner_door";

pub const PARTS: &[PartDecl] = &[PartDecl::active(BODY), PartDecl::active(DOOR)];

/// 补间标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirConditionerTween {
    Fall,
    Door(MoveDirection),
}

/// 空调
pub struct AirConditioner {
    core: ObjectCore<AirConditionerTween, ()>,
    config: AirConditionerConfig,
    body: PartId,
    door: PartId,
    power: PowerState,
    door_state: OpenState,
    door_tween: Option<TweenId>,
    sounds: SoundController,
}

impl AirConditioner {
    pub fn new(sources: &[PartSource], ctx: &mut ObjectContext<'_>) -> RoomResult<Self> {
        let config = ctx.config.air_conditioner.clone();
        let mut core = ObjectCore::new(RoomObjectKind::AirConditioner, sources, PARTS, ctx)?;
        let body = core.parts.require("air_conditioner", BODY)?;
        let door = core.parts.require("air_conditioner", DOOR)?;

        let sound_config = ctx.config.sounds.for_kind(RoomObjectKind::AirConditioner);
        let sounds = SoundController::new(
            "air_conditioner",
            &mut *ctx.audio,
            &sound_config,
            ctx.config.global_volume,
            &[core.parts.position(body)],
            ("air-conditioner-on", "air-conditioner-off"),
            Vec3::ZERO,
        )?;

        core.debug
            .add_monitor("Power", "")
            .add_monitor("Door", "")
            .add_button("Change state", ObjectCommand::ChangeState)
            .add_number("Rotation speed", config.rotation_speed, (10.0, 500.0), |speed| {
                ObjectCommand::SetSpeed { speed }
            });

        let power = if config.power_on { PowerState::On } else { PowerState::Off };
        let mut air_conditioner = Self {
            core,
            config,
            body,
            door,
            power,
            door_state: OpenState::Closed,
            door_tween: None,
            sounds,
        };
        air_conditioner.snap_door();
        Ok(air_conditioner)
    }

    pub fn power(&self) -> PowerState {
        self.power
    }

    pub fn door_state(&self) -> OpenState {
        self.door_state
    }

    /// 导风板当前角度（度）
    pub fn door_angle(&self) -> f32 {
        self.core
            .parts
            .get(self.door)
            .map_or(0.0, |p| (p.transform.rotation.x - p.start.rotation.x).to_degrees())
    }

    /// 切换电源
    pub fn switch_power(&mut self) {
        self.power = self.power.toggled();
        info!(power = ?self.power, "空调电源切换");

        match self.power {
            PowerState::On => {
                self.sounds.play_open(0);
                self.move_door(MoveDirection::Out);
            }
            PowerState::Off => {
                self.sounds.play_close(0);
                self.move_door(MoveDirection::In);
            }
        }
        self.notify();
    }

    fn target_angle(&self, direction: MoveDirection) -> f32 {
        match direction {
            MoveDirection::Out => self.config.max_open_angle,
            MoveDirection::In => 0.0,
        }
    }

    fn move_door(&mut self, direction: MoveDirection) {
        if let Some(id) = self.door_tween.take() {
            self.core.tweens.stop(id);
        }
        if self.door_state == direction.end_state() {
            return;
        }

        let target = self.target_angle(direction);
        let duration = (self.door_angle() - target).abs() / self.config.rotation_speed;
        let start = self.core.parts.get(self.door).map_or(0.0, |p| p.start.rotation.x);

        let spec = TweenSpec::new(
            TweenTarget::new(self.door, Property::RotationX),
            start + target.to_radians(),
            duration,
        )
        .with_easing(EasingFunction::EaseInOutSine);
        self.door_tween = Some(self.core.tweens.start(spec, AirConditionerTween::Door(direction)));
        debug!(direction = ?direction, duration, "导风板开始转动");
    }

    /// 把导风板直接放到当前电源对应的位置
    fn snap_door(&mut self) {
        let (direction, state) = match self.power {
            PowerState::On => (MoveDirection::Out, OpenState::Opened),
            PowerState::Off => (MoveDirection::In, OpenState::Closed),
        };
        let angle = self.target_angle(direction).to_radians();
        if let Some(part) = self.core.parts.get_mut(self.door) {
            part.transform.rotation.x = part.start.rotation.x + angle;
        }
        self.door_state = state;
        self.door_tween = None;
        self.refresh_monitors();
    }

    fn notify(&mut self) {
        self.core.events.post(RoomEvent::AirConditionerStateChanged {
            power: self.power,
            door: self.door_state,
        });
        self.refresh_monitors();
    }

    fn refresh_monitors(&mut self) {
        let power = match self.power {
            PowerState::On => "On",
            PowerState::Off => "Off",
        };
        self.core.debug.update_monitor("Power", power);
        self.core.debug.update_monitor("Door", self.door_state.to_string());
    }
}

impl Behavior for AirConditioner {
    type Tween = AirConditionerTween;
    type Action = ();

    fn core_mut(&mut self) -> &mut ObjectCore<AirConditionerTween, ()> {
        &mut self.core
    }

    fn on_command(&mut self, command: ObjectCommand) {
        match command {
            ObjectCommand::ChangeState | ObjectCommand::SwitchOn => self.switch_power(),
            ObjectCommand::SetSpeed { speed } if speed > 0.0 => self.config.rotation_speed = speed,
            other => debug!(command = ?other, "空调不处理该命令"),
        }
    }

    fn on_tween(&mut self, event: TweenEvent<AirConditionerTween>) {
        let AirConditionerTween::Door(direction) = event.tag() else {
            return;
        };
        if self.door_tween != Some(event.id()) {
            return;
        }

        match event {
            TweenEvent::Started { .. } => {
                self.door_state = OpenState::Moving;
                self.notify();
            }
            TweenEvent::Updated { .. } => {}
            TweenEvent::Completed { .. } => {
                self.door_state = direction.end_state();
                self.door_tween = None;
                self.notify();
            }
        }
    }
}

impl InteractiveObject for AirConditioner {
    fn kind(&self) -> RoomObjectKind {
        RoomObjectKind::AirConditioner
    }

    fn show_with_animation(&mut self, delay: f32) {
        self.core.begin_reveal();
        self.snap_door();

        let ids = self.core.all_parts();
        self.core.raise(&ids, delay);
        for id in ids {
            self.core.fall(id, delay, AirConditionerTween::Fall);
        }

        let fall = self.core.start.object_fall_down_time;
        self.core.complete_reveal_at(delay + fall);
    }

    fn on_click(&mut self, part: PartId) {
        if !self.core.accepts_click(part) {
            return;
        }
        if part == self.body || part == self.door {
            self.switch_power();
        }
    }

    fn meshes_for_outline(&self, _part: PartId) -> Vec<PartId> {
        self.core.all_parts()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;
    use crate::event::EventBus;
    use crate::sound::VirtualAudio;

    fn air_conditioner() -> (AirConditioner, EventBus<RoomEvent>) {
        let config = RoomConfig::default();
        let bus = EventBus::new();
        let mut audio = VirtualAudio::new();
        let mut ctx = ObjectContext {
            config: &config,
            audio: &mut audio,
            events: bus.sender(),
        };
        let sources = vec![
            PartSource::new(BODY, Vec3::new(0.0, 3.0, -2.0)),
            PartSource::new(DOOR, Vec3::new(0.0, 2.8, -1.9)),
        ];
        (AirConditioner::new(&sources, &mut ctx).unwrap(), bus)
    }

    #[test]
    fn test_power_on_opens_door() {
        let (mut ac, bus) = air_conditioner();
        let body = ac.parts().id_of(BODY).unwrap();

        ac.on_click(body);
        assert_eq!(ac.power(), PowerState::On);

        // 70 度 / 140 度每秒
        ac.update(0.25);
        assert_eq!(ac.door_state(), OpenState::Moving);
        ac.update(0.25);
        assert_eq!(ac.door_state(), OpenState::Opened);
        assert!((ac.door_angle() - 70.0).abs() < 1e-3);

        let events = bus.drain();
        assert_eq!(
            events.last(),
            Some(&RoomEvent::AirConditionerStateChanged {
                power: PowerState::On,
                door: OpenState::Opened,
            })
        );
    }

    #[test]
    fn test_power_off_mid_motion_reverses() {
        let (mut ac, _bus) = air_conditioner();
        let body = ac.parts().id_of(BODY).unwrap();

        ac.on_click(body);
        ac.update(0.25);
        let angle = ac.door_angle();
        assert!(angle > 0.0 && angle < 70.0);

        ac.on_click(body);
        assert_eq!(ac.power(), PowerState::Off);
        ac.update(0.5);
        assert_eq!(ac.door_state(), OpenState::Closed);
        assert!(ac.door_angle().abs() < 1e-3);
    }
}
