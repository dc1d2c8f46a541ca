//! # Floor Lamp 模块
//!
//! 落地灯：只有展示动画，点击没有效果。

use tracing::debug;

use crate::error::RoomResult;
use crate::event::ObjectCommand;
use crate::part::{PartDecl, PartId, PartSource};

use super::base::{Behavior, ObjectCore};
use super::{InteractiveObject, ObjectContext, RoomObjectKind};

pub const PARTS: &[PartDecl] = &[PartDecl::active("stand"), PartDecl::active("lamp")];

/// 落地灯
pub struct FloorLamp {
    core: ObjectCore<(), ()>,
}

impl FloorLamp {
    pub fn new(sources: &[PartSource], ctx: &mut ObjectContext<'_>) -> RoomResult<Self> {
        let core = ObjectCore::new(RoomObjectKind::FloorLamp, sources, PARTS, ctx)?;
        Ok(Self { core })
    }
}

impl Behavior for FloorLamp {
    type Tween = ();
    type Action = ();

    fn core_mut(&mut self) -> &mut ObjectCore<(), ()> {
        &mut self.core
    }

    fn on_command(&mut self, command: ObjectCommand) {
        debug!(command = ?command, "落地灯不处理该命令");
    }
}

impl InteractiveObject for FloorLamp {
    fn kind(&self) -> RoomObjectKind {
        RoomObjectKind::FloorLamp
    }

    fn show_with_animation(&mut self, delay: f32) {
        self.core.begin_reveal();

        let ids = self.core.all_parts();
        self.core.raise(&ids, delay);
        for id in ids {
            self.core.fall(id, delay, ());
        }

        let fall = self.core.start.object_fall_down_time;
        self.core.complete_reveal_at(delay + fall);
    }

    fn on_click(&mut self, part: PartId) {
        if self.core.accepts_click(part) {
            debug!("落地灯被点击");
        }
    }

    fn meshes_for_outline(&self, _part: PartId) -> Vec<PartId> {
        self.core.parts.active_ids()
    }

    super::delegate_core!();
}
