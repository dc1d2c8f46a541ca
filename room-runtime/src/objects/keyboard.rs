//! # Keyboard 模块
//!
//! 键盘：整体下落，点击时发出 `KeyPressed`。

use tracing::debug;

use crate::error::RoomResult;
use crate::event::{ObjectCommand, RoomEvent};
use crate::part::{PartDecl, PartId, PartSource};

use super::base::{Behavior, ObjectCore};
use super::{InteractiveObject, ObjectContext, RoomObjectKind};

/// 键盘零件
pub const PARTS: &[PartDecl] = &[PartDecl::active("base")];

/// 键盘
pub struct Keyboard {
    core: ObjectCore<(), ()>,
}

impl Keyboard {
    pub fn new(sources: &[PartSource], ctx: &mut ObjectContext<'_>) -> RoomResult<Self> {
        let mut core = ObjectCore::new(RoomObjectKind::Keyboard, sources, PARTS, ctx)?;
        core.debug.add_button("Switch on", ObjectCommand::SwitchOn);
        Ok(Self { core })
    }

    fn press(&mut self) {
        debug!("键盘被按下");
        self.core.events.post(RoomEvent::KeyPressed);
    }
}

impl Behavior for Keyboard {
    type Tween = ();
    type Action = ();

    fn core_mut(&mut self) -> &mut ObjectCore<(), ()> {
        &mut self.core
    }

    fn on_command(&mut self, command: ObjectCommand) {
        if command == ObjectCommand::SwitchOn {
            if self.core.is_input_enabled() {
                self.press();
            }
        } else {
            debug!(command = ?command, "键盘不处理该命令");
        }
    }
}

impl InteractiveObject for Keyboard {
    fn kind(&self) -> RoomObjectKind {
        RoomObjectKind::Keyboard
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
            self.press();
        }
    }

    fn meshes_for_outline(&self, _part: PartId) -> Vec<PartId> {
        self.core.parts.active_ids()
    }

    super::delegate_core!();
}
