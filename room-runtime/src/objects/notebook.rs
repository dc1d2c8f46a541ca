//! # Notebook 模块
//!
//! 带支架的笔记本：支架先落下，笔记本本体延迟半个下落时长后落下。

use tracing::debug;

use crate::error::RoomResult;
use crate::event::ObjectCommand;
use crate::part::{PartDecl, PartId, PartSource};

use super::base::{Behavior, ObjectCore};
use super::{InteractiveObject, ObjectContext, RoomObjectKind};

/// 支架零件（第一组）
pub const ARM_MOUNT_PARTS: &[&str] = &[
    "notebook_stand",
    "notebook_mount",
    "notebook_arm_mount_base",
    "notebook_arm_mount_arm01",
    "notebook_arm_mount_arm02",
];

/// 笔记本零件（第二组）
pub const NOTEBOOK_PARTS: &[&str] = &["notebook_keyboard", "notebook_monitor", "notebook_screen"];

pub const PARTS: &[PartDecl] = &[
    PartDecl::active("notebook_stand"),
    PartDecl::active("notebook_mount"),
    PartDecl::active("notebook_arm_mount_base"),
    PartDecl::active("notebook_arm_mount_arm01"),
    PartDecl::active("notebook_arm_mount_arm02"),
    PartDecl::active("notebook_keyboard"),
    PartDecl::active("notebook_monitor"),
    PartDecl::active("notebook_screen"),
];

/// 笔记本
pub struct Notebook {
    core: ObjectCore<(), ()>,
    arm_mount: Vec<PartId>,
    notebook: Vec<PartId>,
}

impl Notebook {
    pub fn new(sources: &[PartSource], ctx: &mut ObjectContext<'_>) -> RoomResult<Self> {
        let core = ObjectCore::new(RoomObjectKind::Notebook, sources, PARTS, ctx)?;

        let arm_mount = ARM_MOUNT_PARTS
            .iter()
            .map(|name| core.parts.require("notebook", name))
            .collect::<RoomResult<Vec<_>>>()?;
        let notebook = NOTEBOOK_PARTS
            .iter()
            .map(|name| core.parts.require("notebook", name))
            .collect::<RoomResult<Vec<_>>>()?;

        Ok(Self {
            core,
            arm_mount,
            notebook,
        })
    }
}

impl Behavior for Notebook {
    type Tween = ();
    type Action = ();

    fn core_mut(&mut self) -> &mut ObjectCore<(), ()> {
        &mut self.core
    }

    fn on_command(&mut self, command: ObjectCommand) {
        debug!(command = ?command, "笔记本不处理该命令");
    }
}

impl InteractiveObject for Notebook {
    fn kind(&self) -> RoomObjectKind {
        RoomObjectKind::Notebook
    }

    fn show_with_animation(&mut self, delay: f32) {
        self.core.begin_reveal();

        let ids = self.core.all_parts();
        self.core.raise(&ids, delay);

        let fall = self.core.start.object_fall_down_time;
        for id in self.arm_mount.clone() {
            self.core.fall(id, delay, ());
        }
        for id in self.notebook.clone() {
            self.core.fall(id, delay + fall * 0.5, ());
        }

        self.core.complete_reveal_at(delay + fall * 0.5 + fall);
    }

    fn on_click(&mut self, part: PartId) {
        if self.core.accepts_click(part) {
            debug!(part = %part, "笔记本被点击");
        }
    }

    fn meshes_for_outline(&self, _part: PartId) -> Vec<PartId> {
        self.core.parts.active_ids()
    }

    super::delegate_core!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;
    use crate::event::{EventBus, RoomEvent};
    use crate::sound::VirtualAudio;
    use glam::Vec3;

    fn notebook() -> (Notebook, EventBus<RoomEvent>) {
        let config = RoomConfig::default();
        let bus = EventBus::new();
        let mut audio = VirtualAudio::new();
        let mut ctx = ObjectContext {
            config: &config,
            audio: &mut audio,
            events: bus.sender(),
        };
        let sources: Vec<PartSource> = ARM_MOUNT_PARTS
            .iter()
            .chain(NOTEBOOK_PARTS)
            .enumerate()
            .map(|(i, name)| PartSource::new(*name, Vec3::new(0.0, 0.8 + i as f32 * 0.05, 0.0)))
            .collect();
        (Notebook::new(&sources, &mut ctx).unwrap(), bus)
    }

    fn landed(notebook: &Notebook, ids: &[PartId]) -> bool {
        ids.iter().all(|id| {
            let part = notebook.parts().get(*id).unwrap();
            (part.transform.position.y - part.start.position.y).abs() < 1e-5
        })
    }

    #[test]
    fn test_notebook_group_lands_after_arm_mount() {
        let (mut notebook, bus) = notebook();
        let arm_mount = notebook.arm_mount.clone();
        let screen = notebook.notebook.clone();

        notebook.show_with_animation(0.0);
        notebook.update(0.5);
        assert!(landed(&notebook, &arm_mount));
        assert!(!landed(&notebook, &screen));
        assert!(!notebook.is_input_enabled());

        // 0.5 * 1.5 = 0.75
        notebook.update(0.3);
        assert!(landed(&notebook, &screen));
        assert!(notebook.is_input_enabled());
        assert_eq!(
            bus.drain(),
            vec![RoomEvent::ShowAnimationComplete {
                kind: RoomObjectKind::Notebook
            }]
        );
    }

    /// 笔记本点击只记录日志，调试面板不提供按钮
    #[test]
    fn test_debug_menu_has_no_controls() {
        let (mut notebook, bus) = notebook();

        assert!(notebook.debug_menu().entries().is_empty());
        assert!(!notebook.debug_menu_mut().press("Switch on"));
        notebook.update(0.05);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_missing_group_part_fails() {
        let config = RoomConfig::default();
        let bus = EventBus::new();
        let mut audio = VirtualAudio::new();
        let mut ctx = ObjectContext {
            config: &config,
            audio: &mut audio,
            events: bus.sender(),
        };
        let sources: Vec<PartSource> = ARM_MOUNT_PARTS
            .iter()
            .map(|name| PartSource::new(*name, Vec3::ZERO))
            .collect();

        assert!(Notebook::new(&sources, &mut ctx).is_err());
    }
}
