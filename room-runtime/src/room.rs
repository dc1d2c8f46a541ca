//! # Room 模块
//!
//! 场景控制器：持有房间中的所有对象，负责展示顺序、音量广播、
//! 指针输入路由（点击 / 悬停描边），并收集对象发出的事件。

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::RoomConfig;
use crate::error::{ConfigError, RoomError, RoomResult};
use crate::event::{EventBus, PointerInput, RoomEvent};
use crate::objects::{InteractiveObject, ObjectContext, RoomObjectKind, create_object};
use crate::part::{PartId, PartSource};
use crate::sound::AudioBackend;

/// 房间布局：每个对象的几何数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    #[serde(default)]
    pub objects: BTreeMap<RoomObjectKind, Vec<PartSource>>,
}

impl RoomLayout {
    /// 从 JSON 文件读取
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// 指针拾取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub object: RoomObjectKind,
    /// 零件名
    pub part: String,
}

/// 屏幕坐标 → 零件（宿主提供的射线检测）
pub trait PartPicker {
    fn pick(&self, x: f32, y: f32) -> Option<Hit>;
}

impl<F> PartPicker for F
where
    F: Fn(f32, f32) -> Option<Hit>,
{
    fn pick(&self, x: f32, y: f32) -> Option<Hit> {
        self(x, y)
    }
}

/// 当前描边
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub object: RoomObjectKind,
    pub parts: Vec<PartId>,
}

/// 房间
pub struct Room {
    /// 按展示顺序排列
    objects: Vec<Box<dyn InteractiveObject>>,
    events: EventBus<RoomEvent>,
    global_volume: f32,
    sound_enabled: bool,
    show_delay_step: f32,
    click_threshold: f32,
    pointer_down: Option<Vec2>,
    outline: Option<Outline>,
}

impl Room {
    /// 构造房间中的所有对象
    ///
    /// # 错误
    /// - 配置验证失败
    /// - 任一对象缺少零件或音效
    pub fn new(layout: &RoomLayout, config: &RoomConfig, audio: &mut dyn AudioBackend) -> RoomResult<Self> {
        config.validate()?;

        let events = EventBus::new();
        let mut ctx = ObjectContext {
            config,
            audio,
            events: events.sender(),
        };

        let mut objects = Vec::new();
        for kind in RoomObjectKind::ALL {
            let Some(sources) = layout.objects.get(&kind) else {
                debug!(object = %kind, "布局中没有该对象，跳过");
                continue;
            };
            objects.push(create_object(kind, sources, &mut ctx)?);
        }

        info!(objects = objects.len(), "房间初始化完成");
        Ok(Self {
            objects,
            events,
            global_volume: config.global_volume,
            sound_enabled: true,
            show_delay_step: config.start_animation.show_delay_step,
            click_threshold: config.click_threshold,
            pointer_down: None,
            outline: None,
        })
    }

    /// 依次播放所有对象的展示动画
    pub fn show(&mut self) {
        self.outline = None;
        for (index, object) in self.objects.iter_mut().enumerate() {
            object.show_with_animation(index as f32 * self.show_delay_step);
        }
    }

    pub fn object(&self, kind: RoomObjectKind) -> Option<&dyn InteractiveObject> {
        self.objects.iter().find(|o| o.kind() == kind).map(|o| o.as_ref())
    }

    pub fn object_mut(&mut self, kind: RoomObjectKind) -> Option<&mut (dyn InteractiveObject + 'static)> {
        self.objects.iter_mut().find(|o| o.kind() == kind).map(|o| o.as_mut())
    }

    pub fn kinds(&self) -> Vec<RoomObjectKind> {
        self.objects.iter().map(|o| o.kind()).collect()
    }

    pub fn global_volume(&self) -> f32 {
        self.global_volume
    }

    /// 修改全局音量并广播
    pub fn set_global_volume(&mut self, volume: f32) {
        self.global_volume = volume.clamp(0.0, 1.0);
        for object in &mut self.objects {
            object.on_volume_changed(self.global_volume);
        }
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn enable_sound(&mut self) {
        self.sound_enabled = true;
        for object in &mut self.objects {
            object.enable_sound();
        }
    }

    pub fn disable_sound(&mut self) {
        self.sound_enabled = false;
        for object in &mut self.objects {
            object.disable_sound();
        }
    }

    pub fn show_sound_helpers(&mut self) {
        for object in &mut self.objects {
            object.show_sound_helpers();
        }
    }

    pub fn hide_sound_helpers(&mut self) {
        for object in &mut self.objects {
            object.hide_sound_helpers();
        }
    }

    /// 按名称点击对象的零件
    ///
    /// # 错误
    /// 房间中没有该对象时返回 `RoomError::UnknownObject`；零件名不存在时静默忽略。
    pub fn click(&mut self, kind: RoomObjectKind, part: &str) -> RoomResult<()> {
        let object = self.object_mut(kind).ok_or_else(|| RoomError::UnknownObject {
            kind: kind.to_string(),
        })?;

        match object.parts().id_of(part) {
            Some(id) => object.on_click(id),
            None => debug!(object = %kind, part = part, "零件不存在，忽略点击"),
        }
        Ok(())
    }

    /// 处理指针输入
    ///
    /// 按下与抬起的位移不超过阈值时视为点击，否则视为拖拽（忽略）。
    pub fn on_pointer(&mut self, input: PointerInput, picker: &dyn PartPicker) {
        match input {
            PointerInput::Move { x, y } => self.update_outline(picker.pick(x, y)),
            PointerInput::Down { x, y } => self.pointer_down = Some(Vec2::new(x, y)),
            PointerInput::Up { x, y } => {
                let Some(down) = self.pointer_down.take() else {
                    return;
                };
                if down.distance(Vec2::new(x, y)) > self.click_threshold {
                    debug!("指针位移超过阈值，视为拖拽");
                    return;
                }
                if let Some(hit) = picker.pick(x, y) {
                    // 拾取到布局外的对象时静默忽略
                    let _ = self.click(hit.object, &hit.part);
                }
            }
            PointerInput::Leave => {
                self.pointer_down = None;
                self.outline = None;
            }
        }
    }

    fn update_outline(&mut self, hit: Option<Hit>) {
        self.outline = hit.and_then(|hit| {
            let object = self.object(hit.object)?;
            if !object.is_input_enabled() {
                return None;
            }
            let part = object.parts().id_of(&hit.part)?;
            if !object.parts().get(part)?.active {
                return None;
            }
            Some(Outline {
                object: hit.object,
                parts: object.meshes_for_outline(part),
            })
        });
    }

    /// 当前描边
    pub fn outline(&self) -> Option<&Outline> {
        self.outline.as_ref()
    }

    /// 推进一帧，返回本帧对象发出的事件
    pub fn update(&mut self, dt: f32) -> Vec<RoomEvent> {
        for object in &mut self.objects {
            object.update(dt);
        }
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_json() {
        let layout = RoomLayout::from_json(
            r#"{
                "objects": {
                    "floor_lamp": [
                        { "name": "stand", "position": [1.0, 0.0, 1.0] },
                        { "name": "lamp", "position": [1.0, 1.6, 1.0] }
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(layout.objects.len(), 1);
        assert_eq!(layout.objects[&RoomObjectKind::FloorLamp][1].name, "lamp");
    }

    #[test]
    fn test_closure_picker() {
        let picker = |x: f32, _y: f32| {
            (x < 10.0).then(|| Hit {
                object: RoomObjectKind::Locker,
                part: "body".to_string(),
            })
        };

        assert!(picker.pick(1.0, 0.0).is_some());
        assert!(picker.pick(20.0, 0.0).is_none());
    }
}
