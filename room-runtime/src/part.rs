//! # Part 模块
//!
//! 零件注册表：把零件名映射到零件的变换数据。
//!
//! ## 设计说明
//!
//! - 每个交互对象在构造时从宿主给出的几何数据建立一次注册表
//! - 每个零件在任何动画修改之前记录 `start` 变换（作为展示动画的终点与重置基线）
//! - 声明为必需的零件缺失属于配置错误，在构造时直接失败

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

use crate::animation::{Animatable, Property, TweenTarget};
use crate::error::{RoomError, RoomResult};

/// 零件 ID（注册表内的下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(usize);

impl PartId {
    /// 创建零件 ID
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// 获取内部下标
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for PartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Part({})", self.0)
    }
}

/// 零件变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartTransform {
    /// 位置
    pub position: Vec3,
    /// 欧拉角（弧度）
    #[serde(default)]
    pub rotation: Vec3,
    /// 缩放
    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for PartTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl PartTransform {
    /// 只有位置的变换
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// 读取属性
    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::PositionX => self.position.x,
            Property::PositionY => self.position.y,
            Property::PositionZ => self.position.z,
            Property::Scale => self.scale.x,
            Property::RotationX => self.rotation.x,
            Property::RotationY => self.rotation.y,
            Property::RotationZ => self.rotation.z,
        }
    }

    /// 写入属性
    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::PositionX => self.position.x = value,
            Property::PositionY => self.position.y = value,
            Property::PositionZ => self.position.z = value,
            Property::Scale => self.scale = Vec3::splat(value),
            Property::RotationX => self.rotation.x = value,
            Property::RotationY => self.rotation.y = value,
            Property::RotationZ => self.rotation.z = value,
        }
    }
}

/// 宿主提供的几何数据（一个网格）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSource {
    /// 网格名
    pub name: String,
    /// 创作时的变换
    #[serde(flatten)]
    pub transform: PartTransform,
}

impl PartSource {
    /// 创建几何数据
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            transform: PartTransform::at(position),
        }
    }
}

/// 零件声明（静态配置表中的一项）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDecl {
    /// 零件类型名（同时是网格名）
    pub name: Cow<'static, str>,
    /// 是否可交互（参与点击与描边）
    pub active: bool,
}

impl PartDecl {
    pub const fn active(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            active: true,
        }
    }

    pub const fn inactive(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            active: false,
        }
    }

    /// 运行时生成名称的声明（例如按数量生成的抽屉）
    pub fn named(name: String, active: bool) -> Self {
        Self {
            name: Cow::Owned(name),
            active,
        }
    }
}

/// 零件
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// 零件 ID
    pub id: PartId,
    /// 零件名
    pub name: String,
    /// 当前变换
    pub transform: PartTransform,
    /// 载入时记录的变换（动画终点与重置基线）
    pub start: PartTransform,
    /// 是否可交互
    pub active: bool,
    /// 是否可见
    pub visible: bool,
    /// 子部件下标（构造时缓存，点击时直接读取）
    pub case_id: Option<usize>,
}

impl Part {
    /// 当前位置
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// 载入时位置
    pub fn start_position(&self) -> Vec3 {
        self.start.position
    }
}

/// 零件注册表
#[derive(Debug, Clone, Default)]
pub struct PartRegistry {
    /// 零件（按声明顺序）
    parts: Vec<Part>,
    /// 名称索引
    by_name: HashMap<String, PartId>,
}

impl PartRegistry {
    /// 从几何数据建立注册表
    ///
    /// # 参数
    /// - `object`: 对象名（用于错误信息）
    /// - `sources`: 宿主载入的网格列表
    /// - `decls`: 静态配置声明的零件类型
    ///
    /// # 错误
    /// 任何声明的零件在 `sources` 中缺失时返回 `RoomError::MissingPart`
    pub fn build(object: &str, sources: &[PartSource], decls: &[PartDecl]) -> RoomResult<Self> {
        let mut registry = Self::default();

        for decl in decls {
            let source = sources
                .iter()
                .find(|s| s.name == *decl.name)
                .ok_or_else(|| RoomError::MissingPart {
                    object: object.to_string(),
                    part: decl.name.to_string(),
                })?;

            let id = PartId::new(registry.parts.len());
            registry.parts.push(Part {
                id,
                name: source.name.clone(),
                transform: source.transform,
                start: source.transform,
                active: decl.active,
                visible: true,
                case_id: None,
            });
            registry.by_name.insert(source.name.clone(), id);
        }

        for source in sources {
            if !registry.by_name.contains_key(&source.name) {
                debug!(object = object, mesh = %source.name, "忽略未声明的网格");
            }
        }

        Ok(registry)
    }

    /// 按名称查找零件 ID
    pub fn id_of(&self, name: &str) -> Option<PartId> {
        self.by_name.get(name).copied()
    }

    /// 按名称查找零件 ID（缺失视为配置错误）
    pub fn require(&self, object: &str, name: &str) -> RoomResult<PartId> {
        self.id_of(name).ok_or_else(|| RoomError::MissingPart {
            object: object.to_string(),
            part: name.to_string(),
        })
    }

    /// 获取零件
    pub fn get(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.0)
    }

    /// 获取可变零件
    pub fn get_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.parts.get_mut(id.0)
    }

    /// 零件当前位置（不存在时为原点）
    pub fn position(&self, id: PartId) -> Vec3 {
        self.get(id).map(Part::position).unwrap_or(Vec3::ZERO)
    }

    /// 所有零件 ID（声明顺序）
    pub fn ids(&self) -> Vec<PartId> {
        self.parts.iter().map(|p| p.id).collect()
    }

    /// 可交互零件 ID
    pub fn active_ids(&self) -> Vec<PartId> {
        self.parts.iter().filter(|p| p.active).map(|p| p.id).collect()
    }

    /// 遍历零件
    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// 零件数量
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// 把零件的某个属性写回载入时的值
    pub fn restore(&mut self, id: PartId, property: Property) {
        if let Some(part) = self.get_mut(id) {
            let value = part.start.get(property);
            part.transform.set(property, value);
        }
    }

    /// 设置所有零件的可见性
    pub fn set_visible(&mut self, visible: bool) {
        for part in &mut self.parts {
            part.visible = visible;
        }
    }
}

impl Animatable for PartRegistry {
    fn get_property(&self, target: &TweenTarget) -> Option<f32> {
        self.get(target.part).map(|p| p.transform.get(target.property))
    }

    fn set_property(&mut self, target: &TweenTarget, value: f32) -> bool {
        match self.get_mut(target.part) {
            Some(part) => {
                part.transform.set(target.property, value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECLS: &[PartDecl] = &[PartDecl::active("body"), PartDecl::inactive("stand")];

    fn sources() -> Vec<PartSource> {
        vec![
            PartSource::new("stand", Vec3::new(0.0, 1.0, 0.0)),
            PartSource::new("body", Vec3::new(1.0, 2.0, 3.0)),
            PartSource::new("unused", Vec3::ZERO),
        ]
    }

    #[test]
    fn test_build_follows_declaration_order() {
        let registry = PartRegistry::build("test", &sources(), DECLS).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.id_of("body"), Some(PartId::new(0)));
        assert_eq!(registry.id_of("stand"), Some(PartId::new(1)));
        assert_eq!(registry.id_of("unused"), None);
        assert_eq!(registry.active_ids(), vec![PartId::new(0)]);
    }

    #[test]
    fn test_start_transform_recorded() {
        let mut registry = PartRegistry::build("test", &sources(), DECLS).unwrap();
        let body = registry.id_of("body").unwrap();

        registry
            .get_mut(body)
            .unwrap()
            .transform
            .set(Property::PositionY, 10.0);
        assert_eq!(registry.get(body).unwrap().start_position().y, 2.0);

        registry.restore(body, Property::PositionY);
        assert_eq!(registry.position(body).y, 2.0);
    }

    #[test]
    fn test_missing_part_is_error() {
        let sources = vec![PartSource::new("body", Vec3::ZERO)];
        let err = PartRegistry::build("lamp", &sources, DECLS).unwrap_err();

        assert_eq!(
            err,
            RoomError::MissingPart {
                object: "lamp".to_string(),
                part: "stand".to_string(),
            }
        );
    }

    #[test]
    fn test_animatable_scale_is_uniform() {
        let mut registry = PartRegistry::build("test", &sources(), DECLS).unwrap();
        let target = TweenTarget::new(PartId::new(1), Property::Scale);

        assert!(registry.set_property(&target, 0.5));
        assert_eq!(registry.get(PartId::new(1)).unwrap().transform.scale, Vec3::splat(0.5));
        assert_eq!(registry.get_property(&target), Some(0.5));

        let missing = TweenTarget::new(PartId::new(9), Property::Scale);
        assert!(!registry.set_property(&missing, 1.0));
        assert_eq!(registry.get_property(&missing), None);
    }

    #[test]
    fn test_source_json() {
        let json = r#"{ "name": "case01", "position": [0.0, 1.5, 0.2] }"#;
        let source: PartSource = serde_json::from_str(json).unwrap();

        assert_eq!(source.name, "case01");
        assert_eq!(source.transform.position, Vec3::new(0.0, 1.5, 0.2));
        assert_eq!(source.transform.scale, Vec3::ONE);
    }
}
