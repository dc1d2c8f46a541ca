//! # Target 模块
//!
//! 补间目标抽象：标识某个零件上的某个可动画属性。

use serde::{Deserialize, Serialize};

use crate::part::PartId;

/// 可动画属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    PositionX,
    PositionY,
    PositionZ,
    /// 均匀缩放（同时写入 x/y/z 三个分量，读取 x 分量）
    Scale,
    RotationX,
    RotationY,
    RotationZ,
}

/// 补间目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenTarget {
    /// 零件 ID
    pub part: PartId,
    /// 属性
    pub property: Property,
}

impl TweenTarget {
    /// 创建补间目标
    pub fn new(part: PartId, property: Property) -> Self {
        Self { part, property }
    }
}

impl std::fmt::Display for TweenTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:?}", self.part, self.property)
    }
}

/// 可被补间写入的属性容器
///
/// 补间引擎不持有对象，每次 `update` 时由调用方借出。
pub trait Animatable {
    /// 获取属性的当前值
    ///
    /// # 返回
    /// - `Some(value)`: 属性存在
    /// - `None`: 目标零件不存在
    fn get_property(&self, target: &TweenTarget) -> Option<f32>;

    /// 设置属性的新值
    ///
    /// # 返回
    /// - `true`: 设置成功
    /// - `false`: 目标零件不存在
    fn set_property(&mut self, target: &TweenTarget, value: f32) -> bool;
}
