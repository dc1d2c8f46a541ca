//! # Animation 模块
//!
//! 补间动画系统，驱动零件属性随时间变化。
//!
//! ## 核心设计理念
//!
//! 补间引擎只负责 **时间轴管理**：
//! - 知道某个零件属性从 A 到 B 需要在 duration 内变化
//! - 在开始时（延迟结束后）读取起始值，每帧把插值写回目标
//! - **不使用回调闭包**，而是返回带标签的生命周期事件
//!   （`Started` / `Updated` / `Completed`），由对象自己的状态机消费
//!
//! ## 核心概念
//!
//! - `TweenTarget`: 补间目标，`(PartId, Property)` 组合
//! - `Animatable`: 可被补间写入的属性容器（零件注册表实现）
//! - `Tween`: 单个补间实例
//! - `TweenEngine`: 补间管理器，保证按启动顺序更新
//! - `EasingFunction`: 缓动函数
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let mut engine = TweenEngine::new();
//! let id = engine.start(
//!     TweenSpec::new(TweenTarget::new(part, Property::PositionZ), 1.0, 0.5)
//!         .with_easing(EasingFunction::EaseOutSine),
//!     MyTag::Slide,
//! );
//!
//! for event in engine.update(dt, &mut parts) {
//!     match event {
//!         TweenEvent::Completed { tag: MyTag::Slide, .. } => { /* 状态迁移 */ }
//!         _ => {}
//!     }
//! }
//! ```

mod easing;
mod engine;
mod target;
mod tween;

pub use easing::EasingFunction;
pub use engine::TweenEngine;
pub use target::{Animatable, Property, TweenTarget};
pub use tween::{Tween, TweenId, TweenSpec, TweenState};

/// 补间事件
///
/// 同一个补间的事件总是按 `Started → Updated* → Completed` 顺序产生。
/// 被 `stop` 的补间不会再产生任何事件。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenEvent<T> {
    /// 延迟结束，补间开始（起始值已捕获）
    Started { id: TweenId, tag: T },
    /// 属性已写入新值
    Updated { id: TweenId, tag: T, value: f32 },
    /// 补间完成，目标已精确写入终值
    Completed { id: TweenId, tag: T },
}

impl<T: Copy> TweenEvent<T> {
    /// 事件对应的补间 ID
    pub fn id(&self) -> TweenId {
        match self {
            Self::Started { id, .. } | Self::Updated { id, .. } | Self::Completed { id, .. } => *id,
        }
    }

    /// 事件携带的标签
    pub fn tag(&self) -> T {
        match self {
            Self::Started { tag, .. } | Self::Updated { tag, .. } | Self::Completed { tag, .. } => {
                *tag
            }
        }
    }
}
