//! # Tween 模块
//!
//! 单个补间实例定义。
//!
//! 核心设计：补间只关注 f32 值的时间轴变化，起始值在真正开始时捕获，
//! 因此带延迟的补间会从延迟结束时刻的位置出发。

use super::{EasingFunction, TweenTarget};

/// 补间 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

impl TweenId {
    /// 创建新的补间 ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TweenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tween({})", self.0)
    }
}

/// 补间状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    /// 等待开始（延迟中）
    #[default]
    Pending,
    /// 正在播放
    Playing,
    /// 已完成
    Completed,
    /// 已被停止（保持当前插值位置，不回滚）
    Stopped,
}

impl TweenState {
    /// 是否为活跃状态（需要更新）
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Playing)
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped)
    }
}

/// 补间参数
///
/// 描述"把哪个属性在多长时间内变到多少"，交给 `TweenEngine::start` 执行。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    /// 目标属性
    pub target: TweenTarget,
    /// 目标值
    pub to: f32,
    /// 时长（秒）
    pub duration: f32,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 延迟启动（秒）
    pub delay: f32,
}

impl TweenSpec {
    /// 创建补间参数（默认缓动，无延迟）
    pub fn new(target: TweenTarget, to: f32, duration: f32) -> Self {
        Self {
            target,
            to,
            duration: duration.max(0.0),
            easing: EasingFunction::default(),
            delay: 0.0,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 设置延迟
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }
}

/// 补间实例
#[derive(Debug, Clone)]
pub struct Tween<T> {
    /// 补间 ID
    pub id: TweenId,
    /// 调用方标签
    pub tag: T,
    /// 目标属性
    pub target: TweenTarget,
    /// 起始值（开始时捕获）
    from: f32,
    /// 目标值
    pub to: f32,
    /// 时长（秒）
    pub duration: f32,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 延迟启动（秒）
    pub delay: f32,
    /// 当前状态
    pub state: TweenState,
    /// 当前进度（已应用缓动）
    pub progress: f32,
    /// 已经过的时间
    elapsed: f32,
}

/// 单帧推进结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TweenStep {
    /// 仍在延迟中
    Waiting,
    /// 本帧刚刚开始
    Began,
    /// 播放中
    Running,
}

impl<T> Tween<T> {
    pub(crate) fn from_spec(id: TweenId, spec: TweenSpec, tag: T) -> Self {
        Self {
            id,
            tag,
            target: spec.target,
            from: 0.0,
            to: spec.to,
            duration: spec.duration,
            easing: spec.easing,
            delay: spec.delay,
            state: TweenState::Pending,
            progress: 0.0,
            elapsed: 0.0,
        }
    }

    /// 推进时间
    pub(crate) fn tick(&mut self, dt: f32) -> TweenStep {
        match self.state {
            TweenState::Pending => {
                self.elapsed += dt;
                if self.elapsed >= self.delay {
                    self.state = TweenState::Playing;
                    self.elapsed -= self.delay;
                    TweenStep::Began
                } else {
                    TweenStep::Waiting
                }
            }
            TweenState::Playing => {
                self.elapsed += dt;
                TweenStep::Running
            }
            TweenState::Completed | TweenState::Stopped => TweenStep::Waiting,
        }
    }

    /// 开始时捕获起始值
    pub(crate) fn capture_from(&mut self, from: f32) {
        self.from = from;
    }

    /// 根据已播放时间计算进度
    ///
    /// 时长为 0 的补间在开始的同一帧内完成。
    pub(crate) fn advance(&mut self) {
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            self.progress = 1.0;
            self.state = TweenState::Completed;
        } else {
            self.progress = self.easing.apply(self.elapsed / self.duration);
        }
    }

    /// 停止补间（不回滚）
    pub(crate) fn stop(&mut self) {
        if self.state.is_active() {
            self.state = TweenState::Stopped;
        }
    }

    /// 获取当前值
    ///
    /// 完成时精确返回终值，避免插值误差。
    pub fn current_value(&self) -> f32 {
        if self.state == TweenState::Completed {
            self.to
        } else {
            self.from + (self.to - self.from) * self.progress
        }
    }

    /// 获取起始值（仅开始后有意义）
    pub fn initial_value(&self) -> f32 {
        self.from
    }

    /// 剩余的延迟 + 播放时间（秒）
    pub fn remaining(&self) -> f32 {
        match self.state {
            TweenState::Pending => (self.delay - self.elapsed).max(0.0) + self.duration,
            TweenState::Playing => (self.duration - self.elapsed).max(0.0),
            TweenState::Completed | TweenState::Stopped => 0.0,
        }
    }

    /// 是否正在播放
    pub fn is_playing(&self) -> bool {
        self.state == TweenState::Playing
    }

    /// 是否为活跃状态
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}
