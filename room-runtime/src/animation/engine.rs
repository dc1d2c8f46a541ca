//! # Engine 模块
//!
//! 补间管理器。
//!
//! 每个交互对象持有自己的 `TweenEngine`，由宿主每帧调用 `update` 驱动。
//! 补间按启动顺序更新，事件顺序因此是确定的。

use tracing::trace;

use super::tween::TweenStep;
use super::{Animatable, Tween, TweenEvent, TweenId, TweenSpec, TweenState};

/// 补间引擎
///
/// ## 设计理念
///
/// 1. 管理时间轴：知道某个属性从 A 到 B 需要在 duration 内变化
/// 2. 通过 `Animatable` 直接写入零件属性
/// 3. 生命周期以事件返回，标签 `T` 由对象自定义
pub struct TweenEngine<T> {
    /// 补间（按 ID 递增排列）
    tweens: Vec<Tween<T>>,
    /// 下一个补间 ID
    next_id: u64,
}

impl<T> Default for TweenEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for TweenEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenEngine")
            .field("tweens", &self.tweens.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<T> TweenEngine<T> {
    /// 创建新的补间引擎
    pub fn new() -> Self {
        Self {
            tweens: Vec::new(),
            next_id: 1,
        }
    }

    /// 生成下一个补间 ID
    fn next_tween_id(&mut self) -> TweenId {
        let id = TweenId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// 启动补间
    ///
    /// 补间在下一次 `update` 时才会开始（即使没有延迟），
    /// 起始值在那一刻从目标读取。
    pub fn start(&mut self, spec: TweenSpec, tag: T) -> TweenId {
        let id = self.next_tween_id();
        trace!(id = %id, target = %spec.target, to = spec.to, duration = spec.duration, delay = spec.delay, "启动补间");
        self.tweens.push(Tween::from_spec(id, spec, tag));
        id
    }

    /// 停止补间
    ///
    /// 属性保持在当前插值位置，之后不再产生任何事件。
    ///
    /// # 返回
    /// - `true`: 补间存在且被停止
    /// - `false`: 补间不存在或已结束
    pub fn stop(&mut self, id: TweenId) -> bool {
        let Some(index) = self.tweens.iter().position(|t| t.id == id) else {
            return false;
        };
        let mut tween = self.tweens.remove(index);
        let was_active = tween.is_active();
        tween.stop();
        was_active
    }

    /// 停止所有补间
    pub fn stop_all(&mut self) {
        for tween in &mut self.tweens {
            tween.stop();
        }
        self.tweens.clear();
    }

    /// 更新所有补间
    ///
    /// # 返回
    /// 本帧产生的事件（按补间启动顺序）
    pub fn update<A: Animatable + ?Sized>(&mut self, dt: f32, target: &mut A) -> Vec<TweenEvent<T>>
    where
        T: Copy,
    {
        let mut events = Vec::new();

        for tween in &mut self.tweens {
            match tween.tick(dt) {
                TweenStep::Waiting => continue,
                TweenStep::Began => {
                    let from = target
                        .get_property(&tween.target)
                        .unwrap_or(tween.to);
                    tween.capture_from(from);
                    events.push(TweenEvent::Started {
                        id: tween.id,
                        tag: tween.tag,
                    });
                }
                TweenStep::Running => {}
            }

            tween.advance();
            let value = tween.current_value();
            target.set_property(&tween.target, value);
            events.push(TweenEvent::Updated {
                id: tween.id,
                tag: tween.tag,
                value,
            });

            if tween.state == TweenState::Completed {
                events.push(TweenEvent::Completed {
                    id: tween.id,
                    tag: tween.tag,
                });
            }
        }

        self.tweens.retain(|t| !t.state.is_finished());
        events
    }

    // ========== 查询方法 ==========

    /// 获取补间
    pub fn get(&self, id: TweenId) -> Option<&Tween<T>> {
        self.tweens.iter().find(|t| t.id == id)
    }

    /// 补间是否仍在活跃（等待中或播放中）
    pub fn is_active(&self, id: TweenId) -> bool {
        self.get(id).is_some_and(|t| t.is_active())
    }

    /// 检查是否有活跃的补间
    pub fn has_active(&self) -> bool {
        self.tweens.iter().any(|t| t.is_active())
    }

    /// 获取活跃补间数量
    pub fn active_count(&self) -> usize {
        self.tweens.iter().filter(|t| t.is_active()).count()
    }

    /// 遍历活跃补间
    pub fn iter(&self) -> impl Iterator<Item = &Tween<T>> {
        self.tweens.iter()
    }
}
