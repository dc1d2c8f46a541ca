//! # Timer 模块
//!
//! 延迟调用调度器：在指定时间后触发一次动作，可取消。
//!
//! 动作是普通的枚举值而不是闭包，由持有者在触发后自行分派。

/// 延迟调用 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// 单个延迟调用
#[derive(Debug, Clone)]
struct DelayedCall<A> {
    id: TimerId,
    /// 距触发的剩余时间，到期后为非正数
    remaining: f32,
    action: A,
}

/// 延迟调用调度器
///
/// 每个调用各自倒计时，不维护全局时钟，长时间运行也不会丢失精度。
#[derive(Debug, Clone)]
pub struct DelayedCalls<A> {
    calls: Vec<DelayedCall<A>>,
    next_id: u64,
}

impl<A> Default for DelayedCalls<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> DelayedCalls<A> {
    /// 创建调度器
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_id: 1,
        }
    }

    /// 在 `delay` 秒后触发 `action`
    pub fn call(&mut self, delay: f32, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.calls.push(DelayedCall {
            id,
            remaining: delay.max(0.0),
            action,
        });
        id
    }

    /// 取消延迟调用
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.calls.len();
        self.calls.retain(|c| c.id != id);
        self.calls.len() != before
    }

    /// 取消所有延迟调用
    pub fn cancel_all(&mut self) {
        self.calls.clear();
    }

    /// 推进时间，返回到期的动作
    ///
    /// 越早到期的越先返回，同时到期的按调度顺序。
    pub fn update(&mut self, dt: f32) -> Vec<A> {
        for call in &mut self.calls {
            call.remaining -= dt;
        }

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.calls)
            .into_iter()
            .partition(|c| c.remaining <= 0.0);
        self.calls = pending;

        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining).then(a.id.cmp(&b.id)));
        due.into_iter().map(|c| c.action).collect()
    }

    /// 等待中的调用数量
    pub fn pending(&self) -> usize {
        self.calls.len()
    }

    /// 是否仍在等待
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.calls.iter().any(|c| c.id == id)
    }
}
