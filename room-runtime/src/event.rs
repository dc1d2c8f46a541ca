//! # Event 模块
//!
//! 对象级事件总线与事件类型。
//!
//! ## 事件流向
//!
//! ```text
//! 调试面板 / UI ──ObjectCommand──▶ 对象（每个对象一条总线）
//! 对象 ──────────RoomEvent───────▶ 场景控制器（Room 持有的总线）
//! 宿主输入 ──────PointerInput────▶ Room
//! ```
//!
//! 总线是 `flume` 无界通道，发送端可克隆后交给协作者；
//! 接收端只在所属对象的 `update` 中被排空，始终是单线程协作式消费。

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::objects::RoomObjectKind;
use crate::objects::locker::CasesAnimationMode;
use crate::objects::window::{WindowOpenMode, WindowOpenType};
use crate::objects::{OpenState, PowerState};

/// 事件总线
#[derive(Debug)]
pub struct EventBus<E> {
    sender: flume::Sender<E>,
    receiver: flume::Receiver<E>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    /// 创建总线
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// 获取发送端
    pub fn sender(&self) -> EventSender<E> {
        EventSender {
            inner: self.sender.clone(),
        }
    }

    /// 发布事件
    pub fn post(&self, event: E) {
        // 接收端由总线自己持有，不会断开
        let _ = self.sender.send(event);
    }

    /// 取出当前所有事件（按发布顺序）
    pub fn drain(&self) -> Vec<E> {
        self.receiver.try_iter().collect()
    }

    /// 是否没有待处理事件
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// 待处理事件数量
    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

/// 事件发送端
#[derive(Debug)]
pub struct EventSender<E> {
    inner: flume::Sender<E>,
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E: std::fmt::Debug> EventSender<E> {
    /// 发布事件
    ///
    /// 总线已销毁时事件被丢弃。
    pub fn post(&self, event: E) {
        if let Err(flume::SendError(event)) = self.inner.send(event) {
            trace!(event = ?event, "总线已关闭，丢弃事件");
        }
    }
}

/// 发给对象的命令（来自调试面板或 UI）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectCommand {
    /// 切换一个抽屉
    PushCase { case: usize },
    /// 打开 / 关闭所有抽屉
    PushAllCases,
    /// 修改成组动画
    ChangeAllCasesAnimation { mode: CasesAnimationMode },
    /// 修改移动速度（抽屉：距离 / 秒；转动部件：度 / 秒）
    SetSpeed { speed: f32 },
    /// 修改窗户把手转速（度 / 秒）
    SetHandleSpeed { speed: f32 },
    /// 修改窗户打开方式
    ChangeOpenType { mode: WindowOpenMode },
    /// 修改窗户打开角度
    SetOpenAngle { open_type: WindowOpenType, angle: f32 },
    /// 切换窗户 / 空调状态
    ChangeState,
    /// 模拟一次点击
    SwitchOn,
    /// 鼠标位置（可移动区域内的归一化坐标 -1..=1）
    PositionChanged { x: f32, z: f32 },
    /// 鼠标可移动区域尺寸
    AreaChanged { width: f32, height: f32 },
}

/// 对象发给场景控制器的事件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// 展示动画完成，对象可以交互
    ShowAnimationComplete { kind: RoomObjectKind },
    /// 抽屉状态变化
    CaseStateChanged { case: usize, state: OpenState },
    /// 窗户状态变化
    WindowStateChanged {
        state: OpenState,
        open_type: WindowOpenType,
    },
    /// 空调电源或导风板状态变化
    AirConditionerStateChanged { power: PowerState, door: OpenState },
    /// 鼠标在可移动区域中的位置变化（世界坐标）
    MousePositionChanged { x: f32, z: f32 },
    /// 键盘被按下
    KeyPressed,
}

/// 宿主的指针输入（屏幕坐标）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerInput {
    Move { x: f32, y: f32 },
    Down { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Leave,
}
