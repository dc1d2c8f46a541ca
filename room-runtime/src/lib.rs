//! # Room Runtime
//!
//! 交互式 3D 房间中可点击对象的状态与动画核心。
//!
//! ## 架构概述
//!
//! `room-runtime` 是纯逻辑核心，不做渲染、不接声音设备、不做射线检测。
//! 宿主每帧调用 `update(dt)`，读回零件变换并渲染：
//!
//! ```text
//! Host                              Runtime
//!   │                                  │
//!   │──── PointerInput / 调试面板 ─────►│
//!   │                                  │ update(dt)
//!   │◄─── Vec<RoomEvent> + 零件变换 ────│
//!   │                                  │
//! ```
//!
//! ## 核心类型
//!
//! - [`Room`]：场景控制器，持有所有对象
//! - [`InteractiveObject`]：对象能力接口（展示、点击、描边、音效）
//! - [`Locker`]：多抽屉柜子，最完整的状态机
//! - [`TweenEngine`] / [`DelayedCalls`]：补间与延迟调用
//! - [`EventBus`]：对象级消息通道
//! - [`RoomConfig`]：静态配置表
//!
//! ## 使用示例
//!
//! ```ignore
//! use room_runtime::{Room, RoomConfig, RoomLayout, VirtualAudio};
//!
//! let config = RoomConfig::load("config.json")?;
//! let layout = RoomLayout::load("layout.json")?;
//! let mut audio = VirtualAudio::new();
//! let mut room = Room::new(&layout, &config, &mut audio)?;
//!
//! room.show();
//! loop {
//!     for event in room.update(dt) {
//!         host.handle(event);
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`animation`]：补间引擎与缓动函数
//! - [`timer`]：延迟调用
//! - [`event`]：事件总线与事件类型
//! - [`part`]：零件注册表
//! - [`sound`]：定位音效
//! - [`debug_menu`]：调试面板
//! - [`objects`]：各对象的状态机
//! - [`room`]：场景控制器
//! - [`config`]：配置
//! - [`error`]：错误类型

pub mod animation;
pub mod config;
pub mod debug_menu;
pub mod error;
pub mod event;
pub mod objects;
pub mod part;
pub mod room;
pub mod sound;
pub mod timer;

// 重导出核心类型
pub use animation::{
    Animatable, EasingFunction, Property, Tween, TweenEngine, TweenEvent, TweenId, TweenSpec,
    TweenState, TweenTarget,
};
pub use config::{
    AirConditionerConfig, LockerConfig, MouseConfig, MovingAreaConfig, ObjectSoundConfig,
    RoomConfig, SoundsConfig, StartAnimationConfig, WindowConfig,
};
pub use debug_menu::{DebugControl, DebugEntry, DebugMenu};
pub use error::{ConfigError, RoomError, RoomResult};
pub use event::{EventBus, EventSender, ObjectCommand, PointerInput, RoomEvent};
pub use objects::locker::{CasesAnimationMode, GroupAnimation, LockerCase};
pub use objects::window::{WindowOpenMode, WindowOpenType};
pub use objects::{
    AirConditioner, FloorLamp, InteractiveObject, Keyboard, Locker, Mouse, MoveDirection,
    Notebook, ObjectContext, OpenState, PowerState, RoomObjectKind, Window, create_object,
};
pub use part::{Part, PartDecl, PartId, PartRegistry, PartSource, PartTransform};
pub use room::{Hit, Outline, PartPicker, Room, RoomLayout};
pub use sound::{AudioBackend, AudioRecord, PositionalSound, SoundController, SoundHelper, VirtualAudio};
pub use timer::{DelayedCalls, TimerId};
