//! # Config 模块
//!
//! 各类房间对象的静态配置表，载入一次，运行时只读。
//!
//! ## 配置来源
//!
//! 1. 配置文件（JSON，所有字段可省略）
//! 2. 默认值
//!
//! 时间单位统一为秒，角度单位为度。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::animation::EasingFunction;
use crate::error::ConfigError;
use crate::objects::RoomObjectKind;
use crate::objects::locker::CasesAnimationMode;
use crate::objects::window::WindowOpenMode;

/// 房间配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// 展示动画配置
    #[serde(default)]
    pub start_animation: StartAnimationConfig,

    /// 柜子配置
    #[serde(default)]
    pub locker: LockerConfig,

    /// 空调配置
    #[serde(default)]
    pub air_conditioner: AirConditionerConfig,

    /// 窗户配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 鼠标配置
    #[serde(default)]
    pub mouse: MouseConfig,

    /// 音效配置
    #[serde(default)]
    pub sounds: SoundsConfig,

    /// 初始全局音量 (0.0 - 1.0)
    #[serde(default = "default_global_volume")]
    pub global_volume: f32,

    /// 随机数种子（None 时使用系统熵）
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// 按下与抬起之间允许的最大指针位移（像素），超过视为拖拽
    #[serde(default = "default_click_threshold")]
    pub click_threshold: f32,
}

/// 展示动画配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartAnimationConfig {
    /// 零件下落时长
    #[serde(default = "default_fall_down_time")]
    pub object_fall_down_time: f32,

    /// 零件起始抬高量
    #[serde(default = "default_start_position_y")]
    pub start_position_y: f32,

    /// 下落缓动
    #[serde(default = "default_fall_down_easing")]
    pub fall_down_easing: EasingFunction,

    /// 缩放后滑入的缓动
    #[serde(default = "default_scale_easing")]
    pub scale_easing: EasingFunction,

    /// 房间中相邻对象开始展示的间隔
    #[serde(default = "default_show_delay_step")]
    pub show_delay_step: f32,
}

/// 柜子配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockerConfig {
    /// 抽屉数量
    #[serde(default = "default_cases_count")]
    pub cases_count: usize,

    /// 抽屉拉出距离
    #[serde(default = "default_case_move_distance")]
    pub case_move_distance: f32,

    /// 抽屉移动速度（距离 / 秒）
    #[serde(default = "default_case_move_speed")]
    pub case_move_speed: f32,

    /// 成组动画中相邻批次的延迟系数
    #[serde(default = "default_all_cases_delay_coefficient")]
    pub all_cases_animation_delay_coefficient: f32,

    /// 展示动画开始时抽屉所在的 z
    #[serde(default = "default_case_start_position_z")]
    pub case_start_position_z: f32,

    /// 展示动画中抽屉缩放时长
    #[serde(default = "default_case_scale_time")]
    pub case_scale_time: f32,

    /// 展示动画中抽屉滑入时长
    #[serde(default = "default_case_slide_time")]
    pub case_slide_time: f32,

    /// 展示动画中相邻抽屉的错开时间
    #[serde(default = "default_case_stagger")]
    pub case_stagger: f32,

    /// 音源相对抽屉的 z 偏移
    #[serde(default = "default_sound_offset_z")]
    pub sound_offset_z: f32,

    /// 点击柜体时的成组动画
    #[serde(default)]
    pub animation: CasesAnimationMode,
}

/// 空调配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirConditionerConfig {
    /// 初始是否开机
    #[serde(default)]
    pub power_on: bool,

    /// 导风板转速（度 / 秒）
    #[serde(default = "default_ac_rotation_speed")]
    pub rotation_speed: f32,

    /// 导风板最大打开角度（度）
    #[serde(default = "default_ac_max_open_angle")]
    pub max_open_angle: f32,
}

/// 窗户配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 平开角度（度）
    #[serde(default = "default_window_horizontal_angle")]
    pub horizontal_open_angle: f32,

    /// 内倒角度（度）
    #[serde(default = "default_window_vertical_angle")]
    pub vertical_open_angle: f32,

    /// 转速（度 / 秒）
    #[serde(default = "default_window_rotation_speed")]
    pub rotation_speed: f32,

    /// 把手转动角度（度）
    #[serde(default = "default_handle_open_angle")]
    pub handle_open_angle: f32,

    /// 把手转速（度 / 秒）
    #[serde(default = "default_handle_rotation_speed")]
    pub handle_rotation_speed: f32,

    /// 打开方式
    #[serde(default)]
    pub open_mode: WindowOpenMode,
}

/// 鼠标配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseConfig {
    /// 可移动区域
    #[serde(default)]
    pub moving_area: MovingAreaConfig,

    /// 按键按下深度
    #[serde(default = "default_key_press_depth")]
    pub key_press_depth: f32,

    /// 按键按下 / 弹起各自的时长
    #[serde(default = "default_key_press_time")]
    pub key_press_time: f32,
}

/// 鼠标可移动区域
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAreaConfig {
    #[serde(default = "default_area_width")]
    pub width: f32,

    #[serde(default = "default_area_height")]
    pub height: f32,

    /// 是否显示调试平面
    #[serde(default)]
    pub show_debug_plane: bool,
}

/// 音效配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundsConfig {
    /// 各对象的音效参数
    #[serde(default)]
    pub objects: BTreeMap<RoomObjectKind, ObjectSoundConfig>,
}

/// 单个对象的音效参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSoundConfig {
    /// 衰减参考距离
    #[serde(default = "default_ref_distance")]
    pub ref_distance: f32,

    /// 调试标记尺寸
    #[serde(default = "default_helper_size")]
    pub helper_size: f32,

    /// 对象音量 (0.0 - 1.0)
    #[serde(default = "default_object_volume")]
    pub volume: f32,
}

impl SoundsConfig {
    /// 获取对象的音效参数（未配置时使用默认值）
    pub fn for_kind(&self, kind: RoomObjectKind) -> ObjectSoundConfig {
        self.objects.get(&kind).cloned().unwrap_or_default()
    }
}

// 默认值函数
fn default_global_volume() -> f32 {
    0.5
}

fn default_click_threshold() -> f32 {
    5.0
}

fn default_fall_down_time() -> f32 {
    0.5
}

fn default_start_position_y() -> f32 {
    13.0
}

fn default_fall_down_easing() -> EasingFunction {
    EasingFunction::EaseOutBack
}

fn default_scale_easing() -> EasingFunction {
    EasingFunction::EaseOutCubic
}

fn default_show_delay_step() -> f32 {
    0.1
}

fn default_cases_count() -> usize {
    6
}

fn default_case_move_distance() -> f32 {
    0.8
}

fn default_case_move_speed() -> f32 {
    2.0
}

fn default_all_cases_delay_coefficient() -> f32 {
    0.3
}

fn default_case_start_position_z() -> f32 {
    2.5
}

fn default_case_scale_time() -> f32 {
    0.3
}

fn default_case_slide_time() -> f32 {
    0.3
}

fn default_case_stagger() -> f32 {
    0.1
}

fn default_sound_offset_z() -> f32 {
    0.8
}

fn default_ac_rotation_speed() -> f32 {
    140.0
}

fn default_ac_max_open_angle() -> f32 {
    70.0
}

fn default_window_horizontal_angle() -> f32 {
    60.0
}

fn default_window_vertical_angle() -> f32 {
    12.0
}

fn default_window_rotation_speed() -> f32 {
    80.0
}

fn default_handle_open_angle() -> f32 {
    90.0
}

fn default_handle_rotation_speed() -> f32 {
    450.0
}

fn default_key_press_depth() -> f32 {
    0.02
}

fn default_key_press_time() -> f32 {
    0.08
}

fn default_area_width() -> f32 {
    1.2
}

fn default_area_height() -> f32 {
    0.8
}

fn default_ref_distance() -> f32 {
    10.0
}

fn default_helper_size() -> f32 {
    0.3
}

fn default_object_volume() -> f32 {
    1.0
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            start_animation: StartAnimationConfig::default(),
            locker: LockerConfig::default(),
            air_conditioner: AirConditionerConfig::default(),
            window: WindowConfig::default(),
            mouse: MouseConfig::default(),
            sounds: SoundsConfig::default(),
            global_volume: default_global_volume(),
            random_seed: None,
            click_threshold: default_click_threshold(),
        }
    }
}

impl Default for StartAnimationConfig {
    fn default() -> Self {
        Self {
            object_fall_down_time: default_fall_down_time(),
            start_position_y: default_start_position_y(),
            fall_down_easing: default_fall_down_easing(),
            scale_easing: default_scale_easing(),
            show_delay_step: default_show_delay_step(),
        }
    }
}

impl Default for LockerConfig {
    fn default() -> Self {
        Self {
            cases_count: default_cases_count(),
            case_move_distance: default_case_move_distance(),
            case_move_speed: default_case_move_speed(),
            all_cases_animation_delay_coefficient: default_all_cases_delay_coefficient(),
            case_start_position_z: default_case_start_position_z(),
            case_scale_time: default_case_scale_time(),
            case_slide_time: default_case_slide_time(),
            case_stagger: default_case_stagger(),
            sound_offset_z: default_sound_offset_z(),
            animation: CasesAnimationMode::default(),
        }
    }
}

impl Default for AirConditionerConfig {
    fn default() -> Self {
        Self {
            power_on: false,
            rotation_speed: default_ac_rotation_speed(),
            max_open_angle: default_ac_max_open_angle(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            horizontal_open_angle: default_window_horizontal_angle(),
            vertical_open_angle: default_window_vertical_angle(),
            rotation_speed: default_window_rotation_speed(),
            handle_open_angle: default_handle_open_angle(),
            handle_rotation_speed: default_handle_rotation_speed(),
            open_mode: WindowOpenMode::default(),
        }
    }
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            moving_area: MovingAreaConfig::default(),
            key_press_depth: default_key_press_depth(),
            key_press_time: default_key_press_time(),
        }
    }
}

impl Default for MovingAreaConfig {
    fn default() -> Self {
        Self {
            width: default_area_width(),
            height: default_area_height(),
            show_debug_plane: false,
        }
    }
}

impl Default for ObjectSoundConfig {
    fn default() -> Self {
        Self {
            ref_distance: default_ref_distance(),
            helper_size: default_helper_size(),
            volume: default_object_volume(),
        }
    }
}

impl RoomConfig {
    /// 加载配置文件
    ///
    /// 文件不存在时返回默认配置并打印警告；文件存在但无法解析时返回错误。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        info!(path = ?path, "配置文件加载成功");
        Ok(config)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("start_animation.object_fall_down_time", self.start_animation.object_fall_down_time)?;
        check_non_negative("start_animation.show_delay_step", self.start_animation.show_delay_step)?;

        if self.locker.cases_count == 0 {
            return Err(ConfigError::ValidationFailed(
                "locker.cases_count 必须大于 0".to_string(),
            ));
        }
        check_positive("locker.case_move_distance", self.locker.case_move_distance)?;
        check_positive("locker.case_move_speed", self.locker.case_move_speed)?;
        check_non_negative(
            "locker.all_cases_animation_delay_coefficient",
            self.locker.all_cases_animation_delay_coefficient,
        )?;
        check_non_negative("locker.case_scale_time", self.locker.case_scale_time)?;
        check_non_negative("locker.case_slide_time", self.locker.case_slide_time)?;
        check_non_negative("locker.case_stagger", self.locker.case_stagger)?;

        check_positive("air_conditioner.rotation_speed", self.air_conditioner.rotation_speed)?;
        check_positive("air_conditioner.max_open_angle", self.air_conditioner.max_open_angle)?;
        check_positive("window.rotation_speed", self.window.rotation_speed)?;
        check_positive("window.horizontal_open_angle", self.window.horizontal_open_angle)?;
        check_positive("window.vertical_open_angle", self.window.vertical_open_angle)?;
        check_positive("window.handle_rotation_speed", self.window.handle_rotation_speed)?;
        check_non_negative("window.handle_open_angle", self.window.handle_open_angle)?;

        check_positive("mouse.moving_area.width", self.mouse.moving_area.width)?;
        check_positive("mouse.moving_area.height", self.mouse.moving_area.height)?;
        check_positive("mouse.key_press_time", self.mouse.key_press_time)?;

        check_volume("global_volume", self.global_volume)?;
        for (kind, sound) in &self.sounds.objects {
            check_volume(&format!("sounds.objects.{kind}.volume"), sound.volume)?;
            check_positive(&format!("sounds.objects.{kind}.ref_distance"), sound.ref_distance)?;
        }

        Ok(())
    }
}

fn check_positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(format!(
            "{name} 必须大于 0（当前 {value}）"
        )))
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(format!(
            "{name} 不能为负（当前 {value}）"
        )))
    }
}

fn check_volume(name: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(format!(
            "{name} 必须在 0.0 - 1.0 之间（当前 {value}）"
        )))
    }
}
