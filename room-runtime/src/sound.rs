//! # Sound 模块
//!
//! 对象的定位音效控制。
//!
//! ## 核心概念
//!
//! - `PositionalSound`: 宿主提供的定位音源（音量、参考距离、位置、播放）
//! - `AudioBackend`: 按音效名创建音源
//! - `SoundController`: 一个对象的所有开 / 关音效对，负责音量计算与位置同步
//! - `VirtualAudio`: 不接设备的内存实现，记录播放历史
//!
//! ## 音量
//!
//! ```text
//! effective = enabled ? global_volume * object_volume : 0
//! ```
//!
//! 每次 `on_volume_changed` / `enable` / `disable` 都对全部音源重新计算。

use glam::Vec3;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use tracing::debug;

use crate::config::ObjectSoundConfig;
use crate::error::{RoomError, RoomResult};

/// 定位音源
pub trait PositionalSound {
    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;
    fn set_ref_distance(&mut self, distance: f32);
    fn set_position(&mut self, position: Vec3);
    fn position(&self) -> Vec3;
    fn play(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

/// 音频后端
pub trait AudioBackend {
    /// 创建音源
    ///
    /// # 返回
    /// - `None`: 后端没有这个音效
    fn create_positional(&mut self, clip: &str) -> Option<Box<dyn PositionalSound>>;
}

/// 音源调试标记
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundHelper {
    pub size: f32,
    pub position: Vec3,
    pub visible: bool,
}

impl SoundHelper {
    pub fn new(size: f32, position: Vec3) -> Self {
        Self {
            size,
            position,
            visible: false,
        }
    }
}

/// 一对开 / 关音效
struct SoundPair {
    open: Box<dyn PositionalSound>,
    close: Box<dyn PositionalSound>,
    helper: SoundHelper,
}

/// 音效控制器
pub struct SoundController {
    pairs: Vec<SoundPair>,
    /// 全局音量（广播而来）
    global_volume: f32,
    /// 对象音量（静态配置）
    object_volume: f32,
    enabled: bool,
    /// 音源相对零件的偏移
    offset: Vec3,
}

impl std::fmt::Debug for SoundController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundController")
            .field("pairs", &self.pairs.len())
            .field("global_volume", &self.global_volume)
            .field("object_volume", &self.object_volume)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl SoundController {
    /// 创建控制器
    ///
    /// # 参数
    /// - `object`: 对象名（用于错误信息）
    /// - `anchors`: 每个音效对所跟随零件的当前位置
    /// - `clips`: `(开音效, 关音效)` 名称
    ///
    /// # 错误
    /// 后端缺少音效时返回 `RoomError::MissingSound`
    pub fn new(
        object: &str,
        backend: &mut dyn AudioBackend,
        config: &ObjectSoundConfig,
        global_volume: f32,
        anchors: &[Vec3],
        clips: (&str, &str),
        offset: Vec3,
    ) -> RoomResult<Self> {
        let mut controller = Self {
            pairs: Vec::with_capacity(anchors.len()),
            global_volume,
            object_volume: config.volume,
            enabled: true,
            offset,
        };

        let volume = controller.effective_volume();
        for anchor in anchors {
            let mut open = create_sound(object, backend, clips.0)?;
            let mut close = create_sound(object, backend, clips.1)?;

            let position = *anchor + offset;
            for sound in [&mut open, &mut close] {
                sound.set_ref_distance(config.ref_distance);
                sound.set_volume(volume);
                sound.set_position(position);
            }

            controller.pairs.push(SoundPair {
                open,
                close,
                helper: SoundHelper::new(config.helper_size, position),
            });
        }

        debug!(object = object, pairs = controller.pairs.len(), "音效初始化完成");
        Ok(controller)
    }

    /// 当前的实际音量
    pub fn effective_volume(&self) -> f32 {
        if self.enabled {
            self.global_volume * self.object_volume
        } else {
            0.0
        }
    }

    /// 全局音量变化
    pub fn on_volume_changed(&mut self, global_volume: f32) {
        self.global_volume = global_volume;
        self.apply_volume();
    }

    /// 启用音效
    pub fn enable(&mut self) {
        self.enabled = true;
        self.apply_volume();
    }

    /// 禁用音效（音量置 0，不停止播放）
    pub fn disable(&mut self) {
        self.enabled = false;
        self.apply_volume();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply_volume(&mut self) {
        let volume = self.effective_volume();
        for pair in &mut self.pairs {
            pair.open.set_volume(volume);
            pair.close.set_volume(volume);
        }
    }

    /// 显示调试标记
    pub fn show_helpers(&mut self) {
        for pair in &mut self.pairs {
            pair.helper.visible = true;
        }
    }

    /// 隐藏调试标记
    pub fn hide_helpers(&mut self) {
        for pair in &mut self.pairs {
            pair.helper.visible = false;
        }
    }

    /// 播放开音效（正在播放时从头开始）
    pub fn play_open(&mut self, index: usize) {
        if let Some(pair) = self.pairs.get_mut(index) {
            restart(pair.open.as_mut());
        }
    }

    /// 播放关音效（正在播放时从头开始）
    pub fn play_close(&mut self, index: usize) {
        if let Some(pair) = self.pairs.get_mut(index) {
            restart(pair.close.as_mut());
        }
    }

    /// 让音效对跟随零件位置
    pub fn sync_position(&mut self, index: usize, anchor: Vec3) {
        let position = anchor + self.offset;
        if let Some(pair) = self.pairs.get_mut(index) {
            pair.open.set_position(position);
            pair.close.set_position(position);
            pair.helper.position = position;
        }
    }

    /// 所有音源的音量（开、关交替）
    pub fn volumes(&self) -> Vec<f32> {
        self.pairs
            .iter()
            .flat_map(|p| [p.open.volume(), p.close.volume()])
            .collect()
    }

    /// 调试标记
    pub fn helpers(&self) -> impl Iterator<Item = &SoundHelper> {
        self.pairs.iter().map(|p| &p.helper)
    }

    /// 开音效位置
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.pairs.get(index).map(|p| p.open.position())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn create_sound(
    object: &str,
    backend: &mut dyn AudioBackend,
    clip: &str,
) -> RoomResult<Box<dyn PositionalSound>> {
    backend
        .create_positional(clip)
        .ok_or_else(|| RoomError::MissingSound {
            object: object.to_string(),
            clip: clip.to_string(),
        })
}

fn restart(sound: &mut dyn PositionalSound) {
    if sound.is_playing() {
        sound.stop();
    }
    sound.play();
}

// ========== 内存后端 ==========

/// 播放记录
#[derive(Debug, Clone, PartialEq)]
pub enum AudioRecord {
    Play { clip: String, volume: f32, position: Vec3 },
    Stop { clip: String },
}

#[derive(Debug, Default)]
struct VirtualAudioState {
    history: Vec<AudioRecord>,
    created: usize,
}

/// 内存音频后端
///
/// 没有声音设备，只记录播放历史。克隆共享同一份记录。
#[derive(Debug, Clone, Default)]
pub struct VirtualAudio {
    /// `None` 表示接受任意音效名
    clips: Option<BTreeSet<String>>,
    state: Rc<RefCell<VirtualAudioState>>,
}

impl VirtualAudio {
    /// 接受任意音效名
    pub fn new() -> Self {
        Self::default()
    }

    /// 只接受给定的音效
    pub fn with_clips<I, S>(clips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            clips: Some(clips.into_iter().map(Into::into).collect()),
            state: Rc::default(),
        }
    }

    /// 全部播放记录
    pub fn history(&self) -> Vec<AudioRecord> {
        self.state.borrow().history.clone()
    }

    /// 各音效的播放次数
    pub fn play_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.state.borrow().history {
            if let AudioRecord::Play { clip, .. } = record {
                *counts.entry(clip.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// 清空记录
    pub fn clear_history(&self) {
        self.state.borrow_mut().history.clear();
    }

    /// 已创建的音源数量
    pub fn created(&self) -> usize {
        self.state.borrow().created
    }
}

impl AudioBackend for VirtualAudio {
    fn create_positional(&mut self, clip: &str) -> Option<Box<dyn PositionalSound>> {
        if self.clips.as_ref().is_some_and(|clips| !clips.contains(clip)) {
            return None;
        }

        self.state.borrow_mut().created += 1;
        Some(Box::new(VirtualSound {
            clip: clip.to_string(),
            volume: 1.0,
            ref_distance: 1.0,
            position: Vec3::ZERO,
            playing: false,
            state: Rc::clone(&self.state),
        }))
    }
}

/// 内存音源
///
/// 没有真实时长，播放后保持“正在播放”直到被停止。
#[derive(Debug)]
struct VirtualSound {
    clip: String,
    volume: f32,
    ref_distance: f32,
    position: Vec3,
    playing: bool,
    state: Rc<RefCell<VirtualAudioState>>,
}

impl PositionalSound for VirtualSound {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_ref_distance(&mut self, distance: f32) {
        self.ref_distance = distance;
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn play(&mut self) {
        self.playing = true;
        self.state.borrow_mut().history.push(AudioRecord::Play {
            clip: self.clip.clone(),
            volume: self.volume,
            position: self.position,
        });
    }

    fn stop(&mut self) {
        self.playing = false;
        self.state.borrow_mut().history.push(AudioRecord::Stop {
            clip: self.clip.clone(),
        });
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(audio: &mut VirtualAudio, global: f32) -> SoundController {
        let config = ObjectSoundConfig {
            volume: 0.8,
            ..ObjectSoundConfig::default()
        };
        let anchors = [Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)];
        SoundController::new(
            "locker",
            audio,
            &config,
            global,
            &anchors,
            ("open-case", "close-case"),
            Vec3::new(0.0, 0.0, 0.8),
        )
        .unwrap()
    }

    #[test]
    fn test_effective_volume() {
        let mut audio = VirtualAudio::new();
        let mut sounds = controller(&mut audio, 1.0);
        assert_eq!(audio.created(), 4);
        assert!(sounds.volumes().iter().all(|v| (*v - 0.8).abs() < 1e-6));

        sounds.on_volume_changed(0.5);
        sounds.enable();
        assert!(sounds.volumes().iter().all(|v| (*v - 0.4).abs() < 1e-6));

        sounds.disable();
        assert!(sounds.volumes().iter().all(|v| *v == 0.0));

        // 禁用期间改变全局音量，重新启用后使用新值
        sounds.on_volume_changed(0.25);
        assert!(sounds.volumes().iter().all(|v| *v == 0.0));
        sounds.enable();
        assert!(sounds.volumes().iter().all(|v| (*v - 0.2).abs() < 1e-6));
    }

    #[test]
    fn test_play_restarts() {
        let mut audio = VirtualAudio::new();
        let mut sounds = controller(&mut audio, 1.0);

        sounds.play_open(1);
        sounds.play_open(1);
        sounds.play_close(7);

        let history = audio.history();
        assert_eq!(history.len(), 3);
        assert!(matches!(&history[1], AudioRecord::Stop { clip } if clip == "open-case"));
        assert_eq!(audio.play_counts().get("open-case"), Some(&2));
    }

    #[test]
    fn test_sync_position_applies_offset() {
        let mut audio = VirtualAudio::new();
        let mut sounds = controller(&mut audio, 1.0);

        assert_eq!(sounds.position(0), Some(Vec3::new(0.0, 0.0, 0.8)));
        sounds.sync_position(0, Vec3::new(1.0, 0.0, 0.5));
        assert_eq!(sounds.position(0), Some(Vec3::new(1.0, 0.0, 1.3)));
        assert_eq!(
            sounds.helpers().next().map(|h| h.position),
            Some(Vec3::new(1.0, 0.0, 1.3))
        );
    }

    #[test]
    fn test_helpers_toggle() {
        let mut audio = VirtualAudio::new();
        let mut sounds = controller(&mut audio, 1.0);

        assert!(sounds.helpers().all(|h| !h.visible));
        sounds.show_helpers();
        assert!(sounds.helpers().all(|h| h.visible));
        sounds.hide_helpers();
        assert!(sounds.helpers().all(|h| !h.visible));
    }

    #[test]
    fn test_missing_clip_is_error() {
        let mut audio = VirtualAudio::with_clips(["open-case"]);
        let config = ObjectSoundConfig::default();
        let err = SoundController::new(
            "locker",
            &mut audio,
            &config,
            1.0,
            &[Vec3::ZERO],
            ("open-case", "close-case"),
            Vec3::ZERO,
        )
        .unwrap_err();

        assert_eq!(
            err,
            RoomError::MissingSound {
                object: "locker".to_string(),
                clip: "close-case".to_string(),
            }
        );
    }
}
