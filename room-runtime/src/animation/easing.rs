//! # Easing 模块
//!
//! 补间的时间曲线。每条曲线由一个"缓入"基函数和方向组成：
//! 缓出是缓入的镜像，缓入缓出把两者拼在 `t = 0.5` 处。
//! `EaseOutBack` 会越过终点再回落，落地动画使用。

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// 回弹曲线的越界系数
const BACK_OVERSHOOT: f32 = 1.70158;

/// 缓动函数类型
///
/// 序列化名称为 snake_case（`ease_out_sine` 等），配置文件直接使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    #[default]
    EaseInOutCubic,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    /// 越过终点再回落
    EaseOutBack,
}

/// 缓入基函数
#[derive(Clone, Copy)]
enum Curve {
    Power(i32),
    Sine,
    Back,
}

#[derive(Clone, Copy)]
enum Direction {
    In,
    Out,
    InOut,
}

impl Curve {
    fn ease_in(self, t: f32) -> f32 {
        match self {
            Curve::Power(n) => t.powi(n),
            Curve::Sine => 1.0 - (t * FRAC_PI_2).cos(),
            Curve::Back => (BACK_OVERSHOOT + 1.0) * t.powi(3) - BACK_OVERSHOOT * t.powi(2),
        }
    }
}

impl EasingFunction {
    fn parts(self) -> Option<(Curve, Direction)> {
        use Direction::*;

        let parts = match self {
            EasingFunction::Linear => return None,
            EasingFunction::EaseInQuad => (Curve::Power(2), In),
            EasingFunction::EaseOutQuad => (Curve::Power(2), Out),
            EasingFunction::EaseInOutQuad => (Curve::Power(2), InOut),
            EasingFunction::EaseInCubic => (Curve::Power(3), In),
            EasingFunction::EaseOutCubic => (Curve::Power(3), Out),
            EasingFunction::EaseInOutCubic => (Curve::Power(3), InOut),
            EasingFunction::EaseInSine => (Curve::Sine, In),
            EasingFunction::EaseOutSine => (Curve::Sine, Out),
            EasingFunction::EaseInOutSine => (Curve::Sine, InOut),
            EasingFunction::EaseOutBack => (Curve::Back, Out),
        };
        Some(parts)
    }

    /// 把时间进度 `t`（会被夹到 0..=1）映射为缓动进度
    ///
    /// 两端固定为 0 和 1；只有 `EaseOutBack` 中途会超过 1。
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let Some((curve, direction)) = self.parts() else {
            return t;
        };

        match direction {
            Direction::In => curve.ease_in(t),
            Direction::Out => 1.0 - curve.ease_in(1.0 - t),
            Direction::InOut if t < 0.5 => curve.ease_in(2.0 * t) / 2.0,
            Direction::InOut => 1.0 - curve.ease_in(2.0 - 2.0 * t) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 11] = [
        EasingFunction::Linear,
        EasingFunction::EaseInQuad,
        EasingFunction::EaseOutQuad,
        EasingFunction::EaseInOutQuad,
        EasingFunction::EaseInCubic,
        EasingFunction::EaseOutCubic,
        EasingFunction::EaseInOutCubic,
        EasingFunction::EaseInSine,
        EasingFunction::EaseOutSine,
        EasingFunction::EaseInOutSine,
        EasingFunction::EaseOutBack,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-5, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(EasingFunction::Linear.apply(-0.5), 0.0);
        assert_eq!(EasingFunction::EaseOutSine.apply(1.5), 1.0);
    }

    #[test]
    fn test_out_mirrors_in() {
        let t = 0.3;
        let quad_in = EasingFunction::EaseInQuad.apply(t);
        let quad_out = EasingFunction::EaseOutQuad.apply(1.0 - t);
        assert!((quad_in + quad_out - 1.0).abs() < 1e-5);

        // 缓出前半段走得更多
        assert!(EasingFunction::EaseOutSine.apply(0.5) > 0.5);
        assert!(EasingFunction::EaseInCubic.apply(0.5) < 0.5);
    }

    #[test]
    fn test_in_out_is_half_at_midpoint() {
        for easing in [
            EasingFunction::EaseInOutQuad,
            EasingFunction::EaseInOutCubic,
            EasingFunction::EaseInOutSine,
        ] {
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-5, "{easing:?}");
        }
        assert!((EasingFunction::EaseInOutCubic.apply(0.25) - 0.0625).abs() < 1e-5);
    }

    #[test]
    fn test_out_back_overshoots() {
        let easing = EasingFunction::EaseOutBack;
        assert!(easing.apply(0.6) > 1.0);
        assert!(ALL.iter().filter(|e| **e != easing).all(|e| e.apply(0.6) <= 1.0));
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&EasingFunction::EaseOutBack).unwrap();
        assert_eq!(json, "\"ease_out_back\"");
        let parsed: EasingFunction = serde_json::from_str("\"ease_in_out_sine\"").unwrap();
        assert_eq!(parsed, EasingFunction::EaseInOutSine);
    }
}
