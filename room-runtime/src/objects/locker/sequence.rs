//! 抽屉成组动画
//!
//! 一个成组动画是若干批次，每批次中的抽屉同时开始，
//! 第 `j` 批次延迟 `j * (1 / speed) * coefficient` 秒。

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 成组动画
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupAnimation {
    /// 从上到下逐个打开
    FromTop,
    /// 从下到上逐个打开
    FromBottom,
    /// 从中间向两端
    FromCenter,
    /// 从两端向中间
    ToCenter,
    /// 全部同时
    Together,
}

impl GroupAnimation {
    pub const ALL: [GroupAnimation; 5] = [
        GroupAnimation::FromTop,
        GroupAnimation::FromBottom,
        GroupAnimation::FromCenter,
        GroupAnimation::ToCenter,
        GroupAnimation::Together,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GroupAnimation::FromTop => "From top",
            GroupAnimation::FromBottom => "From bottom",
            GroupAnimation::FromCenter => "From center",
            GroupAnimation::ToCenter => "To center",
            GroupAnimation::Together => "Together",
        }
    }

    /// 抽屉下标的批次序列
    ///
    /// 每个下标在结果中恰好出现一次。
    pub fn sequence(&self, count: usize) -> Vec<Vec<usize>> {
        if count == 0 {
            return Vec::new();
        }

        match self {
            GroupAnimation::FromTop => (0..count).map(|i| vec![i]).collect(),
            GroupAnimation::FromBottom => (0..count).rev().map(|i| vec![i]).collect(),
            GroupAnimation::FromCenter => center_out(count),
            GroupAnimation::ToCenter => {
                let mut batches = center_out(count);
                batches.reverse();
                batches
            }
            GroupAnimation::Together => vec![(0..count).collect()],
        }
    }
}

fn center_out(count: usize) -> Vec<Vec<usize>> {
    let low = (count - 1) / 2;
    let high = count / 2;

    (0..=low)
        .map(|k| {
            if low == high && k == 0 {
                vec![low]
            } else {
                vec![low - k, high + k]
            }
        })
        .collect()
}

/// 点击柜体时使用的成组动画
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasesAnimationMode {
    /// 每次随机选择
    #[default]
    Random,
    /// 固定使用一种
    Fixed(GroupAnimation),
}

impl CasesAnimationMode {
    /// 确定本次使用的动画
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> GroupAnimation {
        match self {
            CasesAnimationMode::Random => {
                GroupAnimation::ALL[rng.gen_range(0..GroupAnimation::ALL.len())]
            }
            CasesAnimationMode::Fixed(animation) => *animation,
        }
    }
}

/// 成组动画中一个抽屉的启动
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaseStart {
    pub case: usize,
    /// 批次序号
    pub batch: usize,
    /// 启动延迟（秒）
    pub delay: f32,
}

/// 计算每个抽屉的启动延迟（按批次顺序）
pub fn schedule(animation: GroupAnimation, count: usize, speed: f32, coefficient: f32) -> Vec<CaseStart> {
    animation
        .sequence(count)
        .into_iter()
        .enumerate()
        .flat_map(|(batch, cases)| {
            let delay = batch as f32 * (1.0 / speed) * coefficient;
            cases.into_iter().map(move |case| CaseStart { case, batch, delay })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sequences_for_six_cases() {
        let sequences: Vec<String> = GroupAnimation::ALL
            .iter()
            .map(|a| {
                let batches: Vec<String> = a
                    .sequence(6)
                    .iter()
                    .map(|batch| batch.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" "))
                    .collect();
                format!("{} = {}", a.label(), batches.join(" / "))
            })
            .collect();

        insta::assert_yaml_snapshot!(sequences, @r"
        - From top = 0 / 1 / 2 / 3 / 4 / 5
        - From bottom = 5 / 4 / 3 / 2 / 1 / 0
        - From center = 2 3 / 1 4 / 0 5
        - To center = 0 5 / 1 4 / 2 3
        - Together = 0 1 2 3 4 5
        ");
    }

    #[test]
    fn test_every_case_visited_once() {
        for count in 1..=9 {
            for animation in GroupAnimation::ALL {
                let mut visited: Vec<usize> = animation.sequence(count).into_iter().flatten().collect();
                visited.sort_unstable();
                assert_eq!(visited, (0..count).collect::<Vec<_>>(), "{animation:?} x {count}");
            }
        }
    }

    #[test]
    fn test_odd_center() {
        assert_eq!(
            GroupAnimation::FromCenter.sequence(5),
            vec![vec![2], vec![1, 3], vec![0, 4]]
        );
        assert_eq!(GroupAnimation::ToCenter.sequence(1), vec![vec![0]]);
        assert!(GroupAnimation::Together.sequence(0).is_empty());
    }

    #[test]
    fn test_schedule_delays_non_decreasing() {
        let starts = schedule(GroupAnimation::FromBottom, 4, 2.0, 0.5);

        assert_eq!(starts.len(), 4);
        assert_eq!(starts[0].case, 3);
        assert_eq!(starts[0].delay, 0.0);
        assert_eq!(starts[1].delay, 0.25);
        assert!(starts.windows(2).all(|w| w[0].delay <= w[1].delay));
    }

    #[test]
    fn test_seeded_pick_is_deterministic() {
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..8)
                .map(|_| CasesAnimationMode::Random.pick(&mut rng))
                .collect::<Vec<_>>()
        };

        assert_eq!(picks(42), picks(42));

        let mut rng = StdRng::seed_from_u64(1);
        let fixed = CasesAnimationMode::Fixed(GroupAnimation::ToCenter);
        assert_eq!(fixed.pick(&mut rng), GroupAnimation::ToCenter);
    }
}
