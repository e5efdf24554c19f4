//! 仿真时间类型
//!
//! 仿真时间以 `f64` 表示（单位由调用方决定，CLI 中为小时），并提供全序比较。

use std::cmp::Ordering;
use std::ops::Add;

/// 仿真时间。`Ord` 基于 [`f64::total_cmp`]，可直接放进 `BinaryHeap`。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    pub fn from_hours(h: f64) -> SimTime {
        SimTime(h)
    }

    pub fn from_minutes(m: f64) -> SimTime {
        SimTime(m / 60.0)
    }

    pub fn as_hours(self) -> f64 {
        self.0
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}
