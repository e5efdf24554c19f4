//! 到达与服务时长的随机生成

use super::{ArrivalMode, QueueParams};
use crate::error::{HubSimError, Result, ensure_positive};
use rand::Rng;
use rand_distr::{Distribution, Exp};
use tracing::{debug, trace, warn};

/// 单次过采样允许抽取的最大候选数。
pub const MAX_ARRIVAL_CANDIDATES: usize = 50_000_000;

fn exponential(name: &'static str, rate: f64) -> Result<Exp<f64>> {
    ensure_positive(name, rate)?;
    Exp::new(rate).map_err(|_| HubSimError::invalid(name, rate, "not a valid exponential rate"))
}

fn too_many_arrivals(expected: f64) -> HubSimError {
    HubSimError::invalid(
        "expected_arrivals",
        expected,
        "more arrivals than MAX_ARRIVAL_CANDIDATES within the horizon",
    )
}

/// 生成 `[0, horizon]` 内的到达时刻（严格递增）。
///
/// 两种模式下到达数都不超过 [`MAX_ARRIVAL_CANDIDATES`]。
pub fn draw_arrivals<R: Rng + ?Sized>(
    arrival_rate: f64,
    horizon: f64,
    mode: ArrivalMode,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let gaps = exponential("arrival_rate", arrival_rate)?;
    ensure_positive("horizon", horizon)?;

    match mode {
        ArrivalMode::Oversample { overshoot_factor } => {
            mode.validate()?;
            let expected = (arrival_rate * horizon * overshoot_factor).ceil();
            if !expected.is_finite() || expected > MAX_ARRIVAL_CANDIDATES as f64 {
                return Err(too_many_arrivals(expected));
            }
            let n = (expected as usize).max(1);

            let mut t = 0.0;
            let mut candidates: Vec<f64> = (0..n)
                .map(|_| {
                    t += gaps.sample(rng);
                    t
                })
                .collect();

            let reached = candidates.last().copied().unwrap_or(0.0);
            if reached <= horizon {
                return Err(HubSimError::CapacityExceeded {
                    drawn: n,
                    reached,
                    horizon,
                });
            }

            let kept = candidates.partition_point(|&a| a <= horizon);
            trace!(drawn = n, kept, "截断过采样到达");
            candidates.truncate(kept);
            Ok(candidates)
        }
        ArrivalMode::Sequential => {
            let expected = (arrival_rate * horizon).ceil();
            if !expected.is_finite() || expected > MAX_ARRIVAL_CANDIDATES as f64 {
                return Err(too_many_arrivals(expected));
            }

            let mut arrivals = Vec::new();
            let mut t = 0.0;
            loop {
                t += gaps.sample(rng);
                if t > horizon {
                    break;
                }
                if arrivals.len() == MAX_ARRIVAL_CANDIDATES {
                    return Err(too_many_arrivals(arrivals.len() as f64));
                }
                arrivals.push(t);
            }
            Ok(arrivals)
        }
    }
}

/// 生成恰好 `count` 个到达时刻。
pub(crate) fn draw_arrival_count<R: Rng + ?Sized>(
    arrival_rate: f64,
    count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let gaps = exponential("arrival_rate", arrival_rate)?;
    let mut t = 0.0;
    Ok((0..count)
        .map(|_| {
            t += gaps.sample(rng);
            t
        })
        .collect())
}

/// 为 `count` 个包裹各抽取一个服务时长（均值 1/μ）。
pub fn draw_services<R: Rng + ?Sized>(
    service_rate: f64,
    count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let dist = exponential("service_rate", service_rate)?;
    Ok((0..count).map(|_| dist.sample(rng)).collect())
}

/// 一次运行的原始随机输入：到达时刻与对应的服务时长。
///
/// 递推实现与事件驱动实现都从同一份 workload 出发，两者结果应逐条一致。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HubWorkload {
    pub arrivals: Vec<f64>,
    pub services: Vec<f64>,
}

impl HubWorkload {
    /// 先抽取全部到达，再按保留的到达数抽取服务时长。
    pub fn draw<R: Rng + ?Sized>(params: &QueueParams, rng: &mut R) -> Result<Self> {
        params.validate()?;
        let arrivals = draw_arrivals(params.arrival_rate, params.horizon, params.arrivals, rng)?;
        let services = draw_services(params.service_rate, arrivals.len(), rng)?;
        debug!(
            parcels = arrivals.len(),
            horizon = params.horizon,
            mode = ?params.arrivals,
            "生成 workload"
        );
        Ok(Self { arrivals, services })
    }

    /// 与 [`HubWorkload::draw`] 相同，但 `CapacityExceeded` 时把过采样倍数翻倍重抽，最多 `max_attempts` 次。
    pub fn draw_with_retry<R: Rng + ?Sized>(
        params: &QueueParams,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let mut params = *params;
        let mut attempt = 1;
        loop {
            match Self::draw(&params, rng) {
                Err(err @ HubSimError::CapacityExceeded { .. }) if attempt < max_attempts => {
                    let ArrivalMode::Oversample { overshoot_factor } = params.arrivals else {
                        return Err(err);
                    };
                    let next = overshoot_factor * 2.0;
                    warn!(attempt, overshoot_factor, next, "过采样不足，增大倍数重试");
                    params.arrivals = ArrivalMode::Oversample {
                        overshoot_factor: next,
                    };
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }
}
