//! 包裹送达时间的 Monte Carlo 模型
//!
//! 每个包裹的送达时间 = 基础时间 + 分拣中心排队延迟 + 外部延迟（天气、罢工）。
//! 排队延迟来自 [`simulate_parcels`]，以小时计，再按每日工作小时数折算为天。

use crate::error::{HubSimError, Result, ensure_positive, ensure_probability};
use crate::queue::simulate_parcels;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 以整天计的延迟区间（闭区间）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_days: u32,
    pub max_days: u32,
}

/// 一类外部延迟：以 `probability` 发生，发生时延迟在 `days` 内均匀取整数天。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExternalDelay {
    pub probability: f64,
    pub days: DelayRange,
}

impl ExternalDelay {
    fn validate(&self, name: &'static str) -> Result<()> {
        ensure_probability(name, self.probability)?;
        if self.days.min_days > self.days.max_days {
            return Err(HubSimError::invalid(
                name,
                self.days.min_days as f64,
                "delay range minimum exceeds maximum",
            ));
        }
        Ok(())
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if rng.random::<f64>() < self.probability {
            rng.random_range(self.days.min_days..=self.days.max_days) as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryParams {
    pub parcels: usize,
    pub base_days: f64,
    /// 分拣中心每天运行的小时数，用于把排队小时折算为天
    pub hours_per_day: f64,
    /// 分拣中心到达率（包裹/小时）
    pub hub_arrival_rate: f64,
    /// 分拣中心处理能力（包裹/小时）
    pub hub_service_rate: f64,
    pub weather: ExternalDelay,
    pub strike: ExternalDelay,
    /// 报告中统计“超过 N 天”比例的阈值
    pub thresholds_days: Vec<f64>,
}

impl Default for DeliveryParams {
    fn default() -> Self {
        Self {
            parcels: 10_000,
            base_days: 3.0,
            hours_per_day: 8.0,
            hub_arrival_rate: 500.0,
            hub_service_rate: 550.0,
            weather: ExternalDelay {
                probability: 0.10,
                days: DelayRange {
                    min_days: 1,
                    max_days: 2,
                },
            },
            strike: ExternalDelay {
                probability: 0.05,
                days: DelayRange {
                    min_days: 2,
                    max_days: 3,
                },
            },
            thresholds_days: vec![3.0, 5.0],
        }
    }
}

impl DeliveryParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_days.is_finite() && self.base_days >= 0.0) {
            return Err(HubSimError::invalid(
                "base_days",
                self.base_days,
                "must be a finite number >= 0",
            ));
        }
        ensure_positive("hours_per_day", self.hours_per_day)?;
        self.weather.validate("weather")?;
        self.strike.validate("strike")?;
        Ok(())
    }
}

/// 单个包裹的送达时间分解（天）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParcelDelivery {
    pub queue_days: f64,
    pub external_days: f64,
    pub total_days: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Exceedance {
    pub threshold_days: f64,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReport {
    pub parcels: usize,
    pub mean_total_days: f64,
    pub median_total_days: f64,
    pub mean_queue_days: f64,
    pub mean_external_days: f64,
    pub exceedance: Vec<Exceedance>,
}

/// 为每个包裹抽取排队与外部延迟。
pub fn simulate_deliveries<R: Rng + ?Sized>(
    params: &DeliveryParams,
    rng: &mut R,
) -> Result<Vec<ParcelDelivery>> {
    params.validate()?;
    let hub = simulate_parcels(
        params.hub_arrival_rate,
        params.hub_service_rate,
        params.parcels,
        rng,
    )?;

    Ok(hub
        .iter()
        .map(|record| {
            let queue_days = record.waiting_time / params.hours_per_day;
            let external_days = params.weather.sample(rng) + params.strike.sample(rng);
            ParcelDelivery {
                queue_days,
                external_days,
                total_days: params.base_days + queue_days + external_days,
            }
        })
        .collect())
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    values.sum::<f64>() / n as f64
}

fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// 均值、中位数与各阈值的超出比例。
pub fn summarize_deliveries(
    deliveries: &[ParcelDelivery],
    thresholds_days: &[f64],
) -> Result<DeliveryReport> {
    if deliveries.is_empty() {
        return Err(HubSimError::EmptyRun);
    }

    let mut totals: Vec<f64> = deliveries.iter().map(|d| d.total_days).collect();
    totals.sort_by(f64::total_cmp);

    let n = totals.len() as f64;
    let exceedance = thresholds_days
        .iter()
        .map(|&threshold_days| Exceedance {
            threshold_days,
            fraction: totals.iter().filter(|&&t| t > threshold_days).count() as f64 / n,
        })
        .collect();

    Ok(DeliveryReport {
        parcels: deliveries.len(),
        mean_total_days: mean(totals.iter().copied()),
        median_total_days: median(&totals),
        mean_queue_days: mean(deliveries.iter().map(|d| d.queue_days)),
        mean_external_days: mean(deliveries.iter().map(|d| d.external_days)),
        exceedance,
    })
}

/// 完整跑一次 Monte Carlo 并生成报告。
#[tracing::instrument(skip(params, rng), fields(parcels = params.parcels))]
pub fn run_monte_carlo<R: Rng + ?Sized>(
    params: &DeliveryParams,
    rng: &mut R,
) -> Result<DeliveryReport> {
    let deliveries = simulate_deliveries(params, rng)?;
    debug!(parcels = deliveries.len(), "送达时间抽样完成");
    let report = summarize_deliveries(&deliveries, &params.thresholds_days)?;
    info!(
        mean_total_days = report.mean_total_days,
        median_total_days = report.median_total_days,
        "Monte Carlo 完成"
    );
    Ok(report)
}
