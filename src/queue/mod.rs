//! 单服务台排队（M/M/1）
//!
//! 分拣中心被建模为一个 FIFO 单服务台队列：到达为泊松过程，服务时长服从指数分布。
//!
//! - [`generate`]：按仿真时长生成到达/服务，并用递推计算每个包裹的开始服务、离开与等待时间
//! - [`summarize`]：平均等待时间、平均队长（Little 定律）与利用率
//! - [`hub`]：同一模型的事件驱动实现，用于回放与跟踪

mod arrivals;
mod hub;
mod mm1;

pub use arrivals::{HubWorkload, MAX_ARRIVAL_CANDIDATES, draw_arrivals, draw_services};
pub use hub::{HubReplay, HubStats, HubWorld, ParcelArrival, ServiceComplete, replay};
pub use mm1::{
    SimulationRun, compute_records, generate, generate_with_retry, simulate, simulate_parcels,
    summarize,
};

use crate::error::{HubSimError, Result, ensure_positive};
use serde::{Deserialize, Serialize};

/// 过采样倍数的默认值。
pub const DEFAULT_OVERSHOOT_FACTOR: f64 = 1.5;

/// 到达过程的生成方式。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrivalMode {
    /// 一次抽取 `ceil(λ × horizon × overshoot_factor)` 个间隔，再截断到 horizon。
    /// 候选不足以覆盖 horizon 时返回 [`HubSimError::CapacityExceeded`]。
    Oversample {
        #[serde(default = "default_overshoot_factor")]
        overshoot_factor: f64,
    },
    /// 逐个抽取间隔，累计时间超过 horizon 即停止。
    Sequential,
}

impl ArrivalMode {
    pub fn validate(&self) -> Result<()> {
        match *self {
            ArrivalMode::Oversample { overshoot_factor }
                if !(overshoot_factor.is_finite() && overshoot_factor >= 1.0) =>
            {
                Err(HubSimError::invalid(
                    "overshoot_factor",
                    overshoot_factor,
                    "must be a finite number >= 1",
                ))
            }
            _ => Ok(()),
        }
    }
}

fn default_overshoot_factor() -> f64 {
    DEFAULT_OVERSHOOT_FACTOR
}

impl Default for ArrivalMode {
    fn default() -> Self {
        ArrivalMode::Oversample {
            overshoot_factor: DEFAULT_OVERSHOOT_FACTOR,
        }
    }
}

/// 一次按时长仿真的输入参数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueParams {
    /// λ：单位时间到达的包裹数
    pub arrival_rate: f64,
    /// μ：单位时间可处理的包裹数
    pub service_rate: f64,
    /// 仿真时长（与速率同一时间单位）
    pub horizon: f64,
    pub arrivals: ArrivalMode,
}

impl QueueParams {
    pub fn new(arrival_rate: f64, service_rate: f64, horizon: f64) -> Self {
        Self {
            arrival_rate,
            service_rate,
            horizon,
            arrivals: ArrivalMode::default(),
        }
    }

    pub fn with_arrivals(mut self, arrivals: ArrivalMode) -> Self {
        self.arrivals = arrivals;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_rates(self.arrival_rate, self.service_rate)?;
        ensure_positive("horizon", self.horizon)?;
        self.arrivals.validate()
    }

    /// ρ = λ / μ
    pub fn utilization(&self) -> f64 {
        self.arrival_rate / self.service_rate
    }
}

pub(crate) fn validate_rates(arrival_rate: f64, service_rate: f64) -> Result<()> {
    ensure_positive("arrival_rate", arrival_rate)?;
    ensure_positive("service_rate", service_rate)?;
    Ok(())
}

/// 单个包裹在分拣中心的经历。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub arrival_time: f64,
    pub service_start_time: f64,
    pub service_duration: f64,
    pub departure_time: f64,
    /// `service_start_time - arrival_time`，总是 >= 0
    pub waiting_time: f64,
}

/// 一次运行的汇总统计。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub parcels: usize,
    pub average_waiting_time: f64,
    /// λ × 平均等待时间（Little 定律，非独立测量）
    pub average_queue_length: f64,
    /// λ / μ（闭式，与样本无关）
    pub utilization: f64,
}
