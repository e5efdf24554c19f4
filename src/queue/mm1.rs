//! M/M/1 递推与汇总统计

use super::arrivals::{HubWorkload, draw_arrival_count, draw_services};
use super::{EventRecord, QueueParams, RunSummary, validate_rates};
use crate::error::{HubSimError, Result};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// 按到达顺序计算每个包裹的开始服务、离开与等待时间。
///
/// `service_start[i] = max(arrival[i], departure[i-1])`，第一个包裹到达即开始服务。
/// 每条记录依赖前一条的离开时间，只能顺序计算。
pub fn compute_records(arrivals: &[f64], services: &[f64]) -> Result<Vec<EventRecord>> {
    if arrivals.len() != services.len() {
        return Err(HubSimError::invalid(
            "service_durations",
            services.len() as f64,
            "must have one service duration per arrival",
        ));
    }

    let mut records = Vec::with_capacity(arrivals.len());
    let mut prev_departure: Option<f64> = None;
    for (&arrival_time, &service_duration) in arrivals.iter().zip(services) {
        let service_start_time = match prev_departure {
            Some(departure) => arrival_time.max(departure),
            None => arrival_time,
        };
        let departure_time = service_start_time + service_duration;
        records.push(EventRecord {
            arrival_time,
            service_start_time,
            service_duration,
            departure_time,
            waiting_time: service_start_time - arrival_time,
        });
        prev_departure = Some(departure_time);
    }
    Ok(records)
}

/// 在 `[0, horizon]` 内生成一次 M/M/1 运行的逐包裹记录。
///
/// 可能为空（horizon 内没有到达）；空结果交给 [`summarize`] 时会得到 [`HubSimError::EmptyRun`]。
///
/// # Errors
///
/// - 速率、时长或过采样倍数非法：[`HubSimError::InvalidParameter`]
/// - 过采样候选不足以覆盖 horizon：[`HubSimError::CapacityExceeded`]
pub fn generate<R: Rng + ?Sized>(params: &QueueParams, rng: &mut R) -> Result<Vec<EventRecord>> {
    let workload = HubWorkload::draw(params, rng)?;
    compute_records(&workload.arrivals, &workload.services)
}

/// 与 [`generate`] 相同，但遇到 `CapacityExceeded` 时把过采样倍数翻倍后重抽，最多 `max_attempts` 次。
pub fn generate_with_retry<R: Rng + ?Sized>(
    params: &QueueParams,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<EventRecord>> {
    let workload = HubWorkload::draw_with_retry(params, max_attempts, rng)?;
    compute_records(&workload.arrivals, &workload.services)
}

/// 恰好模拟 `count` 个包裹（不按时长截断）。
pub fn simulate_parcels<R: Rng + ?Sized>(
    arrival_rate: f64,
    service_rate: f64,
    count: usize,
    rng: &mut R,
) -> Result<Vec<EventRecord>> {
    validate_rates(arrival_rate, service_rate)?;
    if count == 0 {
        return Err(HubSimError::EmptyRun);
    }
    let arrivals = draw_arrival_count(arrival_rate, count, rng)?;
    let services = draw_services(service_rate, count, rng)?;
    compute_records(&arrivals, &services)
}

/// 对一次运行的记录求汇总统计。
pub fn summarize(events: &[EventRecord], arrival_rate: f64, service_rate: f64) -> Result<RunSummary> {
    validate_rates(arrival_rate, service_rate)?;
    if events.is_empty() {
        return Err(HubSimError::EmptyRun);
    }

    let total_wait: f64 = events.iter().map(|e| e.waiting_time).sum();
    let average_waiting_time = total_wait / events.len() as f64;

    Ok(RunSummary {
        parcels: events.len(),
        average_waiting_time,
        average_queue_length: arrival_rate * average_waiting_time,
        utilization: arrival_rate / service_rate,
    })
}

/// 一次运行的完整结果：汇总统计加逐包裹记录。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    pub summary: RunSummary,
    pub records: Vec<EventRecord>,
}

impl SimulationRun {
    pub fn waiting_times(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.waiting_time).collect()
    }
}

/// [`generate_with_retry`] + [`summarize`]。`max_attempts = 1` 即不重试。
#[tracing::instrument(skip(params, rng), fields(arrival_rate = params.arrival_rate, service_rate = params.service_rate, horizon = params.horizon))]
pub fn simulate<R: Rng + ?Sized>(
    params: &QueueParams,
    max_attempts: usize,
    rng: &mut R,
) -> Result<SimulationRun> {
    let records = generate_with_retry(params, max_attempts, rng)?;
    debug!(parcels = records.len(), "递推完成");
    let summary = summarize(&records, params.arrival_rate, params.service_rate)?;
    info!(
        parcels = summary.parcels,
        average_waiting_time = summary.average_waiting_time,
        average_queue_length = summary.average_queue_length,
        utilization = summary.utilization,
        "运行汇总"
    );
    Ok(SimulationRun { summary, records })
}
