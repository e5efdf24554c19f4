//! 事件驱动的分拣中心
//!
//! 用仿真器回放一份 [`HubWorkload`]：`ParcelArrival` 到达时若服务台空闲立即开始服务，
//! 否则进入 FIFO 队列；`ServiceComplete` 释放服务台并取出下一个包裹。
//! 结果与 [`compute_records`](super::compute_records) 的递推逐条一致。

use super::{EventRecord, QueueParams};
use super::arrivals::HubWorkload;
use crate::error::{HubSimError, Result};
use crate::sim::{Event, SimTime, Simulator, World};
use crate::trace::{TraceEvent, TraceEventKind, TraceLogger};
use std::any::Any;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// 事件：第 `parcel` 个包裹到达分拣中心。执行时顺带调度下一个到达。
#[derive(Debug)]
pub struct ParcelArrival {
    pub parcel: usize,
}

impl Event for ParcelArrival {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world
            .as_any_mut()
            .downcast_mut::<HubWorld>()
            .expect("world must be HubWorld");
        w.on_arrival(self.parcel, sim);

        let next = self.parcel + 1;
        if let Some(&at) = w.arrivals.get(next) {
            sim.schedule(SimTime(at), ParcelArrival { parcel: next });
        }
    }
}

/// 事件：第 `parcel` 个包裹服务结束。
#[derive(Debug)]
pub struct ServiceComplete {
    pub parcel: usize,
}

impl Event for ServiceComplete {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world
            .as_any_mut()
            .downcast_mut::<HubWorld>()
            .expect("world must be HubWorld");
        w.on_service_complete(self.parcel, sim);
    }
}

/// 事件驱动运行中测得的统计量。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HubStats {
    pub parcels_served: usize,
    pub events: u64,
    pub max_queue_len: usize,
    /// 排队包裹数（不含服务中的）对时间的平均，区间为 [0, 最后一次离开]
    pub time_avg_queue_len: f64,
}

/// 单服务台 FIFO 分拣中心。
#[derive(Debug, Default)]
pub struct HubWorld {
    arrivals: Vec<f64>,
    services: Vec<f64>,
    queue: VecDeque<usize>,
    /// (包裹, 开始服务时刻)
    in_service: Option<(usize, f64)>,
    records: Vec<EventRecord>,
    last_change: f64,
    queue_area: f64,
    max_queue_len: usize,
    events: u64,
    pub trace: Option<TraceLogger>,
}

impl World for HubWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        self.events = self.events.saturating_add(1);
    }
}

impl HubWorld {
    pub fn new(workload: HubWorkload) -> Result<Self> {
        let HubWorkload { arrivals, services } = workload;
        if arrivals.len() != services.len() {
            return Err(HubSimError::invalid(
                "service_durations",
                services.len() as f64,
                "must have one service duration per arrival",
            ));
        }
        let mut prev = 0.0;
        for &a in &arrivals {
            if !(a.is_finite() && a >= prev) {
                return Err(HubSimError::invalid(
                    "arrival_time",
                    a,
                    "arrivals must be finite, non-negative and non-decreasing",
                ));
            }
            prev = a;
        }
        if let Some(&bad) = services.iter().find(|s| !(s.is_finite() && **s >= 0.0)) {
            return Err(HubSimError::invalid(
                "service_duration",
                bad,
                "must be a finite number >= 0",
            ));
        }

        Ok(Self {
            records: Vec::with_capacity(arrivals.len()),
            arrivals,
            services,
            ..Self::default()
        })
    }

    pub fn with_trace(mut self) -> Self {
        self.trace = Some(TraceLogger::default());
        self
    }

    pub fn emit_trace_meta(&mut self, arrival_rate: f64, service_rate: f64) {
        let parcels = self.arrivals.len();
        self.push_trace(
            0.0,
            None,
            TraceEventKind::Meta {
                arrival_rate,
                service_rate,
                parcels,
            },
        );
    }

    /// 调度第一个到达；后续到达由 [`ParcelArrival`] 依次链式调度。
    pub fn start(&self, sim: &mut Simulator) {
        if let Some(&first) = self.arrivals.first() {
            sim.schedule(SimTime(first), ParcelArrival { parcel: 0 });
        }
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_busy(&self) -> bool {
        self.in_service.is_some()
    }

    pub fn stats(&self) -> HubStats {
        HubStats {
            parcels_served: self.records.len(),
            events: self.events,
            max_queue_len: self.max_queue_len,
            time_avg_queue_len: if self.last_change > 0.0 {
                self.queue_area / self.last_change
            } else {
                0.0
            },
        }
    }

    fn push_trace(&mut self, t: f64, parcel: Option<usize>, kind: TraceEventKind) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(TraceEvent { t, parcel, kind });
        }
    }

    /// 队列长度变化前调用，累计排队面积。
    fn advance(&mut self, now: f64) {
        self.queue_area += self.queue.len() as f64 * (now - self.last_change);
        self.last_change = now;
    }

    fn on_arrival(&mut self, parcel: usize, sim: &mut Simulator) {
        let now = sim.now().0;
        self.advance(now);

        let busy = self.is_busy();
        trace!(parcel, now, queue_len = self.queue.len(), busy, "包裹到达");
        self.push_trace(
            now,
            Some(parcel),
            TraceEventKind::Arrive {
                queue_len: self.queue.len(),
                server_busy: busy,
            },
        );

        if busy {
            self.queue.push_back(parcel);
            self.max_queue_len = self.max_queue_len.max(self.queue.len());
        } else {
            self.start_service(parcel, sim);
        }
    }

    fn on_service_complete(&mut self, parcel: usize, sim: &mut Simulator) {
        let now = sim.now().0;
        self.advance(now);

        let Some((serving, service_start_time)) = self.in_service.take() else {
            debug!(parcel, "服务台空闲时收到服务完成事件，忽略");
            return;
        };
        debug_assert_eq!(serving, parcel);

        let arrival_time = self.arrivals[parcel];
        self.records.push(EventRecord {
            arrival_time,
            service_start_time,
            service_duration: self.services[parcel],
            departure_time: now,
            waiting_time: service_start_time - arrival_time,
        });
        self.push_trace(
            now,
            Some(parcel),
            TraceEventKind::Depart {
                queue_len: self.queue.len(),
            },
        );

        if let Some(next) = self.queue.pop_front() {
            self.start_service(next, sim);
        }
    }

    fn start_service(&mut self, parcel: usize, sim: &mut Simulator) {
        let start = sim.now();
        let service_duration = self.services[parcel];
        self.in_service = Some((parcel, start.0));
        self.push_trace(
            start.0,
            Some(parcel),
            TraceEventKind::StartService {
                waited: start.0 - self.arrivals[parcel],
                service_duration,
            },
        );
        sim.schedule(start + service_duration, ServiceComplete { parcel });
    }
}

/// 事件驱动回放的结果。
#[derive(Debug)]
pub struct HubReplay {
    pub records: Vec<EventRecord>,
    pub stats: HubStats,
    pub trace: Option<TraceLogger>,
}

/// 用事件驱动仿真器回放一份 workload 直到所有包裹离开。
///
/// `with_trace` 时跟踪的第一条事件为 `meta`（记录 `params` 中的 λ、μ）。
pub fn replay(workload: HubWorkload, params: &QueueParams, with_trace: bool) -> Result<HubReplay> {
    let mut world = HubWorld::new(workload)?;
    if with_trace {
        world = world.with_trace();
        world.emit_trace_meta(params.arrival_rate, params.service_rate);
    }
    let mut sim = Simulator::default();
    world.start(&mut sim);
    sim.run(&mut world);

    let stats = world.stats();
    debug!(
        parcels = stats.parcels_served,
        events = stats.events,
        max_queue_len = stats.max_queue_len,
        "事件驱动回放完成"
    );
    Ok(HubReplay {
        records: world.records,
        stats,
        trace: world.trace,
    })
}
