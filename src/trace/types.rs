use serde::{Deserialize, Serialize};

/// 跟踪事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// 运行元信息（t=0 的第一条事件）
    Meta {
        arrival_rate: f64,
        service_rate: f64,
        parcels: usize,
    },
    /// 包裹到达；`queue_len` 为到达前排队的包裹数
    Arrive { queue_len: usize, server_busy: bool },
    /// 包裹开始接受服务
    StartService { waited: f64, service_duration: f64 },
    /// 包裹服务结束离开
    Depart { queue_len: usize },
}

/// 一条可回放的事件（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// 仿真时间（和 `SimTime.0` 同口径）
    pub t: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parcel: Option<usize>,
    #[serde(flatten)]
    pub kind: TraceEventKind,
}

/// 事件收集器（存内存，运行结束后写 JSON 文件）
#[derive(Debug, Default)]
pub struct TraceLogger {
    pub events: Vec<TraceEvent>,
}

impl TraceLogger {
    pub fn push(&mut self, ev: TraceEvent) {
        self.events.push(ev);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}
