use crate::delivery::DeliveryParams;
use crate::error::{HubSimError, Result};
use crate::queue::{ArrivalMode, QueueParams};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 当前支持的场景文件版本。
pub const SCHEMA_VERSION: u32 = 1;

/// 场景文件（scenario.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub schema_version: u32,
    #[serde(default)]
    pub meta: Option<ScenarioMeta>,
    pub queue: QueueSpec,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub delivery: Option<DeliverySpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSpec {
    pub arrival_rate: f64,
    pub service_rate: f64,
    pub horizon: f64,
    /// 缺省为 `oversample`，倍数 1.5
    #[serde(default)]
    pub arrivals: Option<ArrivalMode>,
}

/// 送达模型的覆盖项；未给出的字段沿用 [`DeliveryParams::default`]。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliverySpec {
    #[serde(default)]
    pub parcels: Option<usize>,
    #[serde(default)]
    pub base_days: Option<f64>,
    #[serde(default)]
    pub hours_per_day: Option<f64>,
    #[serde(default)]
    pub hub_arrival_rate: Option<f64>,
    #[serde(default)]
    pub hub_service_rate: Option<f64>,
    #[serde(default)]
    pub weather_probability: Option<f64>,
    #[serde(default)]
    pub strike_probability: Option<f64>,
    #[serde(default)]
    pub thresholds_days: Option<Vec<f64>>,
}

impl ScenarioSpec {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let spec: ScenarioSpec = serde_json::from_str(raw)?;
        if spec.schema_version != SCHEMA_VERSION {
            return Err(HubSimError::invalid(
                "schema_version",
                spec.schema_version as f64,
                "unsupported scenario schema version",
            ));
        }
        Ok(spec)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// 转换为已校验的仿真参数。
    pub fn queue_params(&self) -> Result<QueueParams> {
        let q = &self.queue;
        let params = QueueParams::new(q.arrival_rate, q.service_rate, q.horizon)
            .with_arrivals(q.arrivals.unwrap_or_default());
        params.validate()?;
        Ok(params)
    }

    pub fn delivery_params(&self) -> DeliveryParams {
        match &self.delivery {
            Some(d) => d.apply(DeliveryParams::default()),
            None => DeliveryParams::default(),
        }
    }
}

impl DeliverySpec {
    pub fn apply(&self, mut params: DeliveryParams) -> DeliveryParams {
        if let Some(v) = self.parcels {
            params.parcels = v;
        }
        if let Some(v) = self.base_days {
            params.base_days = v;
        }
        if let Some(v) = self.hours_per_day {
            params.hours_per_day = v;
        }
        if let Some(v) = self.hub_arrival_rate {
            params.hub_arrival_rate = v;
        }
        if let Some(v) = self.hub_service_rate {
            params.hub_service_rate = v;
        }
        if let Some(v) = self.weather_probability {
            params.weather.probability = v;
        }
        if let Some(v) = self.strike_probability {
            params.strike.probability = v;
        }
        if let Some(v) = &self.thresholds_days {
            params.thresholds_days = v.clone();
        }
        params
    }
}
