//! 错误类型
//!
//! 仿真、配置与天气数据解析共用的错误枚举。

use std::path::PathBuf;

/// hubsim-rs 的统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum HubSimError {
    /// 参数非法（非正的速率/时长、越界的概率等），不可重试。
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// 过采样的候选到达数用尽，仍未覆盖仿真时长；调用方应增大 overshoot 倍数后重试。
    #[error(
        "oversampled arrival pool exhausted: {drawn} candidates reached t={reached:.6} < horizon {horizon}"
    )]
    CapacityExceeded {
        drawn: usize,
        reached: f64,
        horizon: f64,
    },

    /// 本次运行没有保留任何到达。
    #[error("simulation run produced no parcels")]
    EmptyRun,

    /// 场景文件解析或 JSON 输出失败。
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// 天气指数文件格式不符合预期。
    #[error("weather file {}: {reason}", path.display())]
    WeatherFile { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, HubSimError>;

impl HubSimError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        HubSimError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// 要求 `value` 为有限正数。
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(HubSimError::invalid(name, value, "must be a finite number > 0"))
    }
}

/// 要求 `value` 为 [0, 1] 内的概率。
pub(crate) fn ensure_probability(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(HubSimError::invalid(name, value, "must lie in [0, 1]"))
    }
}
