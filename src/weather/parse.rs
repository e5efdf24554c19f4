//! ECA&D 指数文件解析
//!
//! 文件前 20 行是表头，其中一行形如
//! `This is the time series data of index FD for SWITZERLAND, BASEL-BINNINGEN (Station-ID: 240)`；
//! 其后每行为 `YEAR,CALC,MEAN`。

use crate::error::{HubSimError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const HEADER_LINES: usize = 20;
pub const STATION_MARKER: &str = "This is the time series data";
/// YEAR 列的缺测值
pub const MISSING_YEAR: i64 = -999_999;
/// CALC 列缩放（/100）后的缺测值
pub const MISSING_CALC: f64 = -9999.99;

/// 测站信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationInfo {
    pub country: Option<String>,
    pub name: String,
    pub id: Option<u64>,
}

impl StationInfo {
    fn unknown() -> Self {
        Self {
            country: None,
            name: "Unknown".to_string(),
            id: None,
        }
    }
}

/// 一行指数数据
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    pub index: String,
    pub station: StationInfo,
    pub year: i32,
    /// 已除以 100；缺测或无法解析时为 `None`
    pub calc: Option<f64>,
    pub mean: Option<f64>,
}

fn station_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bfor\s+([A-Z][A-Z .'\-]*),\s*(.+?)\s*\(Station-ID:\s*(\d+)\)")
            .expect("station regex is valid")
    })
}

/// 从表头行中提取测站信息（国家取 `for` 之后、第一个逗号之前的部分）；
/// 行存在但格式不符时返回 `Unknown`。
pub fn parse_station_line(line: &str) -> StationInfo {
    let Some(caps) = station_regex().captures(line) else {
        return StationInfo::unknown();
    };
    StationInfo {
        country: Some(caps[1].trim().to_string()),
        name: caps[2].trim().to_string(),
        id: caps[3].parse().ok(),
    }
}

fn parse_field(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
}

/// 解析一个文件的全部文本。`Err` 中为原因描述。
pub fn parse_index_text(index: &str, text: &str) -> std::result::Result<Vec<IndexRecord>, String> {
    let mut lines = text.lines();
    let header: Vec<&str> = lines.by_ref().take(HEADER_LINES).collect();
    if header.len() < HEADER_LINES {
        return Err(format!(
            "header has {} lines, expected {HEADER_LINES}",
            header.len()
        ));
    }
    let station_line = header
        .iter()
        .find(|l| l.contains(STATION_MARKER))
        .ok_or_else(|| format!("no station line (`{STATION_MARKER}`) in header"))?;
    let station = parse_station_line(station_line);

    let mut records = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split(',');
        let Some(year) = parse_field(fields.next()) else {
            continue;
        };
        if year.fract() != 0.0 || year as i64 == MISSING_YEAR {
            continue;
        }
        let Ok(year) = i32::try_from(year as i64) else {
            continue;
        };
        let calc = parse_field(fields.next())
            .map(|c| c / 100.0)
            .filter(|c| (c - MISSING_CALC).abs() > 1e-6);
        let mean = parse_field(fields.next());

        records.push(IndexRecord {
            index: index.to_string(),
            station: station.clone(),
            year,
            calc,
            mean,
        });
    }
    Ok(records)
}

/// 读取并解析单个文件。
pub fn parse_index_file(index: &str, path: &Path) -> Result<Vec<IndexRecord>> {
    let file_error = |reason: String| HubSimError::WeatherFile {
        path: path.to_path_buf(),
        reason,
    };
    let text = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
    parse_index_text(index, &text).map_err(file_error)
}
