//! 天气指数与日发生概率
//!
//! 读取 `<root>/<INDEX>/*.txt` 形式的 ECA&D 指数文件，取指定年份的 CALC 值，
//! 按指数求平均后除以 365，得到每日发生概率（可作为送达模型的天气延迟概率）。

mod parse;

pub use parse::{
    HEADER_LINES, IndexRecord, MISSING_CALC, MISSING_YEAR, STATION_MARKER, StationInfo,
    parse_index_file, parse_index_text, parse_station_line,
};

use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DAYS_PER_YEAR: f64 = 365.0;
pub const DEFAULT_YEAR: i32 = 2023;
pub const DEFAULT_INDICES: [&str; 5] = ["FD", "FG6BFT", "R20MM", "SD5CM", "SD50CM"];

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();
    Ok(paths)
}

/// 读取根目录下所有指数子目录中的 `.txt` 文件。子目录名即指数名。
pub fn load_index_dir(root: &Path) -> Result<Vec<IndexRecord>> {
    let mut all = Vec::new();
    for index_dir in sorted_entries(root)? {
        if !index_dir.is_dir() {
            continue;
        }
        let Some(index) = index_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        for file in sorted_entries(&index_dir)? {
            if file.extension().and_then(|e| e.to_str()) != Some("txt") || !file.is_file() {
                continue;
            }
            let records = parse_index_file(index, &file)?;
            debug!(index, file = %file.display(), rows = records.len(), "解析指数文件");
            all.extend(records);
        }
    }
    info!(rows = all.len(), root = %root.display(), "天气指数加载完成");
    Ok(all)
}

/// 选择哪一年、哪些指数参与计算。
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityQuery {
    pub year: i32,
    pub indices: Vec<String>,
}

impl Default for ProbabilityQuery {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            indices: DEFAULT_INDICES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// 每个指数的日发生概率 = 该年所有测站 CALC 均值 / 365。没有有效数据的指数不出现在结果中。
pub fn daily_probabilities(records: &[IndexRecord], query: &ProbabilityQuery) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for r in records {
        if r.year != query.year || !query.indices.iter().any(|i| *i == r.index) {
            continue;
        }
        let Some(calc) = r.calc else {
            continue;
        };
        let entry = sums.entry(r.index.clone()).or_insert((0.0, 0));
        entry.0 += calc;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(index, (sum, n))| (index, sum / n as f64 / DAYS_PER_YEAR))
        .collect()
}
