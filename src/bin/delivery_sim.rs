//! 包裹送达时间 Monte Carlo
//!
//! 送达时间 = 基础时间 + 分拣中心 M/M/1 排队延迟 + 天气/罢工延迟。

use clap::Parser;
use hubsim_rs::Result;
use hubsim_rs::delivery::{DeliveryParams, run_monte_carlo};
use hubsim_rs::sim::ScenarioSpec;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "delivery-sim", about = "包裹送达时间 Monte Carlo 仿真")]
struct Args {
    /// 场景文件（使用其中的 `delivery` 与 `seed`）
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// 模拟的包裹数
    #[arg(long)]
    parcels: Option<usize>,

    /// 基础送达时间（天）
    #[arg(long)]
    base_days: Option<f64>,

    /// 分拣中心每天运行小时数
    #[arg(long)]
    hours_per_day: Option<f64>,

    /// 分拣中心到达率（包裹/小时）
    #[arg(long)]
    hub_arrival_rate: Option<f64>,

    /// 分拣中心处理能力（包裹/小时）
    #[arg(long)]
    hub_service_rate: Option<f64>,

    #[arg(long)]
    weather_prob: Option<f64>,

    #[arg(long)]
    strike_prob: Option<f64>,

    /// 统计“超过 N 天”比例的阈值，可多次给出
    #[arg(long = "threshold")]
    thresholds: Vec<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// 把报告写成 JSON
    #[arg(long)]
    report_json: Option<PathBuf>,

    #[arg(long)]
    quiet: bool,
}

fn resolve_params(args: &Args, scenario: Option<&ScenarioSpec>) -> DeliveryParams {
    let mut params = scenario
        .map(ScenarioSpec::delivery_params)
        .unwrap_or_default();
    if let Some(v) = args.parcels {
        params.parcels = v;
    }
    if let Some(v) = args.base_days {
        params.base_days = v;
    }
    if let Some(v) = args.hours_per_day {
        params.hours_per_day = v;
    }
    if let Some(v) = args.hub_arrival_rate {
        params.hub_arrival_rate = v;
    }
    if let Some(v) = args.hub_service_rate {
        params.hub_service_rate = v;
    }
    if let Some(v) = args.weather_prob {
        params.weather.probability = v;
    }
    if let Some(v) = args.strike_prob {
        params.strike.probability = v;
    }
    if !args.thresholds.is_empty() {
        params.thresholds_days = args.thresholds.clone();
    }
    params
}

fn run(args: Args) -> Result<()> {
    let scenario = args
        .scenario
        .as_deref()
        .map(ScenarioSpec::from_path)
        .transpose()?;
    let params = resolve_params(&args, scenario.as_ref());

    let seed = args
        .seed
        .or_else(|| scenario.as_ref().and_then(|s| s.seed))
        .unwrap_or_else(|| rand::rng().random());
    info!(seed, parcels = params.parcels, "开始 Monte Carlo");
    let mut rng = Pcg64::seed_from_u64(seed);

    let report = run_monte_carlo(&params, &mut rng)?;

    println!("average_total_days={:.2}", report.mean_total_days);
    println!("median_total_days={:.2}", report.median_total_days);
    println!("average_queue_days={:.4}", report.mean_queue_days);
    println!("average_external_days={:.4}", report.mean_external_days);
    for e in &report.exceedance {
        println!(
            "p_exceed threshold_days={} fraction={:.4}",
            e.threshold_days, e.fraction
        );
    }

    if let Some(path) = &args.report_json {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        eprintln!("wrote report to {}", path.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.quiet {
            tracing_subscriber::EnvFilter::new("off")
        } else {
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        })
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
