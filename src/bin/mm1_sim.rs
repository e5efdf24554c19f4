//! M/M/1 分拣中心仿真
//!
//! 按到达率/服务率/时长运行一次单服务台排队仿真，输出平均等待时间、平均队长与利用率。

use clap::{Parser, ValueEnum};
use hubsim_rs::queue::{
    ArrivalMode, EventRecord, HubWorkload, QueueParams, RunSummary, replay, simulate, summarize,
};
use hubsim_rs::sim::ScenarioSpec;
use hubsim_rs::Result;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_ARRIVAL_RATE: f64 = 5.0;
const DEFAULT_SERVICE_RATE: f64 = 6.0;
const DEFAULT_HORIZON: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// 逐包裹递推
    Recurrence,
    /// 事件驱动仿真器回放
    Event,
}

#[derive(Debug, Parser)]
#[command(name = "mm1-sim", about = "M/M/1 分拣中心排队仿真")]
struct Args {
    /// 场景文件（scenario.json）；命令行参数会覆盖其中的值
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// 到达率 λ（包裹/单位时间）
    #[arg(long)]
    arrival_rate: Option<f64>,

    /// 服务率 μ（包裹/单位时间）
    #[arg(long)]
    service_rate: Option<f64>,

    /// 仿真时长
    #[arg(long)]
    horizon: Option<f64>,

    /// 过采样倍数（>= 1）
    #[arg(long, conflicts_with = "sequential")]
    overshoot: Option<f64>,

    /// 逐个抽取到达间隔，不使用过采样
    #[arg(long)]
    sequential: bool,

    /// 过采样不足时最多尝试的次数（每次倍数翻倍）
    #[arg(long, default_value_t = 1)]
    attempts: usize,

    /// 随机种子；缺省时随机生成并打印
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Engine::Recurrence)]
    engine: Engine,

    /// 把汇总和逐包裹等待时间写成 JSON
    #[arg(long)]
    waits_json: Option<PathBuf>,

    /// 把事件跟踪写成 JSON（仅 event 引擎）
    #[arg(long)]
    trace_json: Option<PathBuf>,

    /// 关闭日志输出
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct WaitsOutput<'a> {
    seed: u64,
    summary: &'a RunSummary,
    waiting_times: Vec<f64>,
}

fn resolve_params(args: &Args, scenario: Option<&ScenarioSpec>) -> Result<QueueParams> {
    let base = match scenario {
        Some(s) => s.queue_params()?,
        None => QueueParams::new(DEFAULT_ARRIVAL_RATE, DEFAULT_SERVICE_RATE, DEFAULT_HORIZON),
    };

    let mut params = QueueParams {
        arrival_rate: args.arrival_rate.unwrap_or(base.arrival_rate),
        service_rate: args.service_rate.unwrap_or(base.service_rate),
        horizon: args.horizon.unwrap_or(base.horizon),
        arrivals: base.arrivals,
    };
    if args.sequential {
        params.arrivals = ArrivalMode::Sequential;
    } else if let Some(overshoot_factor) = args.overshoot {
        params.arrivals = ArrivalMode::Oversample { overshoot_factor };
    }
    params.validate()?;
    Ok(params)
}

fn run(args: Args) -> Result<()> {
    let scenario = args
        .scenario
        .as_deref()
        .map(ScenarioSpec::from_path)
        .transpose()?;
    let params = resolve_params(&args, scenario.as_ref())?;

    let seed = args
        .seed
        .or_else(|| scenario.as_ref().and_then(|s| s.seed))
        .unwrap_or_else(|| rand::rng().random());
    info!(seed, ?params, engine = ?args.engine, "开始仿真");
    let mut rng = Pcg64::seed_from_u64(seed);

    let attempts = args.attempts.max(1);
    let (summary, records): (RunSummary, Vec<EventRecord>) = match args.engine {
        Engine::Recurrence => {
            if args.trace_json.is_some() {
                eprintln!("--trace-json is only available with --engine event; ignoring");
            }
            let run = simulate(&params, attempts, &mut rng)?;
            (run.summary, run.records)
        }
        Engine::Event => {
            let workload = HubWorkload::draw_with_retry(&params, attempts, &mut rng)?;
            let out = replay(workload, &params, args.trace_json.is_some())?;
            println!(
                "hub events={} max_queue_len={} time_avg_queue_len={:.6}",
                out.stats.events, out.stats.max_queue_len, out.stats.time_avg_queue_len
            );
            if let (Some(path), Some(trace)) = (&args.trace_json, &out.trace) {
                fs::write(path, trace.to_json()?)?;
                eprintln!("wrote trace events to {}", path.display());
            }
            let summary = summarize(&out.records, params.arrival_rate, params.service_rate)?;
            (summary, out.records)
        }
    };

    println!(
        "summary seed={} parcels={} average_waiting_time={:.6} average_queue_length={:.6} utilization={:.6}",
        seed,
        summary.parcels,
        summary.average_waiting_time,
        summary.average_queue_length,
        summary.utilization
    );

    if let Some(path) = &args.waits_json {
        let out = WaitsOutput {
            seed,
            summary: &summary,
            waiting_times: records.iter().map(|r| r.waiting_time).collect(),
        };
        let json = serde_json::to_string_pretty(&out)?;
        fs::write(path, json)?;
        eprintln!("wrote waiting times to {}", path.display());
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
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
