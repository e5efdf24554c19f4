//! 天气指数日发生概率
//!
//! 读取 `<dir>/<INDEX>/*.txt`，按年份与指数求 CALC 均值 / 365，以 JSON 输出。

use clap::Parser;
use hubsim_rs::Result;
use hubsim_rs::weather::{DEFAULT_YEAR, ProbabilityQuery, daily_probabilities, load_index_dir};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "weather-probs", about = "从 ECA&D 指数文件计算每日发生概率")]
struct Args {
    /// 指数根目录（每个子目录对应一个指数）
    #[arg(long)]
    dir: PathBuf,

    #[arg(long, default_value_t = DEFAULT_YEAR)]
    year: i32,

    /// 参与计算的指数，可多次给出；缺省为 FD FG6BFT R20MM SD5CM SD50CM
    #[arg(long = "index")]
    indices: Vec<String>,

    #[arg(long)]
    quiet: bool,
}

fn run(args: Args) -> Result<()> {
    let records = load_index_dir(&args.dir)?;

    let mut query = ProbabilityQuery {
        year: args.year,
        ..ProbabilityQuery::default()
    };
    if !args.indices.is_empty() {
        query.indices = args.indices;
    }

    let probs = daily_probabilities(&records, &query);
    println!("{}", serde_json::to_string_pretty(&probs)?);
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
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
