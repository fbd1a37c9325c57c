use std::path::PathBuf;

use bipvt_collector::{app, config, scenario};
use clap::Parser;
use tracing::Level;

/// BIPVT 공기 채널 집열기 열해석 CLI.
#[derive(Debug, Parser)]
#[command(name = "bipvt_collector_cli", version, about)]
struct Cli {
    /// 설정 파일 경로 (없으면 기본값으로 생성)
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// 시나리오 파일 경로 (생략 시 내장 데모)
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// 연속 계산할 시간 간격 수
    #[arg(long, default_value_t = 1)]
    steps: usize,
    /// 로그 상세도 (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// 프로그램의 엔트리 포인트. 설정과 시나리오를 로드한 뒤 계산을 실행한다.
fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(err) = try_run(&cli) {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_or_default(&cli.config)?;
    let scn = match &cli.scenario {
        Some(path) => scenario::load_scenario(path)?,
        None => scenario::Scenario::demo(),
    };
    app::run(&cfg, &scn, cli.steps)?;
    Ok(())
}
