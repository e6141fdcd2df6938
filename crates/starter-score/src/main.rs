// Starter score entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the league CSV and derive quantile boundaries
// 4. Prompt for pitcher name + pitch usage until EOF or `quit`

use starter_score::config::{self, OutputFormat};
use starter_score::scoring::starter::ScoreResult;
use starter_score::session::{QueryError, Session};

use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Starter score starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 3. Load dataset; a path argument replaces the configured one
    let csv_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.data.csv_path.clone());
    let session = Session::load(Path::new(&csv_path), &config)
        .with_context(|| format!("CSV 파일 오류: {csv_path}"))?;
    println!(
        "{}명의 투수를 불러왔습니다 ({})",
        session.dataset().len(),
        csv_path
    );

    // 4. Query loop
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let Some(name) = prompt(&mut lines, "투수 이름 입력 (예: Spencer Strider): ")? else {
            break;
        };
        if is_quit(&name) {
            break;
        }
        let Some(usage) = prompt(&mut lines, "구종 사용률 입력 (예: 4-Seam:51.1, Slider:32.6): ")?
        else {
            break;
        };
        if name.trim().is_empty() || usage.trim().is_empty() {
            continue;
        }

        match session.query(&name, &usage) {
            Ok(result) => print_result(&result, config.output.format)?,
            Err(e) => {
                warn!("query for '{}' failed: {}", name.trim(), e);
                match e {
                    QueryError::PitcherNotFound { .. } => eprintln!("투수를 찾을 수 없습니다."),
                    other => eprintln!("오류: {other}"),
                }
            }
        }
    }

    info!("Starter score shut down cleanly");
    Ok(())
}

/// Print `label` and read one line. Returns `None` at end of input.
fn prompt<B: BufRead>(lines: &mut io::Lines<B>, label: &str) -> anyhow::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    Ok(lines.next().transpose()?)
}

fn is_quit(input: &str) -> bool {
    matches!(input.trim(), "quit" | "exit" | ":q")
}

fn print_result(result: &ScoreResult, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("총점: {:.1}점", result.score);
            println!("점수 세부 로그");
            for log in &result.logs {
                println!("- {log}");
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result.for_display())
                    .context("failed to serialize score")?
            );
        }
    }
    Ok(())
}

/// Initialize tracing to log to a file so the prompt output stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("starter-score.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("starter_score=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
