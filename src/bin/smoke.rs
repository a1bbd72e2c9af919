use std::path::PathBuf;
use std::time::Instant;

use bootgenie_core_lib::app::config::{load_config, AppConfig, SimulationSettings};
use bootgenie_core_lib::app::error::AppError;
use bootgenie_core_lib::app::guide::walkthrough::StepOutcome;
use bootgenie_core_lib::app::logging::init_logging;
use bootgenie_core_lib::app::models::{ExportFormat, LogStats};
use bootgenie_core_lib::app::state::AppState;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Args {
    brand: Option<String>,
    model: Option<String>,
    store_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    json: bool,
    fast: bool,
    seed: Option<u64>,
    lookup: bool,
}

#[derive(Serialize)]
struct SmokeSummary {
    tool: &'static str,
    status: &'static str,
    trace_id: String,
    brand: String,
    model: Option<String>,
    export_path: Option<String>,
    stats: LogStats,
    checks: Vec<SmokeCheck>,
}

#[derive(Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: &'static str, // pass|fail|warn|skip
    duration_ms: u128,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<String>,
}

impl SmokeCheck {
    fn finish(name: &'static str, start: Instant, status: &'static str, detail: String) -> Self {
        Self {
            name,
            status,
            duration_ms: start.elapsed().as_millis(),
            detail,
            error_code: None,
        }
    }

    fn failed(name: &'static str, start: Instant, err: &AppError) -> Self {
        Self {
            name,
            status: "fail",
            duration_ms: start.elapsed().as_millis(),
            detail: err.error.clone(),
            error_code: Some(err.code.clone()),
        }
    }
}

const USAGE: &str = "Usage: cargo run --bin smoke -- [--brand BRAND] [--model MODEL] [--store DIR] [--out DIR] [--json] [--fast] [--seed N] [--lookup]\n";

fn parse_args() -> Result<Args, String> {
    let mut brand: Option<String> = None;
    let mut model: Option<String> = None;
    let mut store_dir: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;
    let mut json = false;
    let mut fast = false;
    let mut seed: Option<u64> = None;
    let mut lookup = false;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--brand" => {
                brand = it
                    .next()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
                if brand.is_none() {
                    return Err("--brand requires a value".to_string());
                }
            }
            "--model" => {
                model = it
                    .next()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
                if model.is_none() {
                    return Err("--model requires a value".to_string());
                }
            }
            "--store" => {
                let value = it
                    .next()
                    .ok_or_else(|| "--store requires a value".to_string())?;
                store_dir = Some(PathBuf::from(value));
            }
            "--out" => {
                let value = it
                    .next()
                    .ok_or_else(|| "--out requires a value".to_string())?;
                out_dir = Some(PathBuf::from(value));
            }
            "--json" => {
                json = true;
            }
            "--fast" => {
                fast = true;
            }
            "--seed" => {
                let value = it
                    .next()
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("--seed expects an integer, got {value}"))?,
                );
            }
            "--lookup" => {
                lookup = true;
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            other => return Err(format!("Unknown arg: {other}")),
        }
    }

    if model.is_some() && brand.is_none() {
        return Err("--model requires --brand".to_string());
    }

    Ok(Args {
        brand,
        model,
        store_dir,
        out_dir,
        json,
        fast,
        seed,
        lookup,
    })
}

fn apply_args(mut config: AppConfig, args: &Args) -> AppConfig {
    if let Some(dir) = &args.store_dir {
        config.log_store.store_dir = dir.to_string_lossy().to_string();
    }
    if args.fast {
        config.simulation = SimulationSettings {
            detect_miss_rate: config.simulation.detect_miss_rate,
            adb_success_rate: config.simulation.adb_success_rate,
            fastboot_success_rate: config.simulation.fastboot_success_rate,
            seed: config.simulation.seed,
            ..SimulationSettings::instant()
        };
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }
    config
}

fn print_summary(summary: &SmokeSummary, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).unwrap_or_default()
        );
        return;
    }
    println!("{} [{}] trace_id={}", summary.tool, summary.status, summary.trace_id);
    for check in &summary.checks {
        println!(
            "  {:<20} {:<5} {:>6}ms  {}",
            check.name, check.status, check.duration_ms, check.detail
        );
    }
    println!(
        "  entries: total={} info={} warning={} error={} success={} command={}",
        summary.stats.total,
        summary.stats.info,
        summary.stats.warning,
        summary.stats.error,
        summary.stats.success,
        summary.stats.command
    );
    if let Some(path) = &summary.export_path {
        println!("  export: {path}");
    }
}

#[tokio::main]
async fn main() {
    let args = match parse_args() {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let trace_id = Uuid::new_v4().to_string();
    let mut checks: Vec<SmokeCheck> = Vec::new();

    let start = Instant::now();
    let config = match load_config(&trace_id) {
        Ok(cfg) => {
            checks.push(SmokeCheck::finish(
                "load_config",
                start,
                "pass",
                format!("version {}", cfg.version),
            ));
            cfg
        }
        Err(err) => {
            checks.push(SmokeCheck::failed("load_config", start, &err));
            AppConfig::default()
        }
    };
    let config = apply_args(config, &args);
    init_logging(&config.logging.log_level);

    let state = AppState::from_config(&config);
    let session = &state.session;

    let start = Instant::now();
    let detected = session.detect_device().await;
    checks.push(match &detected {
        Some(device) => SmokeCheck::finish(
            "detect_device",
            start,
            "pass",
            format!("{} {} ({})", device.brand, device.model, device.id),
        ),
        None => SmokeCheck::finish("detect_device", start, "warn", "no device".to_string()),
    });

    let start = Instant::now();
    let status = session.check_bootloader().await;
    checks.push(SmokeCheck::finish(
        "check_bootloader",
        start,
        "pass",
        status.as_str().to_string(),
    ));

    let brand = args
        .brand
        .clone()
        .or_else(|| detected.as_ref().map(|device| device.brand.clone()))
        .unwrap_or_else(|| "xiaomi".to_string());
    let model = match &args.brand {
        Some(_) => args.model.clone(),
        None => detected.as_ref().map(|device| device.model.clone()),
    };

    let start = Instant::now();
    let mut walkthrough = session.start_guide(&brand, model.as_deref()).await;
    let mut failed_commands = 0usize;
    loop {
        if let Some(Err(_)) = session.execute_current_step(&walkthrough).await {
            failed_commands += 1;
        }
        if walkthrough.complete_current() == StepOutcome::Finished {
            break;
        }
    }
    let progress = walkthrough.progress();
    checks.push(SmokeCheck::finish(
        "unlock_guide",
        start,
        if failed_commands == 0 { "pass" } else { "warn" },
        format!(
            "{}/{} steps, {} failed commands",
            progress.completed, progress.total, failed_commands
        ),
    ));

    let start = Instant::now();
    let issues = session.load_troubleshooting(model.as_deref()).await;
    let diagnostics = session.run_diagnostics(model.as_deref()).await;
    checks.push(SmokeCheck::finish(
        "troubleshooting",
        start,
        "pass",
        format!("{} issues, {} diagnostic steps", issues.len(), diagnostics.len()),
    ));

    let start = Instant::now();
    if args.lookup {
        let methods = state.lookup.fetch_methods(&brand, &trace_id).await;
        checks.push(match methods.first() {
            Some(top) => SmokeCheck::finish(
                "lookup",
                start,
                "pass",
                format!("{} methods, top: {} ({} stars)", methods.len(), top.name, top.stars),
            ),
            None => SmokeCheck::finish("lookup", start, "warn", "no methods found".to_string()),
        });
    } else {
        checks.push(SmokeCheck::finish("lookup", start, "skip", "pass --lookup".to_string()));
    }

    let out_dir = args.out_dir.clone().unwrap_or_else(|| {
        let mut p = std::env::temp_dir();
        p.push(format!("bootgenie_smoke_{trace_id}"));
        p
    });
    let start = Instant::now();
    let export_path = match state
        .log
        .export_to_file(&out_dir, ExportFormat::Text, &trace_id)
        .await
    {
        Ok(path) => {
            let path = path.to_string_lossy().to_string();
            checks.push(SmokeCheck::finish("export_logs", start, "pass", path.clone()));
            Some(path)
        }
        Err(err) => {
            checks.push(SmokeCheck::failed("export_logs", start, &err));
            None
        }
    };

    let status = if checks.iter().any(|check| check.status == "fail") {
        "fail"
    } else {
        "pass"
    };
    let summary = SmokeSummary {
        tool: "bootgenie_core_smoke",
        status,
        trace_id,
        brand,
        model,
        export_path,
        stats: state.log.statistics().await,
        checks,
    };
    print_summary(&summary, args.json);
    if status == "fail" {
        std::process::exit(1);
    }
}
