use log::{LevelFilter, error, info};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::{env, fs};

use stepstage::config::{self, SETTINGS_INI_PATH};
use stepstage::parsing::notes::{parse_stepchart, rows_from_json};
use stepstage::schedule::{TimelineOptions, build_stage_timeline};
use stepstage::timing::TimingData;

const USAGE: &str = "usage: stepstage <chart.txt|rows.json> [settings.ini]";

fn run(chart_path: &Path, settings_path: &Path) -> Result<(), Box<dyn Error>> {
    config::load(settings_path);
    let settings = config::get();
    let layout = settings.layout()?;
    info!("Using layout '{}' at quantization {}.", layout.name, settings.quantization);

    let text = fs::read_to_string(chart_path)?;
    let rows = if chart_path.extension().is_some_and(|ext| ext == "json") {
        rows_from_json(&text, layout)?
    } else {
        parse_stepchart(&text, settings.quantization, layout)?
    };

    let timing = TimingData::from_bpm_string(&settings.bpms)?;
    let timeline = build_stage_timeline(&rows, layout, &timing, &TimelineOptions::from(&settings));

    println!("{}", serde_json::to_string_pretty(&timeline)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // --- Logging Setup ---
    // Logs go to stderr so stdout stays clean JSON.
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .filter_module("stepstage::feet", LevelFilter::Info)
        .filter_module("stepstage::parsing", LevelFilter::Debug)
        .init();

    let mut args = env::args().skip(1);
    let Some(chart_path) = args.next().map(PathBuf::from) else {
        error!("{}", USAGE);
        return Err(USAGE.into());
    };
    let settings_path = args.next().map_or_else(|| PathBuf::from(SETTINGS_INI_PATH), PathBuf::from);

    if let Err(e) = run(&chart_path, &settings_path) {
        error!("Failed to build stage timeline for '{}': {}", chart_path.display(), e);
        return Err(e);
    }

    info!("Stage timeline written.");
    Ok(())
}
