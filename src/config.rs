use configparser::ini::Ini;
use log::{info, warn};
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Mutex;

use crate::parsing::ChartError;
use crate::stage::{StageLayout, layout_by_name};

// Chart text
pub const MAX_QUANTIZATION: u32 = 16;
pub const DEFAULT_QUANTIZATION: u32 = 4;

// Settings file
pub const SETTINGS_INI_PATH: &str = "stepstage.ini";
const STAGE_SECTION: &str = "Stage";
const TIMING_SECTION: &str = "Timing";

// Animation
pub const FOOT_LIFT_SCALE: f32 = 1.15;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub steps_type: String,
    pub quantization: u32,
    /// Chart arrow size in pixels.
    pub arrow_size: f32,
    /// Stage diagram panel size in pixels.
    pub stage_arrow_size: f32,
    pub xmod: f32,
    pub body_angle_blend: f32,
    pub bpms: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            steps_type: "dance-single".to_string(),
            quantization: DEFAULT_QUANTIZATION,
            arrow_size: 64.0,
            stage_arrow_size: 64.0,
            xmod: 1.0,
            body_angle_blend: 0.0,
            bpms: "0=120".to_string(),
        }
    }
}

fn parse_or<T>(conf: &Ini, section: &str, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Debug,
{
    match conf.get(section, key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Invalid value '{}' for {}.{}, using {:?}.", raw, section, key, default);
            default
        }),
        None => default,
    }
}

impl Settings {
    pub fn from_ini(conf: &Ini) -> Self {
        let d = Settings::default();
        let body_angle_blend = parse_or(conf, STAGE_SECTION, "BodyAngleBlend", d.body_angle_blend);
        if !(0.0..=1.0).contains(&body_angle_blend) {
            warn!("BodyAngleBlend {} is outside 0..1 and will be clamped.", body_angle_blend);
        }
        Self {
            steps_type: conf.get(STAGE_SECTION, "StepsType").unwrap_or(d.steps_type),
            quantization: parse_or(conf, STAGE_SECTION, "Quantization", d.quantization).max(1),
            arrow_size: parse_or(conf, STAGE_SECTION, "ArrowSize", d.arrow_size),
            stage_arrow_size: parse_or(conf, STAGE_SECTION, "StageArrowSize", d.stage_arrow_size),
            xmod: parse_or(conf, STAGE_SECTION, "XMod", d.xmod),
            body_angle_blend: body_angle_blend.clamp(0.0, 1.0),
            bpms: conf.get(TIMING_SECTION, "Bpms").unwrap_or(d.bpms),
        }
    }

    pub fn to_ini(&self) -> Ini {
        let mut conf = Ini::new();
        conf.set(STAGE_SECTION, "StepsType", Some(self.steps_type.clone()));
        conf.set(STAGE_SECTION, "Quantization", Some(self.quantization.to_string()));
        conf.set(STAGE_SECTION, "ArrowSize", Some(self.arrow_size.to_string()));
        conf.set(STAGE_SECTION, "StageArrowSize", Some(self.stage_arrow_size.to_string()));
        conf.set(STAGE_SECTION, "XMod", Some(self.xmod.to_string()));
        conf.set(STAGE_SECTION, "BodyAngleBlend", Some(self.body_angle_blend.to_string()));
        conf.set(TIMING_SECTION, "Bpms", Some(self.bpms.clone()));
        conf
    }

    pub fn layout(&self) -> Result<&'static StageLayout, ChartError> {
        layout_by_name(&self.steps_type)
            .ok_or_else(|| ChartError::UnknownLayout(self.steps_type.clone()))
    }

    /// Reads settings from `path`, writing a default file first if none exists.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("Settings file not found, creating defaults in '{}'.", path.display());
            if let Err(e) = Settings::default().to_ini().write(path) {
                warn!("Failed to create default settings file: {}", e);
                return Settings::default();
            }
        }

        let mut conf = Ini::new();
        match conf.load(path) {
            Ok(_) => Settings::from_ini(&conf),
            Err(e) => {
                warn!("Failed to load '{}' ({}), using default settings.", path.display(), e);
                Settings::default()
            }
        }
    }
}

static SETTINGS: Lazy<Mutex<Settings>> = Lazy::new(|| Mutex::new(Settings::default()));

pub fn load(path: &Path) {
    let loaded = Settings::load_from(path);
    match SETTINGS.lock() {
        Ok(mut settings) => *settings = loaded,
        Err(poisoned) => *poisoned.into_inner() = loaded,
    }
}

/// Returns a copy of the currently loaded settings.
pub fn get() -> Settings {
    match SETTINGS.lock() {
        Ok(settings) => settings.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
