use std::collections::HashMap;
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub reference_csv: String,
    pub echo_data_url: String,
    pub echo_spatial_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            reference_csv: "data/state_counties.csv".into(),
            echo_data_url: "https://portal.gss.stonybrook.edu/echoepa/index.php".into(),
            echo_spatial_url: "https://portal.gss.stonybrook.edu/echoepa/index2.php".into(),
        }
    }
}

/// Defaults, overlaid by an optional `dashboard.toml`, overlaid by
/// environment variables. Unreadable or partial files fall back silently;
/// the defaults are enough for development.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("dashboard.toml") {
        apply_file_config(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("DASHBOARD_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("DASHBOARD_REFERENCE_CSV") {
        settings.reference_csv = v;
    }
    if let Ok(v) = std::env::var("DASHBOARD_ECHO_DATA_URL") {
        settings.echo_data_url = v;
    }
    if let Ok(v) = std::env::var("DASHBOARD_ECHO_SPATIAL_URL") {
        settings.echo_spatial_url = v;
    }

    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("bind_addr") {
            settings.server_bind = v.clone();
        }
        if let Some(v) = file_cfg.get("reference_csv") {
            settings.reference_csv = v.clone();
        }
        if let Some(v) = file_cfg.get("echo_data_url") {
            settings.echo_data_url = v.clone();
        }
        if let Some(v) = file_cfg.get("echo_spatial_url") {
            settings.echo_spatial_url = v.clone();
        }
    }
}
