use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3200";
pub const DEFAULT_DATA_PATH: &str = "data/regions.json";
pub const DEFAULT_PERSIST_INTERVAL_SECS: u64 = 5;

pub fn bind_addr() -> String {
    std::env::var("GRIDLOT_BIND")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
}

pub fn data_path() -> PathBuf {
    std::env::var("GRIDLOT_DATA_PATH")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}

pub fn persist_interval_secs() -> u64 {
    std::env::var("GRIDLOT_PERSIST_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_PERSIST_INTERVAL_SECS)
}
