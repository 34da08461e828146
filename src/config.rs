use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Board configuration stored in ~/.leadboard/config.json
///
/// Every field carries a serde default so an empty `{}` file (or a file
/// from an older version) loads cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    /// Follow-up window after a call that nobody answered.
    #[serde(default = "default_no_answer_follow_up_hours")]
    pub no_answer_follow_up_hours: i64,
    /// Cool-off before re-contacting a lead that said "not interested".
    #[serde(default = "default_not_interested_follow_up_days")]
    pub not_interested_follow_up_days: i64,
    /// How many change events the board keeps in memory.
    #[serde(default = "default_event_history_size")]
    pub event_history_size: usize,
}

fn default_no_answer_follow_up_hours() -> i64 {
    24
}

fn default_not_interested_follow_up_days() -> i64 {
    14
}

fn default_event_history_size() -> usize {
    100
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            no_answer_follow_up_hours: default_no_answer_follow_up_hours(),
            not_interested_follow_up_days: default_not_interested_follow_up_days(),
            event_history_size: default_event_history_size(),
        }
    }
}

/// Get the canonical config file path (~/.leadboard/config.json)
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".leadboard").join("config.json"))
}

/// Load configuration from ~/.leadboard/config.json.
///
/// A missing file is not an error — the defaults apply.
pub fn load_config() -> Result<BoardConfig, String> {
    let path = config_path()?;
    load_config_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<BoardConfig, String> {
    if !path.exists() {
        return Ok(BoardConfig::default());
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Create or update the config file, applying `mutator` to the current
/// (or default) configuration before writing it back.
pub fn create_or_update_config(
    path: &Path,
    mutator: impl FnOnce(&mut BoardConfig),
) -> Result<BoardConfig, String> {
    let mut config = load_config_from(path)?;
    mutator(&mut config);

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config dir: {}", e))?;
        }
    }

    let content = serde_json::to_string_pretty(&config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.no_answer_follow_up_hours, 24);
        assert_eq!(config.not_interested_follow_up_days, 14);
        assert_eq!(config.event_history_size, 100);
    }

    #[test]
    fn test_empty_json_loads_defaults() {
        let config: BoardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.no_answer_follow_up_hours, 24);
        assert_eq!(config.not_interested_follow_up_days, 14);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.event_history_size, 100);
    }

    #[test]
    fn test_create_or_update_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let written = create_or_update_config(&path, |c| {
            c.not_interested_follow_up_days = 7;
        })
        .unwrap();
        assert_eq!(written.not_interested_follow_up_days, 7);

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.not_interested_follow_up_days, 7);
        // Untouched fields keep their defaults
        assert_eq!(loaded.no_answer_follow_up_hours, 24);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
