// src/config.rs
use crate::drivers::ScopeError;
use crate::gesture::LabelerConfig;
use crate::types::SourceKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Length of the displayed history, shared by every plot and the label track.
    pub n_frames: usize,
    pub labeler: LabelerConfig,
    pub source: SourceKind,
    /// Pacing of simulated and replayed frames.
    pub frame_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            n_frames: 300,
            labeler: LabelerConfig::default(),
            source: SourceKind::default(),
            frame_interval_ms: 10,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, ScopeError> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScopeError> {
        self.labeler.validate()?;
        self.labeler.check_history(self.n_frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = AppConfig::from_json(r#"{ "n_frames": 120 }"#).unwrap();
        assert_eq!(config.n_frames, 120);
        assert_eq!(config.labeler.window, 21);
        assert_eq!(config.labeler.peak_threshold, 0.5);
        assert_eq!(config.source, SourceKind::Simulation);
    }

    #[test]
    fn parses_serial_source() {
        let config = AppConfig::from_json(
            r#"{ "source": { "kind": "serial", "port": "/dev/ttyACM0", "baud_rate": 115200 } }"#,
        )
        .unwrap();
        assert_eq!(
            config.source,
            SourceKind::Serial {
                port: "/dev/ttyACM0".into(),
                baud_rate: 115200
            }
        );
    }

    #[test]
    fn rejects_even_window_and_zero_frames() {
        assert!(matches!(
            AppConfig::from_json(r#"{ "labeler": { "window": 20 } }"#),
            Err(ScopeError::InvalidWindow(20))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{ "n_frames": 0 }"#),
            Err(ScopeError::InvalidFrameCount)
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{ "n_frames": 10, "labeler": { "window": 21 } }"#),
            Err(ScopeError::HistoryTooShort { n_frames: 10, peak_idx: 10 })
        ));
        assert!(AppConfig::from_json(r#"{ "n_frames": 11, "labeler": { "window": 21 } }"#).is_ok());
        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(ScopeError::Config(_))
        ));
    }
}
