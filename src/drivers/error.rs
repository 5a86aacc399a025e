use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("labeler window must be odd and non-zero, got {0}")]
    InvalidWindow(usize),
    #[error("peak threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f32),
    #[error("frame count must be greater than zero")]
    InvalidFrameCount,
    #[error("history of {n_frames} frames cannot hold labels at slot {peak_idx}")]
    HistoryTooShort { n_frames: usize, peak_idx: usize },
    #[error("frame length mismatch: expected {expected}, got {actual}")]
    FrameLength { expected: usize, actual: usize },
    #[error("failed to parse frame {line:?}: {reason}")]
    Parse { line: String, reason: String },
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
