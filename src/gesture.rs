// src/gesture.rs
use crate::drivers::{ScopeError, ScrollingBuffer};
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const GESTURE: usize = 1;

/// One-hot over `[no gesture, gesture]`.
pub type Label = [f32; 2];
pub const NO_GESTURE_LABEL: Label = [1.0, 0.0];
pub const GESTURE_LABEL: Label = [0.0, 1.0];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelerConfig {
    /// Lookback length in samples; must be odd so the peak slot is centered.
    pub window: usize,
    /// Minimum max-min spread (exclusive) for a window to count as a peak.
    pub peak_threshold: f32,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            window: 21,
            peak_threshold: 0.5,
        }
    }
}

impl LabelerConfig {
    pub fn validate(&self) -> Result<(), ScopeError> {
        if self.window == 0 || self.window % 2 == 0 {
            return Err(ScopeError::InvalidWindow(self.window));
        }
        if !self.peak_threshold.is_finite() || self.peak_threshold < 0.0 {
            return Err(ScopeError::InvalidThreshold(self.peak_threshold));
        }
        Ok(())
    }

    pub fn peak_idx(&self) -> usize {
        self.window / 2
    }

    /// Labels land `peak_idx` slots behind the head, so the history must
    /// reach past that slot.
    pub fn check_history(&self, n_frames: usize) -> Result<(), ScopeError> {
        if n_frames == 0 {
            return Err(ScopeError::InvalidFrameCount);
        }
        let peak_idx = self.peak_idx();
        if n_frames <= peak_idx {
            return Err(ScopeError::HistoryTooShort { n_frames, peak_idx });
        }
        Ok(())
    }
}

/// Online gesture labeler.
///
/// Keeps the last `window` raw samples and a label history of `n_frames`
/// one-hot labels. A peak is only recognised once it sits in the middle of
/// the window, so labels are written `peak_idx` slots behind the head.
pub struct GestureLabeler {
    config: LabelerConfig,
    peak_idx: usize,
    window: ScrollingBuffer<f32>,
    labels: ScrollingBuffer<Label>,
    labeling: bool,
}

impl GestureLabeler {
    pub fn new(n_frames: usize, config: LabelerConfig) -> Result<Self, ScopeError> {
        config.validate()?;
        config.check_history(n_frames)?;
        Ok(Self {
            peak_idx: config.peak_idx(),
            window: ScrollingBuffer::new(config.window, 0.0),
            labels: ScrollingBuffer::new(n_frames, NO_GESTURE_LABEL),
            labeling: false,
            config,
        })
    }

    pub fn config(&self) -> &LabelerConfig {
        &self.config
    }

    pub fn peak_idx(&self) -> usize {
        self.peak_idx
    }

    pub fn start_labeling(&mut self) {
        if !self.labeling {
            info!("gesture labeling started");
        }
        self.labeling = true;
    }

    pub fn stop_labeling(&mut self) {
        if self.labeling {
            info!("gesture labeling stopped");
        }
        self.labeling = false;
    }

    pub fn is_labeling(&self) -> bool {
        self.labeling
    }

    /// Advances the window and the label history by one sample.
    /// Returns true when a peak was labeled on this tick.
    pub fn update(&mut self, sample: f32) -> bool {
        self.window.push(sample);
        self.labels.push(NO_GESTURE_LABEL);
        if self.labeling && self.find_peak() {
            self.labels.set(self.peak_idx, GESTURE_LABEL);
            debug!("gesture peak labeled at history slot {}", self.peak_idx);
            return true;
        }
        false
    }

    /// True when the window spread exceeds the threshold and the first
    /// occurrence of its maximum is exactly the center slot. NaN samples are
    /// ignored; a window with no numeric samples never peaks.
    pub fn find_peak(&self) -> bool {
        let mut extremes: Option<(f32, f32)> = None;
        for &v in self.window.iter().filter(|v| !v.is_nan()) {
            extremes = Some(match extremes {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        let Some((min, max)) = extremes else {
            return false;
        };
        if (max - min).abs() > self.config.peak_threshold {
            return self.window.iter().position(|&v| v == max) == Some(self.peak_idx);
        }
        false
    }

    pub fn window(&self) -> &ScrollingBuffer<f32> {
        &self.window
    }

    pub fn labels(&self) -> &ScrollingBuffer<Label> {
        &self.labels
    }

    /// Per history slot, whether the gesture class is active.
    pub fn gesture_mask(&self) -> Vec<bool> {
        self.labels.iter().map(|l| l[GESTURE] > 0.5).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeler(window: usize, threshold: f32, n_frames: usize) -> GestureLabeler {
        let config = LabelerConfig {
            window,
            peak_threshold: threshold,
        };
        GestureLabeler::new(n_frames, config).unwrap()
    }

    #[test]
    fn detects_centered_peak_once() {
        let mut gd = labeler(5, 0.5, 10);
        gd.start_labeling();
        let samples = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        let mut hits = Vec::new();
        for (tick, &s) in samples.iter().enumerate() {
            gd.update(s);
            if gd.find_peak() {
                hits.push(tick);
                assert_eq!(gd.window().to_vec(), vec![0.0, 0.0, 1.0, 0.0, 0.0]);
                assert_eq!(gd.labels()[2], GESTURE_LABEL);
                assert_eq!(gd.labels()[0], NO_GESTURE_LABEL);
            }
        }
        assert_eq!(hits, vec![4]);
        // the label keeps scrolling with the history
        assert_eq!(gd.labels()[4], GESTURE_LABEL);
        assert_eq!(gd.gesture_mask().iter().filter(|&&m| m).count(), 1);
    }

    #[test]
    fn default_window_lags_by_ten() {
        let mut gd = GestureLabeler::new(64, LabelerConfig::default()).unwrap();
        gd.start_labeling();
        assert_eq!(gd.peak_idx(), 10);
        let mut detections = Vec::new();
        for tick in 0..40 {
            let sample = if tick == 15 { 2.0 } else { 0.1 };
            if gd.update(sample) {
                detections.push(tick);
            }
        }
        assert_eq!(detections, vec![25]);
    }

    #[test]
    fn threshold_is_strict() {
        let mut gd = labeler(3, 0.5, 8);
        gd.start_labeling();
        gd.update(0.0);
        gd.update(0.5);
        assert!(!gd.update(0.0));

        let mut gd = labeler(3, 0.5, 8);
        gd.start_labeling();
        gd.update(0.0);
        gd.update(0.5 + 1e-3);
        assert!(gd.update(0.0));
    }

    #[test]
    fn plateau_counts_only_when_first_max_is_centered() {
        let mut gd = labeler(5, 0.5, 8);
        // window after pushes: [0, 0, 1, 1, 0] -> first max at the center
        for s in [0.0, 1.0, 1.0, 0.0, 0.0] {
            gd.update(s);
        }
        assert!(gd.find_peak());
        // window: [0, 1, 1, 0, 0] -> first max at slot 1
        let mut gd = labeler(5, 0.5, 8);
        for s in [0.0, 0.0, 1.0, 1.0, 0.0] {
            gd.update(s);
        }
        assert!(!gd.find_peak());
    }

    #[test]
    fn nan_samples_are_ignored() {
        let mut gd = labeler(3, 0.5, 4);
        for _ in 0..3 {
            gd.update(f32::NAN);
        }
        assert!(!gd.find_peak());
        let mut gd = labeler(3, 0.5, 4);
        for s in [f32::NAN, 1.0, 0.0] {
            gd.update(s);
        }
        assert!(gd.find_peak());
    }

    #[test]
    fn disabled_labeling_still_scrolls() {
        let mut gd = labeler(5, 0.5, 6);
        for s in [0.0, 0.0, 1.0, 0.0, 0.0] {
            assert!(!gd.update(s));
        }
        assert!(gd.find_peak());
        assert!(gd.labels().iter().all(|&l| l == NO_GESTURE_LABEL));
        gd.start_labeling();
        gd.stop_labeling();
        assert!(!gd.is_labeling());
        assert_eq!(gd.window().to_vec(), vec![0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(
            GestureLabeler::new(10, LabelerConfig { window: 4, peak_threshold: 0.5 }),
            Err(ScopeError::InvalidWindow(4))
        ));
        assert!(matches!(
            GestureLabeler::new(10, LabelerConfig { window: 5, peak_threshold: f32::NAN }),
            Err(ScopeError::InvalidThreshold(_))
        ));
        assert!(matches!(
            GestureLabeler::new(0, LabelerConfig::default()),
            Err(ScopeError::InvalidFrameCount)
        ));
        assert!(matches!(
            GestureLabeler::new(10, LabelerConfig::default()),
            Err(ScopeError::HistoryTooShort { n_frames: 10, peak_idx: 10 })
        ));
    }

    #[test]
    fn shortest_history_still_records_labels() {
        let mut gd = labeler(5, 0.5, 3);
        gd.start_labeling();
        let mut hit = false;
        for s in [0.0, 0.0, 1.0, 0.0, 0.0] {
            hit |= gd.update(s);
        }
        assert!(hit);
        assert_eq!(gd.labels()[2], GESTURE_LABEL);
        assert_eq!(gd.gesture_mask(), vec![false, false, true]);
    }
}
