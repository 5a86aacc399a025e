// src/session.rs
use crate::config::AppConfig;
use crate::drivers::{ScopeError, ScrollingBuffer};
use crate::gesture::GestureLabeler;
use crate::plot::{EventPlot, ImuPlot, NnPlot, Plot};
use crate::types::StreamFrame;
use log::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotId {
    Events,
    Imu,
    Network,
}

/// Everything driven by one stream frame per tick. All consumers see the
/// same frame, in a fixed order, before anything is rendered.
pub struct Session {
    labeler: GestureLabeler,
    metronome: ScrollingBuffer<bool>,
    predictions: ScrollingBuffer<f32>,
    event_plot: EventPlot,
    imu_plot: ImuPlot,
    nn_plot: NnPlot,
    frames_seen: u64,
    gestures_labeled: u64,
}

impl Session {
    pub fn new(config: &AppConfig) -> Result<Self, ScopeError> {
        config.validate()?;
        let n = config.n_frames;
        Ok(Self {
            labeler: GestureLabeler::new(n, config.labeler.clone())?,
            metronome: ScrollingBuffer::new(n, false),
            predictions: ScrollingBuffer::new(n, 0.0),
            event_plot: EventPlot::new(n),
            imu_plot: ImuPlot::new(n),
            nn_plot: NnPlot::new(n),
            frames_seen: 0,
            gestures_labeled: 0,
        })
    }

    /// Returns true when the labeler marked a gesture on this frame.
    pub fn apply_frame(&mut self, frame: &StreamFrame) -> bool {
        let labeled = self.labeler.update(frame.magnitude());
        if labeled {
            self.gestures_labeled += 1;
        }
        self.metronome.push(frame.metronome);
        self.imu_plot.update(frame.accel);

        let metronome_mask = self.metronome.to_vec();
        let label_mask = self.labeler.gesture_mask();
        if let Err(e) = self.event_plot.update(&metronome_mask, &label_mask) {
            warn!("event plot update skipped: {e}");
        }

        match frame.prediction {
            Some(p) => {
                self.predictions.push(p);
                let history = self.predictions.to_vec();
                if let Err(e) = self.nn_plot.update(&history) {
                    warn!("network plot update skipped: {e}");
                }
            }
            None => {
                self.predictions.shift_decay(0.0);
                self.nn_plot.shift();
            }
        }
        self.frames_seen += 1;
        labeled
    }

    pub fn start_labeling(&mut self) {
        self.labeler.start_labeling();
    }

    pub fn stop_labeling(&mut self) {
        self.labeler.stop_labeling();
    }

    pub fn is_labeling(&self) -> bool {
        self.labeler.is_labeling()
    }

    fn plot_mut(&mut self, id: PlotId) -> &mut dyn Plot {
        match id {
            PlotId::Events => &mut self.event_plot,
            PlotId::Imu => &mut self.imu_plot,
            PlotId::Network => &mut self.nn_plot,
        }
    }

    pub fn plot(&self, id: PlotId) -> &dyn Plot {
        match id {
            PlotId::Events => &self.event_plot,
            PlotId::Imu => &self.imu_plot,
            PlotId::Network => &self.nn_plot,
        }
    }

    pub fn start_plot(&mut self, id: PlotId) {
        self.plot_mut(id).start();
    }

    pub fn stop_plot(&mut self, id: PlotId) {
        self.plot_mut(id).stop();
    }

    pub fn labeler(&self) -> &GestureLabeler {
        &self.labeler
    }

    pub fn event_plot(&self) -> &EventPlot {
        &self.event_plot
    }

    pub fn imu_plot(&self) -> &ImuPlot {
        &self.imu_plot
    }

    pub fn nn_plot(&self) -> &NnPlot {
        &self.nn_plot
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn gestures_labeled(&self) -> u64 {
        self.gestures_labeled
    }
}
