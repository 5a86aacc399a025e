use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use log::warn;
use crate::drivers::ScopeError;
use crate::types::StreamFrame;
/// Something that can yield stream frames on demand. `Ok(None)` means no
/// frame is ready this tick.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<StreamFrame>, ScopeError>;
    /// True once the source will never produce another frame.
    fn is_exhausted(&self) -> bool {
        false
    }
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<StreamFrame>,
}
impl ManualSource {
    pub fn new(frames: impl IntoIterator<Item = StreamFrame>) -> Self {
        Self {
            queue: frames.into_iter().collect(),
        }
    }
}
impl FrameSource for ManualSource {
    fn next_frame(&mut self) -> Result<Option<StreamFrame>, ScopeError> {
        Ok(self.queue.pop_front())
    }
    fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }
}
/// Parses one text frame: `ax,ay,az[,metronome[,prediction]]`.
/// Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_frame_line(line: &str) -> Result<Option<StreamFrame>, ScopeError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let parse_err = |reason: String| ScopeError::Parse {
        line: trimmed.to_owned(),
        reason,
    };
    let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    if !(3..=5).contains(&fields.len()) {
        return Err(parse_err(format!("expected 3 to 5 fields, got {}", fields.len())));
    }
    let mut accel = [0.0f32; 3];
    for (slot, field) in accel.iter_mut().zip(&fields) {
        *slot = field
            .parse()
            .map_err(|_| parse_err(format!("invalid axis value {field:?}")))?;
    }
    let metronome = match fields.get(3).copied() {
        None | Some("") | Some("0") => false,
        Some("1") => true,
        Some(other) => return Err(parse_err(format!("invalid metronome flag {other:?}"))),
    };
    let prediction = match fields.get(4).copied() {
        None | Some("") => None,
        Some(field) => {
            let value: f32 = field
                .parse()
                .map_err(|_| parse_err(format!("invalid prediction {field:?}")))?;
            (!value.is_nan()).then_some(value)
        }
    };
    Ok(Some(StreamFrame {
        accel,
        metronome,
        prediction,
    }))
}
/// Line-oriented text stream. Partial lines survive read timeouts and are
/// completed on a later call. Lines that fail to parse are logged and
/// skipped.
pub struct LineSource<R: BufRead> {
    reader: R,
    pending: String,
    exhausted: bool,
}
impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: String::new(),
            exhausted: false,
        }
    }
    fn parse_or_skip(line: &str) -> Option<StreamFrame> {
        parse_frame_line(line).unwrap_or_else(|e| {
            warn!("skipping malformed line: {e}");
            None
        })
    }
}
impl<R: BufRead> FrameSource for LineSource<R> {
    fn next_frame(&mut self) -> Result<Option<StreamFrame>, ScopeError> {
        loop {
            if self.exhausted {
                return Ok(None);
            }
            match self.reader.read_line(&mut self.pending) {
                Ok(0) => {
                    self.exhausted = true;
                    let rest = std::mem::take(&mut self.pending);
                    return Ok(Self::parse_or_skip(&rest));
                }
                Ok(_) if !self.pending.ends_with('\n') => continue,
                Ok(_) => {
                    let line = std::mem::take(&mut self.pending);
                    if let Some(frame) = Self::parse_or_skip(&line) {
                        return Ok(Some(frame));
                    }
                }
                Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                    return Ok(None)
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
/// Replays a recorded text stream from disk.
pub type ReplaySource = LineSource<BufReader<File>>;
pub fn open_replay(path: impl AsRef<Path>) -> Result<ReplaySource, ScopeError> {
    let file = File::open(path)?;
    Ok(LineSource::new(BufReader::new(file)))
}
/// Synthetic IMU: gravity on z with noise, a bump on x every
/// `gesture_period` frames and a metronome beat every `beat_period` frames.
/// The prediction channel follows the bump envelope.
pub struct SimulatedSource {
    rng: StdRng,
    tick: u64,
    pub beat_period: u64,
    pub gesture_period: u64,
    pub gesture_amplitude: f32,
    pub noise: f32,
}
impl SimulatedSource {
    const BUMP_HALF_WIDTH: f32 = 4.0;
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            tick: 0,
            beat_period: 50,
            gesture_period: 150,
            gesture_amplitude: 1.5,
            noise: 0.02,
        }
    }
    fn envelope(&self) -> f32 {
        let phase = (self.tick % self.gesture_period.max(1)) as f32;
        let center = self.gesture_period as f32 / 2.0;
        let d = (phase - center) / Self::BUMP_HALF_WIDTH;
        (-d * d).exp()
    }
}
impl FrameSource for SimulatedSource {
    fn next_frame(&mut self) -> Result<Option<StreamFrame>, ScopeError> {
        let envelope = self.envelope();
        let mut jitter = || {
            if self.noise > 0.0 {
                self.rng.gen_range(-self.noise..self.noise)
            } else {
                0.0
            }
        };
        let accel = [
            self.gesture_amplitude * envelope + jitter(),
            jitter(),
            1.0 + jitter(),
        ];
        let frame = StreamFrame {
            accel,
            metronome: self.tick % self.beat_period.max(1) == 0,
            prediction: Some(envelope),
        };
        self.tick += 1;
        Ok(Some(frame))
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    #[test]
    fn parses_frames_with_optional_fields() {
        let frame = parse_frame_line("0.1, -0.2, 9.8").unwrap().unwrap();
        assert_eq!(frame.accel, [0.1, -0.2, 9.8]);
        assert!(!frame.metronome);
        assert_eq!(frame.prediction, None);
        let frame = parse_frame_line("0,0,1,1,0.75\r\n").unwrap().unwrap();
        assert!(frame.metronome);
        assert_eq!(frame.prediction, Some(0.75));
        let frame = parse_frame_line("0,0,1,0,nan").unwrap().unwrap();
        assert_eq!(frame.prediction, None);
        assert!(parse_frame_line("   ").unwrap().is_none());
        assert!(parse_frame_line("# ax,ay,az").unwrap().is_none());
    }
    #[test]
    fn rejects_malformed_frames() {
        assert!(matches!(parse_frame_line("1,2"), Err(ScopeError::Parse { .. })));
        assert!(matches!(parse_frame_line("1,x,3"), Err(ScopeError::Parse { .. })));
        assert!(matches!(parse_frame_line("1,2,3,yes"), Err(ScopeError::Parse { .. })));
        assert!(matches!(parse_frame_line("1,2,3,0,0,9"), Err(ScopeError::Parse { .. })));
    }
    #[test]
    fn line_source_skips_comments_and_ends() {
        let text = "# header\n0,0,1\n\n1,0,0,1\n0,1,0";
        let mut source = LineSource::new(Cursor::new(text));
        let a = source.next_frame().unwrap().unwrap();
        assert_eq!(a.accel, [0.0, 0.0, 1.0]);
        let b = source.next_frame().unwrap().unwrap();
        assert!(b.metronome);
        let c = source.next_frame().unwrap().unwrap();
        assert_eq!(c.accel, [0.0, 1.0, 0.0]);
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.is_exhausted());
    }
    #[test]
    fn line_source_skips_malformed_lines() {
        // joining a serial stream mid-line leaves a fragment first
        let text = "9.8\n0,0,1\n1,x,0\n0,1,0,1\n2,";
        let mut source = LineSource::new(Cursor::new(text));
        let a = source.next_frame().unwrap().unwrap();
        assert_eq!(a.accel, [0.0, 0.0, 1.0]);
        let b = source.next_frame().unwrap().unwrap();
        assert_eq!(b.accel, [0.0, 1.0, 0.0]);
        assert!(b.metronome);
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.is_exhausted());
    }
    #[test]
    fn manual_source_drains_in_order() {
        let frames = (0..3).map(|i| StreamFrame {
            accel: [i as f32, 0.0, 0.0],
            ..Default::default()
        });
        let mut source = ManualSource::new(frames);
        for i in 0..3 {
            assert_eq!(source.next_frame().unwrap().unwrap().accel[0], i as f32);
        }
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.is_exhausted());
    }
    #[test]
    fn simulation_is_reproducible_and_beats() {
        let mut a = SimulatedSource::new(7);
        let mut b = SimulatedSource::new(7);
        let mut beats = 0;
        for _ in 0..150 {
            let fa = a.next_frame().unwrap().unwrap();
            let fb = b.next_frame().unwrap().unwrap();
            assert_eq!(fa, fb);
            beats += fa.metronome as usize;
        }
        assert_eq!(beats, 3);
    }
}
