// src/engine.rs
use crate::drivers::{open_replay, open_serial, FrameSource, ScopeError, SimulatedSource};
use crate::types::*;
use log::{error, info, warn};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// 每轮最多推送的帧数, 避免 GUI 队列堆积
const MAX_FRAMES_PER_POLL: usize = 32;

fn open_source(kind: &SourceKind) -> Result<Box<dyn FrameSource + Send>, ScopeError> {
    Ok(match kind {
        SourceKind::Simulation => {
            let seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            Box::new(SimulatedSource::new(seed))
        }
        SourceKind::Serial { port, baud_rate } => Box::new(open_serial(port, *baud_rate)?),
        SourceKind::Replay { path } => Box::new(open_replay(path)?),
    })
}

/// Runs the stream reader on its own thread. Frames are handed to the GUI
/// one per message over `tx`, in arrival order.
pub fn spawn_thread(tx: Sender<StreamMessage>, rx_cmd: Receiver<GuiCommand>, frame_interval: Duration) {
    thread::spawn(move || {
        tx.send(StreamMessage::Log("⚙️ Stream engine ready.".to_owned())).ok();

        let mut source: Option<Box<dyn FrameSource + Send>> = None;
        let mut current_kind = SourceKind::Simulation;
        let mut is_streaming = false;

        loop {
            // ============================================================
            // 1. 消息处理 (处理 GUI 发来的命令)
            // ============================================================
            loop {
                let cmd = match rx_cmd.try_recv() {
                    Ok(cmd) => cmd,
                    Err(std::sync::mpsc::TryRecvError::Empty) => break,
                    // GUI 已关闭
                    Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                        info!("command channel closed, stream engine exiting");
                        return;
                    }
                };
                match cmd {
                    GuiCommand::Connect(kind) => {
                        if source.is_some() {
                            warn!("connect ignored, {} already open", current_kind.label());
                            tx.send(StreamMessage::Log(format!(
                                "⚠️ Already connected: {}",
                                current_kind.label()
                            )))
                            .ok();
                            continue;
                        }
                        match open_source(&kind) {
                            Ok(s) => {
                                info!("connected to {}", kind.label());
                                tx.send(StreamMessage::Log(format!("✅ Connected: {}", kind.label()))).ok();
                                tx.send(StreamMessage::Status(true)).ok();
                                source = Some(s);
                                current_kind = kind;
                            }
                            Err(e) => {
                                warn!("failed to connect to {}: {e}", kind.label());
                                tx.send(StreamMessage::Log(format!("❌ Connect failed: {e}"))).ok();
                            }
                        }
                    }
                    GuiCommand::Disconnect => {
                        source = None;
                        is_streaming = false;
                        tx.send(StreamMessage::Streaming(false)).ok();
                        tx.send(StreamMessage::Status(false)).ok();
                        tx.send(StreamMessage::Log("🔌 Disconnected".to_owned())).ok();
                    }
                    GuiCommand::StartStream => {
                        if source.is_some() && !is_streaming {
                            is_streaming = true;
                            tx.send(StreamMessage::Streaming(true)).ok();
                            tx.send(StreamMessage::Log("🌊 Stream Started".to_owned())).ok();
                        }
                    }
                    GuiCommand::StopStream => {
                        if is_streaming {
                            is_streaming = false;
                            tx.send(StreamMessage::Streaming(false)).ok();
                            tx.send(StreamMessage::Log("🛑 Stream Stopped".to_owned())).ok();
                        }
                    }
                }
            }

            // ============================================================
            // 2. 数据流循环
            // ============================================================
            let Some(active) = source.as_mut().filter(|_| is_streaming) else {
                thread::sleep(Duration::from_millis(50));
                continue;
            };

            let burst = matches!(current_kind, SourceKind::Serial { .. });
            match pump(active.as_mut(), &tx, burst) {
                Ok(_) if active.is_exhausted() => {
                    info!("source exhausted");
                    is_streaming = false;
                    tx.send(StreamMessage::Streaming(false)).ok();
                    tx.send(StreamMessage::Log("⏹ Replay finished".to_owned())).ok();
                }
                Ok(_) => {}
                Err(e) => {
                    error!("stream read failed: {e}");
                    is_streaming = false;
                    tx.send(StreamMessage::Streaming(false)).ok();
                    tx.send(StreamMessage::Log(format!("❌ Stream error: {e}"))).ok();
                }
            }

            // 串口由读超时控制节奏, 其余数据源按配置间隔推送
            if !burst {
                thread::sleep(frame_interval);
            }
        }
    });
}

/// Forwards one frame, or with `burst` everything already buffered up to a
/// cap. Returns how many frames were sent.
fn pump(
    source: &mut dyn FrameSource,
    tx: &Sender<StreamMessage>,
    burst: bool,
) -> Result<usize, ScopeError> {
    let mut sent = 0;
    while sent < MAX_FRAMES_PER_POLL {
        let Some(frame) = source.next_frame()? else {
            break;
        };
        if tx.send(StreamMessage::Frame(frame)).is_err() {
            break;
        }
        sent += 1;
        if !burst {
            break;
        }
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ManualSource;
    use std::sync::mpsc::channel;

    fn frames(n: usize) -> ManualSource {
        ManualSource::new((0..n).map(|i| StreamFrame {
            accel: [i as f32, 0.0, 0.0],
            ..Default::default()
        }))
    }

    #[test]
    fn pump_forwards_one_frame_per_tick() {
        let (tx, rx) = channel();
        let mut source = frames(3);
        assert_eq!(pump(&mut source, &tx, false).unwrap(), 1);
        assert_eq!(pump(&mut source, &tx, false).unwrap(), 1);
        let received: Vec<f32> = rx
            .try_iter()
            .filter_map(|m| match m {
                StreamMessage::Frame(f) => Some(f.accel[0]),
                _ => None,
            })
            .collect();
        assert_eq!(received, vec![0.0, 1.0]);
    }

    #[test]
    fn burst_drains_up_to_cap() {
        let (tx, rx) = channel();
        let mut source = frames(MAX_FRAMES_PER_POLL + 5);
        assert_eq!(pump(&mut source, &tx, true).unwrap(), MAX_FRAMES_PER_POLL);
        assert_eq!(pump(&mut source, &tx, true).unwrap(), 5);
        assert_eq!(pump(&mut source, &tx, true).unwrap(), 0);
        assert_eq!(rx.try_iter().count(), MAX_FRAMES_PER_POLL + 5);
    }

    #[test]
    fn second_connect_is_reported() {
        let (tx, rx) = channel();
        let (tx_cmd, rx_cmd) = channel();
        spawn_thread(tx, rx_cmd, Duration::from_millis(1));
        tx_cmd.send(GuiCommand::Connect(SourceKind::Simulation)).unwrap();
        tx_cmd.send(GuiCommand::Connect(SourceKind::Simulation)).unwrap();
        let mut logs = Vec::new();
        while let Ok(msg) = rx.recv_timeout(Duration::from_secs(2)) {
            if let StreamMessage::Log(line) = msg {
                let done = line.contains("Already connected");
                logs.push(line);
                if done {
                    break;
                }
            }
        }
        drop(tx_cmd);
        assert_eq!(logs.iter().filter(|l| l.contains("Connected: Simulation")).count(), 1);
        assert!(logs.last().unwrap().contains("Already connected: Simulation"));
    }

    #[test]
    fn missing_replay_file_fails_to_open() {
        let kind = SourceKind::Replay {
            path: "/nonexistent/gesturescope/replay.csv".into(),
        };
        assert!(matches!(open_source(&kind), Err(ScopeError::Io(_))));
    }
}
