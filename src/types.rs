// src/types.rs
use serde::{Deserialize, Serialize};

// 数据源类型
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Simulation,
    Serial { port: String, baud_rate: u32 },
    Replay { path: String },
}

impl SourceKind {
    pub fn label(&self) -> String {
        match self {
            SourceKind::Simulation => "Simulation".to_owned(),
            SourceKind::Serial { port, baud_rate } => format!("Serial {port} @ {baud_rate}"),
            SourceKind::Replay { path } => format!("Replay {path}"),
        }
    }
}

/// One tick of stream data: a 3-axis IMU sample plus event flags.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StreamFrame {
    pub accel: [f32; 3],
    pub metronome: bool,
    pub prediction: Option<f32>,
}

impl StreamFrame {
    pub fn magnitude(&self) -> f32 {
        let [x, y, z] = self.accel;
        (x * x + y * y + z * z).sqrt()
    }
}

// GUI 发给后台的命令
#[derive(Clone, Debug)]
pub enum GuiCommand {
    Connect(SourceKind),
    Disconnect,
    StartStream,
    StopStream,
}

// 后台发给 GUI 的消息
#[derive(Clone, Debug)]
pub enum StreamMessage {
    Log(String),
    Status(bool),    // 连接状态
    Streaming(bool), // 数据流状态
    Frame(StreamFrame),
}
