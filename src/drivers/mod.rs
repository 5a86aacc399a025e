// src/drivers/mod.rs
// 声明同级目录下的子模块文件
pub mod buffer;
pub mod error;
pub mod serial;
pub mod source;
pub mod transform;
// 公开导出这些模块里的结构体，方便外部调用
pub use buffer::ScrollingBuffer;
pub use error::ScopeError;
pub use serial::{available_ports, open_serial, SerialSource};
pub use source::{open_replay, FrameSource, ManualSource, ReplaySource, SimulatedSource};
