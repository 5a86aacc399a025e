use std::io::BufReader;
use std::time::Duration;
use log::info;
use serialport::SerialPort;
use crate::drivers::source::LineSource;
use crate::drivers::ScopeError;
/// Read timeout per poll; a timeout just means no frame this tick.
const READ_TIMEOUT: Duration = Duration::from_millis(20);
/// Text frames arriving over a serial port (same format as replay files).
pub type SerialSource = LineSource<BufReader<Box<dyn SerialPort>>>;
pub fn open_serial(port_name: &str, baud_rate: u32) -> Result<SerialSource, ScopeError> {
    let port = serialport::new(port_name, baud_rate)
        .timeout(READ_TIMEOUT)
        .open()?;
    info!("opened serial port {port_name} at {baud_rate} baud");
    Ok(LineSource::new(BufReader::new(port)))
}
/// Names of the serial ports currently visible to the OS.
pub fn available_ports() -> Vec<String> {
    serialport::available_ports()
        .map(|ports| ports.into_iter().map(|p| p.port_name).collect())
        .unwrap_or_default()
}
