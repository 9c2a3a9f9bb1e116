// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Serial link to the bootloader session (COBS-framed postcard).

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serialport::SerialPort;

use stormloader_common::protocol::{Command, Response, MAX_FRAME_SIZE};

/// Default response timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Quiet period used to flush stale bytes before a request.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(10);

pub struct Link {
    port: Box<dyn SerialPort>,
    frame: Vec<u8>,
}

impl Link {
    pub fn open(port_name: &str, timeout_ms: u64) -> Result<Self> {
        let port = serialport::new(port_name, 115_200)
            .timeout(Duration::from_millis(timeout_ms))
            .open()
            .with_context(|| format!("Failed to open serial port {}", port_name))?;

        Ok(Self {
            port,
            frame: Vec::with_capacity(MAX_FRAME_SIZE),
        })
    }

    pub fn port_name(&self) -> String {
        self.port.name().unwrap_or_else(|| "?".to_string())
    }

    /// Send one command and wait for its response.
    pub fn request(&mut self, cmd: &Command) -> Result<Response> {
        drain(&mut self.port)?;
        self.send(cmd)?;
        self.receive()
    }

    fn send(&mut self, cmd: &Command) -> Result<()> {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let encoded = postcard::to_slice_cobs(cmd, &mut buf)
            .map_err(|e| anyhow!("Failed to encode {:?}: {}", cmd, e))?;
        self.port
            .write_all(encoded)
            .context("Failed to write to serial port")?;
        self.port.flush().context("Failed to flush serial port")?;
        Ok(())
    }

    fn receive(&mut self) -> Result<Response> {
        read_frame(&mut self.port, &mut self.frame)?;
        let raw = format!("{:02x?}", self.frame);
        postcard::from_bytes_cobs(&mut self.frame)
            .map_err(|e| anyhow!("Failed to decode response: {} (raw {})", e, raw))
    }
}

/// Timeout control of a serial port.
trait TimedPort: Read {
    fn timeout(&self) -> Duration;
    fn set_timeout(&mut self, timeout: Duration) -> serialport::Result<()>;
}

impl TimedPort for Box<dyn SerialPort> {
    fn timeout(&self) -> Duration {
        self.as_ref().timeout()
    }

    fn set_timeout(&mut self, timeout: Duration) -> serialport::Result<()> {
        self.as_mut().set_timeout(timeout)
    }
}

/// Read one COBS frame, delimiter included, into `frame`.
///
/// Delimiters before the first data byte are skipped.
fn read_frame<R: Read>(reader: &mut R, frame: &mut Vec<u8>) -> Result<()> {
    frame.clear();
    let mut byte = [0u8; 1];

    loop {
        match reader.read(&mut byte) {
            Ok(0) => continue,
            Ok(_) => {
                if byte[0] == 0x00 && frame.is_empty() {
                    continue;
                }
                frame.push(byte[0]);
                if byte[0] == 0x00 {
                    return Ok(());
                }
                if frame.len() > MAX_FRAME_SIZE {
                    bail!("Response frame exceeds {} bytes", MAX_FRAME_SIZE);
                }
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => {
                bail!("Timeout waiting for response");
            }
            Err(e) => bail!("Serial read error: {}", e),
        }
    }
}

/// Discard stale input, then put the caller's timeout back.
fn drain<P: TimedPort>(port: &mut P) -> Result<()> {
    let mut buf = [0u8; 64];
    let timeout = port.timeout();
    port.set_timeout(DRAIN_TIMEOUT).context("Failed to set drain timeout")?;
    while matches!(port.read(&mut buf), Ok(n) if n > 0) {}
    port.set_timeout(timeout).context("Failed to restore serial timeout")
}
