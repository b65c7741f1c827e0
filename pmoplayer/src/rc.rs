//! Client for VLC's `rc` remote-control interface
//!
//! The protocol is line oriented: one command per line, answers are free
//! text with no framing. Every exchange opens a fresh connection, drains
//! the banner, sends the commands and collects whatever comes back within
//! the read timeout.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_RC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RC_PORT: u16 = 4212;
pub const DEFAULT_CONTROL_TIMEOUT: Duration = Duration::from_millis(1500);

const BANNER_BUFFER: usize = 4096;
const RESPONSE_BUFFER: usize = 8192;

/// VLC volume units per percent (0..=100 maps to 0..=512)
const VOLUME_UNITS_PER_PERCENT: f64 = 5.12;
/// Percent per `volup`/`voldown` step
const PERCENT_PER_STEP: f64 = 1.56;

/// Host and port of an RC endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcEndpoint {
    pub host: String,
    pub port: u16,
}

impl RcEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for RcEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_RC_HOST, DEFAULT_RC_PORT)
    }
}

impl fmt::Display for RcEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Outcome of an RC exchange
///
/// `ok` is true only after a successful connection; `response` then holds
/// the raw text received (possibly empty).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ControlResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ControlResponse {
    fn success(response: String) -> Self {
        Self {
            ok: true,
            response: Some(response),
            error: None,
        }
    }

    fn failure(error: String) -> Self {
        Self {
            ok: false,
            response: None,
            error: Some(error),
        }
    }
}

/// Send `commands` to the RC interface at `host:port`
///
/// Never fails: connection problems come back as `ok: false`. When nothing
/// at all was received, a final `status` is sent to force some output.
pub fn send_rc_commands(
    host: &str,
    port: u16,
    commands: &[String],
    timeout: Duration,
) -> ControlResponse {
    match exchange(host, port, commands, timeout) {
        Ok(raw) => ControlResponse::success(String::from_utf8_lossy(&raw).into_owned()),
        Err(err) => {
            warn!("VLC RC exchange with {}:{} failed: {:#}", host, port, err);
            ControlResponse::failure(format!("{:#}", err))
        }
    }
}

fn exchange(host: &str, port: u16, commands: &[String], timeout: Duration) -> Result<Vec<u8>> {
    let mut stream = connect(host, port, timeout)?;
    stream
        .set_read_timeout(Some(timeout))
        .context("Failed to set read timeout")?;
    stream
        .set_write_timeout(Some(timeout))
        .context("Failed to set write timeout")?;

    let mut received = Vec::new();
    read_chunk(&mut stream, BANNER_BUFFER, &mut received);

    for command in commands {
        let line = format!("{}\n", command.trim());
        debug!("VLC RC -> {}", line.trim_end());
        stream
            .write_all(line.as_bytes())
            .with_context(|| format!("Failed to send '{}' to {}:{}", command.trim(), host, port))?;
        read_chunk(&mut stream, RESPONSE_BUFFER, &mut received);
    }

    if received.is_empty() {
        debug!("VLC RC silent, forcing status");
        match stream.write_all(b"status\n") {
            Ok(()) => read_chunk(&mut stream, RESPONSE_BUFFER, &mut received),
            Err(err) => debug!("Failed to send forced status: {}", err),
        }
    }

    Ok(received)
}

fn connect(host: &str, port: u16, timeout: Duration) -> Result<TcpStream> {
    let addrs: Vec<_> = (host, port)
        .to_socket_addrs()
        .with_context(|| format!("Failed to resolve {}:{}", host, port))?
        .collect();

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }

    Err(match last_err {
        Some(err) => anyhow!(err).context(format!("Failed to connect to {}:{}", host, port)),
        None => anyhow!("No address found for {}:{}", host, port),
    })
}

/// One best-effort read; timeouts and read errors leave `out` unchanged
fn read_chunk(stream: &mut TcpStream, size: usize, out: &mut Vec<u8>) {
    let mut buf = vec![0u8; size];
    match stream.read(&mut buf) {
        Ok(n) => out.extend_from_slice(&buf[..n]),
        Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
        Err(err) => debug!("VLC RC read failed: {}", err),
    }
}

/// VLC volume level for a percentage, clamped to 0..=100 first
pub fn volume_level(percent: i64) -> u32 {
    let percent = percent.clamp(0, 100) as f64;
    (percent * VOLUME_UNITS_PER_PERCENT).round() as u32
}

/// `volup N` / `voldown N` command for a relative change in percent
pub fn volume_change_command(delta: i64) -> String {
    let steps = ((delta.unsigned_abs() as f64) / PERCENT_PER_STEP).round().max(1.0) as u64;
    if delta >= 0 {
        format!("volup {}", steps)
    } else {
        format!("voldown {}", steps)
    }
}

/// RC client bound to one endpoint
#[derive(Debug, Clone)]
pub struct RcClient {
    endpoint: RcEndpoint,
    timeout: Duration,
}

impl Default for RcClient {
    fn default() -> Self {
        Self::new(RcEndpoint::default())
    }
}

impl RcClient {
    pub fn new(endpoint: RcEndpoint) -> Self {
        Self {
            endpoint,
            timeout: DEFAULT_CONTROL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &RcEndpoint {
        &self.endpoint
    }

    pub fn send(&self, commands: &[String]) -> ControlResponse {
        send_rc_commands(&self.endpoint.host, self.endpoint.port, commands, self.timeout)
    }

    /// Toggle pause
    pub fn pause(&self) -> ControlResponse {
        self.send(&["pause".to_string()])
    }

    pub fn stop(&self) -> ControlResponse {
        self.send(&["stop".to_string()])
    }

    pub fn status(&self) -> ControlResponse {
        self.send(&["status".to_string()])
    }

    /// Set the volume in percent (0..=100)
    pub fn volume_set(&self, percent: i64) -> ControlResponse {
        self.send(&[
            format!("volume {}", volume_level(percent)),
            "status".to_string(),
        ])
    }

    /// Raise (positive) or lower (negative) the volume by `delta` percent
    pub fn volume_change(&self, delta: i64) -> ControlResponse {
        self.send(&[volume_change_command(delta), "status".to_string()])
    }
}
