//! Name service client over the cluster's TCP discovery port.
//!
//! Framing: the connection opens with the multiplexed-socket header followed by
//! the name-service sub-protocol id. Requests and responses are each a packed
//! int length followed by UTF-8 text.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use crate::domain::{AppError, Endpoint};
use crate::ports::NameServiceLookup;

/// Multiplexed socket protocol header.
pub const MULTIPLEXED_SOCKET_HEADER: [u8; 4] = [0x05, 0xAC, 0x1E, 0x00];
/// Sub-protocol id selecting the name service.
pub const NAME_SERVICE_SUB_PROTOCOL: u8 = 0x07;

const MAX_RESPONSE_LENGTH: i64 = 16 * 1024 * 1024;
const RETRY_PAUSE: Duration = Duration::from_millis(250);

/// Blocking TCP name service client.
#[derive(Debug, Clone)]
pub struct TcpNameServiceClient {
    timeout: Duration,
    retries: u32,
}

impl TcpNameServiceClient {
    /// `retries` is the number of additional connect attempts after the first.
    pub fn new(timeout: Duration, retries: u32) -> Self {
        Self { timeout, retries }
    }

    fn connect(&self, endpoint: &Endpoint) -> Result<TcpStream, AppError> {
        let discovery_error =
            |details: String| AppError::Discovery { endpoint: endpoint.to_string(), details };
        let addresses: Vec<SocketAddr> = (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|e| discovery_error(e.to_string()))?
            .collect();
        if addresses.is_empty() {
            return Err(discovery_error("host did not resolve".to_string()));
        }

        let mut last_error = String::new();
        for attempt in 0..=self.retries {
            if attempt > 0 {
                tracing::debug!(%endpoint, attempt, "retrying name service connection");
                thread::sleep(RETRY_PAUSE);
            }
            for address in &addresses {
                match TcpStream::connect_timeout(address, self.timeout) {
                    Ok(stream) => {
                        stream.set_read_timeout(Some(self.timeout))?;
                        stream.set_write_timeout(Some(self.timeout))?;
                        return Ok(stream);
                    }
                    Err(err) => last_error = err.to_string(),
                }
            }
        }
        Err(discovery_error(last_error))
    }
}

impl NameServiceLookup for TcpNameServiceClient {
    fn lookup(&self, endpoint: &Endpoint, query: &str) -> Result<String, AppError> {
        let mut stream = self.connect(endpoint)?;
        let exchange = |stream: &mut TcpStream| -> io::Result<String> {
            let mut request = Vec::with_capacity(query.len() + 10);
            request.extend_from_slice(&MULTIPLEXED_SOCKET_HEADER);
            request.push(NAME_SERVICE_SUB_PROTOCOL);
            write_message(&mut request, query.as_bytes());
            stream.write_all(&request)?;
            stream.flush()?;
            read_message(stream)
        };
        let result = exchange(&mut stream).map_err(|e| AppError::Discovery {
            endpoint: endpoint.to_string(),
            details: e.to_string(),
        })?;
        tracing::debug!(%endpoint, query, "name service lookup complete");
        Ok(result)
    }
}

/// Append a length-prefixed message.
pub fn write_message(out: &mut Vec<u8>, payload: &[u8]) {
    write_packed_int(out, payload.len() as i64);
    out.extend_from_slice(payload);
}

/// Read one length-prefixed UTF-8 message.
pub fn read_message<R: Read>(input: &mut R) -> io::Result<String> {
    let length = read_packed_int(input)?;
    if !(0..=MAX_RESPONSE_LENGTH).contains(&length) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid response length {length}"),
        ));
    }
    let mut payload = vec![0u8; length as usize];
    input.read_exact(&mut payload)?;
    String::from_utf8(payload).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Encode a packed int: the first byte carries a continuation bit, a sign bit
/// and six data bits; later bytes carry a continuation bit and seven data bits.
pub fn write_packed_int(out: &mut Vec<u8>, value: i64) {
    let mut remaining = value;
    let mut byte: u8 = 0;
    if remaining < 0 {
        byte = 0x40;
        remaining = !remaining;
    }
    byte |= (remaining & 0x3F) as u8;
    remaining >>= 6;
    while remaining != 0 {
        out.push(byte | 0x80);
        byte = (remaining & 0x7F) as u8;
        remaining >>= 7;
    }
    out.push(byte);
}

/// Decode a packed int written by [`write_packed_int`].
pub fn read_packed_int<R: Read>(input: &mut R) -> io::Result<i64> {
    let mut next = || -> io::Result<u8> {
        let mut buf = [0u8; 1];
        input.read_exact(&mut buf)?;
        Ok(buf[0])
    };
    let mut byte = next()?;
    let negative = byte & 0x40 != 0;
    let mut value = i64::from(byte & 0x3F);
    let mut shift = 6;
    while byte & 0x80 != 0 {
        if shift > 62 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "packed int overflow"));
        }
        byte = next()?;
        value |= i64::from(byte & 0x7F) << shift;
        shift += 7;
    }
    Ok(if negative { !value } else { value })
}
