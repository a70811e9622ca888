use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::foundation::error::{GridError, GridResult};

/// Check that a TCP connection to `addr` (`host:port`) can be established within `timeout`.
///
/// Every resolved address is tried in turn. The connection is shut down as soon as it is
/// established; nothing is sent or read.
pub fn probe_tcp(addr: &str, timeout: Duration) -> GridResult<()> {
    let targets = addr
        .to_socket_addrs()
        .map_err(|e| GridError::transient(format!("resolve '{addr}': {e}")))?;

    let mut last_err = None;
    for target in targets {
        match TcpStream::connect_timeout(&target, timeout) {
            Ok(stream) => {
                let _ = stream.shutdown(Shutdown::Both);
                return Ok(());
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(match last_err {
        Some(e) => GridError::transient(format!("connect '{addr}': {e}")),
        None => GridError::transient(format!("'{addr}' resolved to no addresses")),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/probe.rs"]
mod tests;
