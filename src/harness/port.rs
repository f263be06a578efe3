//! Free TCP port selection for spawned servers.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::io;
use std::net::TcpListener;
use std::sync::Mutex;

/// Attempts before giving up on finding an unused port.
const MAX_ATTEMPTS: usize = 32;

static HANDED_OUT: Lazy<Mutex<HashSet<u16>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Ask the OS for a free port on the loopback interface.
///
/// The listener is dropped before returning, so another process may grab
/// the port in the meantime. Use [`PortAllocator`] to at least avoid
/// collisions inside this process.
pub fn find_free_port() -> io::Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}

/// Process-wide registry of ports already given to a test server.
pub struct PortAllocator;

impl PortAllocator {
    /// Reserve a port nobody else in this process has been given.
    pub fn allocate() -> io::Result<u16> {
        for _ in 0..MAX_ATTEMPTS {
            let port = find_free_port()?;
            let mut handed_out = HANDED_OUT
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "port registry poisoned"))?;
            if handed_out.insert(port) {
                tracing::debug!(port, "Allocated port");
                return Ok(port);
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AddrInUse,
            format!("no unused port after {} attempts", MAX_ATTEMPTS),
        ))
    }

    /// Return a port to the pool.
    pub fn release(port: u16) {
        if let Ok(mut handed_out) = HANDED_OUT.lock() {
            handed_out.remove(&port);
        }
    }

    pub fn is_allocated(port: u16) -> bool {
        HANDED_OUT
            .lock()
            .map(|handed_out| handed_out.contains(&port))
            .unwrap_or(false)
    }
}
