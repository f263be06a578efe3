//! Test harness for the dashboard server
//!
//! - `port` - Free port selection, unique within the process
//! - `build` - One-time build step shared by every spawn
//! - `server` - Spawn, health-wait and stop a server process
//! - `shared` - Lazily started server shared by a whole test binary
//! - `fixtures` - Per-test workspaces and sessions

mod build;
mod fixtures;
mod port;
mod server;
mod shared;

pub use build::run_build_once;
pub use fixtures::{SessionFixture, WorkspaceFixture};
pub use port::{find_free_port, PortAllocator};
pub use server::{TestServer, TEST_README};
pub use shared::{shared_server, shutdown_shared};
