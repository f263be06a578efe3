//! Error handling for the probe client and server harness.
//!
//! - **Error Categories**: classification used for retry decisions
//! - **Unified Error Type**: `ProbeError` covers HTTP, JSON, I/O and server
//!   lifecycle failures
//! - **Result Type Alias**: `ProbeResult<T>`
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, DNS, timeout | Yes |
//! | Server | 5xx, 408, 429 | Yes |
//! | Client | Other 4xx, bad bodies | No |
//! | System | Spawn, filesystem, build | No |
//! | Configuration | Bad harness settings | No |
//! | Lifecycle | Server never healthy or exited | No |

mod category;
mod probe_error;

pub use category::ErrorCategory;
pub use probe_error::{ProbeError, ProbeResult};
