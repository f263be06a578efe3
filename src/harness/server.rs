//! Lifecycle of a dashboard server under test: spawn, health wait, stop.
//!
//! The child is a plain `std::process::Child` and its output is drained on
//! std threads. A server shared across `#[tokio::test]` functions outlives
//! the runtime that started it, so nothing here may be tied to one.
//!
//! On unix the child leads its own process group. Server commands are often
//! wrappers (`npm run dev`, `sh -c ...`), and signals go to the whole group
//! so the real listener never outlives `stop`.

use super::build::run_build_once;
use super::port::PortAllocator;
use crate::config::HarnessConfig;
use crate::error::{ProbeError, ProbeResult};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
#[cfg(unix)]
use std::os::unix::process::CommandExt;

/// Interval between health polls
const POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Timeout of a single health request
const HEALTH_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Time given to the server to exit after SIGTERM
const STOP_GRACE: Duration = Duration::from_secs(10);
/// Interval between exit checks while stopping
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Output lines kept for startup diagnostics
const OUTPUT_TAIL_LINES: usize = 200;

pub const TEST_README: &str = "# Test Project\nThis is a test project for API testing.";

type OutputTail = Arc<Mutex<VecDeque<String>>>;

/// A running (or attached) dashboard server.
pub struct TestServer {
    base_url: String,
    port: u16,
    /// `None` when attached or after `stop`
    child: Mutex<Option<Child>>,
    output: OutputTail,
    temp_path: PathBuf,
    temp_dir: Mutex<Option<TempDir>>,
    spawned: bool,
    stopped: AtomicBool,
}

impl TestServer {
    /// Spawn the configured server on a fresh port and wait until it answers.
    pub async fn start(config: &HarnessConfig) -> ProbeResult<Self> {
        let (program, args) = config
            .server_command
            .split_first()
            .ok_or_else(|| ProbeError::InvalidCommand("empty server command".to_string()))?;

        if let Some(build) = &config.build_command {
            run_build_once(build).await?;
        }

        let port = PortAllocator::allocate()?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let temp_dir = worker_temp_dir(&config.worker_id)?;

        let mut command = Command::new(program);
        command
            .args(args)
            .env("PORT", port.to_string())
            .env("NODE_ENV", "test")
            .envs(config.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        command.process_group(0);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                PortAllocator::release(port);
                return Err(ProbeError::Spawn {
                    command: config.server_command.join(" "),
                    source,
                });
            }
        };

        tracing::info!(
            port,
            pid = child.id(),
            command = %config.server_command.join(" "),
            "Server started"
        );

        let output: OutputTail = Arc::new(Mutex::new(VecDeque::new()));
        if let Some(stdout) = child.stdout.take() {
            drain_output(stdout, "stdout", Arc::clone(&output));
        }
        if let Some(stderr) = child.stderr.take() {
            drain_output(stderr, "stderr", Arc::clone(&output));
        }

        let ready = poll_health(
            &base_url,
            &config.health_path,
            config.startup_timeout(),
            Some(&mut child),
        )
        .await;

        if let Err(e) = ready {
            let _ = kill_group(&mut child);
            PortAllocator::release(port);
            tracing::warn!(
                error = %e,
                output = %tail_text(&output),
                "Server failed to start"
            );
            return Err(e);
        }

        Ok(Self {
            base_url,
            port,
            child: Mutex::new(Some(child)),
            output,
            temp_path: temp_dir.path().to_path_buf(),
            temp_dir: Mutex::new(Some(temp_dir)),
            spawned: true,
            stopped: AtomicBool::new(false),
        })
    }

    /// Wrap a server somebody else is running. Nothing is spawned or stopped.
    pub fn attach(base_url: &str, worker_id: &str) -> ProbeResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let port = port_of(&base_url).unwrap_or(0);
        let temp_dir = worker_temp_dir(worker_id)?;
        tracing::info!(%base_url, "Attached to running server");

        Ok(Self {
            base_url,
            port,
            child: Mutex::new(None),
            output: Arc::new(Mutex::new(VecDeque::new())),
            temp_path: temp_dir.path().to_path_buf(),
            temp_dir: Mutex::new(Some(temp_dir)),
            spawned: false,
            stopped: AtomicBool::new(false),
        })
    }

    /// Attach when `config.base_url` is set, spawn otherwise.
    pub async fn from_config(config: &HarnessConfig) -> ProbeResult<Self> {
        match &config.base_url {
            Some(url) => Self::attach(url, &config.worker_id),
            None => Self::start(config).await,
        }
    }

    /// Poll `base_url + path` until it answers 200 or 404.
    pub async fn wait_for_health(base_url: &str, path: &str, timeout: Duration) -> ProbeResult<()> {
        poll_health(base_url, path, timeout, None).await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Port the server listens on (0 if attached to a URL without one).
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_path
    }

    /// Whether this harness owns the server process.
    pub fn is_spawned(&self) -> bool {
        self.spawned
    }

    /// Whether `stop` has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Last lines the server wrote to stdout/stderr.
    pub fn output_tail(&self) -> Vec<String> {
        self.output
            .lock()
            .map(|tail| tail.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Create `<temp>/<name>/README.md` and return the folder.
    pub fn test_folder(&self, name: &str) -> ProbeResult<PathBuf> {
        let folder = self.temp_path.join(name);
        std::fs::create_dir_all(&folder)?;
        std::fs::write(folder.join("README.md"), TEST_README)?;
        Ok(folder)
    }

    /// Gracefully stop the server and remove the temp dir. Safe to call twice.
    ///
    /// The port is released only once the whole process group is gone. If
    /// waiting for it fails the group is killed before the error is returned.
    pub async fn stop(&self) -> ProbeResult<()> {
        self.stopped.store(true, Ordering::SeqCst);
        let child = self.child.lock().ok().and_then(|mut guard| guard.take());

        let mut result = Ok(());
        if let Some(mut child) = child {
            result = shutdown(&mut child, self.port).await;
            if let Err(e) = &result {
                tracing::warn!(port = self.port, error = %e, "Stop failed, killing server");
                let _ = kill_group(&mut child);
            }
            PortAllocator::release(self.port);
        }

        let temp_dir = self.temp_dir.lock().ok().and_then(|mut guard| guard.take());
        if let Some(dir) = temp_dir {
            dir.close()?;
        }
        result
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let child = self.child.get_mut().ok().and_then(|guard| guard.take());
        if let Some(mut child) = child {
            tracing::debug!(port = self.port, "Killing server on drop");
            let _ = kill_group(&mut child);
            PortAllocator::release(self.port);
        }
    }
}

/// SIGTERM the server, then wait for the leader to exit and its group to
/// empty. Anything left after `STOP_GRACE` is killed.
async fn shutdown(child: &mut Child, port: u16) -> ProbeResult<()> {
    terminate(child);
    let deadline = Instant::now() + STOP_GRACE;
    let mut exited = None;

    loop {
        if exited.is_none() {
            exited = child.try_wait()?;
        }
        if let Some(status) = &exited {
            if !group_alive(child.id()) {
                tracing::info!(port, %status, "Server stopped");
                return Ok(());
            }
        }
        if Instant::now() >= deadline {
            tracing::warn!(port, "Server ignored SIGTERM, killing");
            kill_group(child)?;
            return Ok(());
        }
        tokio::time::sleep(STOP_POLL_INTERVAL).await;
    }
}

async fn poll_health(
    base_url: &str,
    path: &str,
    timeout: Duration,
    mut child: Option<&mut Child>,
) -> ProbeResult<()> {
    let url = format!("{}{}", base_url, path);
    let client = reqwest::Client::builder()
        .timeout(HEALTH_REQUEST_TIMEOUT)
        .build()?;
    let start = Instant::now();

    loop {
        if let Some(child) = child.as_deref_mut() {
            if let Some(status) = child.try_wait()? {
                return Err(ProbeError::ServerExited {
                    status: status.to_string(),
                });
            }
        }

        match client.get(&url).send().await {
            Ok(resp) if resp.status().as_u16() == 200 || resp.status().as_u16() == 404 => {
                tracing::info!(%url, elapsed_ms = start.elapsed().as_millis() as u64, "Server healthy");
                return Ok(());
            }
            Ok(resp) => tracing::trace!(status = resp.status().as_u16(), "Server not ready"),
            Err(e) => tracing::trace!(error = %e, "Server not reachable"),
        }

        if start.elapsed() >= timeout {
            return Err(ProbeError::StartupTimeout {
                url,
                timeout_secs: timeout.as_secs(),
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Send `sig` to the process group led by `pid`. A group that is already
/// gone is not an error.
#[cfg(unix)]
fn signal_group(pid: u32, sig: Signal) {
    let pgid = Pid::from_raw(pid as i32);
    match signal::killpg(pgid, sig) {
        Ok(()) => tracing::debug!(pid, signal = ?sig, "Signalled process group"),
        Err(nix::errno::Errno::ESRCH) => tracing::debug!(pid, "Process group already gone"),
        Err(e) => tracing::warn!(pid, error = %e, "Failed to signal process group"),
    }
}

/// Whether any process is left in the group led by `pid`.
#[cfg(unix)]
fn group_alive(pid: u32) -> bool {
    signal::killpg(Pid::from_raw(pid as i32), None).is_ok()
}

#[cfg(not(unix))]
fn group_alive(_pid: u32) -> bool {
    false
}

/// Ask the server to exit.
#[cfg(unix)]
fn terminate(child: &mut Child) {
    signal_group(child.id(), Signal::SIGTERM);
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) {
    let _ = child.kill();
}

/// Hard-kill the server and everything it started, then reap it.
fn kill_group(child: &mut Child) -> std::io::Result<()> {
    #[cfg(unix)]
    signal_group(child.id(), Signal::SIGKILL);
    let _ = child.kill();
    child.wait().map(|_| ())
}

fn drain_output<R: Read + Send + 'static>(stream: R, name: &'static str, tail: OutputTail) {
    std::thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            let Ok(line) = line else { break };
            tracing::debug!(target: "dashboard_probe::server_output", stream = name, "{}", line);
            if let Ok(mut tail) = tail.lock() {
                if tail.len() == OUTPUT_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
        }
    });
}

fn tail_text(tail: &OutputTail) -> String {
    tail.lock()
        .map(|lines| lines.iter().cloned().collect::<Vec<_>>().join("\n"))
        .unwrap_or_default()
}

fn worker_temp_dir(worker_id: &str) -> ProbeResult<TempDir> {
    Ok(tempfile::Builder::new()
        .prefix(&format!("dashboard_probe_{}_", worker_id))
        .tempdir()?)
}

fn port_of(base_url: &str) -> Option<u16> {
    let authority = base_url.split("://").nth(1)?.split('/').next()?;
    authority.rsplit_once(':')?.1.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_of() {
        assert_eq!(port_of("http://127.0.0.1:3000"), Some(3000));
        assert_eq!(port_of("http://localhost:8080/base"), Some(8080));
        assert_eq!(port_of("http://example.com"), None);
    }

    #[test]
    fn test_attach_creates_worker_temp_dir() {
        let server = TestServer::attach("http://127.0.0.1:3000/", "gw7").unwrap();
        assert_eq!(server.base_url(), "http://127.0.0.1:3000");
        assert_eq!(server.port(), 3000);
        assert!(!server.is_spawned());

        let name = server.temp_dir().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("dashboard_probe_gw7_"));
    }

    #[test]
    fn test_test_folder_writes_readme() {
        let server = TestServer::attach("http://127.0.0.1:3000", "main").unwrap();
        let folder = server.test_folder("test_project").unwrap();
        let readme = std::fs::read_to_string(folder.join("README.md")).unwrap();
        assert_eq!(readme, TEST_README);
        assert!(folder.starts_with(server.temp_dir()));
    }

    #[tokio::test]
    async fn test_stop_removes_temp_dir_and_is_idempotent() {
        let server = TestServer::attach("http://127.0.0.1:3000", "main").unwrap();
        let path = server.temp_dir().to_path_buf();
        assert!(path.exists());

        server.stop().await.unwrap();
        assert!(!path.exists());
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_command_is_rejected() {
        let config = HarnessConfig::new().with_server_args(Vec::<String>::new());
        let result = TestServer::start(&config).await;
        assert!(matches!(result, Err(ProbeError::InvalidCommand(_))));
    }
}
