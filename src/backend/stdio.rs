//! Newline-delimited JSON channel to a helper subprocess.
//!
//! Requests are single JSON lines `{"id", "cmd", "params"}` on the child's
//! stdin; responses are single JSON lines `{"id", "result"}` or
//! `{"id", "error"}` on its stdout, answered in request order. The helper
//! owns the trace directory, blame computation, and the search index.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{LensError, Result};
use crate::model::Transcript;

use super::{
    AgentTouchedFiles, Backend, BlamedFile, ProjectFiles, SearchResults, TimelinePage,
    TraceScan, TranscriptPage,
};

#[derive(Serialize)]
struct Request<'a> {
    id: u64,
    cmd: &'a str,
    params: Value,
}

#[derive(serde::Deserialize)]
struct Response {
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

struct Channel {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    // Held so the helper is reaped when the backend is dropped.
    _child: Child,
}

/// A backend reached through a spawned helper subprocess.
pub struct StdioBackend {
    channel: Mutex<Channel>,
    next_id: AtomicU64,
}

impl StdioBackend {
    /// Spawn `program args...` and wire its stdio as the invocation channel.
    pub fn spawn(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next().ok_or(LensError::BackendUnavailable)?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LensError::io(format!("Failed to spawn backend '{program}'"), e))?;

        let stdin = child.stdin.take().ok_or_else(|| {
            LensError::io(
                "Backend stdin unavailable",
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "no stdin"),
            )
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            LensError::io(
                "Backend stdout unavailable",
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "no stdout"),
            )
        })?;

        Ok(Self {
            channel: Mutex::new(Channel {
                stdin,
                stdout: BufReader::new(stdout),
                _child: child,
            }),
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue one request and decode its response.
    async fn call<T: DeserializeOwned>(&self, cmd: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request { id, cmd, params };
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');

        let mut channel = self.channel.lock().await;
        channel
            .stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| LensError::io(format!("Failed to send '{cmd}' request"), e))?;
        channel
            .stdin
            .flush()
            .await
            .map_err(|e| LensError::io(format!("Failed to flush '{cmd}' request"), e))?;

        // Responses arrive in request order; skip any with a mismatched id
        // (a response to a request whose caller has already given up).
        loop {
            let mut buf = String::new();
            let n = channel
                .stdout
                .read_line(&mut buf)
                .await
                .map_err(|e| LensError::io(format!("Failed to read '{cmd}' response"), e))?;
            if n == 0 {
                return Err(LensError::request(cmd, "backend closed the channel"));
            }

            let response: Response = serde_json::from_str(buf.trim_end())?;
            if response.id != id {
                debug!(expected = id, got = response.id, "skipping out-of-order response");
                continue;
            }
            if let Some(message) = response.error {
                return Err(LensError::request(cmd, message));
            }
            let result = response.result.unwrap_or(Value::Null);
            return Ok(serde_json::from_value(result)?);
        }
    }
}

impl Backend for StdioBackend {
    async fn blame_file(&self, project_dir: &str, file_path: &str) -> Result<BlamedFile> {
        self.call(
            "blame_file",
            json!({ "project_dir": project_dir, "file_path": file_path }),
        )
        .await
    }

    async fn list_project_files(&self, project_dir: &str) -> Result<ProjectFiles> {
        self.call("list_project_files", json!({ "project_dir": project_dir }))
            .await
    }

    async fn list_agent_touched_files(&self, project_dir: &str) -> Result<AgentTouchedFiles> {
        self.call(
            "list_agent_touched_files",
            json!({ "project_dir": project_dir }),
        )
        .await
    }

    async fn scan_traces(&self, project_dir: Option<&str>) -> Result<TraceScan> {
        self.call("scan_traces", json!({ "project_dir": project_dir }))
            .await
    }

    async fn list_timeline(
        &self,
        project_dir: &str,
        limit: usize,
        skip_noise: bool,
    ) -> Result<TimelinePage> {
        self.call(
            "list_timeline",
            json!({
                "project_dir": project_dir,
                "limit": limit,
                "skip_noise": skip_noise,
            }),
        )
        .await
    }

    async fn list_transcripts(&self, project_dir: &str, limit: usize) -> Result<TranscriptPage> {
        self.call(
            "list_transcripts",
            json!({ "project_dir": project_dir, "limit": limit }),
        )
        .await
    }

    async fn get_transcript(&self, session_or_path: &str, project_dir: &str) -> Result<Transcript> {
        self.call(
            "get_transcript",
            json!({
                "session_or_path": session_or_path,
                "project_dir": project_dir,
            }),
        )
        .await
    }

    async fn search_transcripts(
        &self,
        project_dir: &str,
        query: &str,
        limit: usize,
    ) -> Result<SearchResults> {
        self.call(
            "search_transcripts",
            json!({
                "project_dir": project_dir,
                "query": query,
                "limit": limit,
            }),
        )
        .await
    }
}
