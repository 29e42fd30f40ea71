use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// One-shot request/response client for the player's JSON IPC socket.
///
/// Every query opens a fresh connection, sends a single `get_property`
/// request and reads until the matching response line arrives or the
/// timeout budget is spent. All failure modes (socket not there yet,
/// timeout, unparseable or error response) mean "no data this tick" and
/// come back as `None`; the client never fails the caller.
pub struct IpcClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl IpcClient {
    pub fn new(socket_path: PathBuf, timeout: Duration) -> Self {
        Self {
            socket_path,
            timeout,
        }
    }

    /// Query one property value.
    pub fn query(&self, property: &str) -> Option<serde_json::Value> {
        if !self.socket_path.exists() {
            return None;
        }

        let stream = UnixStream::connect(&self.socket_path).ok()?;
        stream.set_read_timeout(Some(self.timeout)).ok()?;
        stream.set_write_timeout(Some(self.timeout)).ok()?;

        let mut request = request_line(property);
        request.push('\n');
        let mut writer = &stream;
        writer.write_all(request.as_bytes()).ok()?;

        // The player interleaves event lines with replies; scan until the
        // first object that carries an "error" status, within the budget.
        let deadline = Instant::now() + self.timeout;
        let mut reader = BufReader::new(&stream);
        let mut line = String::new();
        while Instant::now() < deadline {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {
                    if let Some(value) = parse_response(&line) {
                        return value;
                    }
                }
            }
        }
        None
    }

    /// Query a property expected to be numeric.
    pub fn query_f64(&self, property: &str) -> Option<f64> {
        self.query(property)?.as_f64()
    }
}

/// Serialize one `get_property` request frame (without trailing newline).
pub(super) fn request_line(property: &str) -> String {
    serde_json::json!({ "command": ["get_property", property] }).to_string()
}

/// Interpret one response line.
///
/// Returns `None` for lines that are not replies (events, garbage), and
/// `Some(result)` for replies: the payload on success, `Some(None)` on an
/// error status.
pub(super) fn parse_response(line: &str) -> Option<Option<serde_json::Value>> {
    let value: serde_json::Value = serde_json::from_str(line.trim()).ok()?;
    let status = value.get("error")?.as_str()?;
    if status == "success" {
        Some(Some(value.get("data").cloned().unwrap_or(serde_json::Value::Null)))
    } else {
        Some(None)
    }
}
