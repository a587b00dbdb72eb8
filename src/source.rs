//! Retrieval of raw text for the two input tables.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use crate::data::parser::ParseError;
use crate::error::AcquisitionError;

/// Something that can turn a location into the text stored there.
pub trait TextSource {
    fn fetch_text(&self, location: &str) -> Result<String, AcquisitionError>;
}

// ---------------------------------------------------------------------------
// Fetcher – HTTP(S) and local files
// ---------------------------------------------------------------------------

/// Reads `http://` / `https://` locations over the network and anything else
/// (a plain path or a `file://` URL) from disk.
pub struct Fetcher {
    agent: ureq::Agent,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Fetcher {
    /// `timeout` bounds each whole request; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Fetcher {
            agent: builder.build(),
        }
    }

    fn fetch_http(&self, url: &str) -> Result<String, AcquisitionError> {
        let resp = match self.agent.get(url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(404 | 410, _)) => {
                return Err(AcquisitionError::not_found(url));
            }
            Err(ureq::Error::Status(code, resp)) => {
                return Err(AcquisitionError::unreachable(
                    url,
                    format!("HTTP {code} {}", resp.status_text()),
                ));
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(AcquisitionError::unreachable(url, err));
            }
        };

        // `into_string` caps the body size; the sensor file can be larger.
        let mut bytes = Vec::new();
        resp.into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| AcquisitionError::unreachable(url, e))?;
        String::from_utf8(bytes).map_err(|_| AcquisitionError::malformed(url, ParseError::NotUtf8))
    }

    fn fetch_file(&self, location: &str) -> Result<String, AcquisitionError> {
        let path = local_path(location)?;
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AcquisitionError::not_found(location),
            std::io::ErrorKind::InvalidData => {
                AcquisitionError::malformed(location, ParseError::NotUtf8)
            }
            _ => AcquisitionError::unreachable(location, e),
        })
    }
}

impl TextSource for Fetcher {
    fn fetch_text(&self, location: &str) -> Result<String, AcquisitionError> {
        if is_http(location) {
            self.fetch_http(location)
        } else {
            self.fetch_file(location)
        }
    }
}

fn is_http(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Filesystem path for a plain path or a `file://` URL. URLs may name the
/// empty host or `localhost`; their path is percent-decoded.
fn local_path(location: &str) -> Result<PathBuf, AcquisitionError> {
    let Some(rest) = location.strip_prefix("file://") else {
        return Ok(PathBuf::from(location));
    };
    let path = rest.strip_prefix("localhost").unwrap_or(rest);
    if !path.starts_with('/') {
        return Err(AcquisitionError::unreachable(
            location,
            "file URLs must name a local absolute path",
        ));
    }
    percent_decode(path)
        .map(PathBuf::from)
        .ok_or_else(|| AcquisitionError::unreachable(location, "invalid percent-encoding"))
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
