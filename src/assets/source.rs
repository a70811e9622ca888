use std::io::Read;
use std::path::Path;
use std::time::Duration;

use crate::foundation::error::{GridError, GridResult};

/// Upper bound on a downloaded image body.
const MAX_REMOTE_BYTES: u64 = 32 * 1024 * 1024;

/// Decode an image file from the local filesystem.
///
/// Missing or undecodable files are [`GridError::Asset`].
pub fn load_local(path: &Path) -> GridResult<image::DynamicImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| GridError::asset(format!("open image '{}': {e}", path.display())))?;
    image::load_from_memory(&bytes)
        .map_err(|e| GridError::asset(format!("decode image '{}': {e}", path.display())))
}

/// Options for remote image downloads.
#[derive(Clone, Debug, Default)]
pub struct FetchOpts {
    /// Overall request timeout; `None` waits as long as the server keeps the connection open.
    pub timeout: Option<Duration>,
}

impl FetchOpts {
    /// Build an HTTP agent with these options. Clones share one connection pool.
    pub fn agent(&self) -> ureq::Agent {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        builder.build()
    }
}

/// Download and decode an image over HTTP(S) through `agent`.
///
/// Every failure (connect, status, body, decode) is [`GridError::Transient`].
pub fn fetch_remote(agent: &ureq::Agent, url: &str) -> GridResult<image::DynamicImage> {
    let resp = agent
        .get(url)
        .call()
        .map_err(|e| GridError::transient(format!("fetch '{url}': {e}")))?;

    let mut bytes = Vec::new();
    resp.into_reader()
        .take(MAX_REMOTE_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| GridError::transient(format!("read body of '{url}': {e}")))?;

    image::load_from_memory(&bytes)
        .map_err(|e| GridError::transient(format!("decode image from '{url}': {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
