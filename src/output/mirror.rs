use std::io::Cursor;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;

use image::{Rgba, RgbaImage};

use crate::foundation::core::{BLACK, Canvas, PixelRect};
use crate::foundation::error::{GridError, GridResult};
use crate::output::surface::copy_block;

/// Seconds browsers are told to wait before reloading the mirror page.
pub const MIRROR_REFRESH_SECS: u32 = 60;

/// Second copy of the composited frame, readable while cells keep rendering.
///
/// Writers hold the write lock only for one cell-sized copy; readers take the read lock for a
/// full-frame clone.
pub struct MirrorFrame {
    canvas: Canvas,
    frame: RwLock<RgbaImage>,
}

impl MirrorFrame {
    /// Create a black mirror frame.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            frame: RwLock::new(RgbaImage::from_pixel(canvas.width, canvas.height, Rgba(BLACK))),
        }
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Copy a cell block into the mirror (same contract as the output surface write).
    pub fn write_rect(&self, rect: PixelRect, pixels: &RgbaImage) -> GridResult<()> {
        let mut frame = self
            .frame
            .write()
            .map_err(|_| GridError::render("mirror lock poisoned"))?;
        copy_block(&mut frame, rect, pixels);
        Ok(())
    }

    /// Copy of the latest frame.
    pub fn snapshot(&self) -> GridResult<RgbaImage> {
        let frame = self
            .frame
            .read()
            .map_err(|_| GridError::render("mirror lock poisoned"))?;
        Ok(frame.clone())
    }

    /// Latest frame encoded as PNG.
    pub fn encode_png(&self) -> GridResult<Vec<u8>> {
        let frame = self.snapshot()?;
        let mut buf = Vec::new();
        frame
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| GridError::render(format!("encode mirror frame: {e}")))?;
        Ok(buf)
    }
}

/// HTTP server answering every request with the latest mirror frame as a PNG.
///
/// The server runs on its own thread and stops when dropped.
pub struct MirrorServer {
    server: Arc<tiny_http::Server>,
    addr: SocketAddr,
    worker: Option<JoinHandle<()>>,
}

impl MirrorServer {
    /// Bind `addr` and start serving `frame`.
    pub fn start(addr: impl ToSocketAddrs, frame: Arc<MirrorFrame>) -> GridResult<Self> {
        let server = tiny_http::Server::http(addr)
            .map_err(|e| GridError::device(format!("bind mirror server: {e}")))?;
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| GridError::device("mirror server is not bound to an IP address"))?;
        let server = Arc::new(server);

        let worker = std::thread::Builder::new()
            .name("mirror-http".to_string())
            .spawn({
                let server = Arc::clone(&server);
                move || serve(&server, &frame)
            })
            .map_err(|e| GridError::device(format!("spawn mirror server thread: {e}")))?;

        tracing::info!(%addr, "mirror server listening");
        Ok(Self {
            server,
            addr,
            worker: Some(worker),
        })
    }

    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for MirrorServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn serve(server: &tiny_http::Server, frame: &MirrorFrame) {
    let refresh = MIRROR_REFRESH_SECS.to_string();
    for request in server.incoming_requests() {
        tracing::debug!(url = request.url(), "mirror request");
        let result = match frame.encode_png() {
            Ok(png) => {
                let mut response = tiny_http::Response::from_data(png);
                for (name, value) in [
                    ("Content-Type", "image/png"),
                    ("Cache-Control", "no-cache"),
                    ("Refresh", refresh.as_str()),
                ] {
                    if let Ok(h) = tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                        response.add_header(h);
                    }
                }
                request.respond(response)
            }
            Err(e) => {
                tracing::error!(error = %e, "mirror frame unavailable");
                request.respond(tiny_http::Response::from_string(e.to_string()).with_status_code(500))
            }
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "mirror response failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/mirror.rs"]
mod tests;
