//! `tracing` output routed to the browser console.

use std::io;

use tracing::Level;
use wasm_bindgen::JsValue;

/// Buffers one formatted event and hands it to `console.log` on flush.
#[derive(Default)]
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let line = String::from_utf8_lossy(&self.buf);
            web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
            self.buf.clear();
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: Level) {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter::default)
        .with_max_level(level)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
    if installed.is_ok() {
        tracing::debug!(%level, "console logging ready");
    }
}
