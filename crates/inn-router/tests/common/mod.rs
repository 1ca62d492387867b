#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use inn_router::{Controller, ControllerRegistry, Handler, PathParams};

/// Ordered record of every handler call.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    pub fn push(&self, label: &str, params: &PathParams) {
        let rendered: Vec<_> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.0
            .lock()
            .unwrap()
            .push(format!("{label}({})", rendered.join(",")));
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    /// A direct handler that records under `label`.
    pub fn handler(&self, label: &'static str) -> Handler {
        let calls = self.clone();
        Handler::direct(move |params| calls.push(label, params))
    }
}

/// Controller exposing a fixed list of actions.
pub struct Fixture {
    name: &'static str,
    actions: &'static [&'static str],
    calls: Calls,
}

impl Controller for Fixture {
    fn responds_to(&self, action: &str) -> bool {
        self.actions.contains(&action)
    }

    fn call(&mut self, action: &str, params: &PathParams) {
        self.calls.push(&format!("{}::{action}", self.name), params);
    }
}

/// Registers a [`Fixture`] controller under `name`.
pub fn register_fixture(
    registry: &mut ControllerRegistry,
    name: &'static str,
    actions: &'static [&'static str],
    calls: &Calls,
) {
    let calls = calls.clone();
    registry.register(name, move || Fixture {
        name,
        actions,
        calls: calls.clone(),
    });
}

/// Shared in-memory sink for formatted log output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a WARN-level subscriber and returns its output.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, buffer.contents())
}
