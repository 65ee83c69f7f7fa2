use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use ratatui::style::Color;

pub const MAX_LOG_LINES: usize = 10_000;

/// A single captured output line. `system` marks lifecycle notices
/// (started / stopped / exited / restarting / failed to start).
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub process: String,
    pub text: String,
    pub color: Color,
    pub background: Color,
    pub timestamp: SystemTime,
    pub system: bool,
}

impl LogLine {
    pub fn output(process: &str, text: String, color: Color, background: Color) -> Self {
        Self {
            process: process.to_owned(),
            text,
            color,
            background,
            timestamp: SystemTime::now(),
            system: false,
        }
    }

    pub fn system(process: &str, text: String, color: Color, background: Color) -> Self {
        Self {
            process: process.to_owned(),
            text,
            color,
            background,
            timestamp: SystemTime::now(),
            system: true,
        }
    }
}

type Subscriber = Box<dyn Fn(&LogLine) + Send>;

struct StoreInner {
    global: VecDeque<LogLine>,
    per_process: HashMap<String, VecDeque<LogLine>>,
}

/// Bounded, append-only log sequences: one global, one per process name.
/// A single append lands in both sequences under one lock; each sequence
/// evicts its own oldest entries once `MAX_LOG_LINES` is exceeded.
#[derive(Clone)]
pub struct LogStore {
    inner: Arc<Mutex<StoreInner>>,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                global: VecDeque::new(),
                per_process: HashMap::new(),
            })),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn append(&self, line: LogLine) {
        {
            let mut inner = self.inner.lock().expect("log store lock");
            inner.global.push_back(line.clone());
            while inner.global.len() > MAX_LOG_LINES {
                inner.global.pop_front();
            }
            let buffer = inner.per_process.entry(line.process.clone()).or_default();
            buffer.push_back(line.clone());
            while buffer.len() > MAX_LOG_LINES {
                buffer.pop_front();
            }
        }
        // Data lock released first: subscribers may read the store.
        let subscribers = self.subscribers.lock().expect("subscriber lock");
        for subscriber in subscribers.iter() {
            subscriber(&line);
        }
    }

    /// Registers a callback invoked after each append has landed in both
    /// sequences.
    pub fn subscribe(&self, subscriber: impl Fn(&LogLine) + Send + 'static) {
        let mut subscribers = self.subscribers.lock().expect("subscriber lock");
        subscribers.push(Box::new(subscriber));
    }

    pub fn global_lines(&self) -> Vec<LogLine> {
        let inner = self.inner.lock().expect("log store lock");
        inner.global.iter().cloned().collect()
    }

    pub fn lines_for(&self, process: &str) -> Vec<LogLine> {
        let inner = self.inner.lock().expect("log store lock");
        inner
            .per_process
            .get(process)
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn global_len(&self) -> usize {
        self.inner.lock().expect("log store lock").global.len()
    }

    pub fn len_for(&self, process: &str) -> usize {
        let inner = self.inner.lock().expect("log store lock");
        inner
            .per_process
            .get(process)
            .map(VecDeque::len)
            .unwrap_or(0)
    }
}
