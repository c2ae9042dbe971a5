use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::Mutex;

const MAX_LOG_LINES: usize = 50;

macro_rules! debug_eprintln {
    ($($arg:tt)*) => {
        if $crate::diagnostics::enabled() {
            eprintln!($($arg)*);
        }
    };
}

pub fn enabled() -> bool {
    std::env::var("PRABHU_DEBUG").is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Request,
    Answer,
    Failure,
    Ui,
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub text: String,
    pub kind: Kind,
}

struct Ring {
    entries: VecDeque<Entry>,
    capacity: usize,
}

impl Ring {
    fn with_capacity(capacity: usize) -> Self {
        Ring {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, entry: Entry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn recent(&self, n: usize) -> Vec<Entry> {
        let len = self.entries.len();
        let take = n.min(len);
        self.entries.iter().skip(len - take).cloned().collect()
    }
}

static DIAGNOSTIC_LOG: Lazy<Mutex<Ring>> = Lazy::new(|| Mutex::new(Ring::with_capacity(MAX_LOG_LINES)));

/// Failures always reach stderr; everything else only with `PRABHU_DEBUG` set.
pub fn log_with<T: Into<String>>(kind: Kind, line: T) {
    let text = line.into();
    if kind == Kind::Failure {
        eprintln!("[{:?}] {}", kind, text);
    } else {
        debug_eprintln!("[{:?}] {}", kind, text);
    }
    if let Ok(mut ring) = DIAGNOSTIC_LOG.lock() {
        ring.push(Entry { text, kind });
    }
}

pub fn recent(n: usize) -> Vec<Entry> {
    if let Ok(ring) = DIAGNOSTIC_LOG.lock() {
        ring.recent(n)
    } else {
        Vec::new()
    }
}

pub fn clear() {
    if let Ok(mut ring) = DIAGNOSTIC_LOG.lock() {
        ring.clear();
    }
}
