// Feed-side logging: records are buffered for the in-app logs window, and
// warnings or worse are echoed to stderr and appended to puppygram.log.
// A panic hook routes crashes into the same file.

use lazy_static::lazy_static;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::backtrace::Backtrace;
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

const LOG_FILE_NAME: &str = "puppygram.log";

#[derive(Clone)]
pub struct LogEntry {
    pub level: Level,
    pub when: String,
    pub target: String,
    pub msg: String,
    /// Record came from this crate rather than a dependency.
    pub from_app: bool,
}

impl LogEntry {
    /// Display target: crate-local targets lose the package prefix.
    pub fn short_target(&self) -> &str {
        self.target
            .strip_prefix(concat!(env!("CARGO_PKG_NAME"), "::"))
            .unwrap_or(&self.target)
    }

    pub fn to_line(&self) -> String {
        format!(
            "{} {:<5} {}: {}",
            self.when,
            self.level,
            self.short_target(),
            self.msg
        )
    }
}

/// Bounded entry buffer; once full, the oldest entries fall off and are
/// counted so the logs window can say how much scrolled away.
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    dropped: usize,
}

impl LogBuffer {
    const CAP: usize = 5000;

    fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            dropped: 0,
        }
    }

    fn push(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
        if self.entries.len() > Self::CAP {
            self.entries.pop_front();
            self.dropped += 1;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}

lazy_static! {
    static ref BUFFER: Mutex<LogBuffer> = Mutex::new(LogBuffer::new());
    static ref LOG_FILE: Mutex<Option<std::fs::File>> = Mutex::new(None);
}

static NEW_LOGS: AtomicBool = AtomicBool::new(false);

pub fn with_buffer<R>(f: impl FnOnce(&LogBuffer) -> R) -> R {
    let buf = BUFFER.lock().unwrap_or_else(PoisonError::into_inner);
    f(&buf)
}

pub fn clear() {
    BUFFER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
    NEW_LOGS.store(true, Ordering::Relaxed);
}

/// Returns true if new entries arrived since the last call.
pub fn take_new_flag() -> bool {
    NEW_LOGS.swap(false, Ordering::Relaxed)
}

fn is_app_target(target: &str) -> bool {
    target == env!("CARGO_PKG_NAME")
        || target.starts_with(concat!(env!("CARGO_PKG_NAME"), "::"))
}

struct FeedLogger;

impl Log for FeedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry {
            level: record.level(),
            when: clock(),
            target: record.target().to_string(),
            msg: record.args().to_string(),
            from_app: is_app_target(record.target()),
        };

        if entry.level <= Level::Warn {
            let line = entry.to_line();
            eprintln!("{line}");
            write_file_line(&line);
        }

        BUFFER
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        NEW_LOGS.store(true, Ordering::Relaxed);
    }

    fn flush(&self) {
        let mut lf = LOG_FILE.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(f) = lf.as_mut() {
            let _ = f.flush();
        }
    }
}

/// Install the logger and panic hook. RUST_LOG overrides the default level.
pub fn init() {
    let _ = log::set_boxed_logger(Box::new(FeedLogger));
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Debug);
    log::set_max_level(level);

    install_panic_hook();

    log::info!("logging at {level}, warnings persisted to {LOG_FILE_NAME}");
}

fn clock() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs() % 86_400;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        secs % 3600 / 60,
        secs % 60,
        now.subsec_millis()
    )
}

// The file is opened lazily on the first warning so a clean run leaves no
// stale empty log behind.
fn write_file_line(line: &str) {
    let mut lf = LOG_FILE.lock().unwrap_or_else(PoisonError::into_inner);
    if lf.is_none() {
        *lf = OpenOptions::new()
            .create(true)
            .append(true)
            .open(LOG_FILE_NAME)
            .ok();
    }
    if let Some(f) = lf.as_mut() {
        let _ = writeln!(f, "{line}");
        let _ = f.flush();
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let msg = info.payload_as_str().unwrap_or("non-string panic payload");
        let loc = info
            .location()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let bt = Backtrace::force_capture();
        write_file_line(&format!("{} PANIC {loc}: {msg}", clock()));
        for line in bt.to_string().lines() {
            write_file_line(line);
        }

        log::error!("panic at {loc}: {msg}");
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(target: &str, msg: &str) -> LogEntry {
        LogEntry {
            level: Level::Info,
            when: "00:00:00.000".to_string(),
            target: target.to_string(),
            msg: msg.to_string(),
            from_app: is_app_target(target),
        }
    }

    #[test]
    fn buffer_drops_oldest_past_capacity() {
        let mut buf = LogBuffer::new();
        for i in 0..LogBuffer::CAP + 3 {
            buf.push(entry("puppygram::feed", &i.to_string()));
        }
        assert_eq!(buf.len(), LogBuffer::CAP);
        assert_eq!(buf.dropped(), 3);
        assert_eq!(buf.iter().next().unwrap().msg, "3");
    }

    #[test]
    fn clear_resets_dropped_count() {
        let mut buf = LogBuffer::new();
        for i in 0..LogBuffer::CAP + 1 {
            buf.push(entry("puppygram", &i.to_string()));
        }
        buf.clear();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.dropped(), 0);
    }

    #[test]
    fn app_targets_are_flagged_and_shortened() {
        let e = entry("puppygram::app::fetch", "hi");
        assert!(e.from_app);
        assert_eq!(e.short_target(), "app::fetch");

        let dep = entry("wgpu_core::device", "hi");
        assert!(!dep.from_app);
        assert_eq!(dep.short_target(), "wgpu_core::device");

        assert!(is_app_target("puppygram"));
        assert!(!is_app_target("puppygram_extras"));
    }
}
