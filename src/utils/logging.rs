//! Structured Logging with Sensitive Data Redaction
//!
//! Log lines go to stderr and never carry key material:
//! - Private scalars and nonces are fully redacted
//! - Digests, points and signatures are shortened to a prefix and suffix
//!
//! Debug output is off until [`enable_debug`] is called.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag to enable/disable debug logging
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Warn,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Warn => write!(f, "WARN"),
        }
    }
}

/// Structured log entry
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the log entry (auto-redacts sensitive data)
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let value_str = value.to_string();
        let redacted = redact_if_sensitive(key, &value_str);
        self.fields.push((key, redacted));
        self
    }

    pub fn render(&self) -> String {
        let fields_str = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");

        if fields_str.is_empty() {
            format!("[{}] {} [{}] {}", timestamp, self.level, self.module, self.message)
        } else {
            format!(
                "[{}] {} [{}] {} | {}",
                timestamp, self.level, self.module, self.message, fields_str
            )
        }
    }

    /// Log the entry
    pub fn log(self) {
        // Skip debug logs if not enabled
        if self.level == LogLevel::Debug && !is_debug_enabled() {
            return;
        }
        eprintln!("{}", self.render());
    }
}

/// Redact a value if the key suggests it's sensitive
fn redact_if_sensitive(key: &str, value: &str) -> String {
    let key_lower = key.to_lowercase();

    // Keys that should always be fully redacted
    let fully_redacted_keys = ["secret", "scalar", "nonce", "private", "seed"];

    for sensitive_key in &fully_redacted_keys {
        if key_lower.contains(sensitive_key) {
            return redact_value(value);
        }
    }

    let hex_keys = ["digest", "point", "signature"];
    for hex_key in &hex_keys {
        if key_lower.contains(hex_key) {
            return shorten_hex(value);
        }
    }

    value.to_string()
}

/// Fully redact a sensitive value
fn redact_value(value: &str) -> String {
    if value.is_empty() {
        return "[EMPTY]".to_string();
    }

    let len = value.len();
    if len <= 4 {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED:{}chars]", len)
    }
}

/// Show the first 8 and last 4 hex digits of a long value
fn shorten_hex(value: &str) -> String {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }
    if trimmed.len() <= 16 || !trimmed.is_ascii() {
        return trimmed.to_string();
    }

    let prefix = &trimmed[..8];
    let suffix = &trimmed[trimmed.len() - 4..];

    format!("{}...{}", prefix, suffix)
}

/// Build and emit a [`LogEntry`] at the given level
#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($level:ident, $module:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::$level,
            $module,
            $msg,
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

/// `log_debug!("module", "message", key = value, ...)`
#[macro_export]
macro_rules! log_debug {
    ($($args:tt)*) => {
        $crate::log_at!(Debug, $($args)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($args:tt)*) => {
        $crate::log_at!(Warn, $($args)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_value() {
        assert_eq!(redact_value(""), "[EMPTY]");
        assert_eq!(redact_value("abc"), "[REDACTED]");
        assert_eq!(redact_value("5ec8420bd6ef9252"), "[REDACTED:16chars]");
    }

    #[test]
    fn test_shorten_hex() {
        let digest = "a9993e364706816aba3e25717850c26c9cd0d89d";
        assert_eq!(shorten_hex(digest), "a9993e36...d89d");
        assert_eq!(shorten_hex("00ff"), "00ff");
    }

    #[test]
    fn test_redact_if_sensitive() {
        assert!(redact_if_sensitive("private_scalar", "5ec8420bd6ef").contains("REDACTED"));
        assert!(redact_if_sensitive("nonce", "1234567890abcdef").contains("REDACTED"));
        assert!(redact_if_sensitive("digest", "a9993e364706816aba3e25717850c26c").contains("..."));
        assert_eq!(redact_if_sensitive("curve", "NIST192p"), "NIST192p");
    }

    #[test]
    fn test_log_entry() {
        let entry = LogEntry::new(LogLevel::Warn, "test", "Test message")
            .field("attempt", 2)
            .field("secret", "5ec8420bd6ef9252a942e989")
            .field("point", hex::encode([0x04u8; 49]));

        let secret = entry.fields.iter().find(|(k, _)| *k == "secret").unwrap();
        assert!(secret.1.contains("REDACTED"));

        let point = entry.fields.iter().find(|(k, _)| *k == "point").unwrap();
        assert_eq!(point.1, "04040404...0404");

        let line = entry.render();
        assert!(line.contains("WARN [test] Test message | attempt=2"));
        assert!(!line.contains("5ec8420b"));
    }

    #[test]
    fn test_digest_field_is_shortened() {
        let digest = [0xabu8; 32];
        let entry = LogEntry::new(LogLevel::Debug, "keys", "signature rejected")
            .field("curve", "NIST192p")
            .field("digest", hex::encode(digest));
        assert_eq!(entry.fields[1].1, "abababab...abab");
        assert!(!entry.render().contains(&hex::encode(digest)));

        crate::log_debug!("keys", "signature rejected", curve = "NIST192p", digest = hex::encode(digest));
    }
}
