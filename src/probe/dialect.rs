//! Ping output dialects.
//!
//! Success is decided by a plain substring match on a reply marker, and the
//! average round-trip time by a regular expression. Both depend on the ping
//! implementation, its version and the locale (a localized Windows prints
//! neither `Reply from` nor `Average`), so a probe on an unexpected platform
//! can misclassify. The markers are deliberately narrow and explicit.

use std::sync::OnceLock;

use regex::Regex;

/// Text format of a ping tool's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDialect {
    /// Windows `ping.exe` (English locale).
    Windows,
    /// iputils, BSD and busybox ping.
    Unix,
}

impl OutputDialect {
    /// Dialect of the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Substring that signals a received reply.
    pub fn reply_marker(&self) -> &'static str {
        match self {
            Self::Windows => "Reply from",
            Self::Unix => " bytes from ",
        }
    }

    /// Whether the output contains a reply.
    pub fn is_reply(&self, output: &str) -> bool {
        output.contains(self.reply_marker())
    }

    /// Extract the average round-trip time, verbatim with its unit
    /// (e.g. `12ms`, `0.052ms`).
    pub fn average_rtt(&self, output: &str) -> Option<String> {
        let caps = self.average_regex().captures(output)?;
        Some(format!("{}{}", &caps["avg"], &caps["unit"]))
    }

    fn average_regex(&self) -> &'static Regex {
        static WINDOWS_AVERAGE: OnceLock<Regex> = OnceLock::new();
        static UNIX_AVERAGE: OnceLock<Regex> = OnceLock::new();

        match self {
            Self::Windows => WINDOWS_AVERAGE.get_or_init(|| {
                Regex::new(r"Average = (?P<avg>\d+)(?P<unit>ms)")
                    .expect("failed to compile windows average regex")
            }),
            Self::Unix => UNIX_AVERAGE.get_or_init(|| {
                Regex::new(
                    r"min/avg/max(?:/(?:mdev|stddev))? = [\d.]+/(?P<avg>[\d.]+)/[\d.]+(?:/[\d.]+)? (?P<unit>ms)",
                )
                .expect("failed to compile unix average regex")
            }),
        }
    }
}
