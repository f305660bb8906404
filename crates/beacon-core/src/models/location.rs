use serde::{Deserialize, Serialize};

/// The page the beacon runs on, as seen by the suppression rules.
///
/// `scheme` carries no trailing colon (`https`, `file`). IPv6 hostnames are
/// stored without brackets so `::1` reads the same as it does in a URL bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLocation {
    pub href: String,
    pub hostname: String,
    pub scheme: String,
}

impl PageLocation {
    pub fn new(
        href: impl Into<String>,
        hostname: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Self {
        let hostname = hostname.into();
        let hostname = hostname
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .map(str::to_string)
            .unwrap_or(hostname);
        Self {
            href: href.into(),
            hostname,
            scheme: scheme.into().trim_end_matches(':').to_ascii_lowercase(),
        }
    }

    /// Whether the page was loaded from the local filesystem.
    pub fn is_file(&self) -> bool {
        self.scheme == "file"
    }
}
