//! Local/development page detection.
//!
//! The loopback patterns are loose: octets are not range checked and the
//! IPv6 form accepts any run of zero groups ending in `1`.

use std::sync::LazyLock;

use regex::Regex;

use beacon_core::models::PageLocation;

macro_rules! host_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

host_pattern!(RE_LOCALHOST, r"^localhost$");

// `127` followed by one to four dot-separated decimal runs.
host_pattern!(RE_IPV4_LOOPBACK, r"^127(?:\.[0-9]+){0,3}\.[0-9]+$");

// Leading zero groups, then a final `1`: `::1`, `0:0:0:0:0:0:0:1`, `0::1`.
host_pattern!(RE_IPV6_LOOPBACK, r"^(?:0*:)*?:?0*1$");

/// All hostname patterns, for health checks.
pub fn all_patterns() -> [(&'static str, &'static LazyLock<Option<Regex>>); 3] {
    [
        ("localhost", &RE_LOCALHOST),
        ("ipv4_loopback", &RE_IPV4_LOOPBACK),
        ("ipv6_loopback", &RE_IPV6_LOOPBACK),
    ]
}

/// Whether `hostname` names the local machine.
pub fn is_local_hostname(hostname: &str) -> bool {
    all_patterns()
        .iter()
        .any(|(_, re)| re.as_ref().is_some_and(|re| re.is_match(hostname)))
}

/// Whether the page runs locally: a local hostname or a `file:` page.
pub fn is_local_page(location: &PageLocation) -> bool {
    is_local_hostname(&location.hostname) || location.is_file()
}
