//! Property tests for hostname classification.

use beacon_tracker::locality::is_local_hostname;
use proptest::prelude::*;

proptest! {
    #[test]
    fn loopback_ipv4_forms_are_local(octets in prop::collection::vec(0u32..1000, 1..=4)) {
        let host = std::iter::once("127".to_string())
            .chain(octets.iter().map(u32::to_string))
            .collect::<Vec<_>>()
            .join(".");
        prop_assert!(is_local_hostname(&host), "{}", host);
    }

    #[test]
    fn other_leading_octets_are_not_local(
        first in (0u32..1000).prop_filter("not 127", |n| *n != 127),
        rest in prop::collection::vec(0u32..256, 3),
    ) {
        let host = format!("{}.{}.{}.{}", first, rest[0], rest[1], rest[2]);
        prop_assert!(!is_local_hostname(&host), "{}", host);
    }

    #[test]
    fn dns_names_are_not_local(label in "[a-z][a-z0-9-]{0,15}", tld in "(com|org|net|io|dev)") {
        let host = format!("{label}.{tld}");
        prop_assert!(!is_local_hostname(&host), "{}", host);
    }

    #[test]
    fn suffixed_loopback_names_are_not_local(suffix in "\\.[a-z]{1,10}") {
        let localhost = format!("localhost{}", suffix);
        let loopback = format!("127.0.0.1{}", suffix);
        prop_assert!(!is_local_hostname(&localhost));
        prop_assert!(!is_local_hostname(&loopback));
    }

    #[test]
    fn zero_padded_ipv6_loopback_is_local(zero_groups in 0usize..7) {
        let host = format!("{}::1", vec!["0"; zero_groups].join(":"));
        prop_assert!(is_local_hostname(&host), "{}", host);
    }
}
