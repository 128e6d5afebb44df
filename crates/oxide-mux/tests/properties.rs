//! Property tests for path cleaning.

use oxide_mux::clean_path;
use proptest::prelude::*;

fn raw_path() -> impl Strategy<Value = String> {
    let part = prop_oneof![
        Just(String::new()),
        Just(".".to_string()),
        Just("..".to_string()),
        "[a-z]{1,4}",
    ];
    prop::collection::vec(part, 0..8).prop_map(|parts| parts.join("/"))
}

proptest! {
    #[test]
    fn cleaning_is_idempotent(path in raw_path()) {
        let cleaned = clean_path(&path);
        prop_assert_eq!(clean_path(&cleaned), cleaned);
    }

    #[test]
    fn cleaned_path_is_rooted_without_dots(path in raw_path()) {
        let cleaned = clean_path(&path);
        prop_assert!(cleaned.starts_with('/'));
        prop_assert!(!cleaned.contains("//"));
        for part in cleaned.split('/') {
            prop_assert!(part != "." && part != "..");
        }
    }
}
