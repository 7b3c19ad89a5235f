//! Property-based tests for page aggregation.

#[cfg(test)]
mod tests {
    use crate::aggregator::{AggregateState, apply};
    use crate::types::{DeleteMarkerRecord, ObjectVersionRecord, Page};
    use proptest::prelude::*;

    // --- Generators ---

    fn arbitrary_version() -> impl Strategy<Value = ObjectVersionRecord> {
        (
            "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,2}",
            "[a-zA-Z0-9]{8,16}",
            any::<bool>(),
            0i64..=5_000_000_000,
        )
            .prop_map(|(key, version_id, is_latest, size_bytes)| ObjectVersionRecord {
                key,
                version_id,
                is_latest,
                size_bytes,
            })
    }

    fn arbitrary_delete_marker() -> impl Strategy<Value = DeleteMarkerRecord> {
        ("[a-z0-9]{1,8}", "[a-zA-Z0-9]{8,16}")
            .prop_map(|(key, version_id)| DeleteMarkerRecord { key, version_id })
    }

    fn arbitrary_page() -> impl Strategy<Value = Page> {
        (
            proptest::collection::vec(arbitrary_version(), 0..20),
            proptest::collection::vec(arbitrary_delete_marker(), 0..10),
        )
            .prop_map(|(versions, delete_markers)| Page {
                versions,
                delete_markers,
                is_truncated: false,
                next_cursor: None,
            })
    }

    proptest! {
        #[test]
        fn live_totals_never_exceed_version_totals(
            pages in proptest::collection::vec(arbitrary_page(), 0..10)
        ) {
            let mut state = AggregateState::default();
            for page in &pages {
                state = apply(state, page);
                prop_assert!(state.live_object_count <= state.version_count);
                prop_assert!(state.live_object_bytes <= state.version_bytes);
            }
            prop_assert_eq!(state.page_count, pages.len() as u64);
        }

        #[test]
        fn aggregation_is_order_independent(
            pages in proptest::collection::vec(arbitrary_page(), 0..10)
        ) {
            let forward = pages
                .iter()
                .fold(AggregateState::default(), apply);
            let backward = pages
                .iter()
                .rev()
                .fold(AggregateState::default(), apply);

            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn totals_are_never_decremented(
            first in arbitrary_page(),
            second in arbitrary_page(),
        ) {
            let after_first = apply(AggregateState::default(), &first);
            let after_second = apply(after_first, &second);

            prop_assert!(after_second.version_count >= after_first.version_count);
            prop_assert!(after_second.delete_marker_count >= after_first.delete_marker_count);
            prop_assert!(after_second.version_bytes >= after_first.version_bytes);
            prop_assert!(after_second.live_object_bytes >= after_first.live_object_bytes);
        }
    }
}
