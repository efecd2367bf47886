//! The shared OrderedMap contract, run against both tree variants.
//!
//! Every case is generated once per variant so the two implementations
//! cannot drift apart.

use ordtree::{
    BinarySearchTree, MapConfig, MapError, NullValuePolicy, OrderedMap, RedBlackTree,
    TraversalOrder,
};
use rstest::rstest;
use std::io;
use std::sync::{Arc, Mutex};

const LETTERS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("ordtree=trace"))
        .with_test_writer()
        .try_init();
}

/// Collects formatted events in memory.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("poisoned buffer"))?
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `action` under a trace-level subscriber and returns what it logged.
fn capture_trace(action: impl FnOnce()) -> String {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, action);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

/// A fixed permutation of `0..count` that defeats sorted input.
fn shuffled(count: usize) -> Vec<usize> {
    (0..count).map(|index| (index * 37 + 11) % count).collect()
}

macro_rules! contract_suite {
    ($prefix:ident, $map:ident) => {
        paste::paste! {
            // =================================================================
            // Scenarios
            // =================================================================

            #[rstest]
            fn [<test_ $prefix _put_then_get>]() {
                init_tracing();
                let mut map: $map<&str, &str> = $map::new();
                assert_eq!(map.put("A", "1"), Ok(true));
                assert_eq!(map.get("A"), Ok(Some(&"1")));
                assert_eq!(map.len(), 1);
            }

            #[rstest]
            fn [<test_ $prefix _put_keeps_existing_value>]() {
                let mut map: $map<&str, &str> = $map::new();
                for (key, value) in [("X", "1"), ("Y", "2"), ("Z", "3")] {
                    assert_eq!(map.put(key, value), Ok(true));
                }
                assert_eq!(map.put("X", "4"), Ok(false));
                assert_eq!(map.len(), 3);
                assert_eq!(map.get("X"), Ok(Some(&"1")));
            }

            #[rstest]
            fn [<test_ $prefix _remove_inner_node>]() {
                init_tracing();
                let mut map: $map<&str, usize> = $map::new();
                for (index, key) in ["T", "N", "A", "7", "B", "O", "Z"].into_iter().enumerate() {
                    map.put(key, index).unwrap();
                }
                assert_eq!(map.remove("T"), Ok(true));
                assert_eq!(map.len(), 6);
                assert_eq!(map.keys(), vec![&"7", &"A", &"B", &"N", &"O", &"Z"]);
                assert!(map.check_invariants().is_ok());
            }

            #[rstest]
            #[case::ascending(LETTERS.to_vec())]
            #[case::descending(LETTERS.iter().rev().copied().collect())]
            #[case::interleaved(LETTERS.iter().step_by(2).chain(LETTERS.iter().skip(1).step_by(2)).copied().collect())]
            fn [<test_ $prefix _keys_are_sorted_for_any_insertion_order>](#[case] order: Vec<&'static str>) {
                let mut map: $map<&str, ()> = $map::new();
                for key in order {
                    map.put(key, ()).unwrap();
                }
                assert_eq!(map.keys(), LETTERS.iter().collect::<Vec<_>>());
                assert_eq!(map.traverse(TraversalOrder::InOrder), LETTERS.iter().collect::<Vec<_>>());
            }

            #[rstest]
            fn [<test_ $prefix _absent_key_is_rejected>]() {
                init_tracing();
                let mut map: $map<&str, &str> = $map::new();
                map.put("A", "1").unwrap();

                assert_eq!(map.get(None::<&str>), Err(MapError::invalid_argument("get")));
                assert!(map.put(None, "v").unwrap_err().is_invalid_argument());
                assert!(map.set(None, "v").unwrap_err().is_invalid_argument());
                assert!(map.replace(None, "v").unwrap_err().is_invalid_argument());
                assert!(map.remove(None::<&str>).unwrap_err().is_invalid_argument());
                assert!(map.contains_key(None::<&str>).unwrap_err().is_invalid_argument());
                assert!(map.rank(None::<&str>).unwrap_err().is_invalid_argument());
                assert_eq!(map.len(), 1);
            }

            // =================================================================
            // Mutations
            // =================================================================

            #[rstest]
            fn [<test_ $prefix _set_overwrites_and_replace_requires_presence>]() {
                let mut map: $map<&str, i32> = $map::new();
                map.set("k", 1).unwrap();
                map.set("k", 2).unwrap();
                assert_eq!(map.get("k"), Ok(Some(&2)));
                assert_eq!(map.replace("k", 3), Ok(true));
                assert_eq!(map.replace("missing", 3), Ok(false));
                assert_eq!(map.get("k"), Ok(Some(&3)));
                assert_eq!(map.len(), 1);
            }

            #[rstest]
            fn [<test_ $prefix _remove_missing_is_a_no_op>]() {
                let mut map: $map<i32, i32> = [(1, 1), (2, 2)].into_iter().collect();
                assert_eq!(map.remove(&9), Ok(false));
                assert_eq!(map.len(), 2);

                let mut empty: $map<i32, i32> = $map::new();
                assert_eq!(empty.remove(&1), Ok(false));
            }

            #[rstest]
            fn [<test_ $prefix _remove_every_key_in_shuffled_order>]() {
                let mut map: $map<usize, usize> = shuffled(200).into_iter().map(|key| (key, key * 3)).collect();
                for (removed, key) in shuffled(200).into_iter().rev().enumerate() {
                    assert_eq!(map.remove(&key), Ok(true));
                    assert_eq!(map.len(), 199 - removed);
                    assert_eq!(map.get(&key), Ok(None));
                    assert!(map.check_invariants().is_ok());
                }
                assert!(map.is_empty());
            }

            #[rstest]
            fn [<test_ $prefix _remove_extremes>]() {
                let mut map: $map<i32, &str> = [(2, "b"), (1, "a"), (3, "c")].into_iter().collect();
                assert_eq!(map.remove_min(), Ok((1, Some("a"))));
                assert_eq!(map.remove_max(), Ok((3, Some("c"))));
                assert_eq!(map.remove_max(), Ok((2, Some("b"))));
                assert_eq!(map.remove_min(), Err(MapError::empty_collection("remove_min")));
                assert!(map.remove_max().unwrap_err().is_empty_collection());
            }

            #[rstest]
            fn [<test_ $prefix _extreme_removals_are_traced>]() {
                let output = capture_trace(|| {
                    let mut map: $map<i32, i32> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
                    map.remove_min().unwrap();
                    map.remove_max().unwrap();
                });
                assert!(output.contains("remove_min"), "{output}");
                assert!(output.contains("remove_max"), "{output}");
            }

            #[rstest]
            fn [<test_ $prefix _clear_then_reuse>]() {
                let mut map: $map<usize, usize> = (0..100).map(|key| (key, key)).collect();
                map.clear();
                assert!(map.is_empty());
                assert_eq!(map.min(), None);
                map.put(5, 5).unwrap();
                assert_eq!(map.keys(), vec![&5]);
            }

            // =================================================================
            // Null Value Policies
            // =================================================================

            #[rstest]
            fn [<test_ $prefix _absent_value_removes_by_default>]() {
                let mut map: $map<&str, i32> = $map::new();
                map.put("a", 1).unwrap();
                map.put("b", 2).unwrap();

                map.set("a", None).unwrap();
                assert_eq!(map.keys(), vec![&"b"]);
                assert_eq!(map.put("c", None), Ok(false));
                assert_eq!(map.len(), 1);
            }

            #[rstest]
            fn [<test_ $prefix _absent_value_is_stored_when_overwriting>]() {
                let config = MapConfig::new().with_null_value_policy(NullValuePolicy::Overwrite);
                let mut map: $map<&str, i32> = $map::with_config(config);
                assert_eq!(map.put("a", None), Ok(true));
                map.put("b", 2).unwrap();

                assert_eq!(map.get("a"), Ok(None));
                assert_eq!(map.contains_key("a"), Ok(false));
                assert_eq!(map.len(), 2);
                assert_eq!(map.keys(), vec![&"a", &"b"]);
                assert_eq!(map.values(), vec![&2]);
                assert_eq!(map.config().on_null_value, NullValuePolicy::Overwrite);
            }

            #[rstest]
            fn [<test_ $prefix _replace_with_absent_value_removes>]() {
                let mut map: $map<&str, i32> = [("m", 1), ("k", 2), ("x", 3), ("a", 4)].into_iter().collect();

                assert_eq!(map.replace("k", None), Ok(true));
                assert_eq!(map.replace("k", None), Ok(false));
                assert_eq!(map.get("k"), Ok(None));
                assert_eq!(map.keys(), vec![&"a", &"m", &"x"]);
                assert!(map.check_invariants().is_ok());
            }

            #[rstest]
            fn [<test_ $prefix _put_absent_value_on_existing_key_removes>]() {
                let mut map: $map<usize, usize> = shuffled(32).into_iter().map(|key| (key, key)).collect();

                for key in (0..32).step_by(3) {
                    assert_eq!(map.put(key, None), Ok(false));
                    assert_eq!(map.contains_key(&key), Ok(false));
                    assert!(map.check_invariants().is_ok());
                }
                assert_eq!(map.len(), 21);
                assert_eq!(map.select(0), Some(&1));
            }

            // =================================================================
            // Order Statistics
            // =================================================================

            #[rstest]
            fn [<test_ $prefix _select_and_rank_agree>]() {
                let map: $map<usize, ()> = shuffled(64).into_iter().map(|key| (key * 2, ())).collect();
                for rank in 0..64 {
                    let key = *map.select(rank).unwrap();
                    assert_eq!(key, rank * 2);
                    assert_eq!(map.rank(&key), Ok(rank));
                    assert_eq!(map.rank(&(key + 1)), Ok(rank + 1));
                }
                assert_eq!(map.select(64), None);
                assert_eq!(map.min().map(|(key, _)| *key), Some(0));
                assert_eq!(map.max().map(|(key, _)| *key), Some(126));
            }

            // =================================================================
            // Iteration and Formatting
            // =================================================================

            #[rstest]
            fn [<test_ $prefix _iterators_yield_sorted_entries>]() {
                let map: $map<i32, char> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
                let borrowed: Vec<(i32, char)> = (&map)
                    .into_iter()
                    .map(|(key, value)| (*key, *value.unwrap()))
                    .collect();
                assert_eq!(borrowed, vec![(1, 'a'), (2, 'b'), (3, 'c')]);
                assert_eq!(map.iter().len(), 3);

                let owned: Vec<(i32, Option<char>)> = map.into_iter().collect();
                assert_eq!(owned, vec![(1, Some('a')), (2, Some('b')), (3, Some('c'))]);
            }

            #[rstest]
            fn [<test_ $prefix _display_and_equality>]() {
                let left: $map<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();
                let right: $map<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
                assert_eq!(left.to_string(), "{1: one, 2: two}");
                assert_eq!(left, right);
                assert_eq!(format!("{left:?}"), r#"{1: Some("one"), 2: Some("two")}"#);
            }

            #[rstest]
            fn [<test_ $prefix _clone_is_independent>]() {
                let original: $map<i32, i32> = (0..10).map(|key| (key, key)).collect();
                let mut copy = original.clone();
                copy.remove(&0).unwrap();
                assert_eq!(original.len(), 10);
                assert_eq!(copy.len(), 9);
            }
        }
    };
}

contract_suite!(bst, BinarySearchTree);
contract_suite!(red_black, RedBlackTree);

// =============================================================================
// Variant Differences
// =============================================================================

#[rstest]
fn test_only_the_red_black_tree_stays_shallow_on_sorted_input() {
    let plain: BinarySearchTree<usize, ()> = (0..512).map(|key| (key, ())).collect();
    let balanced: RedBlackTree<usize, ()> = (0..512).map(|key| (key, ())).collect();

    assert_eq!(plain.height(), 512);
    assert!(balanced.height() <= 18);
    assert_eq!(plain.keys(), balanced.keys());
}

#[rstest]
fn test_dump_shows_colors_only_for_the_red_black_tree() {
    let plain: BinarySearchTree<i32, i32> = [(2, 20), (1, 10)].into_iter().collect();
    let balanced: RedBlackTree<i32, i32> = [(2, 20), (1, 10)].into_iter().collect();

    assert_eq!(plain.dump(TraversalOrder::PreOrder), "2 => 20\n  1 => 10\n");
    assert_eq!(
        balanced.dump(TraversalOrder::PreOrder),
        "2 => 20 [black]\n  1 => 10 [red]\n"
    );
}
