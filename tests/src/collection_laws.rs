//! Property tests for the core collection laws:
//! `get(assoc(m,k,v),k) == v`, `dissoc(assoc(m,k,v),k) == dissoc(m,k)`,
//! `count(assoc(m,k,v)) == count(m) + (containsKey(m,k) ? 0 : 1)`, and the
//! vector analogues for `append`/`pop`/`get`. Also encoding round-trip:
//! `decode(encode(x)) == x`.

#[cfg(test)]
mod tests {
    use cc_01_encoding::{Decode, Encode};
    use cc_02_collections::{HashMap, Vector};
    use proptest::prelude::*;

    fn small_map(entries: &[(i64, i64)]) -> HashMap<i64, i64> {
        entries.iter().fold(HashMap::new(), |m, (k, v)| m.assoc(*k, *v))
    }

    proptest! {
        #[test]
        fn assoc_then_get_returns_the_value(entries in prop::collection::vec((any::<i64>(), any::<i64>()), 0..40), k in any::<i64>(), v in any::<i64>()) {
            let m = small_map(&entries).assoc(k, v);
            prop_assert_eq!(m.get(&k), Some(&v));
        }

        #[test]
        fn dissoc_after_assoc_matches_dissoc_alone(entries in prop::collection::vec((any::<i64>(), any::<i64>()), 0..40), k in any::<i64>(), v in any::<i64>()) {
            let base = small_map(&entries);
            let via_assoc = base.assoc(k, v).dissoc(&k);
            let direct = base.dissoc(&k);
            prop_assert_eq!(via_assoc.count(), direct.count());
            prop_assert_eq!(via_assoc.contains_key(&k), direct.contains_key(&k));
        }

        #[test]
        fn assoc_count_grows_only_for_new_keys(entries in prop::collection::vec((any::<i64>(), any::<i64>()), 0..40), k in any::<i64>(), v in any::<i64>()) {
            let base = small_map(&entries);
            let had_key = base.contains_key(&k);
            let after = base.assoc(k, v);
            let expected = base.count() + if had_key { 0 } else { 1 };
            prop_assert_eq!(after.count(), expected);
        }

        #[test]
        fn append_then_get_last_returns_the_value(items in prop::collection::vec(any::<i64>(), 0..200), v in any::<i64>()) {
            let vec = Vector::from_iter(items.iter().copied());
            let appended = vec.append(v);
            prop_assert_eq!(*appended.get(vec.count()), v);
        }

        #[test]
        fn pop_after_append_is_identity(items in prop::collection::vec(any::<i64>(), 0..200), v in any::<i64>()) {
            let vec = Vector::from_iter(items.iter().copied());
            let roundtripped = vec.append(v).pop();
            prop_assert_eq!(roundtripped.count(), vec.count());
            for i in 0..vec.count() {
                prop_assert_eq!(roundtripped.get(i), vec.get(i));
            }
        }

        #[test]
        fn long_roundtrips_through_canonical_encoding(n in any::<i64>()) {
            let bytes = n.to_bytes();
            let (decoded, consumed) = i64::decode(&bytes).unwrap();
            prop_assert_eq!(decoded, n);
            prop_assert_eq!(consumed, bytes.len());
        }

        #[test]
        fn string_roundtrips_through_canonical_encoding(s in ".*") {
            let bytes = s.to_bytes();
            let (decoded, consumed) = String::decode(&bytes).unwrap();
            prop_assert_eq!(decoded, s);
            prop_assert_eq!(consumed, bytes.len());
        }

        #[test]
        fn blob_roundtrips_through_canonical_encoding(b in prop::collection::vec(any::<u8>(), 0..300)) {
            let bytes = b.to_bytes();
            let (decoded, consumed) = Vec::<u8>::decode(&bytes).unwrap();
            prop_assert_eq!(decoded, b);
            prop_assert_eq!(consumed, bytes.len());
        }
    }
}
