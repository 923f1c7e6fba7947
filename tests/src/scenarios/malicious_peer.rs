//! Malicious peer: a forged trie node claims to be
//! a tree with `count == LEAF_MAX`, which is non-canonical — a tree node
//! only ever exists once collapsing it back to a leaf would exceed
//! `LEAF_MAX` — so decoding it must fail with `BadFormat` rather than being
//! silently accepted into a belief.

#[cfg(test)]
mod tests {
    use cc_01_encoding::tag::Tag;
    use cc_01_encoding::varint::write_uvlq;
    use cc_01_encoding::{CodecError, Decode};
    use cc_02_collections::trie::decode_node;
    use cc_02_collections::HashMap;
    use cc_04_state::Belief;

    const LEAF_MAX: usize = 8;

    fn forged_tree_node_at_leaf_max() -> Vec<u8> {
        let mut out = vec![Tag::Map as u8];
        write_uvlq(LEAF_MAX as u64, &mut out); // count == LEAF_MAX, but is_tree will be true below
        out.push(0); // shift
        out.extend_from_slice(&0u16.to_be_bytes()); // empty mask: no children follow
        out
    }

    #[test]
    fn forged_tree_node_at_leaf_max_is_rejected() {
        let bytes = forged_tree_node_at_leaf_max();
        let result = decode_node::<cc_02_collections::trie::HashDigits, i64, i64>(Tag::Map, &bytes, &|_: &i64| {
            cc_02_collections::trie::hash_digits(&[0u8; 32])
        });
        assert!(matches!(result, Err(CodecError::BadFormat(_))));
    }

    #[test]
    fn a_receiver_belief_is_unaffected_by_a_rejected_map() {
        let before = Belief::empty(0);
        let bytes = forged_tree_node_at_leaf_max();
        let result = <HashMap<i64, i64> as Decode>::decode(&bytes);
        assert!(result.is_err());
        // Nothing was ever merged in, so the belief a malformed message
        // arrived alongside is untouched.
        assert_eq!(before, Belief::empty(0));
    }
}
