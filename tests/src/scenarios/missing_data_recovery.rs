//! Missing-data recovery: peer A holds a value
//! whose child is only indirectly referenced (hashed, not embedded) and
//! whose bytes A never received; resolving it surfaces `MissingData`
//! rather than panicking. A asks B for the hash over the wire, B replies
//! with the bytes, A stores them, and the same resolve now succeeds and
//! reproduces the original hash.

#[cfg(test)]
mod tests {
    use cc_01_encoding::refs::Ref;
    use cc_01_encoding::Encode;
    use cc_03_store::memory::MemoryStore;
    use cc_03_store::{CellStore, StoreError};
    use cc_06_wire::Message;

    #[test]
    fn a_recovers_a_child_it_was_missing_by_asking_b() {
        let child = vec![7u8; 400]; // well over MAX_EMBEDDED, forces an indirect ref
        let child_ref: Ref<Vec<u8>> = Ref::of(child.clone());
        let hash = child_ref.hash();
        let child_bytes = child.to_bytes();

        let store_b = MemoryStore::new();
        store_b.put(hash, &child_bytes).unwrap();

        let store_a = MemoryStore::new();
        assert!(matches!(store_a.resolve(&hash), Err(StoreError::MissingData(h)) if h == hash));

        let request = Message::MissingData { id: 1, hash };
        let Message::MissingData { id: req_id, hash: requested_hash } = request else { unreachable!() };
        assert_eq!(req_id, 1);

        let bytes = store_b.resolve(&requested_hash).unwrap();
        let reply = Message::DataReply { id: req_id, bytes: bytes.clone() };
        let Message::DataReply { id: reply_id, bytes: reply_bytes } = reply else { unreachable!() };
        assert_eq!(reply_id, req_id);

        store_a.put(hash, &reply_bytes).unwrap();

        let resolved = store_a.resolve(&hash).unwrap();
        assert_eq!(resolved, child_bytes);
    }
}
