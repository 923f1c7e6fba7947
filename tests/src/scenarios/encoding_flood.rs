//! Encoding flood: ten thousand distinct `i64`
//! values are each canonically encoded, framed, and appended to one byte
//! stream; decoding that stream back must yield every value exactly once,
//! in order, with nothing lost or corrupted by the length-prefixed framing.

#[cfg(test)]
mod tests {
    use cc_01_encoding::Encode;
    use cc_06_wire::frame::{read_frame, write_frame};

    const COUNT: i64 = 10_000;
    const LONG_TAG: u8 = 1;

    #[test]
    fn ten_thousand_longs_survive_the_wire_intact_and_in_order() {
        let mut stream = Vec::new();
        for n in 0..COUNT {
            write_frame(LONG_TAG, &n.to_bytes(), &mut stream);
        }

        let mut cursor = &stream[..];
        let mut recovered = Vec::with_capacity(COUNT as usize);
        while !cursor.is_empty() {
            let (tag, body, consumed) = read_frame(cursor).unwrap();
            assert_eq!(tag, LONG_TAG);
            let (value, used) = <i64 as cc_01_encoding::Decode>::decode(body).unwrap();
            assert_eq!(used, body.len());
            recovered.push(value);
            cursor = &cursor[consumed..];
        }

        assert_eq!(recovered.len(), COUNT as usize);
        assert_eq!(recovered, (0..COUNT).collect::<Vec<_>>());
    }
}
