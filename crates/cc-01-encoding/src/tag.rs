//! One-byte tags for the closed set of cell kinds.
//!
//! Dispatch on decode is by tag byte; dispatch on encode is by enum variant.
//! The set is closed deliberately: adding a new cell kind means adding a
//! variant here, not widening an open string/integer code.

/// Tag byte for each cell kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Nil = 0,
    Bool = 1,
    Long = 2,
    Double = 3,
    Char = 4,
    Str = 5,
    Blob = 6,
    Symbol = 7,
    Keyword = 8,
    Address = 9,
    Vector = 10,
    List = 11,
    Map = 12,
    Set = 13,
    BlobMap = 14,
    MapEntry = 15,
    SignedData = 16,
    AccountKey = 17,
    RefIndirect = 18,
    Record = 19,
}

impl Tag {
    /// Parse a raw tag byte, rejecting anything outside the closed set.
    pub fn from_u8(b: u8) -> Option<Tag> {
        use Tag::*;
        Some(match b {
            0 => Nil,
            1 => Bool,
            2 => Long,
            3 => Double,
            4 => Char,
            5 => Str,
            6 => Blob,
            7 => Symbol,
            8 => Keyword,
            9 => Address,
            10 => Vector,
            11 => List,
            12 => Map,
            13 => Set,
            14 => BlobMap,
            15 => MapEntry,
            16 => SignedData,
            17 => AccountKey,
            18 => RefIndirect,
            19 => Record,
            _ => return None,
        })
    }
}

/// Second-byte subtag following [`Tag::Record`] identifying which record
/// kind follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordTag {
    Block = 0,
    Order = 1,
    Belief = 2,
    State = 3,
    PeerStatus = 4,
    AccountStatus = 5,
    Transaction = 6,
}

impl RecordTag {
    pub fn from_u8(b: u8) -> Option<RecordTag> {
        use RecordTag::*;
        Some(match b {
            0 => Block,
            1 => Order,
            2 => Belief,
            3 => State,
            4 => PeerStatus,
            5 => AccountStatus,
            6 => Transaction,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrips_every_discriminant() {
        for b in 0u8..=19 {
            let tag = Tag::from_u8(b).expect("known tag");
            assert_eq!(tag as u8, b);
        }
    }

    #[test]
    fn tag_rejects_unknown_byte() {
        assert!(Tag::from_u8(20).is_none());
        assert!(Tag::from_u8(255).is_none());
    }

    #[test]
    fn record_tag_roundtrips() {
        for b in 0u8..=6 {
            let tag = RecordTag::from_u8(b).expect("known record tag");
            assert_eq!(tag as u8, b);
        }
    }
}
