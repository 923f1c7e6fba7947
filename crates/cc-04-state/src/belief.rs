//! `Belief`: the set of orders a peer has received from other peers, keyed
//! by signer.

use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::error::CodecError;
use cc_01_encoding::refs::Ref;
use cc_01_encoding::tag::{RecordTag, Tag};
use cc_01_encoding::varint::{read_ivlq, write_ivlq};
use cc_02_collections::HashMap;
use shared_types::AccountKey;

use crate::block::expect_record;
use crate::order::Order;
use crate::signed::SignedData;

/// A peer's accumulated view of every order it has received, most recent
/// signed order per signer.
#[derive(Clone)]
pub struct Belief {
    orders: HashMap<AccountKey, SignedData<Order>>,
    timestamp: i64,
}

impl Belief {
    pub fn new(orders: HashMap<AccountKey, SignedData<Order>>, timestamp: i64) -> Belief {
        Belief { orders, timestamp }
    }

    /// An empty belief.
    pub fn empty(timestamp: i64) -> Belief {
        Belief { orders: HashMap::new(), timestamp }
    }

    pub fn orders(&self) -> &HashMap<AccountKey, SignedData<Order>> {
        &self.orders
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl PartialEq for Belief {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.orders.count() == other.orders.count()
    }
}

impl Encode for Belief {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Record as u8);
        out.push(RecordTag::Belief as u8);
        Ref::of(self.orders.clone()).encode(out);
        write_ivlq(self.timestamp, out);
    }
}

impl Decode for Belief {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut pos = expect_record(input, RecordTag::Belief)?;
        let (orders, n) = Ref::<HashMap<AccountKey, SignedData<Order>>>::decode(&input[pos..])?;
        pos += n;
        let orders = match orders {
            Ref::Embedded(m) => m,
            Ref::Indirect(_) => {
                return Err(CodecError::BadFormat("belief orders ref is indirect in bare decode".into()))
            }
        };
        let (timestamp, n) = read_ivlq(&input[pos..])?;
        pos += n;
        Ok((Belief { orders, timestamp }, pos))
    }
}
