//! `Order`: one peer's view of the chain — a vector of blocks plus the
//! proposal and consensus points into it.

use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::error::CodecError;
use cc_01_encoding::refs::Ref;
use cc_01_encoding::tag::RecordTag;
use cc_01_encoding::varint::{read_ivlq, write_ivlq};
use cc_02_collections::Vector;

use crate::block::{expect_record, Block};
use crate::error::StateError;

/// A peer's ordered chain of blocks, with how far the peer itself has
/// proposed and confirmed consensus into it.
///
/// Invariant: `0 <= consensus_point <= proposal_point <= blocks.count()`.
#[derive(Clone)]
pub struct Order {
    blocks: Vector<Block>,
    proposal_point: i64,
    consensus_point: i64,
    timestamp: i64,
}

impl Order {
    /// Build an order, checking the point invariant.
    pub fn new(
        blocks: Vector<Block>,
        proposal_point: i64,
        consensus_point: i64,
        timestamp: i64,
    ) -> Result<Order, StateError> {
        let len = blocks.count() as i64;
        if !(0 <= consensus_point && consensus_point <= proposal_point && proposal_point <= len) {
            return Err(StateError::InvalidData(format!(
                "order points out of range: consensus={consensus_point} proposal={proposal_point} blocks={len}"
            )));
        }
        Ok(Order { blocks, proposal_point, consensus_point, timestamp })
    }

    /// An empty order at genesis.
    pub fn genesis(timestamp: i64) -> Order {
        Order { blocks: Vector::new(), proposal_point: 0, consensus_point: 0, timestamp }
    }

    pub fn blocks(&self) -> &Vector<Block> {
        &self.blocks
    }

    pub fn proposal_point(&self) -> i64 {
        self.proposal_point
    }

    pub fn consensus_point(&self) -> i64 {
        self.consensus_point
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The block at the consensus point minus one, i.e. the most recently
    /// finalized block, if any.
    pub fn last_consensus_block(&self) -> Option<&Block> {
        if self.consensus_point == 0 {
            None
        } else {
            Some(self.blocks.get((self.consensus_point - 1) as usize))
        }
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.proposal_point == other.proposal_point
            && self.consensus_point == other.consensus_point
            && self.timestamp == other.timestamp
            && self.blocks.count() == other.blocks.count()
            && (0..self.blocks.count()).all(|i| self.blocks.get(i) == other.blocks.get(i))
    }
}
impl Eq for Order {}

impl Encode for Order {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(cc_01_encoding::tag::Tag::Record as u8);
        out.push(RecordTag::Order as u8);
        Ref::of(self.blocks.clone()).encode(out);
        write_ivlq(self.proposal_point, out);
        write_ivlq(self.consensus_point, out);
        write_ivlq(self.timestamp, out);
    }
}

impl Decode for Order {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut pos = expect_record(input, RecordTag::Order)?;
        let (blocks, n) = Ref::<Vector<Block>>::decode(&input[pos..])?;
        pos += n;
        let blocks = match blocks {
            Ref::Embedded(v) => v,
            Ref::Indirect(_) => {
                return Err(CodecError::BadFormat("order blocks ref is indirect in bare decode".into()))
            }
        };
        let (proposal_point, n) = read_ivlq(&input[pos..])?;
        pos += n;
        let (consensus_point, n) = read_ivlq(&input[pos..])?;
        pos += n;
        let (timestamp, n) = read_ivlq(&input[pos..])?;
        pos += n;
        let len = blocks.count() as i64;
        if !(0 <= consensus_point && consensus_point <= proposal_point && proposal_point <= len) {
            return Err(CodecError::BadFormat("decoded order violates point invariant".into()));
        }
        Ok((Order { blocks, proposal_point, consensus_point, timestamp }, pos))
    }
}
