//! The ten gossip message kinds carried over [`crate::frame`].
//!
//! `Belief`, `Transact`, `Result` and `DataReply` bodies are canonical cell
//! encodings, decoded with the same [`cc_01_encoding::codec::Decode`]
//! machinery the store and collections use. `Query` and `MissingData`
//! carry a bare message id and hash rather than a cell — there is nothing
//! to embed-or-indirect about "fetch me this hash". `StatusReq`/`Status`
//! and `Challenge`/`Response` are transport-facing envelopes outside the
//! closed cell-tag set (peer discovery and handshake semantics are this
//! spec's Non-goals); their shape here is the minimal one the frame format
//! needs, not a full protocol.

use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::varint::{read_uvlq, write_ivlq, write_uvlq, read_ivlq};
use cc_04_state::{Belief, SignedData, Transaction};
use shared_types::{AccountKey, Hash};

use crate::error::WireError;

/// One-byte wire tags for the ten message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageTag {
    Belief = 1,
    Query = 2,
    Transact = 3,
    Result = 4,
    StatusReq = 5,
    Status = 6,
    MissingData = 7,
    DataReply = 8,
    Challenge = 9,
    Response = 10,
}

impl MessageTag {
    pub fn from_u8(b: u8) -> Option<MessageTag> {
        use MessageTag::*;
        Some(match b {
            1 => Belief,
            2 => Query,
            3 => Transact,
            4 => Result,
            5 => StatusReq,
            6 => Status,
            7 => MissingData,
            8 => DataReply,
            9 => Challenge,
            10 => Response,
            _ => return None,
        })
    }
}

/// A decoded gossip message.
#[derive(Clone)]
pub enum Message {
    Belief(Belief),
    Query { id: u64, hash: Hash },
    Transact(SignedData<Transaction>),
    Result { tx_hash: Hash, accepted: bool },
    StatusReq,
    Status { proposal_point: i64, consensus_point: i64 },
    MissingData { id: u64, hash: Hash },
    DataReply { id: u64, bytes: Vec<u8> },
    Challenge { nonce: Vec<u8> },
    Response { nonce: Vec<u8>, signer: AccountKey, signature: [u8; 64] },
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Belief(_) => write!(f, "Message::Belief"),
            Message::Query { id, hash } => write!(f, "Message::Query {{ id: {id}, hash: {hash} }}"),
            Message::Transact(_) => write!(f, "Message::Transact"),
            Message::Result { tx_hash, accepted } => {
                write!(f, "Message::Result {{ tx_hash: {tx_hash}, accepted: {accepted} }}")
            }
            Message::StatusReq => write!(f, "Message::StatusReq"),
            Message::Status { proposal_point, consensus_point } => write!(
                f,
                "Message::Status {{ proposal_point: {proposal_point}, consensus_point: {consensus_point} }}"
            ),
            Message::MissingData { id, hash } => write!(f, "Message::MissingData {{ id: {id}, hash: {hash} }}"),
            Message::DataReply { id, bytes } => {
                write!(f, "Message::DataReply {{ id: {id}, len: {} }}", bytes.len())
            }
            Message::Challenge { nonce } => write!(f, "Message::Challenge {{ len: {} }}", nonce.len()),
            Message::Response { signer, .. } => write!(f, "Message::Response {{ signer: {signer} }}"),
        }
    }
}

impl Message {
    pub fn tag(&self) -> MessageTag {
        match self {
            Message::Belief(_) => MessageTag::Belief,
            Message::Query { .. } => MessageTag::Query,
            Message::Transact(_) => MessageTag::Transact,
            Message::Result { .. } => MessageTag::Result,
            Message::StatusReq => MessageTag::StatusReq,
            Message::Status { .. } => MessageTag::Status,
            Message::MissingData { .. } => MessageTag::MissingData,
            Message::DataReply { .. } => MessageTag::DataReply,
            Message::Challenge { .. } => MessageTag::Challenge,
            Message::Response { .. } => MessageTag::Response,
        }
    }

    /// Encode this message's body (not the frame length/tag prefix).
    pub fn encode_body(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Message::Belief(b) => b.encode(&mut out),
            Message::Query { id, hash } => encode_id_hash(*id, hash, &mut out),
            Message::Transact(signed) => signed.encode(&mut out),
            Message::Result { tx_hash, accepted } => {
                out.extend_from_slice(tx_hash.as_bytes());
                out.push(u8::from(*accepted));
            }
            Message::StatusReq => {}
            Message::Status { proposal_point, consensus_point } => {
                write_ivlq(*proposal_point, &mut out);
                write_ivlq(*consensus_point, &mut out);
            }
            Message::MissingData { id, hash } => encode_id_hash(*id, hash, &mut out),
            Message::DataReply { id, bytes } => {
                write_uvlq(*id, &mut out);
                write_uvlq(bytes.len() as u64, &mut out);
                out.extend_from_slice(bytes);
            }
            Message::Challenge { nonce } => {
                write_uvlq(nonce.len() as u64, &mut out);
                out.extend_from_slice(nonce);
            }
            Message::Response { nonce, signer, signature } => {
                write_uvlq(nonce.len() as u64, &mut out);
                out.extend_from_slice(nonce);
                out.extend_from_slice(signer.as_bytes());
                out.extend_from_slice(signature);
            }
        }
        out
    }

    /// Decode a message body given the tag that named its kind.
    pub fn decode_body(tag: MessageTag, body: &[u8]) -> Result<Message, WireError> {
        Ok(match tag {
            MessageTag::Belief => {
                let (b, _) = Belief::decode(body)?;
                Message::Belief(b)
            }
            MessageTag::Query => {
                let (id, hash) = decode_id_hash(body)?;
                Message::Query { id, hash }
            }
            MessageTag::Transact => {
                let (signed, _) = SignedData::<Transaction>::decode(body)?;
                Message::Transact(signed)
            }
            MessageTag::Result => {
                let hash = read_hash(body, 0)?;
                let accepted = *body
                    .get(32)
                    .ok_or_else(|| WireError::Truncated("missing result accepted byte".into()))?
                    != 0;
                Message::Result { tx_hash: hash, accepted }
            }
            MessageTag::StatusReq => Message::StatusReq,
            MessageTag::Status => {
                let (proposal_point, n) = read_ivlq(body)?;
                let (consensus_point, _) = read_ivlq(&body[n..])?;
                Message::Status { proposal_point, consensus_point }
            }
            MessageTag::MissingData => {
                let (id, hash) = decode_id_hash(body)?;
                Message::MissingData { id, hash }
            }
            MessageTag::DataReply => {
                let (id, n) = read_uvlq(body)?;
                let (len, n2) = read_uvlq(&body[n..])?;
                let start = n + n2;
                let end = start
                    .checked_add(len as usize)
                    .ok_or_else(|| WireError::Truncated("data reply length overflow".into()))?;
                let bytes = body
                    .get(start..end)
                    .ok_or_else(|| WireError::Truncated("truncated data reply".into()))?
                    .to_vec();
                Message::DataReply { id, bytes }
            }
            MessageTag::Challenge => {
                let (len, n) = read_uvlq(body)?;
                let end = n
                    .checked_add(len as usize)
                    .ok_or_else(|| WireError::Truncated("challenge nonce length overflow".into()))?;
                let bytes = body
                    .get(n..end)
                    .ok_or_else(|| WireError::Truncated("truncated challenge nonce".into()))?
                    .to_vec();
                Message::Challenge { nonce: bytes }
            }
            MessageTag::Response => {
                let (len, n) = read_uvlq(body)?;
                let nonce_end = n
                    .checked_add(len as usize)
                    .ok_or_else(|| WireError::Truncated("response nonce length overflow".into()))?;
                let nonce = body
                    .get(n..nonce_end)
                    .ok_or_else(|| WireError::Truncated("truncated response nonce".into()))?
                    .to_vec();
                let signer = read_account_key(body, nonce_end)?;
                let sig_start = nonce_end + 32;
                let sig_bytes = body
                    .get(sig_start..sig_start + 64)
                    .ok_or_else(|| WireError::Truncated("truncated response signature".into()))?;
                let mut signature = [0u8; 64];
                signature.copy_from_slice(sig_bytes);
                Message::Response { nonce, signer, signature }
            }
        })
    }
}

fn encode_id_hash(id: u64, hash: &Hash, out: &mut Vec<u8>) {
    write_uvlq(id, out);
    out.extend_from_slice(hash.as_bytes());
}

fn decode_id_hash(body: &[u8]) -> Result<(u64, Hash), WireError> {
    let (id, n) = read_uvlq(body)?;
    let hash = read_hash(body, n)?;
    Ok((id, hash))
}

fn read_hash(body: &[u8], at: usize) -> Result<Hash, WireError> {
    let bytes = body.get(at..at + 32).ok_or_else(|| WireError::Truncated("truncated hash".into()))?;
    let mut arr = [0u8; 32];
    arr.copy_from_slice(bytes);
    Ok(Hash::from_bytes(arr))
}

fn read_account_key(body: &[u8], at: usize) -> Result<AccountKey, WireError> {
    let bytes = body.get(at..at + 32).ok_or_else(|| WireError::Truncated("truncated account key".into()))?;
    let mut arr = [0u8; 32];
    arr.copy_from_slice(bytes);
    Ok(AccountKey::from_bytes(arr))
}

/// Encode a message into a full frame (length + tag + body), appending to
/// `out`.
pub fn write_message(message: &Message, out: &mut Vec<u8>) {
    let body = message.encode_body();
    crate::frame::write_frame(message.tag() as u8, &body, out);
}

/// Read one full frame from the front of `input` and decode its message.
/// Returns the message and the number of bytes consumed.
pub fn read_message(input: &[u8]) -> Result<(Message, usize), WireError> {
    let (tag_byte, body, n) = crate::frame::read_frame(input)?;
    let tag = MessageTag::from_u8(tag_byte).ok_or(WireError::BadTag(tag_byte))?;
    let message = Message::decode_body(tag, body)?;
    Ok((message, n))
}
