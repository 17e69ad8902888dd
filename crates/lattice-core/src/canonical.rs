//! Canonical CBOR encoding for deterministic block serialization.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats
//!
//! The canonical encoding is critical: it ensures that the same block
//! produces identical bytes (and thus an identical hash) across all
//! platforms. The hashable section covers only the fields that define a
//! block's identity; signature and work are appended after it and never
//! feed the hash.

use ciborium::value::Value;

use crate::block::{Block, BlockKind, ChangeBlock, OpenBlock, ReceiveBlock, SendBlock};
use crate::crypto::{AccountId, Ed25519Signature};
use crate::error::CoreError;
use crate::types::{Amount, BlockHash};

/// Hashable field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR. Each kind's map carries only
/// the keys its shape defines.
mod keys {
    pub const KIND: u64 = 0;
    pub const PREVIOUS: u64 = 1;
    pub const SOURCE: u64 = 2;
    pub const DESTINATION: u64 = 3;
    pub const BALANCE: u64 = 4;
    pub const ACCOUNT: u64 = 5;
    pub const REPRESENTATIVE: u64 = 6;
}

/// Length of the trailer appended after the hashable section:
/// a 64-byte signature followed by an 8-byte big-endian work nonce.
const TRAILER_LEN: usize = 64 + 8;

/// Encode a block's hashable fields to canonical CBOR bytes.
///
/// This is the preimage of the block hash.
pub fn canonical_hashable_bytes(block: &Block) -> Vec<u8> {
    let value = block_to_cbor_value(block);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value);
    buf
}

/// Encode an entire block to canonical bytes.
///
/// Format: hashable_bytes || signature || work (big-endian)
pub fn canonical_bytes(block: &Block) -> Vec<u8> {
    let mut buf = canonical_hashable_bytes(block);
    buf.extend_from_slice(&block.signature().0);
    buf.extend_from_slice(&block.work().to_be_bytes());
    buf
}

/// Convert a block's hashable fields to a CBOR Value (map with integer keys).
fn block_to_cbor_value(block: &Block) -> Value {
    let kind_entry = (
        Value::Integer(keys::KIND.into()),
        Value::Integer(u64::from(block.kind().to_u8()).into()),
    );

    let hash_bytes = |h: &BlockHash| Value::Bytes(h.0.to_vec());
    let account_bytes = |a: &AccountId| Value::Bytes(a.0.to_vec());

    let entries = match block {
        Block::Send(b) => vec![
            kind_entry,
            (Value::Integer(keys::PREVIOUS.into()), hash_bytes(&b.previous)),
            (Value::Integer(keys::DESTINATION.into()), account_bytes(&b.destination)),
            (Value::Integer(keys::BALANCE.into()), Value::Bytes(b.balance.to_be_bytes().to_vec())),
        ],
        Block::Receive(b) => vec![
            kind_entry,
            (Value::Integer(keys::PREVIOUS.into()), hash_bytes(&b.previous)),
            (Value::Integer(keys::SOURCE.into()), hash_bytes(&b.source)),
        ],
        Block::Open(b) => vec![
            kind_entry,
            (Value::Integer(keys::SOURCE.into()), hash_bytes(&b.source)),
            (Value::Integer(keys::ACCOUNT.into()), account_bytes(&b.account)),
            (Value::Integer(keys::REPRESENTATIVE.into()), account_bytes(&b.representative)),
        ],
        Block::Change(b) => vec![
            kind_entry,
            (Value::Integer(keys::PREVIOUS.into()), hash_bytes(&b.previous)),
            (Value::Integer(keys::REPRESENTATIVE.into()), account_bytes(&b.representative)),
        ],
    };

    Value::Map(entries)
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => {
            encode_integer(buf, *i);
        }
        Value::Bytes(b) => {
            encode_bytes(buf, b);
        }
        Value::Text(s) => {
            encode_text(buf, s);
        }
        Value::Array(arr) => {
            encode_array(buf, arr);
        }
        Value::Map(entries) => {
            encode_map_canonical(buf, entries);
        }
        Value::Bool(b) => {
            buf.push(if *b { 0xf5 } else { 0xf4 });
        }
        Value::Null => {
            buf.push(0xf6);
        }
        Value::Float(_) => {
            panic!("floats not supported in canonical encoding");
        }
        _ => {
            panic!("unsupported CBOR value type");
        }
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        // Major type 0: unsigned integer
        encode_uint(buf, 0, n as u64);
    } else {
        // Major type 1: negative integer
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item);
    }
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    // Encode all keys first to sort by encoded bytes
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    // Sort by encoded key bytes (lexicographic)
    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    // Write map header
    encode_uint(buf, 5, key_value_pairs.len() as u64);

    // Write sorted key-value pairs
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

/// Decode a block from canonical bytes.
pub fn decode_block(bytes: &[u8]) -> Result<Block, CoreError> {
    if bytes.len() < TRAILER_LEN {
        return Err(CoreError::MalformedBlock("too short".into()));
    }

    // Parse the CBOR hashable section
    let cursor = std::io::Cursor::new(bytes);
    let value: Value =
        ciborium::from_reader(cursor).map_err(|e| CoreError::DecodingError(e.to_string()))?;

    let mut block = cbor_value_to_block(&value)?;

    // Calculate the hashable length by re-encoding
    let mut hashable = Vec::new();
    encode_value_to(&mut hashable, &block_to_cbor_value(&block));
    let remaining = &bytes[hashable.len()..];
    if remaining.len() != TRAILER_LEN {
        return Err(CoreError::MalformedBlock(format!(
            "expected {} trailer bytes, found {}",
            TRAILER_LEN,
            remaining.len()
        )));
    }

    let sig_bytes: [u8; 64] = remaining[..64]
        .try_into()
        .map_err(|_| CoreError::MalformedBlock("invalid signature length".into()))?;
    let work_bytes: [u8; 8] = remaining[64..]
        .try_into()
        .map_err(|_| CoreError::MalformedBlock("invalid work length".into()))?;
    let signature = Ed25519Signature(sig_bytes);
    let work = u64::from_be_bytes(work_bytes);

    match &mut block {
        Block::Send(b) => {
            b.signature = signature;
            b.work = work;
        }
        Block::Receive(b) => {
            b.signature = signature;
            b.work = work;
        }
        Block::Open(b) => {
            b.signature = signature;
            b.work = work;
        }
        Block::Change(b) => {
            b.signature = signature;
            b.work = work;
        }
    }

    Ok(block)
}

/// Convert a CBOR Value (map) back to a block with zeroed trailer fields.
fn cbor_value_to_block(value: &Value) -> Result<Block, CoreError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CoreError::MalformedBlock("expected map".into())),
    };

    // Helper to get a value by integer key
    let get = |key: u64| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key as i128))
            .map(|(_, v)| v)
    };

    let hash_field = |key: u64, name: &str| -> Result<BlockHash, CoreError> {
        match get(key) {
            Some(Value::Bytes(b)) if b.len() == 32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(b);
                Ok(BlockHash(arr))
            }
            _ => Err(CoreError::MalformedBlock(format!("invalid {}", name))),
        }
    };

    let account_field = |key: u64, name: &str| -> Result<AccountId, CoreError> {
        match get(key) {
            Some(Value::Bytes(b)) if b.len() == 32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(b);
                Ok(AccountId(arr))
            }
            _ => Err(CoreError::MalformedBlock(format!("invalid {}", name))),
        }
    };

    let kind = match get(keys::KIND) {
        Some(Value::Integer(i)) => {
            let n = i128::from(*i);
            BlockKind::from_u8(n as u8).ok_or(CoreError::UnknownKind(n as u8))?
        }
        _ => return Err(CoreError::MalformedBlock("missing kind".into())),
    };

    let block = match kind {
        BlockKind::Send => {
            let balance = match get(keys::BALANCE) {
                Some(Value::Bytes(b)) if b.len() == 16 => {
                    let mut arr = [0u8; 16];
                    arr.copy_from_slice(b);
                    Amount::from_be_bytes(arr)
                }
                _ => return Err(CoreError::MalformedBlock("invalid balance".into())),
            };
            Block::Send(SendBlock {
                previous: hash_field(keys::PREVIOUS, "previous")?,
                destination: account_field(keys::DESTINATION, "destination")?,
                balance,
                signature: Ed25519Signature::ZERO,
                work: 0,
            })
        }
        BlockKind::Receive => Block::Receive(ReceiveBlock {
            previous: hash_field(keys::PREVIOUS, "previous")?,
            source: hash_field(keys::SOURCE, "source")?,
            signature: Ed25519Signature::ZERO,
            work: 0,
        }),
        BlockKind::Open => Block::Open(OpenBlock {
            source: hash_field(keys::SOURCE, "source")?,
            representative: account_field(keys::REPRESENTATIVE, "representative")?,
            account: account_field(keys::ACCOUNT, "account")?,
            signature: Ed25519Signature::ZERO,
            work: 0,
        }),
        BlockKind::Change => Block::Change(ChangeBlock {
            previous: hash_field(keys::PREVIOUS, "previous")?,
            representative: account_field(keys::REPRESENTATIVE, "representative")?,
            signature: Ed25519Signature::ZERO,
            work: 0,
        }),
    };

    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 32])
    }

    fn sample_blocks() -> Vec<Block> {
        let prev = BlockHash::from_bytes([0x10; 32]);
        let src = BlockHash::from_bytes([0x20; 32]);
        vec![
            SendBlock::new(prev, account(0xaa), Amount(1_000_000)).into(),
            ReceiveBlock::new(prev, src).into(),
            OpenBlock::new(src, account(0xbb), account(0xcc)).into(),
            ChangeBlock::new(prev, account(0xdd)).into(),
        ]
    }

    #[test]
    fn test_canonical_encoding_deterministic() {
        for block in sample_blocks() {
            assert_eq!(canonical_bytes(&block), canonical_bytes(&block));
            assert_eq!(
                canonical_hashable_bytes(&block),
                canonical_hashable_bytes(&block)
            );
        }
    }

    #[test]
    fn test_trailer_layout() {
        for block in sample_blocks() {
            let hashable = canonical_hashable_bytes(&block);
            let full = canonical_bytes(&block);
            assert_eq!(full.len(), hashable.len() + TRAILER_LEN);
            assert_eq!(&full[..hashable.len()], &hashable[..]);
        }
    }

    #[test]
    fn test_block_roundtrip_all_kinds() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        for mut block in sample_blocks() {
            match &mut block {
                Block::Send(b) => b.work = 7,
                Block::Receive(b) => b.work = 8,
                Block::Open(b) => b.work = 9,
                Block::Change(b) => b.work = 10,
            }
            block.sign(&keypair);

            let bytes = canonical_bytes(&block);
            let decoded = decode_block(&bytes).unwrap();
            assert_eq!(decoded, block);
            assert_eq!(decoded.hash(), block.hash());
        }
    }

    #[test]
    fn test_decode_rejects_truncated() {
        let block: Block = ChangeBlock::new(BlockHash::from_bytes([1; 32]), account(2)).into();
        let bytes = canonical_bytes(&block);
        assert!(decode_block(&bytes[..bytes.len() - 1]).is_err());
        assert!(decode_block(&bytes[..10]).is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        let mut buf = Vec::new();
        let value = Value::Map(vec![(
            Value::Integer(0.into()),
            Value::Integer(9.into()),
        )]);
        encode_value_to(&mut buf, &value);
        buf.extend_from_slice(&[0u8; TRAILER_LEN]);
        assert!(matches!(
            decode_block(&buf),
            Err(CoreError::UnknownKind(9))
        ));
    }

    #[test]
    fn test_integer_encoding() {
        // Test smallest encoding for various integer sizes
        let mut buf = Vec::new();

        // 0-23: single byte
        encode_uint(&mut buf, 0, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        // 24-255: two bytes
        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        buf.clear();
        encode_uint(&mut buf, 0, 255);
        assert_eq!(buf, vec![0x18, 255]);

        // 256-65535: three bytes
        buf.clear();
        encode_uint(&mut buf, 0, 256);
        assert_eq!(buf, vec![0x19, 0x01, 0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 65535);
        assert_eq!(buf, vec![0x19, 0xff, 0xff]);
    }

    #[test]
    fn test_map_key_ordering() {
        // Ensure integer keys are sorted correctly
        let mut buf = Vec::new();
        let entries = vec![
            (Value::Integer(6.into()), Value::Integer(80.into())),
            (Value::Integer(0.into()), Value::Integer(0.into())),
            (Value::Integer(4.into()), Value::Integer(50.into())),
        ];
        encode_map_canonical(&mut buf, &entries);

        // Map header (3 entries)
        assert_eq!(buf[0], 0xa3);
        // Keys should be in order: 0, 4, 6
        assert_eq!(buf[1], 0x00); // key 0
        assert_eq!(buf[2], 0x00); // value 0
        assert_eq!(buf[3], 0x04); // key 4
        assert_eq!(buf[4], 0x18); // value 50 (>23)
        assert_eq!(buf[5], 50);
        assert_eq!(buf[6], 0x06); // key 6
        assert_eq!(buf[7], 0x18); // value 80 (>23)
        assert_eq!(buf[8], 80);
    }
}
