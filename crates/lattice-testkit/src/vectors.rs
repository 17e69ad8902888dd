//! Deterministic consistency vectors.
//!
//! Every implementation of the lattice block encoding must produce
//! identical canonical bytes, hashes, and signatures for the same seeded
//! inputs. These vectors are generated from fixed seeds and checked for
//! internal consistency; serialized to JSON they can be diffed against
//! another implementation's output.

use serde::{Deserialize, Serialize};

use lattice_core::{
    canonical_bytes, canonical_hashable_bytes, decode_block, verify_signature, Amount, Block,
    BlockHash, BlockKind, ChangeBlock, Keypair, OpenBlock, ReceiveBlock, SendBlock,
};

/// A single consistency vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub signer_seed: String, // 32 bytes hex
    pub kind: BlockKind,

    // Derived outputs (all hex)
    pub hashable_bytes: String,
    pub block_bytes: String,
    pub signature: String, // 64 bytes
    pub hash: String,      // 32 bytes
}

/// Generate a vector from a block and the keypair that signs it.
fn generate_vector(name: &str, description: &str, seed: [u8; 32], mut block: Block) -> ConsistencyVector {
    let keypair = Keypair::from_seed(&seed);
    block.sign(&keypair);

    ConsistencyVector {
        name: name.to_string(),
        description: description.to_string(),
        signer_seed: hex::encode(seed),
        kind: block.kind(),
        hashable_bytes: hex::encode(canonical_hashable_bytes(&block)),
        block_bytes: hex::encode(canonical_bytes(&block)),
        signature: block.signature().to_hex(),
        hash: block.hash().to_hex(),
    }
}

/// Generate all consistency vectors.
pub fn all_vectors() -> Vec<ConsistencyVector> {
    let rep = Keypair::from_seed(&[0xe1; 32]).account();
    let dest = Keypair::from_seed(&[0xe2; 32]).account();
    let opener = Keypair::from_seed(&[0x04; 32]);

    vec![
        generate_vector(
            "send_basic",
            "Send with a mid-range balance",
            [0x01; 32],
            SendBlock::new(BlockHash::from_bytes([0x10; 32]), dest, Amount(1_000_000)).into(),
        ),
        generate_vector(
            "send_root",
            "Send whose previous is the sentinel",
            [0x01; 32],
            SendBlock::new(BlockHash::ZERO, dest, Amount(1)).into(),
        ),
        generate_vector(
            "send_max_balance",
            "Send carrying the maximum representable amount",
            [0x02; 32],
            SendBlock::new(BlockHash::from_bytes([0x11; 32]), dest, Amount(u128::MAX)).into(),
        ),
        generate_vector(
            "receive_basic",
            "Receive linking two chains",
            [0x03; 32],
            ReceiveBlock::new(
                BlockHash::from_bytes([0x12; 32]),
                BlockHash::from_bytes([0x13; 32]),
            )
            .into(),
        ),
        generate_vector(
            "open_basic",
            "Open block rooting a new account chain",
            [0x04; 32],
            OpenBlock::new(BlockHash::from_bytes([0x14; 32]), rep, opener.account()).into(),
        ),
        generate_vector(
            "change_basic",
            "Change block rotating the representative",
            [0x05; 32],
            ChangeBlock::new(BlockHash::from_bytes([0x15; 32]), rep).into(),
        ),
    ]
}

/// Regenerate every vector and verify it is self-consistent.
///
/// Checks determinism (regeneration matches), decode round-trips, hash
/// derivation from the hashable bytes, and signature validity.
pub fn verify_all_vectors() -> Result<(), String> {
    let first = all_vectors();
    let second = all_vectors();

    for (a, b) in first.iter().zip(second.iter()) {
        if a.block_bytes != b.block_bytes || a.hash != b.hash || a.signature != b.signature {
            return Err(format!("vector {} is not deterministic", a.name));
        }
    }

    for vector in &first {
        let bytes = hex::decode(&vector.block_bytes)
            .map_err(|e| format!("vector {}: bad hex: {}", vector.name, e))?;
        let block = decode_block(&bytes)
            .map_err(|e| format!("vector {}: undecodable: {}", vector.name, e))?;

        if block.kind() != vector.kind {
            return Err(format!("vector {}: kind mismatch", vector.name));
        }
        if block.hash().to_hex() != vector.hash {
            return Err(format!("vector {}: hash mismatch", vector.name));
        }

        let hashable = hex::decode(&vector.hashable_bytes)
            .map_err(|e| format!("vector {}: bad hex: {}", vector.name, e))?;
        if BlockHash::digest(&hashable).to_hex() != vector.hash {
            return Err(format!(
                "vector {}: hash does not derive from hashable bytes",
                vector.name
            ));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(
            &hex::decode(&vector.signer_seed)
                .map_err(|e| format!("vector {}: bad seed hex: {}", vector.name, e))?,
        );
        let signer = Keypair::from_seed(&seed);
        verify_signature(&block, &signer.account())
            .map_err(|e| format!("vector {}: signature invalid: {}", vector.name, e))?;
    }

    Ok(())
}
