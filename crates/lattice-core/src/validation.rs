//! Block validation: signature verification and work checks.
//!
//! The dependency walker never calls into this module; validity beyond
//! dependency shape is the ingesting collaborator's concern.

use crate::block::Block;
use crate::crypto::{work_difficulty, AccountId, WORK_THRESHOLD};
use crate::error::ValidationError;

/// Verify a block's signature against the chain-owning account.
///
/// Blocks sign their own content hash. For an open block the signer must
/// also be the account the block names.
pub fn verify_signature(block: &Block, account: &AccountId) -> Result<(), ValidationError> {
    if let Block::Open(open) = block {
        if open.account != *account {
            return Err(ValidationError::AccountMismatch {
                signer: account.to_hex(),
                named: open.account.to_hex(),
            });
        }
    }

    let hash = block.hash();
    account
        .verify(hash.as_bytes(), block.signature())
        .map_err(|_| ValidationError::SignatureFailed)
}

/// Verify a block's work nonce against the network threshold.
pub fn verify_work(block: &Block) -> Result<(), ValidationError> {
    verify_work_at(block, WORK_THRESHOLD)
}

/// Verify a block's work nonce against an explicit threshold.
pub fn verify_work_at(block: &Block, threshold: u64) -> Result<(), ValidationError> {
    let difficulty = work_difficulty(&block.root(), block.work());
    if difficulty < threshold {
        return Err(ValidationError::InsufficientWork {
            difficulty,
            threshold,
        });
    }
    Ok(())
}

/// Full standalone validation: signature and network-threshold work.
pub fn validate_block(block: &Block, account: &AccountId) -> Result<(), ValidationError> {
    verify_signature(block, account)?;
    verify_work(block)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{OpenBlock, SendBlock};
    use crate::crypto::Keypair;
    use crate::types::{Amount, BlockHash};

    #[test]
    fn test_signature_valid() {
        let keypair = Keypair::from_seed(&[0x01; 32]);
        let mut block: Block = SendBlock::new(
            BlockHash::from_bytes([0x02; 32]),
            AccountId::from_bytes([0x03; 32]),
            Amount(5),
        )
        .into();
        block.sign(&keypair);

        verify_signature(&block, &keypair.account()).unwrap();
    }

    #[test]
    fn test_signature_wrong_account() {
        let keypair = Keypair::from_seed(&[0x01; 32]);
        let other = Keypair::from_seed(&[0x02; 32]);
        let mut block: Block = SendBlock::new(
            BlockHash::from_bytes([0x04; 32]),
            AccountId::from_bytes([0x05; 32]),
            Amount(5),
        )
        .into();
        block.sign(&keypair);

        assert!(matches!(
            verify_signature(&block, &other.account()),
            Err(ValidationError::SignatureFailed)
        ));
    }

    #[test]
    fn test_open_account_mismatch() {
        let keypair = Keypair::from_seed(&[0x06; 32]);
        let mut block: Block = OpenBlock::new(
            BlockHash::from_bytes([0x07; 32]),
            AccountId::from_bytes([0x08; 32]),
            AccountId::from_bytes([0x09; 32]), // not the signer
        )
        .into();
        block.sign(&keypair);

        assert!(matches!(
            verify_signature(&block, &keypair.account()),
            Err(ValidationError::AccountMismatch { .. })
        ));
    }

    #[test]
    fn test_work_threshold() {
        let block: Block = SendBlock::new(
            BlockHash::from_bytes([0x0a; 32]),
            AccountId::from_bytes([0x0b; 32]),
            Amount(1),
        )
        .into();

        // Any nonce meets a zero threshold.
        verify_work_at(&block, 0).unwrap();

        // Its actual difficulty is the exact boundary.
        let difficulty = work_difficulty(&block.root(), block.work());
        verify_work_at(&block, difficulty).unwrap();
        if difficulty < u64::MAX {
            assert!(matches!(
                verify_work_at(&block, difficulty + 1),
                Err(ValidationError::InsufficientWork { .. })
            ));
        }
    }
}
