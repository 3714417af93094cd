//! Envelope validation: signature verification and structural checks.

use crate::crypto::{PublicKey, Sha512Hash, Signature};
use crate::envelope::{Batch, BatchHeader, Transaction, TransactionHeader};
use crate::error::ValidationError;

/// Validate a transaction and return its decoded header.
///
/// This performs:
/// - Header decoding
/// - Payload hash verification
/// - Signature verification against `signer_public_key`
pub fn validate_transaction(txn: &Transaction) -> Result<TransactionHeader, ValidationError> {
    let header = txn.decode_header()?;

    if Sha512Hash::hash(&txn.payload).to_hex() != header.payload_sha512 {
        return Err(ValidationError::PayloadHashMismatch);
    }

    verify_header_signature(&header.signer_public_key, &txn.header, &txn.header_signature)?;
    Ok(header)
}

/// Validate a batch and every transaction in it.
///
/// Beyond per-transaction checks, the signed id list must match the carried
/// transactions exactly and in order, and each transaction must name the
/// batch signer as its batcher.
pub fn validate_batch(batch: &Batch) -> Result<BatchHeader, ValidationError> {
    let header = batch.decode_header()?;

    verify_header_signature(&header.signer_public_key, &batch.header, &batch.header_signature)?;

    if batch.transactions.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    if header.transaction_ids.len() != batch.transactions.len() {
        return Err(ValidationError::TransactionCountMismatch {
            declared: header.transaction_ids.len(),
            actual: batch.transactions.len(),
        });
    }

    for (position, (declared, txn)) in header
        .transaction_ids
        .iter()
        .zip(&batch.transactions)
        .enumerate()
    {
        if declared != &txn.header_signature {
            return Err(ValidationError::TransactionIdMismatch { position });
        }
        let txn_header = validate_transaction(txn)?;
        if txn_header.batcher_public_key != header.signer_public_key {
            return Err(ValidationError::BatcherMismatch);
        }
    }

    Ok(header)
}

fn verify_header_signature(
    public_key: &str,
    header: &[u8],
    signature: &str,
) -> Result<(), ValidationError> {
    let key = PublicKey::from_hex(public_key).map_err(|_| ValidationError::SignatureFailed)?;
    let sig = Signature::from_hex(signature).map_err(|_| ValidationError::SignatureFailed)?;
    key.verify(header, &sig)
        .map_err(|_| ValidationError::SignatureFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Keypair, Signer};
    use crate::envelope::{build_batch, build_transaction, BatchBuilder, TransactionBuilder};
    use crate::nonce::SequenceNonce;
    use crate::payload::Action;
    use bytes::Bytes;
    use proptest::prelude::*;

    fn signed_batch(keypair: &Keypair) -> Batch {
        let nonces = SequenceNonce::new();
        let txns = vec![
            build_transaction(Action::Bake(5), keypair, &nonces).unwrap(),
            build_transaction(Action::Eat(2), keypair, &nonces).unwrap(),
        ];
        build_batch(txns, keypair).unwrap()
    }

    #[test]
    fn test_valid_batch() {
        let keypair = Keypair::generate();
        let batch = signed_batch(&keypair);
        let header = validate_batch(&batch).unwrap();
        assert_eq!(header.signer_public_key, keypair.public_key().to_hex());
    }

    #[test]
    fn test_payload_swap_detected() {
        let keypair = Keypair::generate();
        let mut txn = TransactionBuilder::new(Action::Bake(5), "n")
            .sign(&keypair)
            .unwrap();
        txn.payload = Bytes::from_static(b"bake,500");
        assert_eq!(
            validate_transaction(&txn),
            Err(ValidationError::PayloadHashMismatch)
        );
    }

    #[test]
    fn test_reordered_transactions_detected() {
        let keypair = Keypair::generate();
        let mut batch = signed_batch(&keypair);
        batch.transactions.swap(0, 1);
        assert_eq!(
            validate_batch(&batch),
            Err(ValidationError::TransactionIdMismatch { position: 0 })
        );
    }

    #[test]
    fn test_foreign_batcher_detected() {
        let alice = Keypair::generate();
        let bob = Keypair::generate();
        let txn = TransactionBuilder::new(Action::Bake(1), "n")
            .sign(&alice)
            .unwrap();
        let batch = BatchBuilder::new().add(txn).sign(&bob).unwrap();
        assert_eq!(validate_batch(&batch), Err(ValidationError::BatcherMismatch));
    }

    #[test]
    fn test_declared_batcher_accepted() {
        let alice = Keypair::generate();
        let bob = Keypair::generate();
        let txn = TransactionBuilder::new(Action::Bake(1), "n")
            .batcher(bob.public_key().to_hex())
            .sign(&alice)
            .unwrap();
        let batch = BatchBuilder::new().add(txn).sign(&bob).unwrap();
        assert!(validate_batch(&batch).is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn any_header_byte_flip_breaks_batch(index in 0usize..4096, bit in 0u8..8) {
            let keypair = Keypair::from_secret(&[0x24; 32]).unwrap();
            let mut batch = signed_batch(&keypair);
            let mut header = batch.header.to_vec();
            let index = index % header.len();
            header[index] ^= 1 << bit;
            batch.header = Bytes::from(header);
            prop_assert!(validate_batch(&batch).is_err());
        }

        #[test]
        fn any_transaction_header_byte_flip_breaks_signature(
            which in 0usize..2,
            index in 0usize..4096,
            bit in 0u8..8,
        ) {
            let keypair = Keypair::from_secret(&[0x42; 32]).unwrap();
            let mut batch = signed_batch(&keypair);
            let txn = &mut batch.transactions[which];
            let mut header = txn.header.to_vec();
            let index = index % header.len();
            header[index] ^= 1 << bit;
            txn.header = Bytes::from(header);

            let signature = Signature::from_hex(&txn.header_signature).unwrap();
            prop_assert!(keypair.public_key().verify(&txn.header, &signature).is_err());
            prop_assert!(validate_transaction(txn).is_err());
            prop_assert!(validate_batch(&batch).is_err());
        }
    }
}
