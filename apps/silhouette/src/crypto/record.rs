use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{
    transform_fields, BlindIndexer, CryptoError, FieldCryptor, FieldInput, FieldOp, FieldOutputs,
};

/// Key material shared by every record store: one index secret and one
/// field key, loaded at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RecordCrypto {
    indexer: Arc<BlindIndexer>,
    cryptor: Arc<FieldCryptor>,
}

impl RecordCrypto {
    pub fn new(indexer: BlindIndexer, cryptor: FieldCryptor) -> Self {
        Self {
            indexer: Arc::new(indexer),
            cryptor: Arc::new(cryptor),
        }
    }

    pub fn blind_index(&self, plaintext: &str) -> Result<String, CryptoError> {
        self.indexer.obtain_blind_index(plaintext)
    }

    pub fn cryptor(&self) -> &FieldCryptor {
        &self.cryptor
    }

    /// Encrypts all fields of one record, all-or-nothing.
    pub async fn seal(
        &self,
        fields: Vec<FieldInput>,
        cancel: &CancellationToken,
    ) -> Result<FieldOutputs, CryptoError> {
        let cryptor = Arc::clone(&self.cryptor);
        transform_fields(
            FieldOp::Encrypt,
            fields,
            move |v: &str| cryptor.encrypt_field(v),
            cancel,
        )
        .await
    }

    /// Decrypts all fields of one record, all-or-nothing.
    pub async fn open(
        &self,
        fields: Vec<FieldInput>,
        cancel: &CancellationToken,
    ) -> Result<FieldOutputs, CryptoError> {
        let cryptor = Arc::clone(&self.cryptor);
        transform_fields(
            FieldOp::Decrypt,
            fields,
            move |v: &str| cryptor.decrypt_field(v),
            cancel,
        )
        .await
    }
}
