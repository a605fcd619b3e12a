//! Store contracts.
//!
//! All three stores are used from one thread, in the order the batch runner
//! drives them.

use chrono::{DateTime, Utc};

use vcard_model::{BatchId, CanonicalField, IdempotencyKey, NormalizedRecord, RecordId};

use crate::error::Result;

/// One record on its way into a store, with the identifiers both stores share.
#[derive(Debug, Clone, Copy)]
pub struct RecordEnvelope<'a> {
    pub id: RecordId,
    pub batch_id: &'a BatchId,
    pub idempotency_key: IdempotencyKey,
    pub record: &'a NormalizedRecord,
    pub written_at: DateTime<Utc>,
}

/// The searchable subset of a record kept in the narrow store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrowRecord {
    pub id: RecordId,
    pub batch_id: BatchId,
    pub idempotency_key: IdempotencyKey,
    pub full_name: Option<String>,
    pub work_phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub email: Option<String>,
    pub business_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NarrowRecord {
    pub fn project(envelope: &RecordEnvelope<'_>) -> Self {
        let field = |field: CanonicalField| envelope.record.get(field).map(str::to_string);
        Self {
            id: envelope.id,
            batch_id: envelope.batch_id.clone(),
            idempotency_key: envelope.idempotency_key,
            full_name: field(CanonicalField::FullName),
            work_phone: field(CanonicalField::WorkPhone),
            mobile_phone: field(CanonicalField::MobilePhone),
            email: field(CanonicalField::Email),
            business_name: field(CanonicalField::BusinessName),
            created_at: envelope.written_at,
        }
    }
}

/// Fast-lookup store holding [`NarrowRecord`]s.
///
/// Inserts may stay invisible to readers until [`NarrowStore::checkpoint`].
pub trait NarrowStore {
    fn insert(&mut self, envelope: &RecordEnvelope<'_>) -> Result<()>;

    /// Makes every insert so far durable and visible.
    fn checkpoint(&mut self) -> Result<()>;
}

/// Wide-column store holding the complete record. Every insert is durable
/// on return.
pub trait WideStore {
    fn insert(&mut self, envelope: &RecordEnvelope<'_>) -> Result<()>;
}

/// Externally visible batch status.
///
/// Each call moves the batch along its lifecycle once; a repeated or
/// out-of-order call is an error.
pub trait StatusTracker {
    fn begin(&mut self, batch_id: &BatchId) -> Result<()>;

    fn complete(&mut self, batch_id: &BatchId, total: usize, processed: usize) -> Result<()>;

    fn fail(&mut self, batch_id: &BatchId, message: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use vcard_model::MappedFields;

    use super::*;

    #[test]
    fn projection_keeps_searchable_fields() {
        let mut mapped = MappedFields::new();
        mapped.set(CanonicalField::FullName, "Ana Jimenez");
        mapped.set(CanonicalField::Email, "ana@example.com");
        mapped.set(CanonicalField::AddressCity, "Cartago");
        let record = NormalizedRecord::from(mapped);
        let batch_id = BatchId::new("b-1").unwrap();

        let envelope = RecordEnvelope {
            id: RecordId::new_v4(),
            batch_id: &batch_id,
            idempotency_key: IdempotencyKey::for_row(&batch_id, 0),
            record: &record,
            written_at: Utc::now(),
        };
        let narrow = NarrowRecord::project(&envelope);
        assert_eq!(narrow.full_name.as_deref(), Some("Ana Jimenez"));
        assert_eq!(narrow.email.as_deref(), Some("ana@example.com"));
        assert_eq!(narrow.work_phone, None);
        assert_eq!(narrow.id, envelope.id);
    }
}
