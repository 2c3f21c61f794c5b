//! Unit-of-work session
//!
//! A `Session` stages transient records and writes them in one transaction
//! on [`Session::commit`]. Staged records are tracked by [`RecordKey`]; after
//! a successful commit the key resolves to a `Record::Persisted` carrying the
//! backend-assigned id.
//!
//! Values queued with [`Session::bulk_save`] are written by the same commit
//! but are not tracked: their ids are never reported back. Callers that need
//! ids must use [`Session::stage`].

use chrono::Local;
use registrar_core::errors::RegistrarError;
use registrar_core::model::{Persisted, Record};
use registrar_core::{log_op_end, log_op_error, log_op_start};
use registrar_core_types::events::op;
use registrar_core_types::SessionId;

use crate::db::Database;
use crate::errors::{from_rusqlite, Result};
use crate::repo::entity::{insert_row, Entity};

/// Handle to a record staged in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordKey(usize);

impl RecordKey {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Outcome of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport<E> {
    /// Staged records, in staging order, with their assigned ids
    pub persisted: Vec<(RecordKey, Persisted<E>)>,
    /// Rows written from `bulk_save`. Their ids are not reported.
    pub bulk_inserted: usize,
}

impl<E> CommitReport<E> {
    /// Ids assigned to staged records, in staging order
    pub fn ids(&self) -> Vec<i64> {
        self.persisted.iter().map(|(_, p)| p.id()).collect()
    }
}

/// Unit of work over one [`Database`]
///
/// Holds the database exclusively for its lifetime. Opening a session has no
/// effect on the backend.
pub struct Session<'db, E: Entity> {
    db: &'db mut Database,
    id: SessionId,
    records: Vec<Option<Record<E>>>,
    pending: Vec<RecordKey>,
    bulk: Vec<E>,
    commits: usize,
}

impl<'db, E: Entity> Session<'db, E> {
    /// Open a session on `db`
    pub fn open(db: &'db mut Database) -> Self {
        let id = SessionId::new();
        tracing::debug!(session_id = %id, table = E::TABLE, "Opened session");
        Self {
            db,
            id,
            records: Vec::new(),
            pending: Vec::new(),
            bulk: Vec::new(),
            commits: 0,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.id
    }

    /// Stage a transient value for insertion on the next commit
    pub fn stage(&mut self, value: E) -> RecordKey {
        let key = RecordKey(self.records.len());
        self.records.push(Some(Record::Transient(value)));
        self.pending.push(key);
        key
    }

    /// Queue values for insertion without tracking them
    ///
    /// The next commit writes these rows but never reports their ids; the
    /// caller's copies stay id-less. Returns the number of values queued.
    pub fn bulk_save(&mut self, values: impl IntoIterator<Item = E>) -> usize {
        let before = self.bulk.len();
        self.bulk.extend(values);
        self.bulk.len() - before
    }

    /// Current state of a staged record
    ///
    /// `None` for keys never issued by this session and for keys that were
    /// expunged or rolled back.
    pub fn get(&self, key: RecordKey) -> Option<&Record<E>> {
        self.records.get(key.0).and_then(Option::as_ref)
    }

    /// Backend id of a staged record, absent until committed
    pub fn id_of(&self, key: RecordKey) -> Option<i64> {
        self.get(key).and_then(Record::id)
    }

    /// Like [`Session::get`], but an unknown key is an error
    pub fn record(&self, key: RecordKey) -> Result<&Record<E>> {
        self.get(key)
            .ok_or_else(|| RegistrarError::UnknownRecordKey { key: key.0 }.into())
    }

    /// Records staged and not yet committed
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Values queued by `bulk_save` and not yet committed
    pub fn bulk_count(&self) -> usize {
        self.bulk.len()
    }

    /// Whether at least one commit succeeded
    pub fn is_committed(&self) -> bool {
        self.commits > 0
    }

    /// Remove a pending record from the next commit, returning its value
    ///
    /// Returns `None` if the key is not pending (unknown or already persisted).
    /// The key is unknown to the session afterwards.
    pub fn expunge(&mut self, key: RecordKey) -> Option<E> {
        let position = self.pending.iter().position(|k| *k == key)?;
        self.pending.remove(position);
        self.take_value(key)
    }

    /// Drop everything pending (staged and bulk), returning the values
    ///
    /// Use after a failed commit to correct values and stage them again.
    /// Rolled-back keys are unknown to the session afterwards.
    pub fn rollback(&mut self) -> Vec<E> {
        let keys: Vec<RecordKey> = self.pending.drain(..).collect();
        let mut values: Vec<E> = keys
            .into_iter()
            .filter_map(|key| self.take_value(key))
            .collect();
        values.append(&mut self.bulk);
        values
    }

    fn take_value(&mut self, key: RecordKey) -> Option<E> {
        self.records
            .get_mut(key.0)
            .and_then(Option::take)
            .map(Record::into_value)
    }

    /// Write all pending records in one transaction
    ///
    /// On success every staged record becomes `Persisted` with its id and
    /// applied defaults. On failure the transaction is rolled back, nothing is
    /// written, and pending records stay transient and pending.
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::ConstraintViolation`: a row violated a unique or check constraint
    /// - `ExErrorKind::Schema`: the entity's table was never materialized on this database
    pub fn commit(&mut self) -> Result<CommitReport<E>> {
        log_op_start!(
            op::SESSION_COMMIT,
            session_id = %self.id,
            table = E::TABLE,
            pending_len = self.pending.len(),
            bulk_len = self.bulk.len()
        );
        let start = std::time::Instant::now();

        let report = self.commit_impl().map_err(|e| {
            let e = e.with_session_id(self.id);
            log_op_error!(
                op::SESSION_COMMIT,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                session_id = %self.id
            );
            e
        })?;

        log_op_end!(
            op::SESSION_COMMIT,
            duration_ms = start.elapsed().as_millis() as u64,
            session_id = %self.id,
            persisted = report.persisted.len(),
            bulk_inserted = report.bulk_inserted
        );

        Ok(report)
    }

    fn commit_impl(&mut self) -> Result<CommitReport<E>> {
        let table = self
            .db
            .table(E::TABLE)
            .cloned()
            .ok_or_else(|| RegistrarError::TableNotMaterialized {
                table: E::TABLE.to_string(),
            })?;
        let now = Local::now().naive_local();

        let tx = self
            .db
            .connection_mut()
            .transaction()
            .map_err(from_rusqlite)?;

        let mut persisted = Vec::with_capacity(self.pending.len());
        for key in &self.pending {
            let Some(record) = self.records.get(key.0).and_then(Option::as_ref) else {
                continue;
            };
            let mut value = record.value().clone();
            value.apply_defaults(&table, now);
            let id = insert_row(&tx, &table, &value)?;
            tracing::debug!(session_id = %self.id, record_id = id, "Inserted staged record");
            persisted.push((*key, Persisted::new(id, value)));
        }

        for value in &self.bulk {
            let mut value = value.clone();
            value.apply_defaults(&table, now);
            insert_row(&tx, &table, &value)?;
        }

        tx.commit().map_err(from_rusqlite)?;

        for (key, row) in &persisted {
            self.records[key.0] = Some(Record::Persisted(row.clone()));
        }
        self.pending.clear();
        let bulk_inserted = self.bulk.len();
        self.bulk.clear();
        self.commits += 1;

        Ok(CommitReport {
            persisted,
            bulk_inserted,
        })
    }
}
