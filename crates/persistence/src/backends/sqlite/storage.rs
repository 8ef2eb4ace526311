//! Entity storage implementations for SQLite.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params, params_from_iter};
use tracing::{debug, info, warn};

use crate::core::{MedicationStorage, PatientStorage, PrescriptionStorage, RecordStorage};
use crate::error::{
    IntegrityError, ResourceError, StorageError, StorageResult, ValidationError,
};
use crate::filter::{Filter, MedicationFilter, PatientFilter, PrescriptionFilter};
use crate::types::{
    Medication, MedicationStatus, NewMedication, NewPatient, NewPrescription, Patient,
    PersonName, Prescription, PrescriptionPatch, PrescriptionStatus,
};
use crate::validation::Validate;

use super::SqliteBackend;
use super::query_builder::{QueryBuilder, SqlFragment};

const PATIENT_COLUMNS: &str = "pt.id, pt.last_name, pt.first_name, pt.birth_date";

const MEDICATION_COLUMNS: &str = "m.id, m.code, m.label, m.status";

const PRESCRIPTION_SELECT: &str = "SELECT p.id, p.patient_id, p.medication_id, \
     p.start_date, p.end_date, p.status, p.comment, p.created_at, p.updated_at, \
     pt.first_name, pt.last_name \
     FROM prescriptions p JOIN patients pt ON pt.id = p.patient_id";

impl FromSql for MedicationStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for MedicationStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PrescriptionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for PrescriptionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        last_name: row.get(1)?,
        first_name: row.get(2)?,
        birth_date: row.get(3)?,
    })
}

fn medication_from_row(row: &Row<'_>) -> rusqlite::Result<Medication> {
    Ok(Medication {
        id: row.get(0)?,
        code: row.get(1)?,
        label: row.get(2)?,
        status: row.get(3)?,
    })
}

fn prescription_from_row(row: &Row<'_>) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        medication_id: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        status: row.get(5)?,
        comment: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        patient_name: PersonName {
            first_name: row.get(9)?,
            last_name: row.get(10)?,
        },
    })
}

/// Appends `WHERE` and `ORDER BY` to a base query and runs it.
fn query_list<T>(
    conn: &Connection,
    base: &str,
    filter: SqlFragment,
    order_by: &str,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> StorageResult<Vec<T>> {
    let mut sql = base.to_string();
    if !filter.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filter.sql);
    }
    sql.push_str(" ORDER BY ");
    sql.push_str(order_by);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(filter.params.iter()), map)?;
    let records = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

fn read_patient(conn: &Connection, id: i64) -> StorageResult<Option<Patient>> {
    let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients pt WHERE pt.id = ?1");
    let patient = conn
        .query_row(&sql, [id], patient_from_row)
        .optional()?;
    Ok(patient)
}

fn read_medication(conn: &Connection, id: i64) -> StorageResult<Option<Medication>> {
    let sql = format!("SELECT {MEDICATION_COLUMNS} FROM medications m WHERE m.id = ?1");
    let medication = conn
        .query_row(&sql, [id], medication_from_row)
        .optional()?;
    Ok(medication)
}

fn read_prescription(conn: &Connection, id: i64) -> StorageResult<Option<Prescription>> {
    let sql = format!("{PRESCRIPTION_SELECT} WHERE p.id = ?1");
    let prescription = conn
        .query_row(&sql, [id], prescription_from_row)
        .optional()?;
    Ok(prescription)
}

fn row_exists(conn: &Connection, table: &str, id: i64) -> StorageResult<bool> {
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
    let found = conn.query_row(&sql, [id], |_| Ok(())).optional()?;
    Ok(found.is_some())
}

/// Fails with a field-attributed error if a referenced row is missing.
fn check_references(conn: &Connection, record: &NewPrescription) -> StorageResult<()> {
    if !row_exists(conn, "patients", record.patient_id)? {
        return Err(ValidationError::ReferenceNotFound {
            field: "patient",
            entity: "patient",
            id: record.patient_id,
        }
        .into());
    }
    if !row_exists(conn, "medications", record.medication_id)? {
        return Err(ValidationError::ReferenceNotFound {
            field: "medication",
            entity: "medication",
            id: record.medication_id,
        }
        .into());
    }
    Ok(())
}

/// Runs the pre-commit hook, logging rejected writes.
fn run_hook(record: &impl Validate, entity: &'static str) -> StorageResult<()> {
    record.validate().map_err(|e| {
        warn!(entity, field = e.field(), error = %e, "Rejected write");
        StorageError::from(e)
    })
}

fn not_found(entity: &'static str, id: i64) -> StorageError {
    ResourceError::NotFound { entity, id }.into()
}

#[async_trait]
impl PatientStorage for SqliteBackend {
    async fn find_patient(&self, id: i64) -> StorageResult<Option<Patient>> {
        let conn = self.get_connection()?;
        read_patient(&conn, id)
    }

    async fn list_patients(&self, filter: &PatientFilter) -> StorageResult<Vec<Patient>> {
        let conn = self.get_connection()?;
        let base = format!("SELECT {PATIENT_COLUMNS} FROM patients pt");
        query_list(
            &conn,
            &base,
            QueryBuilder::new("pt").build(&filter.criteria()),
            "pt.last_name, pt.first_name, pt.id",
            patient_from_row,
        )
    }

    async fn create_patient(&self, patient: NewPatient) -> StorageResult<Patient> {
        run_hook(&patient, "patient")?;
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO patients (last_name, first_name, birth_date) VALUES (?1, ?2, ?3)",
            params![patient.last_name, patient.first_name, patient.birth_date],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, "Created patient");
        read_patient(&conn, id)?.ok_or_else(|| not_found("patient", id))
    }

    async fn delete_patient(&self, id: i64) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        if !row_exists(&tx, "patients", id)? {
            return Err(not_found("patient", id));
        }
        // Cascade explicitly so it does not depend on the foreign_keys pragma.
        let removed = tx.execute("DELETE FROM prescriptions WHERE patient_id = ?1", [id])?;
        tx.execute("DELETE FROM patients WHERE id = ?1", [id])?;
        tx.commit()?;
        debug!(id, prescriptions = removed, "Deleted patient");
        Ok(())
    }
}

#[async_trait]
impl MedicationStorage for SqliteBackend {
    async fn find_medication(&self, id: i64) -> StorageResult<Option<Medication>> {
        let conn = self.get_connection()?;
        read_medication(&conn, id)
    }

    async fn list_medications(&self, filter: &MedicationFilter) -> StorageResult<Vec<Medication>> {
        let conn = self.get_connection()?;
        let base = format!("SELECT {MEDICATION_COLUMNS} FROM medications m");
        query_list(
            &conn,
            &base,
            QueryBuilder::new("m").build(&filter.criteria()),
            "m.code, m.id",
            medication_from_row,
        )
    }

    async fn create_medication(&self, medication: NewMedication) -> StorageResult<Medication> {
        run_hook(&medication, "medication")?;
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        let taken = tx
            .query_row(
                "SELECT 1 FROM medications WHERE code = ?1",
                [&medication.code],
                |_| Ok(()),
            )
            .optional()?;
        if taken.is_some() {
            return Err(ResourceError::AlreadyExists {
                entity: "medication",
                key: medication.code,
            }
            .into());
        }
        tx.execute(
            "INSERT INTO medications (code, label, status) VALUES (?1, ?2, ?3)",
            params![medication.code, medication.label, medication.status],
        )?;
        let id = tx.last_insert_rowid();
        let stored = read_medication(&tx, id)?.ok_or_else(|| not_found("medication", id))?;
        tx.commit()?;
        debug!(id, code = %stored.code, "Created medication");
        Ok(stored)
    }

    async fn delete_medication(&self, id: i64) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        if !row_exists(&tx, "medications", id)? {
            return Err(not_found("medication", id));
        }
        let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM prescriptions WHERE medication_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        let count = count as u64;
        if count > 0 {
            warn!(id, count, "Refused to delete referenced medication");
            return Err(IntegrityError::ProtectedReference {
                entity: "medication",
                id,
                referenced_by: "prescriptions",
                count,
            }
            .into());
        }
        tx.execute("DELETE FROM medications WHERE id = ?1", [id])?;
        tx.commit()?;
        debug!(id, "Deleted medication");
        Ok(())
    }
}

#[async_trait]
impl PrescriptionStorage for SqliteBackend {
    async fn find_prescription(&self, id: i64) -> StorageResult<Option<Prescription>> {
        let conn = self.get_connection()?;
        read_prescription(&conn, id)
    }

    async fn list_prescriptions(
        &self,
        filter: &PrescriptionFilter,
    ) -> StorageResult<Vec<Prescription>> {
        let conn = self.get_connection()?;
        query_list(
            &conn,
            PRESCRIPTION_SELECT,
            QueryBuilder::new("p").build(&filter.criteria()),
            "p.start_date DESC, p.patient_id ASC, p.id ASC",
            prescription_from_row,
        )
    }

    async fn create_prescription(
        &self,
        prescription: NewPrescription,
    ) -> StorageResult<Prescription> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        run_hook(&prescription, "prescription")?;
        check_references(&tx, &prescription)?;

        let now = Utc::now();
        tx.execute(
            "INSERT INTO prescriptions
                (patient_id, medication_id, start_date, end_date, status, comment,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                prescription.patient_id,
                prescription.medication_id,
                prescription.start_date,
                prescription.end_date,
                prescription.status,
                prescription.comment,
                now,
            ],
        )?;
        let id = tx.last_insert_rowid();
        let stored = read_prescription(&tx, id)?.ok_or_else(|| not_found("prescription", id))?;
        tx.commit()?;
        debug!(id, patient_id = stored.patient_id, "Created prescription");
        Ok(stored)
    }

    async fn update_prescription(
        &self,
        id: i64,
        patch: PrescriptionPatch,
    ) -> StorageResult<Prescription> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        let current = read_prescription(&tx, id)?.ok_or_else(|| not_found("prescription", id))?;

        let merged = patch.apply_to(&current);
        run_hook(&merged, "prescription")?;
        check_references(&tx, &merged)?;

        tx.execute(
            "UPDATE prescriptions
             SET patient_id = ?1, medication_id = ?2, start_date = ?3, end_date = ?4,
                 status = ?5, comment = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                merged.patient_id,
                merged.medication_id,
                merged.start_date,
                merged.end_date,
                merged.status,
                merged.comment,
                Utc::now(),
                id,
            ],
        )?;
        let stored = read_prescription(&tx, id)?.ok_or_else(|| not_found("prescription", id))?;
        tx.commit()?;
        debug!(id, "Updated prescription");
        Ok(stored)
    }

    async fn delete_prescription(&self, id: i64) -> StorageResult<()> {
        let conn = self.get_connection()?;
        let removed = conn.execute("DELETE FROM prescriptions WHERE id = ?1", [id])?;
        if removed == 0 {
            return Err(not_found("prescription", id));
        }
        debug!(id, "Deleted prescription");
        Ok(())
    }

    async fn delete_all_prescriptions(&self) -> StorageResult<u64> {
        let conn = self.get_connection()?;
        let removed = conn.execute("DELETE FROM prescriptions", [])?;
        info!(removed, "Deleted all prescriptions");
        Ok(removed as u64)
    }
}

#[async_trait]
impl RecordStorage for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.ping()
    }
}
