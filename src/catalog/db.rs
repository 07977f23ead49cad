//! `SQLite` read-replica of the device catalog.
//!
//! The JSON catalog stays canonical. The database is a queryable copy for
//! external tools, rebuilt by `testkit migrate`.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{CpuOption, DeviceRecord, GpuOption};
use crate::error::{Result, TkError};

/// SQLite schema for the catalog replica.
const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS laptops (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    make TEXT,
    model TEXT,
    year INTEGER,
    form_factor TEXT
);

CREATE TABLE IF NOT EXISTS supported_os (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    laptop_id INTEGER REFERENCES laptops(id),
    os_name TEXT
);

CREATE TABLE IF NOT EXISTS cpu_options (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    laptop_id INTEGER REFERENCES laptops(id),
    name TEXT,
    cores INTEGER
);

CREATE TABLE IF NOT EXISTS ram_options (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    laptop_id INTEGER REFERENCES laptops(id),
    size_mb INTEGER
);

CREATE TABLE IF NOT EXISTS storage_options (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    laptop_id INTEGER REFERENCES laptops(id),
    size_gb INTEGER
);

CREATE TABLE IF NOT EXISTS gpu_options (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    laptop_id INTEGER REFERENCES laptops(id),
    name TEXT,
    vram_mb INTEGER
);

CREATE TABLE IF NOT EXISTS resolution_options (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    laptop_id INTEGER REFERENCES laptops(id),
    resolution TEXT
);
";

/// Outcome of one migration run.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationSummary {
    pub devices: usize,
    pub option_rows: usize,
    pub migrated_at: DateTime<Utc>,
}

/// Database wrapper for the catalog replica.
pub struct CatalogDb {
    conn: Connection,
}

impl std::fmt::Debug for CatalogDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogDb")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl CatalogDb {
    /// Opens or creates a database at the given path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    TkError::Database(format!(
                        "Failed to create directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        debug!(path = %path.display(), "Opening catalog database");
        let conn = Connection::open(path)
            .map_err(|e| TkError::Database(format!("Failed to open database: {e}")))?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Creates an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            TkError::Database(format!("Failed to create in-memory database: {e}"))
        })?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .map_err(|e| TkError::Database(format!("Failed to initialize schema: {e}")))?;
        Ok(())
    }

    /// Inserts every device and its option rows in one transaction.
    ///
    /// Rows are appended; migrating the same catalog twice duplicates it.
    #[instrument(skip_all, fields(devices = devices.len()))]
    pub fn migrate(&mut self, devices: &[DeviceRecord]) -> Result<MigrationSummary> {
        let tx = self.conn.transaction()?;
        let mut option_rows = 0;

        for device in devices {
            tx.execute(
                "INSERT INTO laptops (make, model, year, form_factor) VALUES (?1, ?2, ?3, ?4)",
                params![device.make, device.model, device.year, device.form_factor],
            )?;
            let laptop_id = tx.last_insert_rowid();

            for os_name in &device.supported_os {
                tx.execute(
                    "INSERT INTO supported_os (laptop_id, os_name) VALUES (?1, ?2)",
                    params![laptop_id, os_name],
                )?;
            }
            for cpu in &device.cpu_options {
                tx.execute(
                    "INSERT INTO cpu_options (laptop_id, name, cores) VALUES (?1, ?2, ?3)",
                    params![laptop_id, cpu.name, cpu.cores],
                )?;
            }
            for ram in &device.ram_options {
                tx.execute(
                    "INSERT INTO ram_options (laptop_id, size_mb) VALUES (?1, ?2)",
                    params![laptop_id, ram],
                )?;
            }
            for storage in &device.storage_options {
                tx.execute(
                    "INSERT INTO storage_options (laptop_id, size_gb) VALUES (?1, ?2)",
                    params![laptop_id, storage],
                )?;
            }
            for gpu in &device.gpu_options {
                tx.execute(
                    "INSERT INTO gpu_options (laptop_id, name, vram_mb) VALUES (?1, ?2, ?3)",
                    params![laptop_id, gpu.name, gpu.vram_mb],
                )?;
            }
            for resolution in &device.resolution_options {
                tx.execute(
                    "INSERT INTO resolution_options (laptop_id, resolution) VALUES (?1, ?2)",
                    params![laptop_id, resolution],
                )?;
            }

            option_rows += device.axis_sizes().iter().map(|(_, n)| n).sum::<usize>();
            debug!(laptop_id, device = %device.label(), "Migrated device");
        }

        tx.commit()?;

        let summary = MigrationSummary {
            devices: devices.len(),
            option_rows,
            migrated_at: Utc::now(),
        };
        info!(
            devices = summary.devices,
            option_rows = summary.option_rows,
            "Catalog migration complete"
        );
        Ok(summary)
    }

    /// Number of device rows.
    pub fn device_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM laptops", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Reads every device back, preserving insertion order of devices and options.
    pub fn load_devices(&self) -> Result<Vec<DeviceRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, make, model, year, form_factor FROM laptops ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut devices = Vec::new();
        for row in rows {
            let (id, make, model, year, form_factor) = row?;
            devices.push(DeviceRecord {
                make,
                model,
                year,
                form_factor,
                supported_os: self.column_values(
                    "SELECT os_name FROM supported_os WHERE laptop_id = ?1 ORDER BY id",
                    id,
                )?,
                cpu_options: self.cpu_options(id)?,
                ram_options: self.column_values(
                    "SELECT size_mb FROM ram_options WHERE laptop_id = ?1 ORDER BY id",
                    id,
                )?,
                storage_options: self.column_values(
                    "SELECT size_gb FROM storage_options WHERE laptop_id = ?1 ORDER BY id",
                    id,
                )?,
                gpu_options: self.gpu_options(id)?,
                resolution_options: self.column_values(
                    "SELECT resolution FROM resolution_options WHERE laptop_id = ?1 ORDER BY id",
                    id,
                )?,
            });
        }
        Ok(devices)
    }

    fn column_values<T: rusqlite::types::FromSql>(&self, sql: &str, laptop_id: i64) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let values = stmt
            .query_map(params![laptop_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(values)
    }

    fn cpu_options(&self, laptop_id: i64) -> Result<Vec<CpuOption>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, cores FROM cpu_options WHERE laptop_id = ?1 ORDER BY id")?;
        let values = stmt
            .query_map(params![laptop_id], |row| {
                Ok(CpuOption {
                    name: row.get(0)?,
                    cores: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(values)
    }

    fn gpu_options(&self, laptop_id: i64) -> Result<Vec<GpuOption>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, vram_mb FROM gpu_options WHERE laptop_id = ?1 ORDER BY id")?;
        let values = stmt
            .query_map(params![laptop_id], |row| {
                Ok(GpuOption {
                    name: row.get(0)?,
                    vram_mb: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(values)
    }
}
