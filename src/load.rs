use crate::error::{PersistenceError, Result};
use crate::structs::{CSV_FILE_NAME, DB_FILE_NAME, DailyBucket, JSON_FILE_NAME, TABLE_NAME};
use csv::Writer;
use log::{debug, info};
use rusqlite::{Connection, params};
use std::io::Write;
use std::{fs::File, path::Path};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

type SinkResult = std::result::Result<(), PersistenceError>;

/// Writes daily totals to a UTF-8 (with BOM) CSV file.
///
/// Columns are `data_diaria,cidade,precipitacao_mm`, one row per bucket.
///
/// # Errors
/// Returns error if the file cannot be created or written to.
pub fn write_csv(results: &[DailyBucket], output_path: &Path) -> SinkResult {
    let mut file = File::create(output_path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = Writer::from_writer(file);
    if results.is_empty() {
        writer.write_record(["data_diaria", "cidade", "precipitacao_mm"])?;
    }
    for bucket in results {
        writer.serialize(bucket)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes daily totals to a pretty-formatted JSON array.
///
/// # Errors
/// Returns error if file cannot be created or serialization fails.
pub fn write_json(results: &[DailyBucket], output_path: &Path) -> SinkResult {
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, results)?;
    Ok(())
}

/// Writes daily totals to the `precipitacao` table of a SQLite database file.
///
/// Any existing table with that name is dropped first. Rows are inserted inside a
/// single transaction, so a failure leaves the table either absent or empty.
///
/// # Errors
/// Returns error if the database cannot be opened or any statement fails.
pub fn write_sqlite(results: &[DailyBucket], output_path: &Path) -> SinkResult {
    let mut conn = Connection::open(output_path)?;
    conn.execute_batch(&format!(
        "DROP TABLE IF EXISTS {TABLE_NAME};
         CREATE TABLE {TABLE_NAME} (
             data_diaria DATE,
             cidade TEXT,
             precipitacao_mm REAL
         );"
    ))?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {TABLE_NAME} (data_diaria, cidade, precipitacao_mm) VALUES (?1, ?2, ?3)"
        ))?;
        for bucket in results {
            stmt.execute(params![
                bucket.day.format("%Y-%m-%d").to_string(),
                bucket.city,
                bucket.total_value
            ])?;
        }
    }
    tx.commit()?;

    conn.close().map_err(|(_, e)| e)?;
    Ok(())
}

/// Persists daily totals to every configured sink inside `output_dir`.
///
/// The CSV and SQLite sinks are always written, the JSON sink only when
/// `with_json` is set. Sinks are written one after another; a failure in a later
/// sink does not roll back an earlier one.
///
/// # Errors
/// Returns `PipelineError::Persistence` if `output_dir` is not an existing
/// directory or if any sink fails.
pub fn save_outputs(results: &[DailyBucket], output_dir: &Path, with_json: bool) -> Result<()> {
    if !output_dir.is_dir() {
        return Err(PersistenceError::MissingDirectory(output_dir.to_path_buf()).into());
    }

    let csv_path = output_dir.join(CSV_FILE_NAME);
    write_csv(results, &csv_path)?;
    debug!("  - {}", csv_path.display());

    let db_path = output_dir.join(DB_FILE_NAME);
    write_sqlite(results, &db_path)?;
    debug!("  - {}", db_path.display());

    if with_json {
        let json_path = output_dir.join(JSON_FILE_NAME);
        write_json(results, &json_path)?;
        debug!("  - {}", json_path.display());
    }

    info!("Data saved to {}.", output_dir.display());
    Ok(())
}
