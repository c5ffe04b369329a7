use chrono::{DateTime, Local, NaiveDate, Utc};
use log::{Log, Metadata, Record as LogRecord};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fixed output directory used by the binary
pub const OUTPUT_DIR: &str = "./saida";
pub const CSV_FILE_NAME: &str = "precipitacao_diaria.csv";
pub const JSON_FILE_NAME: &str = "precipitacao_diaria.json";
pub const DB_FILE_NAME: &str = "precipitacao.db";
pub const TABLE_NAME: &str = "precipitacao";

/// Simple logger implementation
pub struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &LogRecord) {
        if !self.enabled(record.metadata()) {
            return;
        }
        println!(
            "{} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// State capitals plus the federal district, in catalog order.
const CAPITALS: [&str; 27] = [
    "Rio Branco",
    "Maceió",
    "Macapá",
    "Manaus",
    "Salvador",
    "Fortaleza",
    "Brasília",
    "Vitória",
    "Goiânia",
    "São Luís",
    "Cuiabá",
    "Campo Grande",
    "Belo Horizonte",
    "Belém",
    "João Pessoa",
    "Curitiba",
    "Recife",
    "Teresina",
    "Rio de Janeiro",
    "Natal",
    "Porto Alegre",
    "Porto Velho",
    "Boa Vista",
    "Florianópolis",
    "São Paulo",
    "Aracaju",
    "Palmas",
];

/// The closed set of cities observations are generated for.
pub struct CityCatalog;

impl CityCatalog {
    pub const LEN: usize = CAPITALS.len();

    pub fn cities() -> &'static [&'static str] {
        &CAPITALS
    }

    pub fn contains(city: &str) -> bool {
        Self::position(city).is_some()
    }

    /// Index of `city` in catalog order, if it is a catalog member.
    pub fn position(city: &str) -> Option<usize> {
        CAPITALS.iter().position(|c| *c == city)
    }
}

/// One hourly precipitation reading for one city
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub city: String,
    pub value: f64,
}

/// Daily precipitation total for one city, as written to every sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    #[serde(rename = "data_diaria")]
    pub day: NaiveDate,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "precipitacao_mm")]
    pub total_value: f64,
}

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub start: String,
    pub end: String,
    pub output_dir: PathBuf,
    pub write_json: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start: String::new(),
            end: String::new(),
            output_dir: PathBuf::from(OUTPUT_DIR),
            write_json: false,
        }
    }
}
