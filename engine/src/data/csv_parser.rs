use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use shared::models::Candle;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// Timestamps are RFC 3339; a bare "YYYY-MM-DD HH:MM:SS" is read as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        .map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", s, e))
}

pub struct CandleCsvParser;

impl CandleCsvParser {
    // CSV Header: timestamp,open,high,low,close,volume
    // Example Row: 2024-05-01T03:00:00Z,85000000,85500000,84800000,85200000,145.25
    pub fn load_candles_from_csv(file_path: &Path) -> Result<Vec<Candle>> {
        let file = File::open(file_path)
            .with_context(|| format!("Failed to open CSV file '{}'", file_path.display()))?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.clone();
        let mut candles = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            let timestamp = parse_timestamp(Self::field(&record, &headers, "timestamp", line)?)
                .with_context(|| format!("Error parsing 'timestamp' at line {}", line))?;
            let candle = Candle {
                timestamp,
                open: Self::number(&record, &headers, "open", line)?,
                high: Self::number(&record, &headers, "high", line)?,
                low: Self::number(&record, &headers, "low", line)?,
                close: Self::number(&record, &headers, "close", line)?,
                volume: Self::number(&record, &headers, "volume", line)?,
            };
            if candle.low > candle.high {
                return Err(anyhow!("Low above high at line {}", line));
            }
            candles.push(candle);
        }

        tracing::debug!(path = %file_path.display(), count = candles.len(), "Loaded candles from CSV");
        Ok(candles)
    }

    fn field<'r>(record: &'r StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'r str> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .and_then(|i| record.get(i))
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
    }

    fn number(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64> {
        let raw = Self::field(record, headers, name, line)?;
        raw.parse::<f64>()
            .map_err(|e| anyhow!("Error parsing '{}' at line {}: {} ('{}')", name, line, e, raw))
    }
}
