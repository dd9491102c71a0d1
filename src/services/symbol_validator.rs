use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct SymbolRow {
    #[serde(rename = "Symbol")]
    symbol: String,
}

/// Read-only reference set of tradable tickers.
#[derive(Debug, Clone, Default)]
pub struct SymbolSet {
    symbols: HashSet<String>,
}

impl SymbolSet {
    /// Loads a CSV with a `Symbol` header column. Other columns are ignored.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open symbols file {}", path.display()))?;
        Self::from_csv_reader(file)
            .with_context(|| format!("Failed to read symbols from {}", path.display()))
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let mut symbols = HashSet::new();

        for (i, row) in rdr.deserialize::<SymbolRow>().enumerate() {
            let row = row.with_context(|| format!("Malformed symbols row {}", i + 1))?;
            // Cells are taken verbatim; blank ones are dropped
            if !row.symbol.is_empty() {
                symbols.insert(row.symbol);
            }
        }

        Ok(Self { symbols })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("Symbol is required")]
    Missing,
    #[error("Invalid stock symbol")]
    Unknown(String),
}

/// Exact, case-sensitive membership. The empty string is never valid.
pub fn validate(symbol: &str, known: &SymbolSet) -> bool {
    !symbol.is_empty() && known.contains(symbol)
}

/// Same gate as [`validate`], but says why a symbol was refused.
pub fn check_symbol(symbol: &str, known: &SymbolSet) -> Result<(), SymbolError> {
    if symbol.is_empty() {
        return Err(SymbolError::Missing);
    }
    if !validate(symbol, known) {
        return Err(SymbolError::Unknown(symbol.to_string()));
    }
    Ok(())
}
