//! Static company reference data: display name, sector and logo per ticker.

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Symbol;

const BUILTIN_COMPANIES: &str = include_str!("../data/companies.json");

static BUILTIN: LazyLock<CompanyDirectory> = LazyLock::new(|| {
    CompanyDirectory::from_json(BUILTIN_COMPANIES).expect("bundled company data is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMeta {
    pub symbol: Symbol,
    pub name: String,
    pub sector: String,
    pub logo_url: String,
}

/// Row of the company sector table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorRow {
    pub ticker: Symbol,
    pub name: String,
    pub sector: String,
}

#[derive(Debug, Error)]
pub enum CompanyDataError {
    #[error("failed to read company data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid company data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only ticker → company lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDirectory {
    entries: Vec<CompanyMeta>,
}

impl CompanyDirectory {
    /// Directory bundled with the binary, parsed once per process.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    pub fn from_json(json: &str) -> Result<Self, CompanyDataError> {
        let entries: Vec<CompanyMeta> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CompanyDataError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CompanyDataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn lookup(&self, symbol: &Symbol) -> Option<&CompanyMeta> {
        self.entries.iter().find(|entry| &entry.symbol == symbol)
    }

    /// Known companies for `symbols`, in selection order. Unknown tickers are skipped.
    pub fn profiles_for<'a>(&'a self, symbols: &[Symbol]) -> Vec<&'a CompanyMeta> {
        symbols
            .iter()
            .filter_map(|symbol| self.lookup(symbol))
            .collect()
    }

    pub fn sector_rows(&self, symbols: &[Symbol]) -> Vec<SectorRow> {
        self.profiles_for(symbols)
            .into_iter()
            .map(|meta| SectorRow {
                ticker: meta.symbol.clone(),
                name: meta.name.clone(),
                sector: meta.sector.clone(),
            })
            .collect()
    }

    pub fn entries(&self) -> &[CompanyMeta] {
        &self.entries
    }
}
