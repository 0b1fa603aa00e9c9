// ==========================================
// Vendas Ingest - ingestion configuration
// ==========================================
// Injectable configuration for the ingestion pipeline: the
// employee-to-store mapping table, the known branch list for
// filename scoping, and the reference-year policy for date
// parsing. Kept as plain data so the resolution algorithms
// stay pure and testable independent of the table contents.
// ==========================================

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// YearPolicy
// ==========================================
// Ledger exports carry no year in their date tokens; the year is
// an explicit configuration choice, never inferred per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearPolicy {
    /// Use the current system year.
    CurrentYear,
    /// Use a fixed configured year (deterministic; preferred in tests).
    Fixed(i32),
}

impl YearPolicy {
    /// Year stamped onto every parsed ledger date.
    pub fn reference_year(&self) -> i32 {
        match self {
            YearPolicy::CurrentYear => chrono::Local::now().year(),
            YearPolicy::Fixed(year) => *year,
        }
    }
}

impl Default for YearPolicy {
    fn default() -> Self {
        YearPolicy::CurrentYear
    }
}

// ==========================================
// IngestConfig
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Reference-year policy for date parsing.
    #[serde(default)]
    pub year_policy: YearPolicy,

    /// Static employee-token -> store-name mapping (static-mapping
    /// variant). Tokens absent from the table fall back to identity.
    pub operator_store_map: HashMap<String, String>,

    /// Known branch names for filename scoping, in match-priority
    /// order: the first branch found as a substring of the uppercased
    /// filename wins.
    pub known_branches: Vec<String>,
}

impl IngestConfig {
    /// Load a configuration from JSON.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl Default for IngestConfig {
    /// Production tables for the current branch network.
    fn default() -> Self {
        let operator_store_map = [
            ("ROBERTO", "Belvedere"),
            ("SUELEM", "Belvedere"),
            ("GABRIELA", "Belvedere"),
            ("ONLINE", "Belvedere"),
            ("KEYLA", "Belvedere"),
            ("ARETHA", "Belvedere"),
            ("JENIFFER", "Belvedere"),
            ("Egberto", "Belvedere"),
            ("Maiana", "Belvedere"),
            ("IZA", "Contagem"),
            ("ALICE", "Independência"),
            ("CHEILA", "Independência"),
            ("ONLINE ID", "Independência"),
            ("SUSANE", "Independência"),
            ("JOSIANE DE PAULA", "Independência"),
            ("NASCIMENTO", "Independência"),
            ("PILLY", "Betim"),
            ("SCARLET", "Betim"),
            ("ONLINE BT", "Betim"),
        ]
        .into_iter()
        .map(|(operator, store)| (operator.to_string(), store.to_string()))
        .collect();

        let known_branches = [
            "Taquaril",
            "Contagem",
            "Barão",
            "Belvedere",
            "Betim",
            "Independência",
            "Ibirité",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self {
            year_policy: YearPolicy::default(),
            operator_store_map,
            known_branches,
        }
    }
}
