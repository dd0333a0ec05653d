//! Portfolio file loading: JSON, CSV, free text, or a saved `@name`.

use std::path::Path;

use folio::{Position, RawPosition, parse_csv, parse_positions, parse_text};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::store::PortfolioStore;

/// A portfolio file in JSON form.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub positions: Vec<FilePosition>,
}

/// One position in a JSON portfolio file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePosition {
    pub ticker: String,
    pub amount: Field,
    pub target_percent: Field,
}

/// A number that may be written as `30000`, `"30000"` or `"$30,000"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Number(f64),
    Text(String),
}

impl Field {
    fn into_text(self) -> String {
        match self {
            Field::Number(n) => n.to_string(),
            Field::Text(s) => s,
        }
    }
}

impl PortfolioSpec {
    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Text records, unvalidated.
    pub fn raw_positions(&self) -> Vec<RawPosition> {
        self.positions
            .iter()
            .cloned()
            .map(|p| RawPosition {
                ticker: p.ticker,
                amount: p.amount.into_text(),
                target_percent: p.target_percent.into_text(),
            })
            .collect()
    }

    /// Validated positions.
    pub fn to_positions(&self) -> Result<Vec<Position>> {
        Ok(parse_positions(&self.raw_positions())?)
    }
}

/// A portfolio ready for calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPortfolio {
    pub name: String,
    pub positions: Vec<Position>,
}

/// Resolve a command-line portfolio argument.
///
/// `@name` reads from the saved store. Otherwise the argument is a path and
/// the extension picks the parser: `.json`, `.csv`, anything else free text.
pub fn load(arg: &str, store: &PortfolioStore) -> Result<LoadedPortfolio> {
    if let Some(name) = arg.strip_prefix('@') {
        let saved = store
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        let positions = parse_positions(&saved.positions)?;
        log::info!("loaded saved portfolio \"{name}\" ({} positions)", positions.len());
        return Ok(LoadedPortfolio {
            name: saved.name,
            positions,
        });
    }

    let path = Path::new(arg);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::PortfolioRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| arg.to_string());

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    let loaded = match extension.as_deref() {
        Some("json") => {
            let spec = PortfolioSpec::from_json(&contents)?;
            LoadedPortfolio {
                name: spec.name.clone().unwrap_or(stem),
                positions: spec.to_positions()?,
            }
        }
        Some("csv") => LoadedPortfolio {
            name: stem,
            positions: parse_csv(&contents)?,
        },
        _ => LoadedPortfolio {
            name: stem,
            positions: parse_text(&contents)?,
        },
    };

    log::info!(
        "loaded {} ({} positions)",
        path.display(),
        loaded.positions.len()
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> &'static str {
        r#"{
            "name": "Three fund",
            "positions": [
                { "ticker": "vti",  "amount": 30000,     "targetPercent": 60 },
                { "ticker": "VXUS", "amount": "$15,000", "targetPercent": "30%" },
                { "ticker": "BND",  "amount": "5000",    "targetPercent": 10 }
            ]
        }"#
    }

    fn write(dir: &tempfile::TempDir, file: &str, contents: &str) -> String {
        let path = dir.path().join(file);
        std::fs::write(&path, contents).unwrap();
        path.display().to_string()
    }

    fn empty_store(dir: &tempfile::TempDir) -> PortfolioStore {
        PortfolioStore::new(dir.path().join("store.json"), 5)
    }

    #[test]
    fn parse_json_with_mixed_number_forms() {
        let spec = PortfolioSpec::from_json(valid_json()).unwrap();
        let positions = spec.to_positions().unwrap();

        assert_eq!(spec.name.as_deref(), Some("Three fund"));
        assert_eq!(positions[0], Position::new("VTI", 30_000.0, 60.0));
        assert_eq!(positions[1], Position::new("VXUS", 15_000.0, 30.0));
        assert_eq!(positions[2].amount, 5_000.0);
    }

    #[test]
    fn reject_invalid_amount() {
        let json = r#"{ "positions": [{ "ticker": "VTI", "amount": "lots", "targetPercent": 100 }] }"#;
        let err = PortfolioSpec::from_json(json).unwrap().to_positions().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn reject_missing_positions() {
        assert!(matches!(
            PortfolioSpec::from_json(r#"{ "name": "x" }"#),
            Err(Error::PortfolioParse(_))
        ));
    }

    #[test]
    fn load_json_file_uses_embedded_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "mine.json", valid_json());
        let loaded = load(&path, &empty_store(&dir)).unwrap();
        assert_eq!(loaded.name, "Three fund");
        assert_eq!(loaded.positions.len(), 3);
    }

    #[test]
    fn load_csv_file_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "retirement.CSV", "Ticker,Amount,Target\nVTI,100,100\n");
        let loaded = load(&path, &empty_store(&dir)).unwrap();
        assert_eq!(loaded.name, "retirement");
        assert_eq!(loaded.positions, vec![Position::new("VTI", 100.0, 100.0)]);
    }

    #[test]
    fn load_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "notes.txt", "VTI 600 60%\nBND 400 40%\n");
        let loaded = load(&path, &empty_store(&dir)).unwrap();
        assert_eq!(loaded.positions.len(), 2);
    }

    #[test]
    fn load_saved_portfolio() {
        let dir = tempfile::tempdir().unwrap();
        let store = empty_store(&dir);
        store
            .save("core", &[Position::new("VTI", 100.0, 100.0)])
            .unwrap();

        let loaded = load("@core", &store).unwrap();
        assert_eq!(loaded.name, "core");
        assert!(matches!(load("@nope", &store), Err(Error::NotFound(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json").display().to_string();
        assert!(matches!(
            load(&missing, &empty_store(&dir)),
            Err(Error::PortfolioRead { .. })
        ));
    }
}
