use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{StateCode, StateRules};

#[derive(Debug)]
pub enum StateRulesImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidBoolean { line: u64, column: &'static str, value: String },
    InvalidNumber { line: u64, column: &'static str, value: String },
    DuplicateState(StateCode),
}

impl std::fmt::Display for StateRulesImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateRulesImportError::Io(err) => write!(f, "failed to read state rules: {}", err),
            StateRulesImportError::Csv(err) => write!(f, "invalid state rules CSV data: {}", err),
            StateRulesImportError::InvalidBoolean {
                line,
                column,
                value,
            } => write!(f, "line {line}: {column} must be true/false, found '{value}'"),
            StateRulesImportError::InvalidNumber {
                line,
                column,
                value,
            } => write!(f, "line {line}: {column} must be a number, found '{value}'"),
            StateRulesImportError::DuplicateState(code) => {
                write!(f, "state {code} appears more than once")
            }
        }
    }
}

impl std::error::Error for StateRulesImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateRulesImportError::Io(err) => Some(err),
            StateRulesImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StateRulesImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for StateRulesImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads state regulatory records from a CSV export.
///
/// Expected headers: `state_code,state_name,fpa_available,fpa_automatic_with_license,
/// fpa_hours_required,fpa_years_required,physician_np_ratio`. Blank cells are absent
/// values and `has_ratio_limit` follows from a non-blank ratio.
pub struct StateRulesImporter;

impl StateRulesImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<StateRules>, StateRulesImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<StateRules>, StateRulesImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut states = BTreeMap::new();

        for (index, record) in csv_reader.deserialize::<StateRulesRow>().enumerate() {
            // header is line 1
            let line = index as u64 + 2;
            let rules = record?.into_rules(line)?;
            if states.contains_key(&rules.state_code) {
                return Err(StateRulesImportError::DuplicateState(rules.state_code));
            }
            states.insert(rules.state_code.clone(), rules);
        }

        Ok(states.into_values().collect())
    }
}

#[derive(Debug, Deserialize)]
struct StateRulesRow {
    state_code: String,
    state_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    fpa_available: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    fpa_automatic_with_license: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    fpa_hours_required: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    fpa_years_required: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    physician_np_ratio: Option<String>,
}

impl StateRulesRow {
    fn into_rules(self, line: u64) -> Result<StateRules, StateRulesImportError> {
        let fpa_available = parse_flag(self.fpa_available.as_deref(), line, "fpa_available")?;
        let fpa_automatic_with_license = parse_flag(
            self.fpa_automatic_with_license.as_deref(),
            line,
            "fpa_automatic_with_license",
        )?;
        let fpa_hours_required = self
            .fpa_hours_required
            .map(|value| {
                value
                    .parse::<u32>()
                    .map_err(|_| StateRulesImportError::InvalidNumber {
                        line,
                        column: "fpa_hours_required",
                        value,
                    })
            })
            .transpose()?;
        let fpa_years_required = self
            .fpa_years_required
            .map(|value| match value.parse::<f64>() {
                Ok(years) if years.is_finite() => Ok(years),
                _ => Err(StateRulesImportError::InvalidNumber {
                    line,
                    column: "fpa_years_required",
                    value,
                }),
            })
            .transpose()?;

        Ok(StateRules {
            state_code: StateCode::new(&self.state_code),
            state_name: self.state_name,
            fpa_available,
            fpa_automatic_with_license,
            fpa_hours_required,
            fpa_years_required,
            has_ratio_limit: self.physician_np_ratio.is_some(),
            physician_np_ratio: self.physician_np_ratio,
        })
    }
}

fn parse_flag(
    value: Option<&str>,
    line: u64,
    column: &'static str,
) -> Result<bool, StateRulesImportError> {
    let Some(raw) = value else {
        return Ok(false);
    };

    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(StateRulesImportError::InvalidBoolean {
            line,
            column,
            value: raw.to_string(),
        }),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
