//! Taxonomy and conflict table parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a taxonomy or conflict table.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("Failed to read taxonomy file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Taxonomy validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Phrases that signal a value is being upheld or violated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityIndicators {
    #[serde(default)]
    pub upholding: Vec<String>,

    #[serde(default)]
    pub violating: Vec<String>,
}

/// One value in the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDefinition {
    /// Value name (e.g., "Autonomy")
    pub name: String,

    /// Domain the value belongs to (e.g., "dignity")
    pub domain: String,

    /// Words whose presence qualifies the value as detected
    #[serde(default)]
    pub semantic_markers: Vec<String>,

    #[serde(default)]
    pub polarity_indicators: PolarityIndicators,
}

impl ValueDefinition {
    /// Definition with markers only, no polarity indicators.
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        semantic_markers: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            semantic_markers: semantic_markers.iter().map(|m| m.to_string()).collect(),
            polarity_indicators: PolarityIndicators::default(),
        }
    }

    pub fn with_upholding(mut self, phrases: &[&str]) -> Self {
        self.polarity_indicators.upholding = phrases.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_violating(mut self, phrases: &[&str]) -> Self {
        self.polarity_indicators.violating = phrases.iter().map(|p| p.to_string()).collect();
        self
    }
}

/// A value taxonomy: the `{ values: [...] }` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub values: Vec<ValueDefinition>,
}

impl Taxonomy {
    /// Build and validate a taxonomy from definitions.
    pub fn new(values: Vec<ValueDefinition>) -> Result<Self, TaxonomyError> {
        let taxonomy = Self { values };
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// Parse a taxonomy from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, TaxonomyError> {
        let taxonomy: Taxonomy = serde_yaml::from_str(yaml)?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// Parse a taxonomy from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, TaxonomyError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Build a taxonomy from an untyped JSON document.
    ///
    /// Fails when the document is null, not an object, or has no `values`
    /// array.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, TaxonomyError> {
        match &value {
            serde_json::Value::Null => {
                return Err(TaxonomyError::MissingField("taxonomy".to_string()))
            }
            serde_json::Value::Object(map) => match map.get("values") {
                Some(serde_json::Value::Array(_)) => {}
                Some(_) => {
                    return Err(TaxonomyError::ValidationError(
                        "`values` must be a list".to_string(),
                    ))
                }
                None => return Err(TaxonomyError::MissingField("values".to_string())),
            },
            _ => {
                return Err(TaxonomyError::ValidationError(
                    "taxonomy must be an object".to_string(),
                ))
            }
        }

        let taxonomy: Taxonomy = serde_json::from_value(value)?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// Parse a taxonomy from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a taxonomy from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load by extension: `.json` as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        if is_json(path.as_ref()) {
            Self::from_json_file(path)
        } else {
            Self::from_yaml_file(path)
        }
    }

    /// Distinct domains in first-seen order.
    pub fn domains(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.values
            .iter()
            .map(|v| v.domain.as_str())
            .filter(|d| seen.insert(d.to_lowercase()))
            .collect()
    }

    /// Validate the taxonomy structure.
    fn validate(&self) -> Result<(), TaxonomyError> {
        let mut seen = HashSet::new();

        for (index, value) in self.values.iter().enumerate() {
            if value.name.trim().is_empty() {
                return Err(TaxonomyError::MissingField(format!("values[{}].name", index)));
            }
            if value.domain.trim().is_empty() {
                return Err(TaxonomyError::MissingField(format!(
                    "values[{}].domain",
                    index
                )));
            }
            if !seen.insert(value.name.to_lowercase()) {
                return Err(TaxonomyError::ValidationError(format!(
                    "Duplicate value name: {}",
                    value.name
                )));
            }
        }

        Ok(())
    }
}

/// A curated pair of values known to pull against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictPair {
    pub value1: String,

    pub value2: String,

    /// How strongly the pair conflicts, in [0, 1]
    pub severity: f64,

    #[serde(default)]
    pub description: String,
}

impl ConflictPair {
    pub fn new(
        value1: impl Into<String>,
        value2: impl Into<String>,
        severity: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            value1: value1.into(),
            value2: value2.into(),
            severity,
            description: description.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConflictDocument {
    List(Vec<ConflictPair>),
    Wrapped { conflicts: Vec<ConflictPair> },
}

impl From<ConflictDocument> for Vec<ConflictPair> {
    fn from(document: ConflictDocument) -> Self {
        match document {
            ConflictDocument::List(pairs) => pairs,
            ConflictDocument::Wrapped { conflicts } => conflicts,
        }
    }
}

/// The curated conflict table handed to the profiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictTable {
    pub conflicts: Vec<ConflictPair>,
}

impl ConflictTable {
    pub fn new(conflicts: Vec<ConflictPair>) -> Result<Self, TaxonomyError> {
        let table = Self { conflicts };
        table.validate()?;
        Ok(table)
    }

    /// Parse a bare list or a `{ conflicts: [...] }` document from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, TaxonomyError> {
        let document: ConflictDocument = serde_yaml::from_str(yaml)?;
        Self::new(document.into())
    }

    /// Parse a bare list or a `{ conflicts: [...] }` document from JSON.
    pub fn from_json(json: &str) -> Result<Self, TaxonomyError> {
        let document: ConflictDocument = serde_json::from_str(json)?;
        Self::new(document.into())
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load by extension: `.json` as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        if is_json(path.as_ref()) {
            Self::from_json_file(path)
        } else {
            Self::from_yaml_file(path)
        }
    }

    fn validate(&self) -> Result<(), TaxonomyError> {
        for (index, pair) in self.conflicts.iter().enumerate() {
            if pair.value1.trim().is_empty() || pair.value2.trim().is_empty() {
                return Err(TaxonomyError::MissingField(format!(
                    "conflicts[{}].value1/value2",
                    index
                )));
            }
            if pair.value1 == pair.value2 {
                return Err(TaxonomyError::ValidationError(format!(
                    "Conflict pair {} is paired with itself",
                    pair.value1
                )));
            }
            if !(0.0..=1.0).contains(&pair.severity) {
                return Err(TaxonomyError::ValidationError(format!(
                    "Severity for {}/{} must be within [0, 1], got {}",
                    pair.value1, pair.value2, pair.severity
                )));
            }
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID_TAXONOMY: &str = r#"
values:
  - name: "Autonomy"
    domain: "dignity"
    semantic_markers: ["autonomy", "self-determination", "choice"]
    polarity_indicators:
      upholding: ["respect autonomy", "informed consent"]
      violating: ["coerce", "override their wishes"]
  - name: "Beneficence"
    domain: "care"
    semantic_markers: ["protect", "wellbeing"]
"#;

    #[test]
    fn test_parse_valid_taxonomy() {
        let taxonomy = Taxonomy::from_yaml(VALID_TAXONOMY).unwrap();
        assert_eq!(taxonomy.values.len(), 2);
        assert_eq!(taxonomy.values[0].polarity_indicators.violating.len(), 2);
        assert!(taxonomy.values[1].polarity_indicators.upholding.is_empty());
        assert_eq!(taxonomy.domains(), vec!["dignity", "care"]);
    }

    #[test]
    fn test_missing_values_list() {
        let result = Taxonomy::from_yaml("name: empty\n");
        assert!(result.is_err());

        let result = Taxonomy::from_json(r#"{"name": "empty"}"#);
        assert!(matches!(result, Err(TaxonomyError::MissingField(_))));
    }

    #[test]
    fn test_values_must_be_a_list() {
        let result = Taxonomy::from_json(r#"{"values": "Autonomy"}"#);
        assert!(matches!(result, Err(TaxonomyError::ValidationError(_))));
    }

    #[test]
    fn test_null_taxonomy() {
        let result = Taxonomy::from_json_value(serde_json::Value::Null);
        assert!(matches!(result, Err(TaxonomyError::MissingField(_))));
    }

    #[test]
    fn test_duplicate_value_names() {
        let yaml = r#"
values:
  - name: "Care"
    domain: "care"
  - name: "care"
    domain: "care"
"#;
        let result = Taxonomy::from_yaml(yaml);
        assert!(matches!(result, Err(TaxonomyError::ValidationError(_))));
    }

    #[test]
    fn test_empty_values_list_is_allowed() {
        let taxonomy = Taxonomy::from_json(r#"{"values": []}"#).unwrap();
        assert!(taxonomy.values.is_empty());
    }

    #[test]
    fn test_taxonomy_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(VALID_TAXONOMY.as_bytes()).unwrap();
        let taxonomy = Taxonomy::from_file(file.path()).unwrap();
        assert_eq!(taxonomy.values[0].name, "Autonomy");
    }

    #[test]
    fn test_conflict_table_formats() {
        let list = r#"
- value1: "Autonomy"
  value2: "Beneficence"
  severity: 0.7
  description: "Self-determination against protective care"
"#;
        let table = ConflictTable::from_yaml(list).unwrap();
        assert_eq!(table.conflicts.len(), 1);

        let wrapped = r#"{"conflicts": [{"value1": "Justice", "value2": "Mercy", "severity": 0.5}]}"#;
        let table = ConflictTable::from_json(wrapped).unwrap();
        assert_eq!(table.conflicts[0].value2, "Mercy");
        assert!(table.conflicts[0].description.is_empty());
    }

    #[test]
    fn test_conflict_severity_out_of_range() {
        let json = r#"[{"value1": "Justice", "value2": "Mercy", "severity": 1.5}]"#;
        assert!(matches!(
            ConflictTable::from_json(json),
            Err(TaxonomyError::ValidationError(_))
        ));
    }

    #[test]
    fn test_conflict_pair_with_itself() {
        let json = r#"[{"value1": "Justice", "value2": "Justice", "severity": 0.5}]"#;
        assert!(ConflictTable::from_json(json).is_err());
    }
}
