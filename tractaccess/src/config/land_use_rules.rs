use super::{ConfigError, CountyNaming};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

const DEFAULT_RULES: &str = include_str!("../../resources/land_use_rules_default.toml");
const LEGACY_RULES: &str = include_str!("../../resources/land_use_rules_legacy.toml");

/// residential land use rule of a single county
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CountyRule {
    /// accepted `PARUSEDESC` values. matched exactly, including case and
    /// whitespace, since assessor datasets spell these arbitrarily.
    pub land_use: Vec<String>,
    /// overrides the table's tract naming for this county
    #[serde(default)]
    pub county_naming: Option<CountyNaming>,
}

impl CountyRule {
    pub fn allows(&self, land_use: &str) -> bool {
        self.land_use.iter().any(|accepted| accepted == land_use)
    }
}

/// mapping from county name to the parcel land use values treated as
/// residential. a county missing from the table cannot be prepared.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LandUseRuleTable {
    #[serde(default)]
    pub county_naming: CountyNaming,
    pub counties: BTreeMap<String, CountyRule>,
}

impl LandUseRuleTable {
    pub fn rule(&self, county: &str) -> Option<&CountyRule> {
        self.counties.get(county)
    }

    pub fn county_naming(&self, county: &str) -> CountyNaming {
        self.rule(county)
            .and_then(|r| r.county_naming)
            .unwrap_or(self.county_naming)
    }

    pub fn county_names(&self) -> Vec<&str> {
        self.counties.keys().map(|k| k.as_str()).collect()
    }
}

impl TryFrom<&Path> for LandUseRuleTable {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let filepath = path.to_string_lossy().to_string();
        let s = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            filepath: filepath.clone(),
            error: e.to_string(),
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&s).map_err(|e| ConfigError::DecodeError {
                filepath,
                error: e.to_string(),
            }),
            Some("json") => serde_json::from_str(&s).map_err(|e| ConfigError::DecodeError {
                filepath,
                error: e.to_string(),
            }),
            _ => Err(ConfigError::UnsupportedFileType(filepath)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BuiltInRules {
    /// consolidated rules for the ten study counties, "<Name> County" tracts
    Default,
    /// earlier rules (Guilford, Bladen, Other) with plain "<Name>" tracts
    Legacy,
}

/// where the land use rule table comes from
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum LandUseRuleSource {
    BuiltIn { name: BuiltInRules },
    /// a user provided .toml or .json table
    File { file: String },
}

impl Default for LandUseRuleSource {
    fn default() -> Self {
        LandUseRuleSource::BuiltIn {
            name: BuiltInRules::Default,
        }
    }
}

impl LandUseRuleSource {
    pub fn build(&self) -> Result<LandUseRuleTable, ConfigError> {
        match self {
            LandUseRuleSource::BuiltIn { name } => {
                let (label, contents) = match name {
                    BuiltInRules::Default => ("built-in default rules", DEFAULT_RULES),
                    BuiltInRules::Legacy => ("built-in legacy rules", LEGACY_RULES),
                };
                toml::from_str(contents).map_err(|e| ConfigError::DecodeError {
                    filepath: label.to_string(),
                    error: e.to_string(),
                })
            }
            LandUseRuleSource::File { file } => LandUseRuleTable::try_from(Path::new(file)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_rules() {
        let table = LandUseRuleSource::default().build().unwrap();
        assert_eq!(table.counties.len(), 10);
        let guilford = table.rule("Guilford").unwrap();
        assert!(guilford.allows("TOWNHOUSE"));
        assert!(guilford.allows("MULTI-FAMILY<4"));
        assert!(!guilford.allows("townhouse"));
        assert!(table.rule("Wake").unwrap().allows("R"));
        assert!(table.rule("Mecklenburg").unwrap().allows("MOBILE HOME "));
        assert!(!table.rule("Mecklenburg").unwrap().allows("MOBILE HOME"));
        assert!(table.rule("Durham").unwrap().allows("RES/ RESIDENTIAL (UN"));
        assert_eq!(table.county_naming("Bladen"), CountyNaming::Suffixed);
        assert!(table.rule("Orange").is_none());
    }

    #[test]
    fn test_legacy_rules() {
        let table = LandUseRuleSource::BuiltIn {
            name: BuiltInRules::Legacy,
        }
        .build()
        .unwrap();
        assert_eq!(table.county_names(), vec!["Bladen", "Guilford", "Other"]);
        assert!(table.rule("Bladen").unwrap().allows("RESIDENTIAL IMPROVED"));
        assert!(!table.rule("Bladen").unwrap().allows("RURAL IMPROVED"));
        assert_eq!(table.county_naming("Guilford"), CountyNaming::Plain);
    }

    #[test]
    fn test_rules_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
county_naming = "plain"

[counties.Orange]
land_use = ["SINGLE FAMILY"]
county_naming = "suffixed"
"#
        )
        .unwrap();
        let source = LandUseRuleSource::File {
            file: file.path().to_string_lossy().to_string(),
        };
        let table = source.build().unwrap();
        assert!(table.rule("Orange").unwrap().allows("SINGLE FAMILY"));
        assert_eq!(table.county_naming("Orange"), CountyNaming::Suffixed);
        assert_eq!(table.county_naming("Elsewhere"), CountyNaming::Plain);
    }
}
