use serde::{Deserialize, Serialize};

/// how the `COUNTY` field of a tract dataset names a county. SVI releases
/// are not consistent about the suffix.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CountyNaming {
    /// "Guilford County"
    #[default]
    Suffixed,
    /// "Guilford"
    Plain,
}

impl CountyNaming {
    pub fn tract_label(&self, county: &str) -> String {
        match self {
            CountyNaming::Suffixed => format!("{county} County"),
            CountyNaming::Plain => county.to_string(),
        }
    }
}

/// normalizes a county name given on the command line: first character upper
/// case, the rest lower case ("GUILFORD", "guilford" -> "Guilford").
pub fn normalize_county_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
    }
}
