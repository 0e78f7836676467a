use serde::{Deserialize, Serialize};

/// A country known to the statistics API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub iso2: Option<String>,
    pub iso3: Option<String>,
}

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iso2: None,
            iso3: None,
        }
    }

    /// Case-insensitive match against the name or either ISO code.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query)
            || self
                .iso2
                .as_deref()
                .is_some_and(|code| code.eq_ignore_ascii_case(query))
            || self
                .iso3
                .as_deref()
                .is_some_and(|code| code.eq_ignore_ascii_case(query))
    }
}
