use std::str::FromStr;

/// One requested Munin graph: `name|title|vlabel|alias,alias,...`.
///
/// Title and vlabel may be left out (`name|alias,...`, `name|title|alias,...`),
/// in which case they default to `title of <name>` and `units`. The aliases
/// keep the order they were given in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSpec {
    pub name: String,
    pub title: String,
    pub vlabel: String,
    pub aliases: Vec<String>,
}

impl GraphSpec {
    pub fn new(name: &str, title: &str, vlabel: &str, aliases: &[&str]) -> Self {
        GraphSpec {
            name: name.to_string(),
            title: title.to_string(),
            vlabel: vlabel.to_string(),
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        }
    }
}

impl FromStr for GraphSpec {
    type Err = GraphSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('|').collect();
        let (name, title, vlabel, aliases) = match fields[..] {
            [name, aliases] => (name, "", "", aliases),
            [name, title, aliases] => (name, title, "", aliases),
            [name, title, vlabel, aliases] => (name, title, vlabel, aliases),
            [_] => return Err(GraphSpecError::MissingSeparator(s.to_string())),
            _ => return Err(GraphSpecError::TooManyFields(s.to_string())),
        };
        if name.is_empty() {
            return Err(GraphSpecError::EmptyName(s.to_string()));
        }

        let title = if title.is_empty() {
            format!("title of {name}")
        } else {
            title.to_string()
        };
        let vlabel = if vlabel.is_empty() { "units" } else { vlabel };
        let aliases: Vec<String> = aliases
            .split(',')
            .filter(|alias| !alias.is_empty())
            .map(str::to_string)
            .collect();

        Ok(GraphSpec {
            name: name.to_string(),
            title,
            vlabel: vlabel.to_string(),
            aliases,
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphSpecError {
    #[error("Expected name|[title|][vlabel|]aliases, got {0:?}")]
    MissingSeparator(String),

    #[error("Too many '|' separated fields in {0:?}")]
    TooManyFields(String),

    #[error("Missing graph name in {0:?}")]
    EmptyName(String),
}
