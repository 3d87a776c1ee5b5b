use crate::model::{Error, Result};
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Repository {
    pub name: String,
    pub path: PathBuf,
}

// New
impl Repository {
    pub fn from_config(path: &str, workspace: &Path) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::parse(&json_str, workspace)
    }

    pub fn new(name: impl ToString, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
        }
    }
}

// Parser
impl Repository {
    fn parse(json_str: &str, workspace: &Path) -> Result<Vec<Self>> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut result = Vec::new();
        for (name, details) in elements {
            if !is_plain_name(&name) {
                return Err(Error::Config(format!(
                    "Repository name `{}` must be a single path segment",
                    name
                )));
            }
            if !details.is_object() {
                return Err(Error::Config(format!(
                    "Repository `{}` must be an object",
                    name
                )));
            }
            let path = match &details["path"] {
                Value::Null => workspace.join(&name),
                Value::String(path) => PathBuf::from(path),
                _ => {
                    return Err(Error::Config(format!(
                        "Not a valid 'path' field for repository `{}`",
                        name
                    )))
                }
            };
            result.push(Self::new(name, path));
        }
        Ok(result)
    }
}

/// The name ends up in output file names and the default workspace path.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(|c: char| c == '/' || c == '\\')
}
