use {
    crate::{Field, VerifyError},
    log::trace,
    serde::{Serialize, Serializer},
    serde_json::Value,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

pub type ResourceList = Vec<Resource>;

/// A single entry of a statement's `Resource` field.
///
/// Only the literal string `"*"` is [`Resource::Any`]. Anything else, including strings that merely contain
/// asterisks such as `"**"` or `"arn:aws:s3:::bucket/*"`, is kept verbatim as a pattern.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Resource {
    Any,
    Pattern(String),
}

impl Resource {
    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<&str> for Resource {
    fn from(s: &str) -> Self {
        if s == "*" {
            Self::Any
        } else {
            Self::Pattern(s.to_string())
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Any => f.write_str("*"),
            Self::Pattern(pattern) => f.write_str(pattern),
        }
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Decode the value bound to a statement's `Resource` key.
///
/// A string yields a single resource; a list yields one resource per element, and every element must be a string.
pub(crate) fn resource_list(value: &Value) -> Result<ResourceList, VerifyError> {
    match value {
        Value::String(s) => Ok(vec![Resource::from(s.as_str())]),
        Value::Array(entries) => {
            let mut result = Vec::with_capacity(entries.len());
            for (i, entry) in entries.iter().enumerate() {
                match entry {
                    Value::String(s) => result.push(Resource::from(s.as_str())),
                    _ => return Err(VerifyError::TypeMismatch(Field::ResourceEntry(i))),
                }
            }
            Ok(result)
        }
        _ => Err(VerifyError::TypeMismatch(Field::Resource)),
    }
}

/// Whether any resource in the list grants access to all resources.
pub fn grants_wildcard(resources: &[Resource]) -> bool {
    let wildcard = resources.iter().any(Resource::is_any);
    trace!("Resources {:?}: wildcard = {}", resources, wildcard);
    wildcard
}
