use {
    serde::{ser::SerializeMap, Serialize, Serializer},
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Location of a checked value inside a policy document.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Field {
    Version,
    Statement,
    StatementEntry(usize),
    Effect,
    Action,
    ActionEntry(usize),
    Resource,
    ResourceEntry(usize),
}

impl Field {
    /// The JSON key this field is stored under, without any index.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Version => "Version",
            Self::Statement | Self::StatementEntry(_) => "Statement",
            Self::Effect => "Effect",
            Self::Action | Self::ActionEntry(_) => "Action",
            Self::Resource | Self::ResourceEntry(_) => "Resource",
        }
    }

    #[inline]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::StatementEntry(i) | Self::ActionEntry(i) | Self::ResourceEntry(i) => Some(*i),
            _ => None,
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self.index() {
            Some(i) => write!(f, "{}[{}]", self.key(), i),
            None => f.write_str(self.key()),
        }
    }
}

/// A structural violation found while verifying a policy document.
///
/// The first violation encountered aborts verification; policies that are well-formed but grant wildcard resource
/// access are not errors (see [`Verdict`](crate::Verdict)).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VerifyError {
    MalformedDocument,
    MissingField(&'static str),
    TypeMismatch(Field),
    EmptyField(Field),
    InvalidValue(Field, String),
    ForbiddenField(&'static str),
    UnexpectedField(String),
}

impl VerifyError {
    /// The name of this error's kind, e.g. `"TypeMismatch"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedDocument => "MalformedDocument",
            Self::MissingField(_) => "MissingField",
            Self::TypeMismatch(_) => "TypeMismatch",
            Self::EmptyField(_) => "EmptyField",
            Self::InvalidValue(..) => "InvalidValue",
            Self::ForbiddenField(_) => "ForbiddenField",
            Self::UnexpectedField(_) => "UnexpectedField",
        }
    }

    /// The field the error refers to, rendered with its index if it has one.
    pub fn field(&self) -> Option<String> {
        match self {
            Self::MalformedDocument => None,
            Self::MissingField(name) | Self::ForbiddenField(name) => Some(name.to_string()),
            Self::TypeMismatch(field) | Self::EmptyField(field) | Self::InvalidValue(field, _) => Some(field.to_string()),
            Self::UnexpectedField(name) => Some(name.clone()),
        }
    }
}

impl Display for VerifyError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::MalformedDocument => f.write_str("PolicyDocument is not a dictionary"),
            Self::MissingField(name) => write!(f, "{} field is missing", name),
            Self::TypeMismatch(field) => match field {
                Field::Version => f.write_str("Version field is not a string"),
                Field::Statement => f.write_str("Statement field is not a list"),
                Field::StatementEntry(_) => f.write_str("Statement is not a dictionary"),
                Field::Effect => f.write_str("Effect field is not a string"),
                Field::Action => f.write_str("Action field is not a string or a list"),
                Field::ActionEntry(_) => f.write_str("Action field contains non-string value"),
                Field::Resource => f.write_str("Resource field is not a string or a list"),
                Field::ResourceEntry(_) => f.write_str("Resource list contains non-string value"),
            },
            Self::EmptyField(field) => write!(f, "{} field is empty", field.key()),
            Self::InvalidValue(field, value) => match field {
                Field::Version => f.write_str("Version field is not '2012-10-17' or '2008-10-17'"),
                Field::Effect => f.write_str("Effect field is not 'Allow' or 'Deny'"),
                _ => write!(f, "Invalid value for {}: {}", field, value),
            },
            Self::ForbiddenField(name) => write!(f, "{} field is not allowed", name),
            Self::UnexpectedField(name) => write!(f, "unexpected field {}", name),
        }
    }
}

impl Error for VerifyError {}

impl Serialize for VerifyError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(None)?;
        state.serialize_entry("Kind", self.kind())?;
        if let Some(field) = self.field() {
            state.serialize_entry("Field", &field)?;
        }
        if let Self::InvalidValue(_, value) = self {
            state.serialize_entry("Value", value)?;
        }
        state.serialize_entry("Message", &self.to_string())?;
        state.end()
    }
}
