use {
    crate::{display_json, PolicyVersion, StatementReport},
    serde::{
        ser::{SerializeMap, Serializer},
        Serialize,
    },
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// A non-fatal observation about a policy. Findings never change whether a policy is safe.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "Kind")]
pub enum Finding {
    /// A statement names a `Principal`, extending trust beyond the attached identity.
    PrincipalPresent {
        #[serde(rename = "Statement")]
        statement: usize,

        #[serde(rename = "Sid", skip_serializing_if = "Option::is_none")]
        sid: Option<String>,
    },
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::PrincipalPresent {
                statement,
                sid: Some(sid),
            } => write!(f, "Statement[{}] ({}) has a Principal field", statement, sid),
            Self::PrincipalPresent {
                statement,
                sid: None,
            } => write!(f, "Statement[{}] has a Principal field", statement),
        }
    }
}

/// The outcome of verifying a structurally valid policy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Verdict {
    version: PolicyVersion,
    statements: Vec<StatementReport>,
    findings: Vec<Finding>,
}

impl Verdict {
    pub(crate) fn new(version: PolicyVersion, statements: Vec<StatementReport>) -> Self {
        let findings = statements
            .iter()
            .filter(|s| s.has_principal())
            .map(|s| Finding::PrincipalPresent {
                statement: s.index(),
                sid: s.sid().map(str::to_string),
            })
            .collect();

        Self {
            version,
            statements,
            findings,
        }
    }

    /// True when no statement grants access to the wildcard resource `"*"`.
    pub fn is_safe(&self) -> bool {
        !self.statements.iter().any(StatementReport::is_wildcard)
    }

    #[inline]
    pub fn version(&self) -> PolicyVersion {
        self.version
    }

    #[inline]
    pub fn statements(&self) -> &[StatementReport] {
        &self.statements
    }

    /// Indices of the statements granting wildcard resource access, in policy order.
    pub fn wildcard_statements(&self) -> Vec<usize> {
        self.statements.iter().filter(|s| s.is_wildcard()).map(StatementReport::index).collect()
    }

    #[inline]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

display_json!(Verdict);

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(None)?;
        state.serialize_entry("Safe", &self.is_safe())?;
        state.serialize_entry("Version", &self.version)?;
        state.serialize_entry("WildcardStatements", &self.wildcard_statements())?;
        state.serialize_entry("Statement", &self.statements)?;
        if !self.findings.is_empty() {
            state.serialize_entry("Findings", &self.findings)?;
        }
        state.end()
    }
}
