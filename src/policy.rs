use {
    crate::{Field, VerifyError},
    log::{debug, trace},
    serde::{Serialize, Serializer},
    serde_json::{Map, Value},
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// Key of the policy document inside a decoded policy file.
pub const POLICY_DOCUMENT: &str = "PolicyDocument";

/// Keys every policy document must carry, in the order they are checked.
const REQUIRED_FIELDS: [&str; 2] = ["Version", "Statement"];

/// Policy versions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PolicyVersion {
    V2008_10_17,
    V2012_10_17,
}

impl Display for PolicyVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::V2008_10_17 => f.write_str("2008-10-17"),
            Self::V2012_10_17 => f.write_str("2012-10-17"),
        }
    }
}

impl FromStr for PolicyVersion {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2008-10-17" => Ok(Self::V2008_10_17),
            "2012-10-17" => Ok(Self::V2012_10_17),
            _ => Err(VerifyError::InvalidValue(Field::Version, s.to_string())),
        }
    }
}

impl Serialize for PolicyVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Extract the `PolicyDocument` mapping from a decoded policy file.
pub(crate) fn policy_document(document: &Value) -> Result<&Map<String, Value>, VerifyError> {
    match document.get(POLICY_DOCUMENT) {
        Some(Value::Object(map)) => Ok(map),
        other => {
            debug!("{} is not a mapping: {:?}", POLICY_DOCUMENT, other);
            Err(VerifyError::MalformedDocument)
        }
    }
}

/// Check the required fields of a policy document and parse its version.
///
/// Returns the version along with the (not yet checked) value bound to `Statement`.
pub(crate) fn check_policy_document(
    policy_document: &Map<String, Value>,
) -> Result<(PolicyVersion, &Value), VerifyError> {
    for field in REQUIRED_FIELDS {
        if !policy_document.contains_key(field) {
            debug!("Policy document is missing {}", field);
            return Err(VerifyError::MissingField(field));
        }
    }

    let version = match &policy_document["Version"] {
        Value::String(s) => PolicyVersion::from_str(s)?,
        other => {
            debug!("Version is not a string: {:?}", other);
            return Err(VerifyError::TypeMismatch(Field::Version));
        }
    };

    trace!("Policy version {}", version);
    Ok((version, &policy_document["Statement"]))
}

#[cfg(test)]
mod tests {
    use {
        super::{check_policy_document, policy_document},
        crate::{Field, PolicyVersion, VerifyError},
        pretty_assertions::assert_eq,
        serde_json::json,
        std::str::FromStr,
    };

    #[test_log::test]
    fn test_version_round_trip() {
        assert_eq!(PolicyVersion::from_str("2012-10-17").unwrap(), PolicyVersion::V2012_10_17);
        assert_eq!(PolicyVersion::from_str("2008-10-17").unwrap(), PolicyVersion::V2008_10_17);
        assert_eq!(PolicyVersion::V2012_10_17.to_string(), "2012-10-17");
        assert_eq!(serde_json::to_value(PolicyVersion::V2008_10_17).unwrap(), json!("2008-10-17"));

        let e = PolicyVersion::from_str("2012-10-18").unwrap_err();
        assert_eq!(e, VerifyError::InvalidValue(Field::Version, "2012-10-18".to_string()));
    }

    #[test_log::test]
    fn test_policy_document_shape() {
        assert_eq!(policy_document(&json!({})).unwrap_err(), VerifyError::MalformedDocument);
        assert_eq!(
            policy_document(&json!({"PolicyDocument": "Not a dictionary"})).unwrap_err(),
            VerifyError::MalformedDocument
        );
        assert_eq!(policy_document(&json!({"PolicyDocument": []})).unwrap_err(), VerifyError::MalformedDocument);
        assert_eq!(policy_document(&json!(["PolicyDocument"])).unwrap_err(), VerifyError::MalformedDocument);
        assert_eq!(policy_document(&json!("PolicyDocument")).unwrap_err(), VerifyError::MalformedDocument);

        let doc = json!({"PolicyName": "root", "PolicyDocument": {"Version": "2012-10-17"}});
        assert_eq!(policy_document(&doc).unwrap().len(), 1);
    }

    #[test_log::test]
    fn test_required_fields_in_order() {
        let pd = json!({});
        assert_eq!(
            check_policy_document(pd.as_object().unwrap()).unwrap_err(),
            VerifyError::MissingField("Version")
        );

        let pd = json!({"Statement": []});
        assert_eq!(
            check_policy_document(pd.as_object().unwrap()).unwrap_err().to_string(),
            "Version field is missing"
        );

        let pd = json!({"Version": "2012-10-17"});
        assert_eq!(
            check_policy_document(pd.as_object().unwrap()).unwrap_err().to_string(),
            "Statement field is missing"
        );

        // Presence is checked before the version's type.
        let pd = json!({"Version": 2012});
        assert_eq!(
            check_policy_document(pd.as_object().unwrap()).unwrap_err(),
            VerifyError::MissingField("Statement")
        );
    }

    #[test_log::test]
    fn test_version_checks() {
        let pd = json!({"Version": 20121017, "Statement": []});
        assert_eq!(
            check_policy_document(pd.as_object().unwrap()).unwrap_err(),
            VerifyError::TypeMismatch(Field::Version)
        );

        let pd = json!({"Version": "2012-10-17 ", "Statement": []});
        assert_eq!(
            check_policy_document(pd.as_object().unwrap()).unwrap_err().to_string(),
            "Version field is not '2012-10-17' or '2008-10-17'"
        );

        let pd = json!({"Version": "2008-10-17", "Statement": "anything"});
        let (version, statement) = check_policy_document(pd.as_object().unwrap()).unwrap();
        assert_eq!(version, PolicyVersion::V2008_10_17);
        assert_eq!(statement, &json!("anything"));
    }
}
