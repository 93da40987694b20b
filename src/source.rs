use {
    crate::{Verdict, Verifier, VerifyError},
    log::debug,
    serde_json::Value,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
        fs,
        path::Path,
    },
};

/// Failure to turn a policy file into a decoded document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoadError {
    NotFound(String),
    InvalidJson {
        name: String,
        message: String,
    },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::NotFound(name) => write!(f, "File '{}' not found.", name),
            Self::InvalidJson {
                name,
                message,
            } => write!(f, "Invalid JSON format in file '{}': {}", name, message),
        }
    }
}

impl Error for LoadError {}

/// Read and decode a policy file.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Value, LoadError> {
    let path = path.as_ref();
    let name = path.display().to_string();

    let data = fs::read(path).map_err(|e| {
        debug!("Failed to read {}: {}", name, e);
        LoadError::NotFound(name.clone())
    })?;

    serde_json::from_slice(&data).map_err(|e| {
        debug!("Failed to parse {}: {:?}", name, e);
        LoadError::InvalidJson {
            name,
            message: e.to_string(),
        }
    })
}

/// Decode an in-memory policy; `name` is only used in error messages.
pub fn parse_document(name: &str, text: &str) -> Result<Value, LoadError> {
    serde_json::from_str(text).map_err(|e| {
        debug!("Failed to parse {}: {:?}", name, e);
        LoadError::InvalidJson {
            name: name.to_string(),
            message: e.to_string(),
        }
    })
}

/// What happened to a single policy file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FileOutcome {
    Verified(Verdict),
    Rejected(VerifyError),
    Unreadable(LoadError),
}

impl FileOutcome {
    /// True only for a readable, well-formed policy without wildcard resources.
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Verified(verdict) if verdict.is_safe())
    }
}

/// Load a policy file and verify it.
pub fn verify_file<P: AsRef<Path>>(verifier: &Verifier, path: P) -> FileOutcome {
    match load_document(path) {
        Ok(document) => match verifier.verify(&document) {
            Ok(verdict) => FileOutcome::Verified(verdict),
            Err(e) => FileOutcome::Rejected(e),
        },
        Err(e) => FileOutcome::Unreadable(e),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{load_document, parse_document, verify_file, FileOutcome, LoadError},
        crate::{Verifier, VerifyError},
        indoc::indoc,
        pretty_assertions::assert_eq,
        std::{
            fs,
            path::{Path, PathBuf},
        },
        tempfile::TempDir,
    };

    fn write_policy(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test_log::test]
    fn test_not_found() {
        let e = load_document("/nonexistent/aspen-verify/iam.json").unwrap_err();
        assert_eq!(e, LoadError::NotFound("/nonexistent/aspen-verify/iam.json".to_string()));
        assert_eq!(e.to_string(), "File '/nonexistent/aspen-verify/iam.json' not found.");

        let outcome = verify_file(&Verifier::default(), "/nonexistent/aspen-verify/iam.json");
        assert!(matches!(outcome, FileOutcome::Unreadable(LoadError::NotFound(_))));
        assert!(!outcome.is_safe());
    }

    #[test_log::test]
    fn test_invalid_json() {
        let e = parse_document("iam.json", "{\"PolicyDocument\": ").unwrap_err();
        match &e {
            LoadError::InvalidJson {
                name,
                ..
            } => assert_eq!(name, "iam.json"),
            _ => panic!("Expected InvalidJson"),
        }
        assert!(e.to_string().starts_with("Invalid JSON format in file 'iam.json': EOF while parsing"));
    }

    #[test_log::test]
    fn test_load_invalid_json_file() {
        let dir = TempDir::new().unwrap();
        let path = write_policy(dir.path(), "truncated.json", "{\"PolicyDocument\": ");

        let e = load_document(&path).unwrap_err();
        assert_eq!(
            e,
            LoadError::InvalidJson {
                name: path.display().to_string(),
                message: "EOF while parsing a value at line 1 column 19".to_string(),
            }
        );

        let outcome = verify_file(&Verifier::default(), &path);
        assert!(matches!(outcome, FileOutcome::Unreadable(LoadError::InvalidJson { .. })));
    }

    #[test_log::test]
    fn test_verify_file() {
        let dir = TempDir::new().unwrap();
        let safe = write_policy(
            dir.path(),
            "safe.json",
            indoc! { r#"
            {
                "PolicyName": "root",
                "PolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [
                        {
                            "Sid": "ReadObjects",
                            "Effect": "Allow",
                            "Action": ["s3:GetObject"],
                            "Resource": "arn:aws:s3:::bucket/*object"
                        }
                    ]
                }
            }"# },
        );
        let outcome = verify_file(&Verifier::default(), &safe);
        assert!(outcome.is_safe());

        let unsafe_policy = write_policy(
            dir.path(),
            "unsafe.json",
            r#"{"PolicyDocument": {"Version": "2012-10-17", "Statement": [
                {"Effect": "Allow", "Action": ["s3:GetObject"], "Resource": "*"}]}}"#,
        );
        let outcome = verify_file(&Verifier::default(), &unsafe_policy);
        assert!(matches!(&outcome, FileOutcome::Verified(verdict) if !verdict.is_safe()));
        assert!(!outcome.is_safe());

        let malformed = write_policy(dir.path(), "malformed.json", r#"{"PolicyDocument": []}"#);
        let outcome = verify_file(&Verifier::default(), &malformed);
        assert_eq!(outcome, FileOutcome::Rejected(VerifyError::MalformedDocument));
    }
}
