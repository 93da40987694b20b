use {
    crate::{
        policy::{check_policy_document, policy_document},
        statement::{check_statement, statement_list},
        Verdict, VerifyError,
    },
    derive_builder::Builder,
    log::{debug, trace},
    serde_json::Value,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// How statements carrying a `Principal` field are treated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrincipalPolicy {
    /// A `Principal` field is a structural error ([`VerifyError::ForbiddenField`]).
    Reject,

    /// A `Principal` field is accepted and reported as a [`Finding`](crate::Finding).
    Warn,
}

impl Default for PrincipalPolicy {
    fn default() -> Self {
        Self::Reject
    }
}

impl Display for PrincipalPolicy {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Warn => f.write_str("warn"),
        }
    }
}

/// Checks policy documents for structural validity and wildcard resource grants.
///
/// A verifier holds configuration only; it is cheap to clone and may be shared between threads.
///
/// ```rust
/// # use scratchstack_aspen_verify::{PrincipalPolicy, Verifier};
/// # use serde_json::json;
/// let verifier = Verifier::builder().principal(PrincipalPolicy::Warn).build().unwrap();
/// let verdict = verifier.verify(&json!({
///     "PolicyDocument": {
///         "Version": "2012-10-17",
///         "Statement": [
///             {"Effect": "Allow", "Action": ["s3:GetObject"], "Resource": "*"}
///         ]
///     }
/// })).unwrap();
/// assert!(!verdict.is_safe());
/// ```
#[derive(Builder, Clone, Debug, Default, Eq, PartialEq)]
pub struct Verifier {
    #[builder(default)]
    principal: PrincipalPolicy,
}

impl Verifier {
    #[inline]
    pub fn builder() -> VerifierBuilder {
        VerifierBuilder::default()
    }

    #[inline]
    pub fn principal(&self) -> PrincipalPolicy {
        self.principal
    }

    /// Verify a decoded policy file.
    ///
    /// Checks run in a fixed order and the first structural violation is returned as an error. Otherwise every
    /// statement is evaluated and the returned [`Verdict`] says whether any of them grants wildcard resource access.
    pub fn verify(&self, document: &Value) -> Result<Verdict, VerifyError> {
        let result = self.verify_inner(document);
        if let Err(e) = &result {
            debug!("Policy rejected: {} ({:?})", e, e);
        }
        result
    }

    fn verify_inner(&self, document: &Value) -> Result<Verdict, VerifyError> {
        let policy_document = policy_document(document)?;
        let (version, statements) = check_policy_document(policy_document)?;
        let statements = statement_list(statements)?;

        let reports = statements
            .iter()
            .enumerate()
            .map(|(i, statement)| check_statement(i, statement, self.principal))
            .collect::<Result<Vec<_>, _>>()?;

        let verdict = Verdict::new(version, reports);
        trace!("Verified {} statement(s): safe = {}", verdict.statements().len(), verdict.is_safe());
        Ok(verdict)
    }
}

/// Verify a decoded policy file with the default [`Verifier`].
///
/// Returns `Ok(true)` if the policy is well-formed and scoped, `Ok(false)` if it is well-formed but grants access to
/// the wildcard resource, and `Err` if it is malformed.
pub fn verify(document: &Value) -> Result<bool, VerifyError> {
    Verifier::default().verify(document).map(|verdict| verdict.is_safe())
}
