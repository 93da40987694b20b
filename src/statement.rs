use {
    crate::{
        resource::{grants_wildcard, resource_list},
        Effect, Field, PrincipalPolicy, ResourceList, VerifyError,
    },
    log::{debug, trace},
    serde::Serialize,
    serde_json::{Map, Value},
    std::str::FromStr,
};

/// Keys every statement must carry, in the order they are checked.
const REQUIRED_FIELDS: [&str; 3] = ["Effect", "Action", "Resource"];

/// Every key a statement may carry.
const KNOWN_FIELDS: [&str; 5] = ["Sid", "Effect", "Action", "Resource", "Principal"];

pub type ActionList = Vec<String>;

/// The checked contents of a single statement.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatementReport {
    index: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    sid: Option<String>,

    effect: Effect,
    action: ActionList,
    resource: ResourceList,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    principal: bool,

    wildcard: bool,
}

impl StatementReport {
    /// Position of the statement in the policy's `Statement` list.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    #[inline]
    pub fn effect(&self) -> Effect {
        self.effect
    }

    #[inline]
    pub fn action(&self) -> &ActionList {
        &self.action
    }

    #[inline]
    pub fn resource(&self) -> &ResourceList {
        &self.resource
    }

    /// Whether the statement carries a `Principal` field. Only possible under [`PrincipalPolicy::Warn`].
    #[inline]
    pub fn has_principal(&self) -> bool {
        self.principal
    }

    /// Whether the statement's `Resource` field contains the literal wildcard `"*"`.
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }
}

/// Check the value bound to a policy's `Statement` key is a non-empty list.
pub(crate) fn statement_list(value: &Value) -> Result<&[Value], VerifyError> {
    match value {
        Value::Array(statements) if statements.is_empty() => Err(VerifyError::EmptyField(Field::Statement)),
        Value::Array(statements) => Ok(statements.as_slice()),
        other => {
            debug!("Statement is not a list: {:?}", other);
            Err(VerifyError::TypeMismatch(Field::Statement))
        }
    }
}

/// Run every structural check on one statement and evaluate its resources.
pub(crate) fn check_statement(
    index: usize,
    value: &Value,
    principal_policy: PrincipalPolicy,
) -> Result<StatementReport, VerifyError> {
    trace!("Checking statement {}", index);

    let statement = match value {
        Value::Object(map) => map,
        _ => return Err(VerifyError::TypeMismatch(Field::StatementEntry(index))),
    };

    check_fields(statement)?;
    let action = check_action(&statement["Action"])?;
    let effect = check_effect(&statement["Effect"])?;

    let principal = statement.contains_key("Principal");
    if principal {
        match principal_policy {
            PrincipalPolicy::Reject => return Err(VerifyError::ForbiddenField("Principal")),
            PrincipalPolicy::Warn => debug!("Statement {} has a Principal field", index),
        }
    }

    let resource = resource_list(&statement["Resource"])?;
    let wildcard = grants_wildcard(&resource);

    Ok(StatementReport {
        index,
        sid: statement.get("Sid").and_then(Value::as_str).map(str::to_string),
        effect,
        action,
        resource,
        principal,
        wildcard,
    })
}

fn check_fields(statement: &Map<String, Value>) -> Result<(), VerifyError> {
    for field in REQUIRED_FIELDS {
        if !statement.contains_key(field) {
            return Err(VerifyError::MissingField(field));
        }
    }

    if let Some(key) = statement.keys().find(|key| !KNOWN_FIELDS.contains(&key.as_str())) {
        return Err(VerifyError::UnexpectedField(key.clone()));
    }

    Ok(())
}

fn check_action(value: &Value) -> Result<ActionList, VerifyError> {
    let actions = match value {
        Value::Array(actions) if actions.is_empty() => return Err(VerifyError::EmptyField(Field::Action)),
        Value::Array(actions) => actions,
        _ => return Err(VerifyError::TypeMismatch(Field::Action)),
    };

    let mut result = Vec::with_capacity(actions.len());
    for (i, action) in actions.iter().enumerate() {
        match action {
            Value::String(s) => result.push(s.clone()),
            _ => return Err(VerifyError::TypeMismatch(Field::ActionEntry(i))),
        }
    }

    Ok(result)
}

fn check_effect(value: &Value) -> Result<Effect, VerifyError> {
    match value {
        Value::String(s) => Effect::from_str(s),
        _ => Err(VerifyError::TypeMismatch(Field::Effect)),
    }
}
