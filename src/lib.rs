#![warn(clippy::all)]
//! Structural and wildcard-resource verification for AWS IAM policy documents.
//!
//! A policy file is expected to carry its policy under a `PolicyDocument` key. [`verify`] returns `Ok(true)` for a
//! well-formed policy whose statements are all scoped to specific resources, `Ok(false)` for a well-formed policy that
//! grants access to the wildcard resource `"*"`, and an error describing the first structural violation otherwise.
pub(crate) mod effect;
pub(crate) mod error;
pub(crate) mod eval;
pub(crate) mod policy;
pub(crate) mod resource;
pub(crate) mod source;
pub(crate) mod statement;
pub(crate) mod verifier;

#[macro_use]
pub(crate) mod serutil;

pub use {
    effect::Effect,
    error::{Field, VerifyError},
    eval::{Finding, Verdict},
    policy::{PolicyVersion, POLICY_DOCUMENT},
    resource::{grants_wildcard, Resource, ResourceList},
    source::{load_document, parse_document, verify_file, FileOutcome, LoadError},
    statement::{ActionList, StatementReport},
    verifier::{verify, PrincipalPolicy, Verifier, VerifierBuilder, VerifierBuilderError},
};
