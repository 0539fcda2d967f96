// src/errors/resolve.rs
//! Deferred type resolution errors (E2xxx).
//!
//! These never escape to general analysis code: the future-type boundary
//! converts them into its terminal `Failed` state and degrades the type to
//! the empty union. They are retained there for the diagnostic layer.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("undefined symbol '{name}'")]
    #[diagnostic(code(E2001))]
    UndefinedSymbol { name: String },

    #[error("cyclic definition while resolving deferred type")]
    #[diagnostic(
        code(E2002),
        help("the expression's type depends on the declaration being resolved")
    )]
    CyclicDefinition,

    #[error("cannot resolve type of expression: {reason}")]
    #[diagnostic(code(E2003))]
    Unresolvable { reason: String },
}
