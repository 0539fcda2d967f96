// src/errors/name.rs
//! Qualified-name construction errors (E1xxx).
//!
//! These are contract violations on the caller's side: malformed input to
//! the name table is surfaced immediately and never silently ignored.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("empty local name in qualified symbol")]
    #[diagnostic(code(E1001))]
    EmptyName { text: String },

    #[error("qualified name '{text}' does not start with the root marker '\\'")]
    #[diagnostic(
        code(E1002),
        help("fully qualified names are written '\\Namespace\\Name'")
    )]
    MissingRootMarker { text: String },

    #[error("malformed alternate suffix in '{text}'")]
    #[diagnostic(code(E1003), help("alternates are written 'Name,N' with N a non-negative integer"))]
    MalformedAlternate { text: String },

    #[error("'{owner}' is not a class; methods, properties and class constants must be owned by a class")]
    #[diagnostic(code(E1004))]
    NotAClass { owner: String },

    #[error("member name '{text}' is missing the '::' owner separator")]
    #[diagnostic(code(E1005))]
    MissingMemberSeparator { text: String },
}
