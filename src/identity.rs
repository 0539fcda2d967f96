// src/identity.rs
//
// Interned qualified-symbol identities.
//
// Every declared entity (class, function, method, property, constant) gets
// one canonical `NameId` per (namespace, kind, local name, alternate) key.
// Two lookups with the same canonical key return the same handle, so
// downstream maps can key on `NameId` instead of strings. Alternates
// disambiguate legal redeclarations of the same name.

use std::cell::OnceCell;

use crate::errors::NameError;
use crate::intern::Interner;

mod context;
pub use context::NamespaceContext;

/// Handle to an interned qualified name. Valid until `NameTable::clear()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameId(u32);

impl NameId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// What a qualified name refers to.
///
/// Class and function local names are case-insensitive in the analyzed
/// language; member and constant names are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Function,
    GlobalConstant,
    Method,
    Property,
    ClassConstant,
}

impl SymbolKind {
    /// Member kinds are owned by a class and serialize as `Owner::name`.
    pub fn is_member(self) -> bool {
        matches!(
            self,
            SymbolKind::Method | SymbolKind::Property | SymbolKind::ClassConstant
        )
    }

    /// Whether local-name lookups fold case for this kind.
    pub fn folds_case(self) -> bool {
        matches!(self, SymbolKind::Class | SymbolKind::Function)
    }
}

/// One interned qualified name. Immutable after creation; transformations
/// like `with_alternate` intern and return a different identity.
#[derive(Debug, Clone)]
pub struct QualifiedName {
    kind: SymbolKind,
    /// Canonical namespace segments; empty means the global namespace.
    /// Always empty for member kinds, whose position comes from the owner.
    namespace: Vec<String>,
    /// First-seen spelling; case-insensitive kinds fold case in the key
    /// but display the original.
    name: String,
    alternate: u32,
    /// Owning class for member kinds.
    owner: Option<NameId>,
    /// Memoized canonical text, rendered on first `display`.
    text: OnceCell<String>,
}

impl QualifiedName {
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    pub fn local_name(&self) -> &str {
        &self.name
    }

    pub fn alternate(&self) -> u32 {
        self.alternate
    }

    pub fn owner(&self) -> Option<NameId> {
        self.owner
    }
}

/// Canonical lookup key. Namespace segments and case-insensitive local
/// names are folded to lowercase so spelling variants collapse onto one
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NameKey {
    kind: SymbolKind,
    namespace: Vec<String>,
    name: String,
    alternate: u32,
    owner: Option<NameId>,
}

fn folded_name(kind: SymbolKind, name: &str) -> String {
    if kind.folds_case() {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}

fn folded_namespace(segments: &[String]) -> Vec<String> {
    segments.iter().map(|s| s.to_lowercase()).collect()
}

/// Split a trailing `,N` alternate suffix off a name segment.
fn split_alternate(text: &str) -> Result<(&str, u32), NameError> {
    match text.rsplit_once(',') {
        Some((rest, suffix)) => {
            let alternate = suffix.parse::<u32>().map_err(|_| NameError::MalformedAlternate {
                text: text.to_string(),
            })?;
            Ok((rest, alternate))
        }
        None => Ok((text, 0)),
    }
}

/// Process-wide table of qualified names.
///
/// Owns every identity; call sites hold `NameId` handles. The table is the
/// unit of invalidation: when any source file changes, the incremental
/// driver clears it together with the type arena and re-registers.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    inner: Interner<NameKey, QualifiedName>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NameId) -> &QualifiedName {
        self.inner.value(id.0)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Intern a top-level name. Empty namespace segments are stripped, so
    /// every spelling of the global namespace collapses to the empty path.
    pub fn make(
        &mut self,
        namespace: &[&str],
        kind: SymbolKind,
        name: &str,
        alternate: u32,
    ) -> Result<NameId, NameError> {
        debug_assert!(!kind.is_member(), "member names go through member()");
        if name.is_empty() {
            return Err(NameError::EmptyName {
                text: name.to_string(),
            });
        }
        let namespace: Vec<String> = namespace
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        let key = NameKey {
            kind,
            namespace: folded_namespace(&namespace),
            name: folded_name(kind, name),
            alternate,
            owner: None,
        };
        let name = name.to_string();
        let idx = self.inner.intern(key, || QualifiedName {
            kind,
            namespace,
            name,
            alternate,
            owner: None,
            text: OnceCell::new(),
        });
        Ok(NameId(idx))
    }

    /// Intern a member name (method, property, class constant) owned by a
    /// class identity.
    pub fn member(
        &mut self,
        owner: NameId,
        kind: SymbolKind,
        name: &str,
    ) -> Result<NameId, NameError> {
        debug_assert!(kind.is_member(), "top-level names go through make()");
        if self.get(owner).kind() != SymbolKind::Class {
            return Err(NameError::NotAClass {
                owner: self.display(owner).to_string(),
            });
        }
        if name.is_empty() {
            return Err(NameError::EmptyName {
                text: name.to_string(),
            });
        }
        let key = NameKey {
            kind,
            namespace: Vec::new(),
            name: folded_name(kind, name),
            alternate: 0,
            owner: Some(owner),
        };
        let name = name.to_string();
        let idx = self.inner.intern(key, || QualifiedName {
            kind,
            namespace: Vec::new(),
            name,
            alternate: 0,
            owner: Some(owner),
            text: OnceCell::new(),
        });
        Ok(NameId(idx))
    }

    /// Identity with the same coordinates but a different alternate index.
    /// Returns `id` itself when the index already matches, preserving
    /// referential identity on the common path.
    pub fn with_alternate(&mut self, id: NameId, alternate: u32) -> NameId {
        let qn = self.get(id);
        if qn.alternate == alternate {
            return id;
        }
        let key = NameKey {
            kind: qn.kind,
            namespace: folded_namespace(&qn.namespace),
            name: folded_name(qn.kind, &qn.name),
            alternate,
            owner: qn.owner,
        };
        let template = QualifiedName {
            kind: qn.kind,
            namespace: qn.namespace.clone(),
            name: qn.name.clone(),
            alternate,
            owner: qn.owner,
            text: OnceCell::new(),
        };
        NameId(self.inner.intern(key, || template))
    }

    /// Parse the canonical fully-qualified form, the exact inverse of
    /// `display`: `\Ns\Name`, optionally `,N` for alternates, and
    /// `Owner::name` for member kinds.
    pub fn from_qualified_string(
        &mut self,
        kind: SymbolKind,
        text: &str,
    ) -> Result<NameId, NameError> {
        if kind.is_member() {
            let (owner_text, member_text) =
                text.rsplit_once("::")
                    .ok_or_else(|| NameError::MissingMemberSeparator {
                        text: text.to_string(),
                    })?;
            let owner = self.from_qualified_string(SymbolKind::Class, owner_text)?;
            let (name, alternate) = split_alternate(member_text)?;
            let base = self.member(owner, kind, name)?;
            return Ok(self.with_alternate(base, alternate));
        }
        let rest = text
            .strip_prefix('\\')
            .ok_or_else(|| NameError::MissingRootMarker {
                text: text.to_string(),
            })?;
        let (rest, alternate) = split_alternate(rest)?;
        let mut segments: Vec<&str> = rest.split('\\').filter(|s| !s.is_empty()).collect();
        let name = segments.pop().ok_or_else(|| NameError::EmptyName {
            text: text.to_string(),
        })?;
        self.make(&segments, kind, name, alternate)
    }

    /// Resolve a reference string as written in source against a namespace
    /// context. Fully-qualified text bypasses the context; otherwise the
    /// leading segment is checked against the context's use-aliases for the
    /// kind, then the reference resolves relative to the current namespace.
    ///
    /// Unqualified function references with no alias are the one exception:
    /// they resolve to the global namespace, not the current one.
    ///
    /// Member kinds are not reference strings; resolve the class first and
    /// go through `member()`.
    pub fn from_string_in_context(
        &mut self,
        kind: SymbolKind,
        text: &str,
        ctx: &NamespaceContext,
    ) -> Result<NameId, NameError> {
        debug_assert!(!kind.is_member(), "resolve the owning class instead");
        if text.starts_with('\\') {
            return self.from_qualified_string(kind, text);
        }
        if text.is_empty() {
            return Err(NameError::EmptyName {
                text: text.to_string(),
            });
        }
        let mut segments: Vec<&str> = text.split('\\').filter(|s| !s.is_empty()).collect();
        let name = segments.pop().ok_or_else(|| NameError::EmptyName {
            text: text.to_string(),
        })?;

        let leading = if segments.is_empty() { name } else { segments[0] };
        if let Some(target) = ctx.alias_for(kind, leading) {
            // The alias replaces the leading segment with a qualified prefix.
            let mut full: Vec<&str> = target.iter().map(|s| s.as_str()).collect();
            if segments.is_empty() {
                if let Some((last, prefix)) = full.split_last() {
                    return self.make(prefix, kind, last, 0);
                }
            } else {
                full.extend(segments.iter().skip(1).copied());
                return self.make(&full, kind, name, 0);
            }
        }

        if kind == SymbolKind::Function && segments.is_empty() {
            // Unaliased unqualified calls fall back to the global namespace.
            return self.make(&[], kind, name, 0);
        }

        let mut namespace: Vec<&str> = ctx.namespace().iter().map(|s| s.as_str()).collect();
        namespace.extend(segments);
        self.make(&namespace, kind, name, 0)
    }

    /// Canonical textual form, memoized per identity.
    pub fn display(&self, id: NameId) -> &str {
        let qn = self.inner.value(id.0);
        qn.text.get_or_init(|| self.render(id))
    }

    fn render(&self, id: NameId) -> String {
        let qn = self.get(id);
        let mut out = match qn.owner {
            Some(owner) => {
                let mut out = self.display(owner).to_string();
                out.push_str("::");
                out.push_str(&qn.name);
                out
            }
            None => {
                let mut out = String::from("\\");
                for segment in &qn.namespace {
                    out.push_str(segment);
                    out.push('\\');
                }
                out.push_str(&qn.name);
                out
            }
        };
        if qn.alternate != 0 {
            out.push(',');
            out.push_str(&qn.alternate.to_string());
        }
        out
    }

    /// Drop every identity. Handles from before the clear are stale and
    /// must not be dereferenced; the incremental driver clears the type
    /// arena in the same breath because interned types hold `NameId`s.
    pub fn clear(&mut self) {
        tracing::debug!(names = self.inner.len(), "clearing name table");
        self.inner.clear();
    }
}
