// src/sema/symbol_table.rs
//
// Central registry for declared symbols.
//
// The symbol table owns declarations, assigns alternate indices when the
// same name is legally declared more than once, and retracts declarations
// per file for incremental re-analysis.

use rustc_hash::FxHashMap;

use crate::errors::NameError;
use crate::identity::{NameId, NameTable, SymbolKind};
use crate::sema::future::FutureUnionType;
use crate::sema::union::UnionType;

/// Handle to an interned source file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(u32);

impl FileId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Interns file paths to FileIds.
#[derive(Debug, Clone, Default)]
pub struct FileTable {
    paths: Vec<String>,
    lookup: FxHashMap<String, FileId>,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, path: &str) -> FileId {
        if let Some(&id) = self.lookup.get(path) {
            return id;
        }
        let id = FileId(self.paths.len() as u32);
        self.paths.push(path.to_string());
        self.lookup.insert(path.to_string(), id);
        id
    }

    pub fn path(&self, id: FileId) -> &str {
        &self.paths[id.0 as usize]
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.lookup.clear();
    }
}

/// Handle to a registered declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(u32);

impl DeclId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// The type attached to a declaration, if any.
///
/// Annotated types resolve eagerly; types that require evaluating an
/// expression (default values, constant initializers) defer behind a
/// future.
#[derive(Debug, Clone)]
pub enum DeclaredType {
    Unannotated,
    Eager(UnionType),
    Deferred(FutureUnionType),
}

/// One registered declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: NameId,
    pub kind: SymbolKind,
    pub file: FileId,
    pub declared_type: DeclaredType,
}

/// Registry of every declaration in the analyzed program.
///
/// Storage is a DeclId-indexed vector with retracted slots left as holes,
/// so live DeclIds stay stable across retractions of other files.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    decls: Vec<Option<Declaration>>,
    by_name: FxHashMap<NameId, DeclId>,
    by_file: FxHashMap<FileId, Vec<DeclId>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level declaration, assigning the first free alternate
    /// index for its (namespace, kind, name) coordinates.
    ///
    /// Scanning starts at 0 and counts up, so two classes with the same
    /// name behind mutually exclusive conditionals register as alternates
    /// 0 and 1 in declaration order.
    pub fn register(
        &mut self,
        names: &mut NameTable,
        namespace: &[&str],
        kind: SymbolKind,
        local_name: &str,
        file: FileId,
        declared_type: DeclaredType,
    ) -> Result<(NameId, DeclId), NameError> {
        let mut alternate = 0;
        let name = loop {
            let candidate = names.make(namespace, kind, local_name, alternate)?;
            if !self.by_name.contains_key(&candidate) {
                break candidate;
            }
            alternate += 1;
        };
        if alternate > 0 {
            tracing::debug!(
                name = names.display(name),
                alternate,
                "registered redeclaration as alternate"
            );
        }
        Ok((name, self.insert(name, kind, file, declared_type)))
    }

    /// Register a member declaration under its owning class, with the same
    /// alternate scan.
    pub fn register_member(
        &mut self,
        names: &mut NameTable,
        owner: NameId,
        kind: SymbolKind,
        local_name: &str,
        file: FileId,
        declared_type: DeclaredType,
    ) -> Result<(NameId, DeclId), NameError> {
        let base = names.member(owner, kind, local_name)?;
        let mut alternate = 0;
        let name = loop {
            let candidate = names.with_alternate(base, alternate);
            if !self.by_name.contains_key(&candidate) {
                break candidate;
            }
            alternate += 1;
        };
        Ok((name, self.insert(name, kind, file, declared_type)))
    }

    fn insert(
        &mut self,
        name: NameId,
        kind: SymbolKind,
        file: FileId,
        declared_type: DeclaredType,
    ) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(Some(Declaration {
            name,
            kind,
            file,
            declared_type,
        }));
        self.by_name.insert(name, id);
        self.by_file.entry(file).or_default().push(id);
        id
    }

    pub fn contains(&self, name: NameId) -> bool {
        self.by_name.contains_key(&name)
    }

    pub fn lookup(&self, name: NameId) -> Option<DeclId> {
        self.by_name.get(&name).copied()
    }

    pub fn declaration(&self, id: DeclId) -> Option<&Declaration> {
        self.decls.get(id.0 as usize).and_then(|d| d.as_ref())
    }

    /// Number of live declarations.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Retract every declaration that originated from `file`, freeing their
    /// identities for re-registration.
    ///
    /// The incremental driver calls this before re-registering a reparsed
    /// file; paired with the arena and name-table clears when types may
    /// hold stale references.
    pub fn retract_file(&mut self, file: FileId) {
        let Some(ids) = self.by_file.remove(&file) else {
            return;
        };
        tracing::debug!(file = file.0, count = ids.len(), "retracting declarations");
        for id in ids {
            if let Some(decl) = self.decls[id.0 as usize].take() {
                self.by_name.remove(&decl.name);
            }
        }
    }

    /// Drop everything. Used with the global invalidation path.
    pub fn clear(&mut self) {
        self.decls.clear();
        self.by_name.clear();
        self.by_file.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (NameTable, FileTable, SymbolTable) {
        (NameTable::new(), FileTable::new(), SymbolTable::new())
    }

    #[test]
    fn register_and_lookup() {
        let (mut names, mut files, mut table) = setup();
        let file = files.intern("src/user.x");
        let (name, decl) = table
            .register(
                &mut names,
                &["App"],
                SymbolKind::Class,
                "User",
                file,
                DeclaredType::Unannotated,
            )
            .unwrap();

        assert!(table.contains(name));
        assert_eq!(table.lookup(name), Some(decl));
        assert_eq!(table.declaration(decl).unwrap().name, name);
        assert_eq!(names.get(name).alternate(), 0);
    }

    #[test]
    fn redeclarations_get_monotonic_alternates() {
        let (mut names, mut files, mut table) = setup();
        let file = files.intern("src/conditional.x");

        let mut alternates = Vec::new();
        for _ in 0..3 {
            let (name, _) = table
                .register(
                    &mut names,
                    &[],
                    SymbolKind::Class,
                    "Config",
                    file,
                    DeclaredType::Unannotated,
                )
                .unwrap();
            alternates.push(names.get(name).alternate());
        }
        assert_eq!(alternates, [0, 1, 2]);
    }

    #[test]
    fn member_redeclarations_get_alternates() {
        let (mut names, mut files, mut table) = setup();
        let file = files.intern("src/class.x");
        let (owner, _) = table
            .register(
                &mut names,
                &[],
                SymbolKind::Class,
                "Widget",
                file,
                DeclaredType::Unannotated,
            )
            .unwrap();

        let (first, _) = table
            .register_member(
                &mut names,
                owner,
                SymbolKind::Method,
                "render",
                file,
                DeclaredType::Unannotated,
            )
            .unwrap();
        let (second, _) = table
            .register_member(
                &mut names,
                owner,
                SymbolKind::Method,
                "render",
                file,
                DeclaredType::Unannotated,
            )
            .unwrap();

        assert_eq!(names.get(first).alternate(), 0);
        assert_eq!(names.get(second).alternate(), 1);
        assert_eq!(names.display(second), "\\Widget::render,1");
    }

    #[test]
    fn retract_file_frees_identities() {
        let (mut names, mut files, mut table) = setup();
        let edited = files.intern("src/edited.x");
        let stable = files.intern("src/stable.x");

        let (edited_name, _) = table
            .register(
                &mut names,
                &[],
                SymbolKind::Class,
                "Edited",
                edited,
                DeclaredType::Unannotated,
            )
            .unwrap();
        let (stable_name, stable_decl) = table
            .register(
                &mut names,
                &[],
                SymbolKind::Class,
                "Stable",
                stable,
                DeclaredType::Unannotated,
            )
            .unwrap();

        table.retract_file(edited);
        assert!(!table.contains(edited_name));
        assert!(table.contains(stable_name));
        // DeclIds from other files stay valid across the retraction.
        assert_eq!(table.lookup(stable_name), Some(stable_decl));

        // Re-registering the reparsed file starts the alternate scan at 0.
        let (again, _) = table
            .register(
                &mut names,
                &[],
                SymbolKind::Class,
                "Edited",
                edited,
                DeclaredType::Unannotated,
            )
            .unwrap();
        assert_eq!(names.get(again).alternate(), 0);
        assert_eq!(again, edited_name);
    }

    #[test]
    fn retracting_unknown_file_is_a_no_op() {
        let (mut names, mut files, mut table) = setup();
        let file = files.intern("src/a.x");
        table
            .register(
                &mut names,
                &[],
                SymbolKind::Class,
                "A",
                file,
                DeclaredType::Unannotated,
            )
            .unwrap();
        let other = files.intern("src/other.x");
        table.retract_file(other);
        assert_eq!(table.len(), 1);
    }
}
