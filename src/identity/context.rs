// src/identity/context.rs
//
// Namespace context for resolving reference strings as written in source:
// the namespace a file's declarations live in, plus its use-alias maps.

use rustc_hash::FxHashMap;

use crate::identity::SymbolKind;

/// Resolution context captured per file (or per namespace block).
///
/// Aliases map a leading reference segment to a fully qualified segment
/// path. Class and function aliases fold case like the names they stand
/// for; constant aliases are case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct NamespaceContext {
    namespace: Vec<String>,
    class_aliases: FxHashMap<String, Vec<String>>,
    function_aliases: FxHashMap<String, Vec<String>>,
    constant_aliases: FxHashMap<String, Vec<String>>,
}

impl NamespaceContext {
    /// Context for the global namespace with no aliases.
    pub fn global() -> Self {
        Self::default()
    }

    pub fn in_namespace(segments: &[&str]) -> Self {
        Self {
            namespace: segments
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect(),
            ..Self::default()
        }
    }

    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    pub fn add_class_alias(&mut self, alias: &str, target: &[&str]) {
        self.class_aliases.insert(
            alias.to_lowercase(),
            target.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub fn add_function_alias(&mut self, alias: &str, target: &[&str]) {
        self.function_aliases.insert(
            alias.to_lowercase(),
            target.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub fn add_constant_alias(&mut self, alias: &str, target: &[&str]) {
        self.constant_aliases.insert(
            alias.to_string(),
            target.iter().map(|s| s.to_string()).collect(),
        );
    }

    /// Alias target for a reference's leading segment, if one is in scope
    /// for the kind being resolved.
    pub(crate) fn alias_for(&self, kind: SymbolKind, leading: &str) -> Option<&[String]> {
        let target = match kind {
            SymbolKind::Function => self.function_aliases.get(&leading.to_lowercase()),
            SymbolKind::GlobalConstant => self.constant_aliases.get(leading),
            // Member kinds never reach here; class aliases cover the rest.
            _ => self.class_aliases.get(&leading.to_lowercase()),
        };
        target.map(|t| t.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_alias_lookup_folds_case() {
        let mut ctx = NamespaceContext::global();
        ctx.add_class_alias("Models", &["App", "Models"]);
        assert!(ctx.alias_for(SymbolKind::Class, "models").is_some());
        assert!(ctx.alias_for(SymbolKind::Class, "MODELS").is_some());
    }

    #[test]
    fn constant_alias_lookup_is_case_sensitive() {
        let mut ctx = NamespaceContext::global();
        ctx.add_constant_alias("LIMIT", &["App", "LIMIT"]);
        assert!(ctx.alias_for(SymbolKind::GlobalConstant, "LIMIT").is_some());
        assert!(ctx.alias_for(SymbolKind::GlobalConstant, "limit").is_none());
    }

    #[test]
    fn alias_maps_are_per_kind() {
        let mut ctx = NamespaceContext::global();
        ctx.add_class_alias("len", &["App", "Len"]);
        assert!(ctx.alias_for(SymbolKind::Function, "len").is_none());
    }
}
