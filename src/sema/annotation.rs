// src/sema/annotation.rs
//
// Resolution of declared type annotations into union types.
//
// The front end hands over the raw annotation text; members are split on
// `|`, each member is an optionally `?`-prefixed primitive keyword,
// `array<T>` generic, or class reference resolved through the namespace
// context.

use crate::errors::NameError;
use crate::identity::{NameTable, NamespaceContext, SymbolKind};
use crate::sema::type_arena::{TypeArena, TypeId};
use crate::sema::types::Primitive;
use crate::sema::union::UnionType;

/// Resolve an annotation string. Empty text is "no information", the empty
/// union.
pub fn resolve(
    text: &str,
    ctx: &NamespaceContext,
    names: &mut NameTable,
    arena: &mut TypeArena,
) -> Result<UnionType, NameError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(UnionType::empty());
    }
    let mut members: Vec<TypeId> = Vec::new();
    for part in split_members(text) {
        members.push(resolve_single(part.trim(), ctx, names, arena)?);
    }
    Ok(UnionType::of(arena, members))
}

/// Resolve one annotation member to an interned type.
pub fn resolve_single(
    text: &str,
    ctx: &NamespaceContext,
    names: &mut NameTable,
    arena: &mut TypeArena,
) -> Result<TypeId, NameError> {
    let (nullable, rest) = match text.strip_prefix('?') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    if let Some(inner) = rest
        .strip_prefix("array<")
        .and_then(|r| r.strip_suffix('>'))
    {
        // The generic wraps exactly one element type. A union parameter
        // carries no single element, so it degrades to the plain array
        // kind rather than failing the whole annotation.
        let element = resolve(inner, ctx, names, arena)?;
        let mut members = element.iter();
        return Ok(match (members.next(), members.next()) {
            (Some(element), None) => arena.array_of(element, nullable),
            _ => arena.atomic(Primitive::Array, nullable),
        });
    }
    if let Some(primitive) = Primitive::from_keyword(rest) {
        return Ok(arena.atomic(primitive, nullable));
    }
    let class = names.from_string_in_context(SymbolKind::Class, rest, ctx)?;
    Ok(arena.class_type(class, nullable))
}

/// Split on top-level `|`, leaving `|` inside `array<...>` parameters
/// alone.
fn split_members(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (NamespaceContext, NameTable, TypeArena) {
        (
            NamespaceContext::in_namespace(&["App"]),
            NameTable::new(),
            TypeArena::new(),
        )
    }

    #[test]
    fn empty_annotation_is_empty_union() {
        let (ctx, mut names, mut arena) = setup();
        let union = resolve("", &ctx, &mut names, &mut arena).unwrap();
        assert!(union.is_empty());
        let union = resolve("   ", &ctx, &mut names, &mut arena).unwrap();
        assert!(union.is_empty());
    }

    #[test]
    fn primitive_keywords_resolve() {
        let (ctx, mut names, mut arena) = setup();
        let union = resolve("int", &ctx, &mut names, &mut arena).unwrap();
        assert!(union.has_type(arena.primitive(Primitive::Int)));

        let union = resolve("?string", &ctx, &mut names, &mut arena).unwrap();
        assert!(union.has_type(arena.atomic(Primitive::String, true)));
    }

    #[test]
    fn union_annotations_split_on_pipe() {
        let (ctx, mut names, mut arena) = setup();
        let union = resolve("int|string|null", &ctx, &mut names, &mut arena).unwrap();
        assert_eq!(union.len(), 3);
        assert!(union.has_type(arena.primitive(Primitive::Int)));
        assert!(union.has_type(arena.primitive(Primitive::String)));
        assert!(union.has_type(arena.primitive(Primitive::Null)));
    }

    #[test]
    fn generic_array_annotations() {
        let (ctx, mut names, mut arena) = setup();
        let union = resolve("array<int>", &ctx, &mut names, &mut arena).unwrap();
        let int = arena.primitive(Primitive::Int);
        let ints = arena.array_of(int, false);
        assert!(union.has_type(ints));

        let union = resolve("?array<array<string>>", &ctx, &mut names, &mut arena).unwrap();
        let string = arena.primitive(Primitive::String);
        let strings = arena.array_of(string, false);
        let nested = arena.array_of(strings, true);
        assert!(union.has_type(nested));
    }

    #[test]
    fn class_references_resolve_through_context() {
        let (mut ctx, mut names, mut arena) = setup();
        ctx.add_class_alias("M", &["App", "Models"]);

        let union = resolve("M\\User|null", &ctx, &mut names, &mut arena).unwrap();
        let user = names
            .from_qualified_string(SymbolKind::Class, "\\App\\Models\\User")
            .unwrap();
        let user_ty = arena.class_type(user, false);
        assert!(union.has_type(user_ty));
        assert!(union.has_type(arena.primitive(Primitive::Null)));
    }

    #[test]
    fn malformed_class_reference_propagates() {
        let (ctx, mut names, mut arena) = setup();
        let err = resolve("int|", &ctx, &mut names, &mut arena).unwrap_err();
        assert!(matches!(err, NameError::EmptyName { .. }));
    }

    #[test]
    fn split_members_respects_generics() {
        assert_eq!(split_members("int|string"), vec!["int", "string"]);
        assert_eq!(
            split_members("array<int|string>|null"),
            vec!["array<int|string>", "null"]
        );
    }

    #[test]
    fn union_generic_parameter_degrades_to_plain_array() {
        let (ctx, mut names, mut arena) = setup();
        let union = resolve("array<int|string>", &ctx, &mut names, &mut arena).unwrap();
        assert!(union.has_type(arena.primitive(Primitive::Array)));
    }
}
