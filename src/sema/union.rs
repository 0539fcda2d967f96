// src/sema/union.rs
//
// Union type values: "the expression is one of these types".

use smallvec::SmallVec;

use crate::identity::NameTable;
use crate::sema::type_arena::{TypeArena, TypeId};
use crate::sema::types::Primitive;

/// SmallVec for union members - inline up to 4, which covers most unions.
pub type TypeIdVec = SmallVec<[TypeId; 4]>;

/// An ordered, deduplicated set of interned types.
///
/// Immutable value type: every transformation returns a new union. Member
/// order is insertion order and only matters for display determinism. The
/// empty union is a valid value meaning "no information", and the
/// compatibility predicate treats it permissively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct UnionType {
    members: TypeIdVec,
}

impl UnionType {
    /// The zero-type value.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(id: TypeId) -> Self {
        let mut members = TypeIdVec::new();
        members.push(id);
        Self { members }
    }

    /// Build from members, deduplicating and normalizing nullability so
    /// "null" is not represented both as the null atom and as a member's
    /// nullable flag.
    pub fn of(arena: &TypeArena, types: impl IntoIterator<Item = TypeId>) -> Self {
        let mut union = Self::empty();
        for id in types {
            union.push_normalized(arena, id);
        }
        union
    }

    fn push_normalized(&mut self, arena: &TypeArena, id: TypeId) {
        if self.members.contains(&id) {
            return;
        }
        let null = arena.atomic(Primitive::Null, false);
        if id == null {
            // Null is already represented when any member is nullable.
            if self.members.iter().any(|&m| arena.is_nullable(m)) {
                return;
            }
        } else if arena.is_nullable(id) {
            // A nullable member subsumes a previously added null atom.
            self.members.retain(|&mut m| m != null);
        }
        self.members.push(id);
    }

    /// New union with `id` joined in.
    pub fn with_type(&self, arena: &TypeArena, id: TypeId) -> Self {
        let mut union = self.clone();
        union.push_normalized(arena, id);
        union
    }

    /// New union with every trace of null removed: the null atom is dropped
    /// and nullable members become their non-nullable siblings.
    pub fn without_null(&self, arena: &mut TypeArena) -> Self {
        let null = arena.atomic(Primitive::Null, false);
        let mut union = Self::empty();
        for &member in &self.members {
            if member == null {
                continue;
            }
            let stripped = arena.with_nullable(member, false);
            union.push_normalized(arena, stripped);
        }
        union
    }

    /// Set-join of two unions.
    pub fn union_with(&self, arena: &TypeArena, other: &UnionType) -> Self {
        let mut union = self.clone();
        for &member in &other.members {
            union.push_normalized(arena, member);
        }
        union
    }

    /// Membership by interned identity.
    pub fn has_type(&self, id: TypeId) -> bool {
        self.members.contains(&id)
    }

    /// Non-empty and every member satisfies the predicate.
    pub fn is_exclusively(&self, pred: impl Fn(TypeId) -> bool) -> bool {
        !self.members.is_empty() && self.members.iter().all(|&m| pred(m))
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members joined with `|` in insertion order.
    pub fn display(&self, arena: &TypeArena, names: &NameTable) -> String {
        let mut out = String::new();
        for (i, &member) in self.members.iter().enumerate() {
            if i > 0 {
                out.push('|');
            }
            out.push_str(&arena.display(member, names));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_deduplicates_by_identity() {
        let arena = TypeArena::new();
        let int = arena.primitive(Primitive::Int);
        let string = arena.primitive(Primitive::String);
        let union = UnionType::of(&arena, [int, string, int]);
        assert_eq!(union.len(), 2);
        assert!(union.has_type(int));
        assert!(union.has_type(string));
    }

    #[test]
    fn null_atom_is_not_double_represented() {
        let mut arena = TypeArena::new();
        let int = arena.primitive(Primitive::Int);
        let nullable_int = arena.with_nullable(int, true);
        let null = arena.primitive(Primitive::Null);

        // Nullable member first: the null atom is already covered.
        let union = UnionType::of(&arena, [nullable_int, null]);
        assert_eq!(union.len(), 1);
        assert!(union.has_type(nullable_int));

        // Null atom first: the nullable member subsumes it.
        let union = UnionType::of(&arena, [null, nullable_int]);
        assert_eq!(union.len(), 1);
        assert!(union.has_type(nullable_int));

        // A plain null union stays a null union.
        let union = UnionType::of(&arena, [null, int]);
        assert_eq!(union.len(), 2);
    }

    #[test]
    fn transformations_return_new_values() {
        let arena = TypeArena::new();
        let int = arena.primitive(Primitive::Int);
        let string = arena.primitive(Primitive::String);

        let base = UnionType::single(int);
        let wider = base.with_type(&arena, string);
        assert_eq!(base.len(), 1);
        assert_eq!(wider.len(), 2);
    }

    #[test]
    fn without_null_strips_atom_and_flags() {
        let mut arena = TypeArena::new();
        let int = arena.primitive(Primitive::Int);
        let nullable_string = arena.atomic(Primitive::String, true);
        let null = arena.primitive(Primitive::Null);
        let string = arena.primitive(Primitive::String);

        let union = UnionType::of(&arena, [null, int, nullable_string]);
        let stripped = union.without_null(&mut arena);
        assert_eq!(stripped.len(), 2);
        assert!(stripped.has_type(int));
        assert!(stripped.has_type(string));
        assert!(!stripped.has_type(null));
    }

    #[test]
    fn is_exclusively_requires_non_empty() {
        let arena = TypeArena::new();
        let bool_ty = arena.primitive(Primitive::Bool);
        let union = UnionType::single(bool_ty);
        assert!(union.is_exclusively(|t| t == bool_ty));
        assert!(!UnionType::empty().is_exclusively(|_| true));
    }

    #[test]
    fn display_joins_members() {
        let arena = TypeArena::new();
        let names = NameTable::new();
        let int = arena.primitive(Primitive::Int);
        let nullable_string = arena.atomic(Primitive::String, true);
        let union = UnionType::of(&arena, [int, nullable_string]);
        assert_eq!(union.display(&arena, &names), "int|?string");
    }
}
