// src/sema/compatibility.rs
//
// Type compatibility checking functions.
// These are pure functions that decide whether a value of one type is
// acceptable where another is expected. Results are findings, not errors:
// the diagnostic layer turns `false` into a report, nothing here fails.

use crate::sema::hierarchy::ClassHierarchy;
use crate::sema::type_arena::{TypeArena, TypeId, TypeKind};
use crate::sema::types::Primitive;
use crate::sema::union::UnionType;

/// The primitive lattice, row = source kind, column = accepted target.
///
/// The table is authoritative and deliberately asymmetric: it records what
/// the analyzed language accepts, not what a symmetric lattice would
/// derive. Pairs it does not name are incompatible.
fn primitive_casts_to(from: Primitive, to: Primitive) -> bool {
    use Primitive::*;
    if from == to {
        return true;
    }
    match (from, to) {
        // Every kind reaches mixed, and mixed reaches every kind.
        (_, Mixed) | (Mixed, _) => true,
        // One-directional widenings.
        (Int, Float) => true,
        (Array, Iterable) => true,
        // Strings can name callables; the reverse does not hold.
        (String, Callable) => true,
        // Null joins nothing else, and nothing else becomes null.
        (Null, _) | (_, Null) => false,
        // The void row and column are closed past the mixed arms above.
        (Void, _) | (_, Void) => false,
        _ => false,
    }
}

/// Single-pair compatibility: can a value of `from` be used where `to` is
/// expected?
///
/// Rule order matters. A mixed target accepts everything, including
/// nullable sources and void; only then does nullability gate the rest.
pub fn can_cast(
    arena: &TypeArena,
    hierarchy: &dyn ClassHierarchy,
    from: TypeId,
    to: TypeId,
) -> bool {
    if from == to {
        return true;
    }
    let from_data = arena.get(from);
    let to_data = arena.get(to);

    if to_data.kind == TypeKind::Primitive(Primitive::Mixed) {
        return true;
    }
    if from_data.nullable && !to_data.nullable {
        return false;
    }
    if from_data.kind == TypeKind::Primitive(Primitive::Mixed) {
        return true;
    }

    match (&from_data.kind, &to_data.kind) {
        (TypeKind::Primitive(a), TypeKind::Primitive(b)) => primitive_casts_to(*a, *b),

        (TypeKind::Class(a), TypeKind::Class(b)) => a == b || hierarchy.is_subtype_of(*a, *b),

        // Any class is an object; the generic object kind is not any class.
        (TypeKind::Class(class), TypeKind::Primitive(p)) => match p {
            Primitive::Object => true,
            Primitive::Iterable => hierarchy.is_traversable(*class),
            _ => false,
        },
        (TypeKind::Primitive(_), TypeKind::Class(_)) => false,

        // Parameterized arrays behave as the array kind against primitives
        // and are element-covariant against each other.
        (TypeKind::ArrayOf(_), TypeKind::Primitive(p)) => {
            primitive_casts_to(Primitive::Array, *p)
        }
        (TypeKind::ArrayOf(a), TypeKind::ArrayOf(b)) => can_cast(arena, hierarchy, *a, *b),
        // Best-effort posture: plain array and array<T> accept each other.
        (TypeKind::Primitive(Primitive::Array), TypeKind::ArrayOf(_)) => true,
        (TypeKind::Primitive(_), TypeKind::ArrayOf(_)) => false,
        (TypeKind::ArrayOf(_), TypeKind::Class(_)) => false,
        (TypeKind::Class(_), TypeKind::ArrayOf(_)) => false,
    }
}

/// Union compatibility: existential on both sides.
///
/// An empty union means "no information" and is never flagged: unknown
/// types produce no findings. Otherwise one compatible member pair is
/// enough. This asymmetric, permissive policy trades missed true
/// incompatibilities for fewer false positives.
pub fn can_cast_union(
    arena: &TypeArena,
    hierarchy: &dyn ClassHierarchy,
    from: &UnionType,
    to: &UnionType,
) -> bool {
    if from.is_empty() || to.is_empty() {
        return true;
    }
    from.iter()
        .any(|f| to.iter().any(|t| can_cast(arena, hierarchy, f, t)))
}
