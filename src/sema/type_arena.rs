// src/sema/type_arena.rs
//
// Interned type values using TypeId handles for O(1) equality.
//
// This module provides the canonical type representation for the analyzer:
// - TypeId: u32 handle to an interned type (Copy, trivial Eq/Hash)
// - TypeData: nullability flag plus a primitive kind, class reference, or
//   parameterized array
// - TypeArena: per-session storage with automatic deduplication and an
//   explicit clear() lifecycle for reparse invalidation

use crate::identity::{NameId, NameTable};
use crate::intern::Interner;
use crate::sema::types::Primitive;

/// Handle to an interned type in the arena.
///
/// Handle equality is type identity: two structurally equal types always
/// intern to the same handle. Handles are invalidated by
/// `TypeArena::clear()`; the `generation` counter tracks the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    // Reserved handles for the non-nullable primitive singletons, interned
    // at these indices by TypeArena::new() in Primitive::ALL order.
    pub const ARRAY: TypeId = TypeId(0);
    pub const BOOL: TypeId = TypeId(1);
    pub const CALLABLE: TypeId = TypeId(2);
    pub const FLOAT: TypeId = TypeId(3);
    pub const INT: TypeId = TypeId(4);
    pub const ITERABLE: TypeId = TypeId(5);
    pub const MIXED: TypeId = TypeId(6);
    pub const NULL: TypeId = TypeId(7);
    pub const OBJECT: TypeId = TypeId(8);
    pub const RESOURCE: TypeId = TypeId(9);
    pub const STRING: TypeId = TypeId(10);
    pub const VOID: TypeId = TypeId(11);

    /// First handle index that is not a reserved singleton. The nullable
    /// primitive siblings occupy 12..23 (`?null` normalizes to `null`, so
    /// it has no slot of its own).
    pub const FIRST_DYNAMIC: u32 = 23;

    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

/// The shape of a single type value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// One of the fixed primitive kinds.
    Primitive(Primitive),
    /// Reference to a user-defined class identity.
    Class(NameId),
    /// Parameterized array wrapping one element type.
    ArrayOf(TypeId),
}

/// An interned type value: a kind plus an orthogonal nullability flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeData {
    pub kind: TypeKind,
    pub nullable: bool,
}

impl TypeData {
    pub fn primitive(&self) -> Option<Primitive> {
        match self.kind {
            TypeKind::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn class(&self) -> Option<NameId> {
        match self.kind {
            TypeKind::Class(name) => Some(name),
            _ => None,
        }
    }
}

fn kind_slot(p: Primitive) -> usize {
    match p {
        Primitive::Array => 0,
        Primitive::Bool => 1,
        Primitive::Callable => 2,
        Primitive::Float => 3,
        Primitive::Int => 4,
        Primitive::Iterable => 5,
        Primitive::Mixed => 6,
        Primitive::Null => 7,
        Primitive::Object => 8,
        Primitive::Resource => 9,
        Primitive::String => 10,
        Primitive::Void => 11,
    }
}

/// Per-session type arena with automatic interning.
///
/// All type construction goes through the arena, so handle equality is
/// identity. The arena is owned state passed by reference, never ambient
/// globals; `clear()` is the reparse-invalidation boundary.
#[derive(Clone)]
pub struct TypeArena {
    inner: Interner<TypeData, TypeData>,
    plain: [TypeId; 12],
    nullable: [TypeId; 12],
    generation: u32,
}

impl std::fmt::Debug for TypeArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeArena")
            .field("types_count", &self.inner.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        let mut arena = Self {
            inner: Interner::new(),
            plain: [TypeId(0); 12],
            nullable: [TypeId(0); 12],
            generation: 0,
        };
        arena.seed();
        arena
    }

    /// Pre-intern the primitive singletons at their reserved indices.
    fn seed(&mut self) {
        for p in Primitive::ALL {
            let id = self.intern(TypeData {
                kind: TypeKind::Primitive(p),
                nullable: false,
            });
            self.plain[kind_slot(p)] = id;
            debug_assert_eq!(id.0 as usize, kind_slot(p));
        }
        for p in Primitive::ALL {
            // `?null` is `null`; it normalizes instead of getting a slot.
            let id = if p == Primitive::Null {
                self.plain[kind_slot(p)]
            } else {
                self.intern(TypeData {
                    kind: TypeKind::Primitive(p),
                    nullable: true,
                })
            };
            self.nullable[kind_slot(p)] = id;
        }
        debug_assert_eq!(self.inner.len() as u32, TypeId::FIRST_DYNAMIC);
    }

    fn intern(&mut self, data: TypeData) -> TypeId {
        TypeId(self.inner.intern(data.clone(), || data))
    }

    pub fn get(&self, id: TypeId) -> &TypeData {
        self.inner.value(id.0)
    }

    /// Primitive singleton. O(1) reserved lookup; `(null, true)` normalizes
    /// to the plain null atom.
    pub fn atomic(&self, p: Primitive, nullable: bool) -> TypeId {
        if nullable {
            self.nullable[kind_slot(p)]
        } else {
            self.plain[kind_slot(p)]
        }
    }

    pub fn primitive(&self, p: Primitive) -> TypeId {
        self.atomic(p, false)
    }

    /// Interned class reference type.
    pub fn class_type(&mut self, class: NameId, nullable: bool) -> TypeId {
        self.intern(TypeData {
            kind: TypeKind::Class(class),
            nullable,
        })
    }

    /// Interned parameterized array type.
    pub fn array_of(&mut self, element: TypeId, nullable: bool) -> TypeId {
        self.intern(TypeData {
            kind: TypeKind::ArrayOf(element),
            nullable,
        })
    }

    /// The interned sibling with nullability flipped; identity no-op when
    /// the flag already matches. The null atom never becomes nullable.
    pub fn with_nullable(&mut self, id: TypeId, nullable: bool) -> TypeId {
        let data = self.get(id);
        if data.nullable == nullable {
            return id;
        }
        if data.kind == TypeKind::Primitive(Primitive::Null) {
            return self.atomic(Primitive::Null, false);
        }
        let sibling = TypeData {
            kind: data.kind.clone(),
            nullable,
        };
        self.intern(sibling)
    }

    pub fn is_nullable(&self, id: TypeId) -> bool {
        self.get(id).nullable
    }

    /// Whether a value of this type can be null: nullable flag, the null
    /// atom, and mixed (which includes null).
    pub fn admits_null(&self, id: TypeId) -> bool {
        let data = self.get(id);
        data.nullable
            || matches!(
                data.kind,
                TypeKind::Primitive(Primitive::Null) | TypeKind::Primitive(Primitive::Mixed)
            )
    }

    /// Canonical textual form: `?`-prefixed when nullable, then the
    /// primitive keyword, `array<T>`, or the class's qualified string.
    pub fn display(&self, id: TypeId, names: &NameTable) -> String {
        let data = self.get(id);
        let mut out = String::new();
        if data.nullable {
            out.push('?');
        }
        match &data.kind {
            TypeKind::Primitive(p) => out.push_str(p.keyword()),
            TypeKind::Class(class) => out.push_str(names.display(*class)),
            TypeKind::ArrayOf(element) => {
                out.push_str("array<");
                out.push_str(&self.display(*element, names));
                out.push('>');
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Generation counter, bumped on every `clear()`. Drivers use it to
    /// assert that no handle crosses a reparse boundary.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Drop every dynamic type and re-intern the reserved singletons.
    ///
    /// Called by the incremental driver whenever any file changes, together
    /// with `NameTable::clear()`: interned types hold `NameId`s, so they go
    /// stale as a unit. Handles from before the clear must not be reused.
    pub fn clear(&mut self) {
        tracing::debug!(
            types = self.inner.len(),
            generation = self.generation,
            "clearing type arena"
        );
        self.inner.clear();
        self.generation += 1;
        self.seed();
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}
