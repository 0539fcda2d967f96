// src/sema/future.rs
//
// Deferred type resolution with memoization.
//
// Some declared types cannot be known until dependent declarations finish
// loading (a property's default value, a constant's value expression). The
// front end wraps those in a FutureUnionType: the expression and its
// namespace context are captured at declaration time, and the realized
// union is computed on first demand, exactly once.

use std::cell::RefCell;

use crate::errors::ResolveError;
use crate::identity::NamespaceContext;
use crate::sema::type_arena::TypeArena;
use crate::sema::union::UnionType;

/// Opaque handle into the front end's expression tree. The core never
/// inspects expressions; it only routes them to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub u32);

/// Evaluates a captured expression to a union type. Implemented by the
/// analysis front end; the core calls it through this seam so deferred
/// resolution stays decoupled from the AST.
pub trait TypeResolver {
    fn resolve_expr(
        &mut self,
        expr: ExprId,
        scope: &NamespaceContext,
        arena: &mut TypeArena,
    ) -> Result<UnionType, ResolveError>;
}

/// One-way state machine: evaluation happens at most once, and both
/// outcomes are terminal.
#[derive(Debug, Clone)]
enum FutureState {
    Unresolved,
    /// Evaluation in progress; hit again only on re-entrant resolution.
    Evaluating,
    Resolved(UnionType),
    Failed(ResolveError),
}

/// A deferred, memoized union type computation.
///
/// Failure never propagates to callers that read declared types
/// optimistically: `get` degrades to the empty union and retains the error
/// for the diagnostic layer.
#[derive(Debug, Clone)]
pub struct FutureUnionType {
    expr: ExprId,
    scope: NamespaceContext,
    state: RefCell<FutureState>,
}

impl FutureUnionType {
    pub fn new(expr: ExprId, scope: NamespaceContext) -> Self {
        Self {
            expr,
            scope,
            state: RefCell::new(FutureState::Unresolved),
        }
    }

    pub fn expr(&self) -> ExprId {
        self.expr
    }

    pub fn scope(&self) -> &NamespaceContext {
        &self.scope
    }

    /// The realized union type, evaluating on first access.
    ///
    /// Re-entrant calls (the expression's own resolution depends on this
    /// future) are detected and recorded as a cyclic-definition failure
    /// rather than recursing. After any failure, every call returns the
    /// empty union.
    pub fn get(&self, resolver: &mut dyn TypeResolver, arena: &mut TypeArena) -> UnionType {
        {
            let mut state = self.state.borrow_mut();
            match &*state {
                FutureState::Resolved(union) => return union.clone(),
                FutureState::Failed(_) => return UnionType::empty(),
                FutureState::Evaluating => {
                    tracing::debug!(expr = self.expr.0, "cyclic deferred type resolution");
                    *state = FutureState::Failed(ResolveError::CyclicDefinition);
                    return UnionType::empty();
                }
                FutureState::Unresolved => {
                    *state = FutureState::Evaluating;
                }
            }
        }

        let outcome = resolver.resolve_expr(self.expr, &self.scope, arena);

        let mut state = self.state.borrow_mut();
        match &*state {
            // A re-entrant call failed the future while we were evaluating;
            // the first terminal outcome wins.
            FutureState::Failed(_) => UnionType::empty(),
            _ => match outcome {
                Ok(union) => {
                    *state = FutureState::Resolved(union.clone());
                    union
                }
                Err(error) => {
                    tracing::debug!(expr = self.expr.0, %error, "deferred type resolution failed");
                    *state = FutureState::Failed(error);
                    UnionType::empty()
                }
            },
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(&*self.state.borrow(), FutureState::Resolved(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(&*self.state.borrow(), FutureState::Failed(_))
    }

    /// The retained failure, for the diagnostic layer.
    pub fn error(&self) -> Option<ResolveError> {
        match &*self.state.borrow() {
            FutureState::Failed(error) => Some(error.clone()),
            _ => None,
        }
    }
}
