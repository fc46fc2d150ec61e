//! Closed-form, time-parameterized expressions.
//!
//! Motion paths are built as small expression trees, evaluated numerically when checking
//! viewport bounds and lowered to the renderer's textual syntax only when the filter graph
//! is emitted.

pub(crate) mod ast;
pub(crate) mod lower;

pub(crate) use ast::{Env, Expr, Var};
