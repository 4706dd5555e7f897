//! Code Generation trait - Backend abstraction

use crate::backend::asm::Listing;
use crate::frontend::ast::Expr;

/// Code generation backend trait
///
/// Generation cannot fail: every tree the parser builds is well formed.
pub trait CodeGen {
    /// Lower an expression tree to an instruction listing
    fn generate(&self, expr: &Expr) -> Listing;

    /// Get the target triple (e.g., "x86_64-unknown-linux-gnu")
    fn target_triple(&self) -> &str;

    /// Get the backend name
    fn name(&self) -> &str;
}
