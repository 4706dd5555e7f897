//! x86-64 stack-machine code generator
//!
//! Every expression leaves exactly one value on the machine stack. Binary
//! operators pop the right operand into rdi, the left into rax, combine
//! them in rax and push the result.

use crate::backend::asm::{fits_imm32, Instr, Listing, Operand, Reg};
use crate::backend::codegen::CodeGen;
use crate::frontend::ast::{BinOp, Expr};

pub struct X86_64 {
    target_triple: String,
}

impl X86_64 {
    pub fn new(target: &str) -> Self {
        Self {
            target_triple: target.to_string(),
        }
    }

    fn gen_expr(&self, expr: &Expr, out: &mut Listing) {
        match expr {
            Expr::Literal { value, .. } => {
                if fits_imm32(*value) {
                    out.push(Instr::Push(Operand::Imm(*value)));
                } else {
                    out.push(Instr::Mov(Reg::Rax, Operand::Imm(*value)));
                    out.push(Instr::Push(Operand::Reg(Reg::Rax)));
                }
            }
            Expr::Binary { op, left, right, .. } => {
                self.gen_expr(left, out);
                self.gen_expr(right, out);

                out.push(Instr::Pop(Reg::Rdi));
                out.push(Instr::Pop(Reg::Rax));

                match op {
                    BinOp::Add => out.push(Instr::Add(Reg::Rax, Reg::Rdi)),
                    BinOp::Sub => out.push(Instr::Sub(Reg::Rax, Reg::Rdi)),
                    BinOp::Mul => out.push(Instr::Imul(Reg::Rax, Reg::Rdi)),
                    BinOp::Div => {
                        out.push(Instr::Cqo);
                        out.push(Instr::Idiv(Reg::Rdi));
                    }
                }

                out.push(Instr::Push(Operand::Reg(Reg::Rax)));
            }
        }
    }
}

impl Default for X86_64 {
    fn default() -> Self {
        Self::new("x86_64-unknown-linux-gnu")
    }
}

impl CodeGen for X86_64 {
    fn generate(&self, expr: &Expr) -> Listing {
        let mut listing = Listing::new();
        self.gen_expr(expr, &mut listing);
        debug_assert_eq!(listing.net_depth(), 1);
        log::debug!(
            "generated {} instructions, max stack depth {}",
            listing.instrs.len(),
            listing.max_depth()
        );
        listing
    }

    fn target_triple(&self) -> &str {
        &self.target_triple
    }

    fn name(&self) -> &str {
        "x86_64"
    }
}
