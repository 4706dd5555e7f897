//! In-process simulator for generated listings
//!
//! Executes the same instructions the assembler would see, with 64-bit
//! wrapping arithmetic and x86 `idiv` semantics, then runs the
//! `pop rax; ret` epilogue and returns rax.

use thiserror::Error;

use crate::backend::asm::{Instr, Listing, Operand, Reg};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("stack underflow at instruction {index}")]
    StackUnderflow { index: usize },

    /// #DE: divisor is zero or the quotient does not fit in 64 bits
    #[error("divide error at instruction {index}")]
    DivideError { index: usize },
}

#[derive(Debug, Default)]
pub struct Machine {
    stack: Vec<i64>,
    rax: i64,
    rdx: i64,
    rdi: i64,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    fn reg(&self, reg: Reg) -> i64 {
        match reg {
            Reg::Rax => self.rax,
            Reg::Rdi => self.rdi,
        }
    }

    fn reg_mut(&mut self, reg: Reg) -> &mut i64 {
        match reg {
            Reg::Rax => &mut self.rax,
            Reg::Rdi => &mut self.rdi,
        }
    }

    fn operand(&self, op: Operand) -> i64 {
        match op {
            Operand::Reg(r) => self.reg(r),
            Operand::Imm(v) => v,
        }
    }

    /// Run `listing` followed by the epilogue and return the value in rax
    pub fn run(&mut self, listing: &Listing) -> Result<i64, VmError> {
        let epilogue = Listing::epilogue();
        let program = listing.instrs.iter().chain(epilogue.iter());
        for (index, instr) in program.enumerate() {
            if self.step(index, *instr)? {
                break;
            }
        }
        Ok(self.rax)
    }

    /// Execute one instruction; returns true on `ret`
    fn step(&mut self, index: usize, instr: Instr) -> Result<bool, VmError> {
        match instr {
            Instr::Push(op) => {
                let value = self.operand(op);
                self.stack.push(value);
            }
            Instr::Pop(r) => {
                let value = self.stack.pop().ok_or(VmError::StackUnderflow { index })?;
                *self.reg_mut(r) = value;
            }
            Instr::Mov(r, op) => {
                let value = self.operand(op);
                *self.reg_mut(r) = value;
            }
            Instr::Add(dst, src) => {
                let value = self.reg(dst).wrapping_add(self.reg(src));
                *self.reg_mut(dst) = value;
            }
            Instr::Sub(dst, src) => {
                let value = self.reg(dst).wrapping_sub(self.reg(src));
                *self.reg_mut(dst) = value;
            }
            Instr::Imul(dst, src) => {
                let value = self.reg(dst).wrapping_mul(self.reg(src));
                *self.reg_mut(dst) = value;
            }
            Instr::Cqo => {
                self.rdx = if self.rax < 0 { -1 } else { 0 };
            }
            Instr::Idiv(r) => {
                let divisor = self.reg(r) as i128;
                if divisor == 0 {
                    return Err(VmError::DivideError { index });
                }
                let dividend = ((self.rdx as i128) << 64) | (self.rax as u64 as i128);
                let quotient = dividend / divisor;
                let quotient =
                    i64::try_from(quotient).map_err(|_| VmError::DivideError { index })?;
                self.rdx = (dividend % divisor) as i64;
                self.rax = quotient;
            }
            Instr::Ret => return Ok(true),
        }
        Ok(false)
    }
}
