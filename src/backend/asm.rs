//! Stack-machine instructions and their x86-64 assembly text
//!
//! The generator produces a [`Listing`]; rendering wraps it with the
//! `main` prologue and the `pop rax; ret` epilogue.

use std::fmt::Write;

/// Assembly dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Syntax {
    /// `.intel_syntax noprefix`, destination first
    #[default]
    Intel,
    /// GNU as default, `%`/`$` prefixes, source first
    Att,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    Rax,
    Rdi,
}

impl Reg {
    fn name(&self) -> &'static str {
        match self {
            Reg::Rax => "rax",
            Reg::Rdi => "rdi",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Imm(i64),
}

impl Operand {
    fn render(&self, syntax: Syntax) -> String {
        match (self, syntax) {
            (Operand::Reg(r), Syntax::Intel) => r.name().to_string(),
            (Operand::Reg(r), Syntax::Att) => format!("%{}", r.name()),
            (Operand::Imm(v), Syntax::Intel) => v.to_string(),
            (Operand::Imm(v), Syntax::Att) => format!("${}", v),
        }
    }
}

/// True if `value` can be encoded as a sign-extended 32-bit immediate
pub fn fits_imm32(value: i64) -> bool {
    i32::try_from(value).is_ok()
}

/// One stack-machine instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    Push(Operand),
    Pop(Reg),
    Mov(Reg, Operand),
    Add(Reg, Reg),
    Sub(Reg, Reg),
    Imul(Reg, Reg),
    /// Sign-extend rax into rdx:rax
    Cqo,
    /// Signed divide rdx:rax, quotient to rax
    Idiv(Reg),
    Ret,
}

impl Instr {
    /// Change in operand stack depth
    pub fn stack_effect(&self) -> isize {
        match self {
            Instr::Push(_) => 1,
            Instr::Pop(_) => -1,
            _ => 0,
        }
    }

    pub fn render(&self, syntax: Syntax) -> String {
        let reg = |r: &Reg| Operand::Reg(*r).render(syntax);
        // dst, src in Intel order; swapped for AT&T
        let binary = |mnemonic: &str, dst: String, src: String| match syntax {
            Syntax::Intel => format!("{} {}, {}", mnemonic, dst, src),
            Syntax::Att => format!("{} {}, {}", mnemonic, src, dst),
        };

        match self {
            Instr::Push(op) => format!("push {}", op.render(syntax)),
            Instr::Pop(r) => format!("pop {}", reg(r)),
            Instr::Mov(dst, src) => {
                let mnemonic = match src {
                    Operand::Imm(v) if !fits_imm32(*v) => "movabs",
                    _ => "mov",
                };
                binary(mnemonic, reg(dst), src.render(syntax))
            }
            Instr::Add(dst, src) => binary("add", reg(dst), reg(src)),
            Instr::Sub(dst, src) => binary("sub", reg(dst), reg(src)),
            Instr::Imul(dst, src) => binary("imul", reg(dst), reg(src)),
            Instr::Cqo => "cqo".to_string(),
            Instr::Idiv(r) => format!("idiv {}", reg(r)),
            Instr::Ret => "ret".to_string(),
        }
    }
}

/// An ordered instruction sequence for one expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub instrs: Vec<Instr>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    /// Stack depth after running every instruction
    pub fn net_depth(&self) -> isize {
        self.instrs.iter().map(Instr::stack_effect).sum()
    }

    /// Deepest the operand stack gets while running
    pub fn max_depth(&self) -> isize {
        let mut depth = 0;
        let mut max = 0;
        for instr in &self.instrs {
            depth += instr.stack_effect();
            max = max.max(depth);
        }
        max
    }

    /// Instruction lines, without prologue or epilogue
    pub fn lines(&self, syntax: Syntax) -> Vec<String> {
        self.instrs.iter().map(|i| i.render(syntax)).collect()
    }

    /// Instructions executed after the listing to return its value
    pub fn epilogue() -> [Instr; 2] {
        [Instr::Pop(Reg::Rax), Instr::Ret]
    }

    /// Render a complete assembly program with `main` as entry point
    pub fn render(&self, syntax: Syntax) -> String {
        let mut out = String::new();
        if syntax == Syntax::Intel {
            out.push_str(".intel_syntax noprefix\n");
        }
        out.push_str(".global main\n");
        out.push_str("main:\n");

        let epilogue = Self::epilogue().into_iter().map(|i| i.render(syntax));
        for line in self.lines(syntax).into_iter().chain(epilogue) {
            // Writing to a String cannot fail
            let _ = writeln!(out, "    {}", line);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_intel() {
        let listing = Listing {
            instrs: vec![Instr::Push(Operand::Imm(42))],
        };
        assert_eq!(
            listing.render(Syntax::Intel),
            ".intel_syntax noprefix\n.global main\nmain:\n    push 42\n    pop rax\n    ret\n"
        );
    }

    #[test]
    fn test_render_att() {
        let listing = Listing {
            instrs: vec![
                Instr::Push(Operand::Imm(7)),
                Instr::Push(Operand::Imm(2)),
                Instr::Pop(Reg::Rdi),
                Instr::Pop(Reg::Rax),
                Instr::Sub(Reg::Rax, Reg::Rdi),
                Instr::Push(Operand::Reg(Reg::Rax)),
            ],
        };
        assert_eq!(
            listing.render(Syntax::Att),
            ".global main\nmain:\n    push $7\n    push $2\n    pop %rdi\n    pop %rax\n    sub %rdi, %rax\n    push %rax\n    pop %rax\n    ret\n"
        );
    }

    #[test]
    fn test_wide_immediate_uses_movabs() {
        let mov = Instr::Mov(Reg::Rax, Operand::Imm(5_000_000_000));
        assert_eq!(mov.render(Syntax::Intel), "movabs rax, 5000000000");
        assert_eq!(mov.render(Syntax::Att), "movabs $5000000000, %rax");
        assert_eq!(Instr::Mov(Reg::Rax, Operand::Imm(1)).render(Syntax::Intel), "mov rax, 1");
    }

    #[test]
    fn test_fits_imm32() {
        assert!(fits_imm32(i32::MAX as i64));
        assert!(fits_imm32(i32::MIN as i64));
        assert!(!fits_imm32(i32::MAX as i64 + 1));
    }

    #[test]
    fn test_depths() {
        let listing = Listing {
            instrs: vec![
                Instr::Push(Operand::Imm(1)),
                Instr::Push(Operand::Imm(2)),
                Instr::Pop(Reg::Rdi),
                Instr::Pop(Reg::Rax),
                Instr::Add(Reg::Rax, Reg::Rdi),
                Instr::Push(Operand::Reg(Reg::Rax)),
            ],
        };
        assert_eq!(listing.net_depth(), 1);
        assert_eq!(listing.max_depth(), 2);
    }
}
