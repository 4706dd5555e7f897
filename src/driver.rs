//! Compilation driver: lexer -> parser -> code generator
//!
//! Each stage runs only if the previous one succeeded.

use std::fmt::Write;

use crate::backend::vm::Machine;
use crate::backend::{CodeGen, Syntax, X86_64};
use crate::frontend::{lexer::tokenize, parser::parse};
use crate::utils::{Error, Result};

/// Artifact to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Emit {
    /// Assembly program
    #[default]
    Asm,
    /// Token stream, one token per line
    Tokens,
    /// Syntax tree as an S-expression
    Ast,
    /// Value the program would return, computed by simulation
    Value,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub emit: Emit,
    pub syntax: Syntax,
}

/// Compile `source` and render the requested artifact
pub fn compile(source: &str, options: &Options) -> Result<String> {
    let tokens = tokenize(source)?;

    if options.emit == Emit::Tokens {
        let mut out = String::new();
        for token in &tokens {
            let _ = writeln!(out, "{} {:?}", token.span.start, token.kind);
        }
        return Ok(out);
    }

    let expr = parse(tokens)?;

    if options.emit == Emit::Ast {
        return Ok(format!("{}\n", expr));
    }

    let backend = X86_64::default();
    log::debug!("using backend {} ({})", backend.name(), backend.target_triple());
    let listing = backend.generate(&expr);

    match options.emit {
        Emit::Value => {
            let value = Machine::new()
                .run(&listing)
                .map_err(|e| Error::Runtime(e.to_string()))?;
            Ok(format!("{}\n", value))
        }
        _ => Ok(listing.render(options.syntax)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn opts(emit: Emit) -> Options {
        Options {
            emit,
            ..Options::default()
        }
    }

    #[test]
    fn test_default_emits_intel_asm() {
        let asm = compile("1+2", &Options::default()).unwrap();
        assert_eq!(
            asm,
            "\
.intel_syntax noprefix
.global main
main:
    push 1
    push 2
    pop rdi
    pop rax
    add rax, rdi
    push rax
    pop rax
    ret
"
        );
    }

    #[test]
    fn test_att_syntax() {
        let options = Options {
            emit: Emit::Asm,
            syntax: Syntax::Att,
        };
        let asm = compile("2*3", &options).unwrap();
        assert!(!asm.contains(".intel_syntax"));
        assert!(asm.contains("    imul %rdi, %rax\n"));
    }

    #[test]
    fn test_emit_tokens() {
        assert_eq!(
            compile("(1 +2)", &opts(Emit::Tokens)).unwrap(),
            "0 LParen\n1 IntLit(1)\n3 Plus\n4 IntLit(2)\n5 RParen\n6 Eof\n"
        );
    }

    #[test]
    fn test_emit_ast() {
        assert_eq!(compile("1-2-3", &opts(Emit::Ast)).unwrap(), "(- (- 1 2) 3)\n");
    }

    #[test]
    fn test_emit_value() {
        assert_eq!(compile("1-2-3", &opts(Emit::Value)).unwrap(), "-4\n");
        assert_eq!(compile("(2+3)*4", &opts(Emit::Value)).unwrap(), "20\n");
        assert_eq!(compile("100/7/2", &opts(Emit::Value)).unwrap(), "7\n");
    }

    #[test]
    fn test_division_by_zero_compiles() {
        let asm = compile("1/0", &Options::default()).unwrap();
        assert!(asm.contains("idiv rdi"));

        let err = compile("1/0", &opts(Emit::Value)).unwrap_err();
        assert!(matches!(err, Error::Runtime(_)));
    }

    #[test]
    fn test_errors_stop_the_pipeline() {
        let err = compile("1+@", &opts(Emit::Tokens)).unwrap_err();
        assert_eq!(err.offset(), Some(2));

        let err = compile("(1+2", &Options::default()).unwrap_err();
        assert_eq!(err.to_string(), "')' expected");
        assert_eq!(err.offset(), Some(4));
    }

    #[test]
    fn test_tokens_emit_skips_parsing() {
        assert!(compile("1 2", &opts(Emit::Tokens)).is_ok());
        assert!(compile("1 2", &opts(Emit::Ast)).is_err());
    }
}
