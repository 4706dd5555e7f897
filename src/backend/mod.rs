//! Backend module - Code generation

pub mod asm;
pub mod codegen;
pub mod vm;
pub mod x86_64;

pub use asm::Syntax;
pub use codegen::CodeGen;
pub use x86_64::X86_64;
