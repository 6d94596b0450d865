use tracing::debug;

use crate::Expr;

/// Assembler dialect of the emitted program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Syntax {
    /// `mov $1, %rax`
    #[default]
    Att,
    /// `mov rax, 1`
    Intel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Register {
    Rax,
    Rdi,
}

impl Register {
    fn name(self, syntax: Syntax) -> &'static str {
        match (self, syntax) {
            (Register::Rax, Syntax::Att) => "%rax",
            (Register::Rdi, Syntax::Att) => "%rdi",
            (Register::Rax, Syntax::Intel) => "rax",
            (Register::Rdi, Syntax::Intel) => "rdi",
        }
    }
}

/// Stack-machine code generator. Every expression leaves its value on top of
/// the machine stack; binary operators pop both operands into rax (left) and
/// rdi (right) and push the result from rax.
pub struct Codegen {
    pub syntax: Syntax,
    pub out: String,
    pub depth: i64,
}

impl Codegen {
    pub fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            out: String::new(),
            depth: 0,
        }
    }

    pub fn program(mut self, node: &Expr) -> String {
        if self.syntax == Syntax::Intel {
            self.emit(".intel_syntax noprefix");
        }
        self.emit(".text");
        self.emit(".globl main");
        self.out.push_str("main:\n");

        self.expr(node);
        self.pop(Register::Rax);
        self.emit("ret");

        debug_assert_eq!(self.depth, 0);
        debug!(lines = self.out.lines().count(), "generated");
        self.out
    }

    fn emit(&mut self, instr: &str) {
        self.out.push_str("  ");
        self.out.push_str(instr);
        self.out.push('\n');
    }

    fn push(&mut self) {
        let rax = Register::Rax.name(self.syntax);
        self.emit(&format!("push {rax}"));
        self.depth += 1;
    }

    fn pop(&mut self, reg: Register) {
        let reg = reg.name(self.syntax);
        self.emit(&format!("pop {reg}"));
        self.depth -= 1;
    }

    fn mov_imm(&mut self, val: i64) {
        let rax = Register::Rax.name(self.syntax);
        match self.syntax {
            Syntax::Att => self.emit(&format!("mov ${val}, {rax}")),
            Syntax::Intel => self.emit(&format!("mov {rax}, {val}")),
        }
    }

    // <op> dst, src in whichever operand order the dialect uses
    fn op(&mut self, mnemonic: &str, dst: Register, src: Register) {
        let dst = dst.name(self.syntax);
        let src = src.name(self.syntax);
        match self.syntax {
            Syntax::Att => self.emit(&format!("{mnemonic} {src}, {dst}")),
            Syntax::Intel => self.emit(&format!("{mnemonic} {dst}, {src}")),
        }
    }

    fn expr(&mut self, node: &Expr) {
        match node {
            Expr::Number(val) => {
                self.mov_imm(*val);
                self.push();
            }
            Expr::Add(lhs, rhs) => {
                self.operands(lhs, rhs);
                self.op("add", Register::Rax, Register::Rdi);
                self.push();
            }
            Expr::Sub(lhs, rhs) => {
                self.operands(lhs, rhs);
                self.op("sub", Register::Rax, Register::Rdi);
                self.push();
            }
            Expr::Mul(lhs, rhs) => {
                self.operands(lhs, rhs);
                self.op("imul", Register::Rax, Register::Rdi);
                self.push();
            }
            Expr::Div(lhs, rhs) => {
                self.operands(lhs, rhs);
                // rdx:rax / rdi, quotient truncated toward zero
                self.emit("cqo");
                let rdi = Register::Rdi.name(self.syntax);
                self.emit(&format!("idiv {rdi}"));
                self.push();
            }
        }
    }

    /// Evaluate left then right, leaving left in rax and right in rdi.
    fn operands(&mut self, lhs: &Expr, rhs: &Expr) {
        self.expr(lhs);
        self.expr(rhs);
        self.pop(Register::Rdi);
        self.pop(Register::Rax);
    }
}
