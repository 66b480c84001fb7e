//! Builder for predicated inline PTX.
//!
//! Operands live in an arena and are referenced by [`OperandId`]. Constants
//! are printed inline; every other operand becomes an inline-asm argument
//! `$n`. Arguments are numbered outputs first (constraints starting with
//! `=`), then inputs, each group in creation order.

use std::fmt::Write;

/// Handle to an operand in a [`PtxBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OperandId(u32);

/// Handle to an emitted instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExecId(u32);

#[derive(Clone, Debug)]
enum Operand<V> {
    Register { value: V, constraint: String },
    Constant(u64),
    Address {
        value: V,
        constraint: String,
        offset: i64,
    },
}

impl<V> Operand<V> {
    fn arg(&self) -> Option<(&V, &str)> {
        match self {
            Self::Register { value, constraint } | Self::Address { value, constraint, .. } => {
                Some((value, constraint))
            }
            Self::Constant(_) => None,
        }
    }
}

/// An instruction opcode: base name plus `.`-separated modifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PtxInstr {
    name: String,
    modifiers: Vec<String>,
}

impl PtxInstr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
        }
    }

    /// Append `modifier` when `enabled`.
    pub fn o(mut self, modifier: impl Into<String>, enabled: bool) -> Self {
        if enabled {
            self.modifiers.push(modifier.into());
        }
        self
    }

    pub fn global(self) -> Self {
        self.o("global", true)
    }

    pub fn shared(self) -> Self {
        self.o("shared", true)
    }

    /// Vector width; `.v1` is implied and never printed.
    pub fn v(self, n: u32) -> Self {
        self.o(format!("v{n}"), n > 1)
    }

    pub fn b(self, width: u32) -> Self {
        self.o(format!("b{width}"), true)
    }

    pub fn opcode(&self) -> String {
        let mut out = self.name.clone();
        for m in &self.modifiers {
            out.push('.');
            out.push_str(m);
        }
        out
    }
}

#[derive(Clone, Debug)]
struct Exec {
    opcode: String,
    operands: Vec<OperandId>,
    predicate: Option<OperandId>,
}

#[derive(Clone, Debug)]
pub struct PtxBuilder<V> {
    operands: Vec<Operand<V>>,
    execs: Vec<Exec>,
}

impl<V> Default for PtxBuilder<V> {
    fn default() -> Self {
        Self {
            operands: Vec::new(),
            execs: Vec::new(),
        }
    }
}

impl<V> PtxBuilder<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, operand: Operand<V>) -> OperandId {
        let id = OperandId(self.operands.len() as u32);
        self.operands.push(operand);
        id
    }

    /// Register operand bound to `value`.
    pub fn new_operand(&mut self, value: V, constraint: impl Into<String>) -> OperandId {
        self.push(Operand::Register {
            value,
            constraint: constraint.into(),
        })
    }

    /// Immediate, printed inline as hex.
    pub fn new_constant(&mut self, value: u64) -> OperandId {
        self.push(Operand::Constant(value))
    }

    /// Memory operand `[ $n + offset ]` with `value` as the address.
    pub fn new_addr(&mut self, value: V, constraint: impl Into<String>, offset: i64) -> OperandId {
        self.push(Operand::Address {
            value,
            constraint: constraint.into(),
            offset,
        })
    }

    /// Emit `instr` applied to `operands`.
    pub fn exec(&mut self, instr: &PtxInstr, operands: &[OperandId]) -> ExecId {
        let id = ExecId(self.execs.len() as u32);
        self.execs.push(Exec {
            opcode: instr.opcode(),
            operands: operands.to_vec(),
            predicate: None,
        });
        id
    }

    /// Guard `exec` with the predicate `value`, passed with constraint `b`.
    pub fn predicate(&mut self, exec: ExecId, value: V) -> OperandId {
        let pred = self.new_operand(value, "b");
        self.execs[exec.0 as usize].predicate = Some(pred);
        pred
    }

    pub fn len(&self) -> usize {
        self.execs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.execs.is_empty()
    }

    /// Argument operands in `$n` order.
    fn arg_order(&self) -> Vec<usize> {
        let is_output = |i: &usize| {
            self.operands[*i]
                .arg()
                .is_some_and(|(_, c)| c.starts_with('='))
        };
        let args = (0..self.operands.len()).filter(|&i| self.operands[i].arg().is_some());
        let (mut order, inputs): (Vec<_>, Vec<_>) = args.partition(is_output);
        order.extend(inputs);
        order
    }

    /// `$n` index of every operand; `None` for constants.
    fn arg_indices(&self) -> Vec<Option<usize>> {
        let mut indices = vec![None; self.operands.len()];
        for (n, i) in self.arg_order().into_iter().enumerate() {
            indices[i] = Some(n);
        }
        indices
    }

    /// The assembly text, one instruction per line.
    pub fn dump(&self) -> String {
        let indices = self.arg_indices();
        let mut lines = Vec::with_capacity(self.execs.len());
        for exec in &self.execs {
            let mut line = String::new();
            if let Some(pred) = exec.predicate {
                let _ = write!(line, "@{} ", self.format_operand(pred, &indices));
            }
            line.push_str(&exec.opcode);
            for (i, &op) in exec.operands.iter().enumerate() {
                line.push_str(if i == 0 { " " } else { ", " });
                line.push_str(&self.format_operand(op, &indices));
            }
            line.push(';');
            lines.push(line);
        }
        lines.join("\r\n")
    }

    fn format_operand(&self, id: OperandId, indices: &[Option<usize>]) -> String {
        let arg = || match indices[id.0 as usize] {
            Some(n) => format!("${n}"),
            None => unreachable!("non-constant operands always have an index"),
        };
        match &self.operands[id.0 as usize] {
            Operand::Constant(v) => format!("0x{v:x}"),
            Operand::Register { .. } => arg(),
            Operand::Address { offset: 0, .. } => format!("[ {} ]", arg()),
            Operand::Address { offset, .. } if *offset < 0 => {
                format!("[ {} - {} ]", arg(), offset.unsigned_abs())
            }
            Operand::Address { offset, .. } => format!("[ {} + {} ]", arg(), offset),
        }
    }

    /// Constraint string, in `$n` order.
    pub fn constraints(&self) -> String {
        self.arg_order()
            .into_iter()
            .filter_map(|i| self.operands[i].arg().map(|(_, c)| c))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Bound values, in `$n` order.
    pub fn args(&self) -> Vec<&V> {
        self.arg_order()
            .into_iter()
            .filter_map(|i| self.operands[i].arg().map(|(v, _)| v))
            .collect()
    }
}
