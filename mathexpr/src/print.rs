use crate::ast::{Expression, Node};
use crate::parser::{precedence, Assoc, NEG_PRECEDENCE, VARIABLE};
use std::fmt;

// numbers, x and calls never need parens
const ATOM_PREC: usize = 99;

fn printer(node: &Node) -> (String, usize) {
    match node {
        Node::Number(n) => (format!("{}", n), ATOM_PREC),
        Node::Variable => (VARIABLE.to_string(), ATOM_PREC),
        Node::Call(func, arg) => (format!("{}({})", func.name(), printer(arg).0), ATOM_PREC),
        Node::Neg(operand) => {
            let (inner, prec) = printer(operand);
            if prec < NEG_PRECEDENCE {
                (format!("-({})", inner), NEG_PRECEDENCE)
            } else {
                (format!("-{}", inner), NEG_PRECEDENCE)
            }
        }
        Node::Binary(op, lhs, rhs) => {
            let (prec, assoc) = precedence(*op);
            let (l, lprec) = printer(lhs);
            let (r, rprec) = printer(rhs);
            let lh = if lprec < prec || (lprec == prec && assoc != Assoc::Left) {
                format!("({})", l)
            } else {
                l
            };
            let rh = if rprec < prec || (rprec == prec && assoc != Assoc::Right) {
                format!("({})", r)
            } else {
                r
            };
            (format!("{} {} {}", lh, op.symbol(), rh), prec)
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", printer(self).0)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.root())
    }
}
