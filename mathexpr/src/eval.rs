use crate::ast::{BinOp, Expression, Func, Node};
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Debug, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("{func} is undefined for argument {arg}")]
    Domain { func: &'static str, arg: f64 },
    #[error("{op} overflowed the representable range")]
    Overflow { op: &'static str },
    #[error("cannot evaluate at non-finite x = {x}")]
    NonFiniteInput { x: f64 },
}

/// Evaluate `expr` at `x`.
///
/// Pure function of `x`: the tree is walked and each node dispatches on the
/// closed operator/function set. Every intermediate value is finite or an
/// error is returned.
pub fn evaluate(expr: &Expression, x: f64) -> Result<f64, EvalError> {
    if !x.is_finite() {
        return Err(EvalError::NonFiniteInput { x });
    }
    eval_node(expr.root(), x)
}

fn finite(value: f64, op: &'static str) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::Overflow { op })
    }
}

fn eval_node(node: &Node, x: f64) -> Result<f64, EvalError> {
    match node {
        Node::Number(n) => finite(*n, "number literal"),
        Node::Variable => Ok(x),
        Node::Neg(operand) => Ok(-eval_node(operand, x)?),
        Node::Binary(op, lhs, rhs) => {
            let l = eval_node(lhs, x)?;
            let r = eval_node(rhs, x)?;
            eval_binop(*op, l, r)
        }
        Node::Call(func, arg) => eval_fn(*func, eval_node(arg, x)?),
    }
}

fn eval_binop(op: BinOp, l: f64, r: f64) -> Result<f64, EvalError> {
    match op {
        BinOp::Add => finite(l + r, "+"),
        BinOp::Sub => finite(l - r, "-"),
        BinOp::Mul => finite(l * r, "*"),
        BinOp::Div => {
            if r.abs() <= f64::EPSILON {
                return Err(EvalError::DivisionByZero);
            }
            finite(l / r, "/")
        }
        BinOp::Pow => {
            if l == 0.0 && r < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            let p = l.powf(r);
            if p.is_nan() {
                // negative base with a non-integer exponent
                return Err(EvalError::Domain { func: "**", arg: l });
            }
            finite(p, "**")
        }
    }
}

fn eval_fn(func: Func, arg: f64) -> Result<f64, EvalError> {
    let value = match func {
        Func::Sin => arg.sin(),
        Func::Cos => arg.cos(),
        Func::Tan => arg.tan(),
        Func::Exp => arg.exp(),
        Func::Abs => arg.abs(),
        Func::Log if arg <= 0.0 => return Err(EvalError::Domain { func: "log", arg }),
        Func::Log => arg.ln(),
        Func::Sqrt if arg < 0.0 => return Err(EvalError::Domain { func: "sqrt", arg }),
        Func::Sqrt => arg.sqrt(),
    };
    finite(value, func.name())
}
