//! Safe evaluation of user supplied formulas over a single variable `x`.
//!
//! Formulas are tokenized, checked against a closed set of operators and
//! functions, parsed into an [`Expression`] and then interpreted by walking
//! the tree. Nothing outside of that closed set can be reached.
//!
//! ```
//! let expr = mathexpr::parse("x**3 - x - 2").unwrap();
//! assert_eq!(mathexpr::evaluate(&expr, 2.0), Ok(4.0));
//! ```

mod ast;
pub use ast::{BinOp, Expression, Func, Node};

mod parser;
pub use parser::{parse, precedence, Assoc, Malformed, ParseError, MAX_DEPTH, VARIABLE};

mod eval;
pub use eval::{evaluate, EvalError};

mod print;
