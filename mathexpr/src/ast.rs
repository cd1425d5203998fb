use std::str::FromStr;

/// Binary operators, `Pow` is spelled `**` (or `^`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "**",
        }
    }
}

impl FromStr for BinOp {
    type Err = ();
    fn from_str(op: &str) -> Result<Self, Self::Err> {
        match op {
            "+" => Ok(BinOp::Add),
            "-" => Ok(BinOp::Sub),
            "*" => Ok(BinOp::Mul),
            "/" => Ok(BinOp::Div),
            "**" | "^" => Ok(BinOp::Pow),
            _ => Err(()),
        }
    }
}

/// The complete set of callable functions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Sqrt,
    Abs,
}

impl Func {
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
        }
    }
}

impl FromStr for Func {
    type Err = ();
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "sin" => Ok(Func::Sin),
            "cos" => Ok(Func::Cos),
            "tan" => Ok(Func::Tan),
            "exp" => Ok(Func::Exp),
            "log" => Ok(Func::Log),
            "sqrt" => Ok(Func::Sqrt),
            "abs" => Ok(Func::Abs),
            _ => Err(()),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum Node {
    Number(f64),
    Variable,
    Neg(Box<Node>),
    Binary(BinOp, Box<Node>, Box<Node>),
    Call(Func, Box<Node>),
}

impl Node {
    pub(crate) fn binary(op: BinOp, lhs: Node, rhs: Node) -> Node {
        Node::Binary(op, Box::new(lhs), Box::new(rhs))
    }
}

/// A parsed formula over `x`. Immutable once built.
#[derive(Clone, PartialEq, Debug)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    pub(crate) fn new(source: &str, root: Node) -> Self {
        Expression { source: source.to_string(), root }
    }

    /// The text this expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Evaluate at `x`, see [`crate::evaluate`].
    pub fn eval(&self, x: f64) -> Result<f64, crate::EvalError> {
        crate::evaluate(self, x)
    }
}

impl FromStr for Expression {
    type Err = crate::ParseError;
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        crate::parse(text)
    }
}
