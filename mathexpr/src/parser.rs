use crate::ast::{BinOp, Expression, Func, Node};
use lexers::{MathToken, MathTokenizer};
use log::trace;
use thiserror::Error;

/// Name of the single free variable.
pub const VARIABLE: &str = "x";

/// Deepest tree (and deepest parser recursion) a formula may produce.
/// Evaluating, printing and dropping a tree all recurse over it.
pub const MAX_DEPTH: usize = 256;

#[derive(Clone, PartialEq, Debug, Error)]
pub enum ParseError {
    #[error("unknown token '{0}'")]
    UnknownToken(String),
    #[error("malformed expression: {0}")]
    Malformed(Malformed),
}

#[derive(Clone, PartialEq, Debug, Error)]
pub enum Malformed {
    #[error("empty expression")]
    Empty,
    #[error("missing operand")]
    MissingOperand,
    #[error("missing closing paren")]
    MissingCParen,
    #[error("missing opening paren")]
    MissingOParen,
    #[error("unexpected '{0}' after a complete expression")]
    Trailing(String),
    #[error("function '{0}' must be followed by '('")]
    BareFunction(String),
    #[error("nested deeper than {0} levels")]
    TooDeep(usize),
}

impl From<Malformed> for ParseError {
    fn from(m: Malformed) -> Self {
        ParseError::Malformed(m)
    }
}

#[derive(PartialEq, Debug)]
pub enum Assoc {
    Left,
    Right,
}

// Unary minus sits between '*' and '**': -x**2 is -(x**2) while 2**-x
// still parses because '**' reads its right operand as a unary.
pub(crate) const NEG_PRECEDENCE: usize = 4;

pub fn precedence(op: BinOp) -> (usize, Assoc) {
    match op {
        BinOp::Add | BinOp::Sub => (2, Assoc::Left),
        BinOp::Mul | BinOp::Div => (3, Assoc::Left),
        BinOp::Pow => (5, Assoc::Right),
    }
}

// Closed token set, everything else was rejected while tokenizing.
#[derive(Clone, PartialEq, Debug)]
enum Tok {
    Num(f64),
    X,
    Call(Func),
    Op(BinOp),
    Neg,
    OParen,
    CParen,
}

impl Tok {
    fn lexeme(&self) -> String {
        match self {
            Tok::Num(n) => n.to_string(),
            Tok::X => VARIABLE.to_string(),
            Tok::Call(f) => f.name().to_string(),
            Tok::Op(op) => op.symbol().to_string(),
            Tok::Neg => "-".to_string(),
            Tok::OParen => "(".to_string(),
            Tok::CParen => ")".to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Tok>, ParseError> {
    let classify = |token: MathToken| -> Result<Tok, ParseError> {
        match token {
            MathToken::Number(n) => Ok(Tok::Num(n)),
            MathToken::Variable(ref v) if v == VARIABLE => Ok(Tok::X),
            MathToken::Variable(v) => match v.parse::<Func>() {
                Ok(_) => Err(Malformed::BareFunction(v).into()),
                Err(_) => Err(ParseError::UnknownToken(v)),
            },
            MathToken::Function(f) => f
                .parse::<Func>()
                .map(Tok::Call)
                .map_err(|_| ParseError::UnknownToken(f)),
            MathToken::UOp(ref op) if op == "-" => Ok(Tok::Neg),
            MathToken::BOp(op) => op
                .parse::<BinOp>()
                .map(Tok::Op)
                .map_err(|_| ParseError::UnknownToken(op)),
            MathToken::OParen => Ok(Tok::OParen),
            MathToken::CParen => Ok(Tok::CParen),
            other => Err(ParseError::UnknownToken(other.lexeme())),
        }
    };
    MathTokenizer::from_str(text).map(classify).collect()
}

/// Precedence climbing over the closed token set.
///
///   expr  := unary (binop expr)*    -- subject to precedence/assoc
///   unary := '-' unary | atom
///   atom  := number | 'x' | func '(' expr ')' | '(' expr ')'
struct Parser {
    tokens: Vec<Tok>,
    pos: usize,
    depth: usize,
}

// Each parse step returns the subtree with its height.
type Built = Result<(Node, usize), ParseError>;

fn grown(height: usize) -> Result<usize, ParseError> {
    if height > MAX_DEPTH {
        return Err(Malformed::TooDeep(MAX_DEPTH).into());
    }
    Ok(height)
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Tok> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_cparen(&mut self) -> Result<(), ParseError> {
        match self.next() {
            Some(Tok::CParen) => Ok(()),
            Some(other) => Err(Malformed::Trailing(other.lexeme()).into()),
            None => Err(Malformed::MissingCParen.into()),
        }
    }

    fn expr(&mut self, min_prec: usize) -> Built {
        self.depth += 1;
        let built = match grown(self.depth) {
            Ok(_) => self.climb(min_prec),
            Err(e) => Err(e),
        };
        self.depth -= 1;
        built
    }

    fn climb(&mut self, min_prec: usize) -> Built {
        let (mut lhs, mut height) = self.unary()?;
        while let Some(&Tok::Op(op)) = self.peek() {
            let (prec, assoc) = precedence(op);
            if prec < min_prec {
                break;
            }
            self.next();
            let next_min = match assoc {
                Assoc::Left => prec + 1,
                Assoc::Right => prec,
            };
            let (rhs, rhs_height) = self.expr(next_min)?;
            height = grown(height.max(rhs_height) + 1)?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok((lhs, height))
    }

    fn unary(&mut self) -> Built {
        if self.peek() == Some(&Tok::Neg) {
            self.next();
            let (operand, height) = self.expr(NEG_PRECEDENCE)?;
            return Ok((Node::Neg(Box::new(operand)), grown(height + 1)?));
        }
        self.atom()
    }

    fn atom(&mut self) -> Built {
        match self.next() {
            Some(Tok::Num(n)) => Ok((Node::Number(n), 1)),
            Some(Tok::X) => Ok((Node::Variable, 1)),
            Some(Tok::Call(func)) => {
                if self.next() != Some(Tok::OParen) {
                    return Err(Malformed::BareFunction(func.name().to_string()).into());
                }
                let (arg, height) = self.expr(0)?;
                self.expect_cparen()?;
                Ok((Node::Call(func, Box::new(arg)), grown(height + 1)?))
            }
            Some(Tok::OParen) => {
                let inner = self.expr(0)?;
                self.expect_cparen()?;
                Ok(inner)
            }
            Some(Tok::Op(_)) | Some(Tok::Neg) | Some(Tok::CParen) | None => {
                Err(Malformed::MissingOperand.into())
            }
        }
    }
}

/// Parse `text` into an [`Expression`] over `x`.
pub fn parse(text: &str) -> Result<Expression, ParseError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(Malformed::Empty.into());
    }
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let (root, _) = parser.expr(0)?;
    match parser.next() {
        None => {
            trace!("parsed '{}' into {:?}", text, root);
            Ok(Expression::new(text, root))
        }
        Some(Tok::CParen) => Err(Malformed::MissingOParen.into()),
        Some(other) => Err(Malformed::Trailing(other.lexeme()).into()),
    }
}
