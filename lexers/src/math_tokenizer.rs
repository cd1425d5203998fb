#![deny(warnings)]

use crate::helpers;
use crate::scanner::Scanner;


#[derive(Clone, PartialEq, Debug)]
pub enum MathToken {
    Unknown(String),
    Number(f64),
    Variable(String),
    Function(String),
    UOp(String), BOp(String),
    OParen, CParen,
}

impl MathToken {
    /// Source-like spelling, used when reporting a token back to the user.
    pub fn lexeme(&self) -> String {
        match self {
            MathToken::Unknown(s) | MathToken::Variable(s) | MathToken::Function(s) => s.clone(),
            MathToken::UOp(op) | MathToken::BOp(op) => op.clone(),
            MathToken::Number(n) => n.to_string(),
            MathToken::OParen => "(".to_string(),
            MathToken::CParen => ")".to_string(),
        }
    }
}

pub struct MathTokenizer<I: Iterator<Item=char>> {
    src: Scanner<I>,
    prev: Option<MathToken>
}

impl<I: Iterator<Item=char>> MathTokenizer<I> {
    pub fn new(source: I) -> Self {
        MathTokenizer{src: Scanner::new(source), prev: None}
    }

    // when would a minus be unary? we need to know the prev token
    fn makes_unary(prev: &Option<MathToken>) -> bool {
        !matches!(
            *prev,
            Some(MathToken::Number(_)) | Some(MathToken::Variable(_)) | Some(MathToken::CParen)
        )
    }

    fn get_token(&mut self) -> Option<MathToken> {
        self.src.ignore_ws(); // discard whatever came before + and spaces
        if let Some(op) = helpers::scan_math_op(&mut self.src) {
            match op.as_ref() {
                "(" => Some(MathToken::OParen),
                ")" => Some(MathToken::CParen),
                "-" if Self::makes_unary(&self.prev) => Some(MathToken::UOp(op)),
                _ => Some(MathToken::BOp(op)),
            }
        } else if let Some(id) = helpers::scan_identifier(&mut self.src) {
            // a name followed by '(' is a call, spaces in between allowed
            self.src.ignore_ws();
            match self.src.peek() {
                Some('(') => Some(MathToken::Function(id)),
                _ => Some(MathToken::Variable(id))
            }
        } else if let Some(num) = helpers::scan_number(&mut self.src) {
            match num.parse::<f64>() {
                Ok(n) => Some(MathToken::Number(n)),
                Err(_) => Some(MathToken::Unknown(num)),
            }
        } else if self.src.next().is_some() {
            Some(MathToken::Unknown(self.src.extract_string()))
        } else {
            None
        }
    }
}

impl<'a> MathTokenizer<std::str::Chars<'a>> {
    pub fn from_str(source: &'a str) -> Self {
        Self::new(source.chars())
    }
}

impl<I: Iterator<Item=char>> Iterator for MathTokenizer<I> {
    type Item = MathToken;
    fn next(&mut self) -> Option<Self::Item> {
        let token = self.get_token();
        self.prev = token.clone();
        token
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{MathToken, MathTokenizer};

    fn check(input: &str, expect: &[MathToken]) {
        let mut lx = MathTokenizer::from_str(input);
        for exp_token in expect.iter() {
            let token = lx.next().unwrap();
            assert_eq!(*exp_token, token);
        }
        assert_eq!(lx.next(), None);
    }

    #[test]
    fn basic_ops() {
        check("3+4*2/-(1-x)**2**3", &[
            MathToken::Number(3.0),
            MathToken::BOp(format!("+")),
            MathToken::Number(4.0),
            MathToken::BOp(format!("*")),
            MathToken::Number(2.0),
            MathToken::BOp(format!("/")),
            MathToken::UOp(format!("-")),
            MathToken::OParen,
            MathToken::Number(1.0),
            MathToken::BOp(format!("-")),
            MathToken::Variable(format!("x")),
            MathToken::CParen,
            MathToken::BOp(format!("**")),
            MathToken::Number(2.0),
            MathToken::BOp(format!("**")),
            MathToken::Number(3.0),
        ]);
    }

    #[test]
    fn functions_and_spaces() {
        check(" 3.4e-2 * sin( x ) / exp(.5)", &[
            MathToken::Number(3.4e-2),
            MathToken::BOp(format!("*")),
            MathToken::Function(format!("sin")),
            MathToken::OParen,
            MathToken::Variable(format!("x")),
            MathToken::CParen,
            MathToken::BOp(format!("/")),
            MathToken::Function(format!("exp")),
            MathToken::OParen,
            MathToken::Number(0.5),
            MathToken::CParen,
        ]);
    }

    #[test]
    fn unary_ops() {
        check("x---y", &[
            MathToken::Variable(format!("x")),
            MathToken::BOp(format!("-")),
            MathToken::UOp(format!("-")),
            MathToken::UOp(format!("-")),
            MathToken::Variable(format!("y")),
        ]);
        check("2**-x", &[
            MathToken::Number(2.0),
            MathToken::BOp(format!("**")),
            MathToken::UOp(format!("-")),
            MathToken::Variable(format!("x")),
        ]);
    }

    #[test]
    fn call_with_space_before_paren() {
        check("sin (x) + x (", &[
            MathToken::Function(format!("sin")),
            MathToken::OParen,
            MathToken::Variable(format!("x")),
            MathToken::CParen,
            MathToken::BOp(format!("+")),
            MathToken::Function(format!("x")),
            MathToken::OParen,
        ]);
        check("x 2", &[MathToken::Variable(format!("x")), MathToken::Number(2.0)]);
    }

    #[test]
    fn unknown_chars() {
        check("x $ 1", &[
            MathToken::Variable(format!("x")),
            MathToken::Unknown(format!("$")),
            MathToken::Number(1.0),
        ]);
        check("x,1", &[
            MathToken::Variable(format!("x")),
            MathToken::Unknown(format!(",")),
            MathToken::Number(1.0),
        ]);
    }
}
