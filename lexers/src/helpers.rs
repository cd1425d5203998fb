#![deny(warnings)]

use crate::scanner::Scanner;

/*
 * The caller of these functions is expected to setup the scanner for a
 * clear start, ie: call scanner.ignore() to start fresh.
 * On a miss the scanner is left where it was.
 */

const DIGITS: &str = "0123456789";

// scan unsigned decimals like [0-9]*(\.[0-9]*)?([eE][+-]?[0-9]+)?
// requiring at least one digit in the mantissa
pub fn scan_number<I: Iterator<Item=char>>(scanner: &mut Scanner<I>) -> Option<String> {
    let backtrack = scanner.pos();
    let int_part = scanner.skip_all_chars(DIGITS);
    let frac_part = if scanner.accept_any_char(".").is_some() {
        scanner.skip_all_chars(DIGITS)
    } else {
        false
    };
    if !int_part && !frac_part {
        scanner.set_pos(backtrack);
        return None;
    }
    // exponent only counts if digits follow
    let backtrack = scanner.pos();
    if scanner.accept_any_char("Ee").is_some() {
        scanner.accept_any_char("+-");
        if !scanner.skip_all_chars(DIGITS) {
            scanner.set_pos(backtrack);
        }
    }
    Some(scanner.extract_string())
}

// arithmetic operators and parens
pub fn scan_math_op<I: Iterator<Item=char>>(scanner: &mut Scanner<I>) -> Option<String> {
    if scanner.accept_any_char("*").is_some() {
        // '*' or '**'
        scanner.accept_any_char("*");
        Some(scanner.extract_string())
    } else if scanner.accept_any_char("+-/^()").is_some() {
        Some(scanner.extract_string())
    } else {
        None
    }
}

// scan [a-zA-Z_][a-zA-Z0-9_]*
pub fn scan_identifier<I: Iterator<Item=char>>(scanner: &mut Scanner<I>) -> Option<String> {
    let alfa = concat!("abcdefghijklmnopqrstuvwxyz",
                       "ABCDEFGHIJKLMNOPQRSTUVWXYZ_");
    let alnum = concat!("0123456789",
                        "abcdefghijklmnopqrstuvwxyz",
                        "ABCDEFGHIJKLMNOPQRSTUVWXYZ_");
    scanner.accept_any_char(alfa)?;
    scanner.skip_all_chars(alnum);
    Some(scanner.extract_string())
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_number() {
        let tests = vec![
            "987", "41.98", ".5", "7.",
            "28e3", "54E+2", "54e-33",
            "85.365e3", "54.234E+2", "54.849e-33",
        ];
        for t in tests.iter() {
            let mut s = Scanner::from_str(t);
            assert_eq!(Some(t.to_string()), scan_number(&mut s));
        }
    }

    #[test]
    fn number_stops_before_dangling_exponent() {
        let mut s = Scanner::from_str("2e+x");
        assert_eq!(scan_number(&mut s), Some("2".to_string()));
        assert_eq!(s.next(), Some('e'));
    }

    #[test]
    fn signs_and_dots_are_not_numbers() {
        for t in ["-3", "+3", ".", "e5"].iter() {
            let mut s = Scanner::from_str(t);
            assert_eq!(scan_number(&mut s), None);
            assert_eq!(s.pos(), -1);
        }
    }

    #[test]
    fn test_scan_math_ops() {
        let tests = vec!["(", ")", "*", "**", "^", "+", "-", "/"];
        for t in tests.iter() {
            let mut s = Scanner::from_str(t);
            assert_eq!(Some(t.to_string()), scan_math_op(&mut s));
        }
        for t in ["%", "!", "=", "<", ","].iter() {
            let mut s = Scanner::from_str(t);
            assert_eq!(scan_math_op(&mut s), None);
        }
    }

    #[test]
    fn test_scan_identifiers() {
        let tests = vec!["x", "sin", "sqrt", "_00", "bla23"];
        for t in tests.iter() {
            let mut s = Scanner::from_str(t);
            assert_eq!(Some(t.to_string()), scan_identifier(&mut s));
        }
        let mut s = Scanner::from_str("2x");
        assert_eq!(scan_identifier(&mut s), None);
    }
}
