//! FILENAME: parser/src/lexer.rs
//! PURPOSE: Hand-written scanner turning a formula string into a Token stream.

use std::iter::Peekable;
use std::str::Chars;

use crate::token::Token;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Star,
            Some('/') => Token::Slash,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,
            Some(c) if c.is_ascii_digit() || c == '.' => self.read_number(c),
            Some(c) if c.is_ascii_alphabetic() => self.read_identifier(c),
            Some(c) => Token::Illegal(c),
            None => Token::EOF,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.input.peek() {
            if c.is_whitespace() {
                self.input.next();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self, first: char) -> Token {
        let mut s = String::new();
        s.push(first);

        while let Some(&c) = self.input.peek() {
            if c.is_ascii_digit() || c == '.' {
                s.push(c);
                self.input.next();
            } else {
                break;
            }
        }

        if let Some(&c) = self.input.peek() {
            if c == 'e' || c == 'E' {
                let mut exp = String::new();
                exp.push(c);
                let mut lookahead = self.input.clone();
                lookahead.next();
                if let Some(&sign) = lookahead.peek() {
                    if sign == '+' || sign == '-' {
                        exp.push(sign);
                        lookahead.next();
                    }
                }
                let has_digits = matches!(lookahead.peek(), Some(d) if d.is_ascii_digit());
                if has_digits {
                    self.input = lookahead;
                    while let Some(&d) = self.input.peek() {
                        if d.is_ascii_digit() {
                            exp.push(d);
                            self.input.next();
                        } else {
                            break;
                        }
                    }
                    s.push_str(&exp);
                }
            }
        }

        s.parse::<f64>()
            .map(Token::Number)
            .unwrap_or(Token::Illegal(first))
    }

    fn read_identifier(&mut self, first: char) -> Token {
        let mut s = String::new();
        s.push(first);

        while let Some(&c) = self.input.peek() {
            if c.is_ascii_alphanumeric() {
                s.push(c);
                self.input.next();
            } else {
                break;
            }
        }

        Token::Ident(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok == Token::EOF;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn tokenizes_arithmetic() {
        assert_eq!(
            tokens("1+2*3"),
            vec![
                Token::Number(1.0),
                Token::Plus,
                Token::Number(2.0),
                Token::Star,
                Token::Number(3.0),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn tokenizes_cell_ref() {
        assert_eq!(
            tokens("A1+ZZ42"),
            vec![
                Token::Ident("A1".to_string()),
                Token::Plus,
                Token::Ident("ZZ42".to_string()),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn tokenizes_exponent() {
        assert_eq!(
            tokens("1.5e3"),
            vec![Token::Number(1500.0), Token::EOF]
        );
    }

    #[test]
    fn skips_whitespace() {
        assert_eq!(
            tokens("  1 +   2  "),
            vec![Token::Number(1.0), Token::Plus, Token::Number(2.0), Token::EOF]
        );
    }

    #[test]
    fn illegal_character() {
        assert_eq!(tokens("1 & 2"), vec![Token::Number(1.0), Token::Illegal('&'), Token::Number(2.0), Token::EOF]);
    }
}
