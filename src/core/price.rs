//! Price entry: plain amounts or small arithmetic expressions such as
//! `20 + 5`, `15*2` or `(12.50 + 3) / 2`.

use crate::constants::MAX_PRICE_NESTING;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut position = 0;

    while position < chars.len() {
        let c = chars[position];
        match c {
            ' ' | '\t' | '$' => position += 1,
            '+' | '-' | '*' | '/' | '(' | ')' => {
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    _ => Token::RParen,
                });
                position += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = position;
                while position < chars.len() && (chars[position].is_ascii_digit() || chars[position] == '.') {
                    position += 1;
                }
                let literal: String = chars[start..position].iter().collect();
                tokens.push(Token::Number(literal.parse().ok()?));
            }
            _ => return None,
        }
    }
    Some(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;
        token
    }

    fn parse_expression(&mut self) -> Option<f64> {
        let mut value = self.parse_term()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Plus => {
                    self.advance();
                    value += self.parse_term()?;
                }
                Token::Minus => {
                    self.advance();
                    value -= self.parse_term()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn parse_term(&mut self) -> Option<f64> {
        let mut value = self.parse_factor()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Star => {
                    self.advance();
                    value *= self.parse_factor()?;
                }
                Token::Slash => {
                    self.advance();
                    value /= self.parse_factor()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn parse_factor(&mut self) -> Option<f64> {
        match self.advance()? {
            Token::Number(n) => Some(n),
            Token::Minus => self.nested(Self::parse_factor).map(|v| -v),
            Token::Plus => self.nested(Self::parse_factor),
            Token::LParen => {
                let value = self.nested(Self::parse_expression)?;
                match self.advance()? {
                    Token::RParen => Some(value),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Runs one level deeper, giving up past `MAX_PRICE_NESTING`.
    fn nested(&mut self, parse: fn(&mut Self) -> Option<f64>) -> Option<f64> {
        if self.depth >= MAX_PRICE_NESTING {
            return None;
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }
}

/// Evaluates a price expression, `None` when it is malformed.
pub fn evaluate(input: &str) -> Option<f64> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return None;
    }
    let mut parser = Parser {
        tokens,
        position: 0,
        depth: 0,
    };
    let value = parser.parse_expression()?;
    if parser.position != parser.tokens.len() {
        return None;
    }
    Some(value)
}

/// Non-finite and negative amounts become `0.0`.
pub fn clamp_price(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 { value } else { 0.0 }
}

/// Malformed, non-finite or negative prices become `0.0`.
pub fn parse_price(input: &str) -> f64 {
    evaluate(input).map(clamp_price).unwrap_or(0.0)
}
