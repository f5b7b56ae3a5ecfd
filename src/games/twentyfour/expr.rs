//! Exact rational arithmetic and a small recursive-descent parser for the
//! expressions players type: integers, `+ - * /`, parentheses, and `x` as
//! an alternative multiplication sign.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio
{
    num: i64,
    den: i64,
}

fn gcd(mut a: u64, mut b: u64) -> u64
{
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Ratio
{
    /// Reduced fraction with a positive denominator. `None` for `den == 0`
    /// or when the normalized parts no longer fit in an `i64`.
    pub fn new(num: i64, den: i64) -> Option<Self>
    {
        if den == 0 {
            return None;
        }
        let divisor = gcd(num.unsigned_abs(), den.unsigned_abs()).max(1) as i128;
        let sign: i128 = if den < 0 { -1 } else { 1 };
        Some(Self {
            num: i64::try_from(sign * num as i128 / divisor).ok()?,
            den: i64::try_from(sign * den as i128 / divisor).ok()?,
        })
    }

    pub fn from_int(value: i64) -> Self
    {
        Self { num: value, den: 1 }
    }

    pub fn is_zero(self) -> bool
    {
        self.num == 0
    }

    pub fn equals_int(self, value: i64) -> bool
    {
        self.den == 1 && self.num == value
    }

    pub fn checked_add(self, other: Self) -> Result<Self, ExprError>
    {
        let num = self
            .num
            .checked_mul(other.den)
            .zip(other.num.checked_mul(self.den))
            .and_then(|(a, b)| a.checked_add(b));
        let den = self.den.checked_mul(other.den);
        match (num, den) {
            (Some(num), Some(den)) => Self::new(num, den).ok_or(ExprError::Overflow),
            _ => Err(ExprError::Overflow),
        }
    }

    pub fn checked_sub(self, other: Self) -> Result<Self, ExprError>
    {
        self.checked_add(Self {
            num: other.num.checked_neg().ok_or(ExprError::Overflow)?,
            den: other.den,
        })
    }

    pub fn checked_mul(self, other: Self) -> Result<Self, ExprError>
    {
        let num = self.num.checked_mul(other.num).ok_or(ExprError::Overflow)?;
        let den = self.den.checked_mul(other.den).ok_or(ExprError::Overflow)?;
        Self::new(num, den).ok_or(ExprError::Overflow)
    }

    pub fn checked_div(self, other: Self) -> Result<Self, ExprError>
    {
        if other.is_zero() {
            return Err(ExprError::DivisionByZero);
        }
        let num = self.num.checked_mul(other.den).ok_or(ExprError::Overflow)?;
        let den = self.den.checked_mul(other.num).ok_or(ExprError::Overflow)?;
        Self::new(num, den).ok_or(ExprError::Overflow)
    }
}

impl fmt::Display for Ratio
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError
{
    Empty,
    UnexpectedChar(char),
    UnexpectedEnd,
    ExpectedNumber,
    UnclosedParen,
    DivisionByZero,
    Overflow,
}

impl fmt::Display for ExprError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            ExprError::Empty => write!(f, "enter an expression"),
            ExprError::UnexpectedChar(ch) => write!(f, "unexpected character '{ch}'"),
            ExprError::UnexpectedEnd => write!(f, "expression ends too early"),
            ExprError::ExpectedNumber => write!(f, "expected a number or '('"),
            ExprError::UnclosedParen => write!(f, "missing ')'"),
            ExprError::DivisionByZero => write!(f, "division by zero"),
            ExprError::Overflow => write!(f, "number too large"),
        }
    }
}

impl std::error::Error for ExprError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token
{
    Number(i64),
    Plus,
    Minus,
    Times,
    Divide,
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError>
{
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if let Some(digit) = ch.to_digit(10) {
            let mut value = digit as i64;
            chars.next();
            while let Some(digit) = chars.peek().and_then(|next| next.to_digit(10)) {
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit as i64))
                    .ok_or(ExprError::Overflow)?;
                chars.next();
            }
            tokens.push(Token::Number(value));
            continue;
        }
        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' | 'x' | 'X' | '\u{d7}' => Token::Times,
            '/' | '\u{f7}' => Token::Divide,
            '(' => Token::Open,
            ')' => Token::Close,
            other => return Err(ExprError::UnexpectedChar(other)),
        };
        tokens.push(token);
        chars.next();
    }
    Ok(tokens)
}

struct Parser
{
    tokens: Vec<Token>,
    pos: usize,
    numbers: Vec<i64>,
}

impl Parser
{
    fn peek(&self) -> Option<Token>
    {
        self.tokens.get(self.pos).copied()
    }

    fn expression(&mut self) -> Result<Ratio, ExprError>
    {
        let mut value = self.term()?;
        while let Some(token @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if token == Token::Plus {
                value.checked_add(rhs)?
            } else {
                value.checked_sub(rhs)?
            };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Ratio, ExprError>
    {
        let mut value = self.factor()?;
        while let Some(token @ (Token::Times | Token::Divide)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if token == Token::Times {
                value.checked_mul(rhs)?
            } else {
                value.checked_div(rhs)?
            };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<Ratio, ExprError>
    {
        match self.peek() {
            Some(Token::Number(value)) => {
                self.pos += 1;
                self.numbers.push(value);
                Ok(Ratio::from_int(value))
            }
            Some(Token::Open) => {
                self.pos += 1;
                let value = self.expression()?;
                match self.peek() {
                    Some(Token::Close) => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => Err(ExprError::UnclosedParen),
                }
            }
            Some(_) => Err(ExprError::ExpectedNumber),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation
{
    pub value: Ratio,
    /// Every integer literal in the order it appears.
    pub numbers: Vec<i64>,
}

pub fn evaluate(input: &str) -> Result<Evaluation, ExprError>
{
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        numbers: Vec::new(),
    };
    let value = parser.expression()?;
    if let Some(token) = parser.peek() {
        let ch = match token {
            Token::Close => ')',
            Token::Open => '(',
            _ => return Err(ExprError::ExpectedNumber),
        };
        return Err(ExprError::UnexpectedChar(ch));
    }
    Ok(Evaluation {
        value,
        numbers: parser.numbers,
    })
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_precedence_and_parens()
    {
        let result = evaluate("2 + 3 * 4").unwrap();
        assert!(result.value.equals_int(14));
        let result = evaluate("(2 + 3) x 4").unwrap();
        assert!(result.value.equals_int(20));
        assert_eq!(result.numbers, vec![2, 3, 4]);
    }

    #[test]
    fn test_exact_fractions()
    {
        // 8 / (3 - 8 / 3) = 24 only with exact arithmetic
        let result = evaluate("8/(3-8/3)").unwrap();
        assert!(result.value.equals_int(24));
        assert_eq!(result.numbers, vec![8, 3, 8, 3]);
        assert_eq!(evaluate("1/3").unwrap().value.to_string(), "1/3");
    }

    #[test]
    fn test_left_associative_subtraction()
    {
        assert!(evaluate("10 - 4 - 3").unwrap().value.equals_int(3));
        assert!(evaluate("12 / 3 / 2").unwrap().value.equals_int(2));
    }

    #[test]
    fn test_errors()
    {
        assert_eq!(evaluate("   "), Err(ExprError::Empty));
        assert_eq!(evaluate("4 / (2 - 2)"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("(1 + 2"), Err(ExprError::UnclosedParen));
        assert_eq!(evaluate("1 +"), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate("1 + a"), Err(ExprError::UnexpectedChar('a')));
        assert_eq!(evaluate("1 2"), Err(ExprError::ExpectedNumber));
        assert_eq!(evaluate("(1) )"), Err(ExprError::UnexpectedChar(')')));
        assert_eq!(evaluate("-3 + 5"), Err(ExprError::ExpectedNumber));
    }

    #[test]
    fn test_ratio_normalizes_sign()
    {
        assert_eq!(Ratio::new(2, -4), Ratio::new(-1, 2));
        assert_eq!(Ratio::new(0, -5), Some(Ratio::from_int(0)));
        assert_eq!(Ratio::new(1, 0), None);
        assert_eq!(Ratio::new(i64::MIN, -1), None);
        assert_eq!(Ratio::new(i64::MIN, i64::MIN), Some(Ratio::from_int(1)));
    }

    #[test]
    fn test_extreme_values_report_overflow()
    {
        let result = evaluate("0-9223372036854775807-1").unwrap();
        assert!(result.value.equals_int(i64::MIN));
        assert_eq!(
            evaluate("(0-9223372036854775807-1)/(0-1)"),
            Err(ExprError::Overflow)
        );
        assert_eq!(
            evaluate("1-(0-9223372036854775807-1)"),
            Err(ExprError::Overflow)
        );
        assert_eq!(evaluate("99999999999999999999"), Err(ExprError::Overflow));
    }
}
