//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with function calls, cell
//! references and ranges.

use crate::ast::{BinaryOperator, CellReference, FormulaExpr, RangeReference, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::DEFAULT_MAX_DEPTH;
use cellcalc_core::{is_valid_address_text, CellError};

/// Parse a formula string into an AST
///
/// # Example
/// ```rust
/// use cellcalc_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("=SUM(A1:A10)").unwrap();
/// let ast = parse_formula("=SUM(A3, SUM(A4:A6))").unwrap();
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let formula = formula.trim();

    let body = formula
        .strip_prefix('=')
        .ok_or_else(|| FormulaError::Parse("Formula must start with '='".into()))?;

    parse_expression(body, DEFAULT_MAX_DEPTH)
}

/// Parse a formula body (no leading `=`) into an AST
///
/// Parentheses, function arguments and unary signs each count as one nesting level;
/// going deeper than `max_depth` fails with [`FormulaError::NestingTooDeep`].
pub fn parse_expression(body: &str, max_depth: usize) -> FormulaResult<FormulaExpr> {
    let mut parser = FormulaParser::new(body, max_depth);
    let expr = parser.parse_expression()?;

    // Trailing tokens mean the body was not a single expression
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Parse(format!(
            "Unexpected {:?} after expression",
            parser.current_token()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals
    Number(f64),
    Error(CellError),

    // Identifiers and references
    Identifier(String), // Function name or bare symbol
    CellRef(String),    // Cell reference like A1

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Colon,
    Comma,

    // Delimiters
    LeftParen,
    RightParen,

    /// A character no formula may contain
    Unknown(char),

    // End of input
    Eof,
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    depth: usize,
    max_depth: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str, max_depth: usize) -> Self {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            depth: 0,
            max_depth,
        };
        parser.advance_token();
        parser
    }

    // === Token scanning ===

    fn advance_token(&mut self) {
        self.current_token = self.scan_token();
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Token::Eof,
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return token;
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Identifier, cell reference, or error
        if c.is_ascii_alphabetic() || c == '_' || c == '#' {
            return self.scan_identifier_or_ref();
        }

        self.advance();
        Token::Unknown(c)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part; a trailing point ("456.") is allowed
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        match num_str.parse::<f64>() {
            Ok(num) => Token::Number(num),
            // Only reachable for a lone '.', which scan_token never hands us
            Err(_) => Token::Unknown('.'),
        }
    }

    fn scan_identifier_or_ref(&mut self) -> Token {
        // Check for error values first (#REF!, #DIV0!, etc.)
        if self.peek_char() == Some('#') {
            let start = self.pos;
            self.advance();
            while self
                .peek_char()
                .map_or(false, |c| c.is_ascii_alphanumeric() || c == '!' || c == '?')
            {
                self.advance();
            }
            let error_str = &self.input[start..self.pos];
            if let Some(err) = CellError::from_str(error_str) {
                return Token::Error(err);
            }
            // Not an error token, e.g. `#FOO`: keep it as a plain name
            return Token::Identifier(error_str.to_string());
        }

        let start = self.pos;

        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];

        // Looks like an address, unless it is followed by '(' and so names a function
        if is_valid_address_text(text) && self.peek_char() != Some('(') {
            return Token::CellRef(text.to_ascii_uppercase());
        }

        Token::Identifier(text.to_string())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> Token {
        let next = self.scan_token();
        std::mem::replace(&mut self.current_token, next)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume();
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    /// Go one nesting level deeper, failing past `max_depth`
    fn deepen(&mut self) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(FormulaError::NestingTooDeep(self.max_depth));
        }
        Ok(())
    }

    /// Run `f` one nesting level deeper
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> FormulaResult<T>) -> FormulaResult<T> {
        self.deepen()?;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: -, +
    // 4. Range: :
    // 5. Primary: literals, references, function calls, parentheses

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        self.nested(|p| p.parse_additive())
    }

    fn parse_additive(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_multiplicative()?;
        let base = self.depth;

        // Each operator in a chain adds a level to the left-deep tree
        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume();
            self.deepen()?;
            let right = self.parse_multiplicative()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth = base;
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_unary()?;
        let base = self.depth;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume();
            self.deepen()?;
            let right = self.parse_unary()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth = base;
        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<FormulaExpr> {
        // Prefix unary minus
        if matches!(self.current_token(), Token::Minus) {
            self.consume();
            let operand = self.nested(|p| p.parse_unary())?;
            return Ok(FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            });
        }

        // Prefix plus (no-op)
        if matches!(self.current_token(), Token::Plus) {
            self.consume();
            return self.nested(|p| p.parse_unary());
        }

        self.parse_range()
    }

    fn parse_range(&mut self) -> FormulaResult<FormulaExpr> {
        let left = self.parse_primary()?;

        if !matches!(self.current_token(), Token::Colon) {
            return Ok(left);
        }

        self.consume();
        let right = self.parse_primary()?;

        match (left, right) {
            (FormulaExpr::CellRef(start), FormulaExpr::CellRef(end)) => {
                Ok(FormulaExpr::RangeRef(RangeReference { start, end }))
            }
            _ => Err(FormulaError::Parse(
                "Both ends of a range must be cell references".into(),
            )),
        }
    }

    fn parse_primary(&mut self) -> FormulaResult<FormulaExpr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume();
                Ok(FormulaExpr::Number(n))
            }

            Token::Error(e) => {
                self.consume();
                Ok(FormulaExpr::Error(e))
            }

            Token::LeftParen => {
                self.consume();
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }

            Token::CellRef(address) => {
                self.consume();
                Ok(FormulaExpr::CellRef(CellReference::new(address)))
            }

            Token::Identifier(name) => {
                self.consume();
                if matches!(self.current_token(), Token::LeftParen) {
                    self.parse_function_call(name)
                } else {
                    Ok(FormulaExpr::NameRef(name))
                }
            }

            _ => Err(FormulaError::Parse(format!(
                "Unexpected token: {:?}",
                self.current_token()
            ))),
        }
    }

    fn parse_function_call(&mut self, name: String) -> FormulaResult<FormulaExpr> {
        self.expect(&Token::LeftParen)?;

        let mut args = Vec::new();

        // Parse arguments; an empty slot between commas is a missing argument
        if !matches!(self.current_token(), Token::RightParen) {
            loop {
                if matches!(self.current_token(), Token::Comma | Token::RightParen) {
                    args.push(FormulaExpr::Missing);
                } else {
                    args.push(self.parse_expression()?);
                }

                if matches!(self.current_token(), Token::Comma) {
                    self.consume();
                } else {
                    break;
                }
            }
        }

        self.expect(&Token::RightParen)?;

        Ok(FormulaExpr::Function {
            name: name.to_uppercase(),
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(address: &str) -> FormulaExpr {
        FormulaExpr::CellRef(CellReference::new(address))
    }

    #[test]
    fn test_parse_number() {
        let ast = parse_formula("=42").unwrap();
        assert_eq!(ast, FormulaExpr::Number(42.0));

        let ast = parse_formula("=3.25").unwrap();
        assert_eq!(ast, FormulaExpr::Number(3.25));

        let ast = parse_formula("=.5").unwrap();
        assert_eq!(ast, FormulaExpr::Number(0.5));

        let ast = parse_formula("=456.").unwrap();
        assert_eq!(ast, FormulaExpr::Number(456.0));
    }

    #[test]
    fn test_requires_equals() {
        assert!(parse_formula("1+2").is_err());
        assert!(parse_expression("1+2", 8).is_ok());
    }

    #[test]
    fn test_parse_arithmetic() {
        let ast = parse_formula("=1+2*3").unwrap();
        // 1+(2*3)
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Add);
            assert_eq!(*left, FormulaExpr::Number(1.0));
            assert!(matches!(
                *right,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_left_associative() {
        // 8/4/2 is (8/4)/2
        let ast = parse_formula("=8/4/2").unwrap();
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Divide);
            assert_eq!(*right, FormulaExpr::Number(2.0));
            assert!(matches!(
                *left,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Divide,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_unary() {
        let ast = parse_formula("=-5").unwrap();
        assert_eq!(
            ast,
            FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(FormulaExpr::Number(5.0)),
            }
        );

        // Unary plus disappears
        let ast = parse_formula("=+5").unwrap();
        assert_eq!(ast, FormulaExpr::Number(5.0));

        let ast = parse_formula("=2+-3").unwrap();
        assert!(matches!(
            ast,
            FormulaExpr::BinaryOp {
                op: BinaryOperator::Add,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_cell_reference() {
        assert_eq!(parse_formula("=a2").unwrap(), cell("A2"));
        assert_eq!(parse_formula("= bL47 ").unwrap(), cell("BL47"));

        // Syntactically an address even though it may be outside the grid
        assert_eq!(parse_formula("=ZZ999").unwrap(), cell("ZZ999"));

        // Too long for an address: a bare name
        assert_eq!(
            parse_formula("=AAA1").unwrap(),
            FormulaExpr::NameRef("AAA1".into())
        );
    }

    #[test]
    fn test_parse_range_reference() {
        let ast = parse_formula("=SUM(A2:a4)").unwrap();
        if let FormulaExpr::Function { args, .. } = ast {
            assert_eq!(
                args[0],
                FormulaExpr::RangeRef(RangeReference {
                    start: CellReference::new("A2"),
                    end: CellReference::new("A4"),
                })
            );
        } else {
            panic!("Expected Function");
        }

        assert!(parse_formula("=SUM(A1:2)").is_err());
        assert!(parse_formula("=SUM(A1:)").is_err());
    }

    #[test]
    fn test_parse_function() {
        let ast = parse_formula("=sum(1,2,3)").unwrap();
        if let FormulaExpr::Function { name, args } = ast {
            assert_eq!(name, "SUM");
            assert_eq!(args.len(), 3);
        } else {
            panic!("Expected Function");
        }

        let ast = parse_formula("=COUNT()").unwrap();
        assert_eq!(
            ast,
            FormulaExpr::Function {
                name: "COUNT".into(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_parse_missing_arguments() {
        let ast = parse_formula("=SUM(1,,2,)").unwrap();
        assert_eq!(
            ast,
            FormulaExpr::Function {
                name: "SUM".into(),
                args: vec![
                    FormulaExpr::Number(1.0),
                    FormulaExpr::Missing,
                    FormulaExpr::Number(2.0),
                    FormulaExpr::Missing,
                ],
            }
        );
    }

    #[test]
    fn test_parse_nested_function() {
        let ast = parse_formula("=A1 + A2 + SUM(A3, SUM(A4:A6))").unwrap();
        if let FormulaExpr::BinaryOp { right, .. } = ast {
            if let FormulaExpr::Function { name, args } = *right {
                assert_eq!(name, "SUM");
                assert_eq!(args[0], cell("A3"));
                assert!(matches!(&args[1], FormulaExpr::Function { name, .. } if name == "SUM"));
            } else {
                panic!("Expected Function");
            }
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_function_name_that_looks_like_address() {
        let ast = parse_formula("=LOG10(1)").unwrap();
        assert!(matches!(ast, FormulaExpr::Function { name, .. } if name == "LOG10"));
    }

    #[test]
    fn test_parse_error_literal() {
        let ast = parse_formula("=#REF!").unwrap();
        assert_eq!(ast, FormulaExpr::Error(CellError::Ref));

        let ast = parse_formula("=#div0!+1").unwrap();
        assert!(matches!(ast, FormulaExpr::BinaryOp { .. }));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_formula("='1").is_err());
        assert!(parse_formula("=1'").is_err());
        assert!(parse_formula("=1 2").is_err());
        assert!(parse_formula("=(1+2").is_err());
        assert!(parse_formula("=1+").is_err());
        assert!(parse_formula("=1e5").is_err());
        assert!(parse_formula("=").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert!(parse_expression(&deep, 11).is_ok());
        assert!(matches!(
            parse_expression(&deep, 10),
            Err(FormulaError::NestingTooDeep(10))
        ));

        let negations = format!("{}1", "- ".repeat(20));
        assert!(matches!(
            parse_expression(&negations, 8),
            Err(FormulaError::NestingTooDeep(8))
        ));
    }

    #[test]
    fn test_operator_chain_limit() {
        assert!(parse_expression("1+1+1", 3).is_ok());
        assert!(matches!(
            parse_expression("1+1+1+1", 3),
            Err(FormulaError::NestingTooDeep(3))
        ));
        assert!(matches!(
            parse_expression("2*2*2*2", 3),
            Err(FormulaError::NestingTooDeep(3))
        ));

        // Depth is restored once a chain is done
        let chains = format!("SUM({})", vec!["1+1+1"; 50].join(","));
        assert!(parse_expression(&chains, 5).is_ok());
    }

    #[test]
    fn test_long_operator_chain_fails_cleanly() {
        let chain = format!("{}1", "1+".repeat(20_000));
        assert!(matches!(
            parse_expression(&chain, DEFAULT_MAX_DEPTH),
            Err(FormulaError::NestingTooDeep(DEFAULT_MAX_DEPTH))
        ));
    }
}
