pub mod ast;
pub mod lexer;

use std::mem;

use ast::{BinaryOperator, Expression};
use thiserror::Error;

use crate::lexer::{Lexer, LexerError, Token, TokenKind};

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("{}: expected {}, found {}", .actual.loc, .expected.kind_name(), .actual.kind.describe())]
    UnexpectedToken { expected: TokenKind, actual: Token },
    #[error("{}: expected one of {}, found {}", .actual.loc, kind_names(.expected), .actual.kind.describe())]
    UnexpectedTokens {
        expected: Vec<TokenKind>,
        actual: Token,
    },
}

fn kind_names(kinds: &[TokenKind]) -> String {
    kinds
        .iter()
        .map(TokenKind::kind_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Recursive descent parser with a single token of lookahead.
#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let cur_token = lexer.next_token();
        Self { lexer, cur_token }
    }

    /// The characters the lexer skipped while this parser was running.
    pub fn into_diagnostics(self) -> Vec<LexerError> {
        self.lexer.into_diagnostics()
    }

    /// Retires the current token and returns it.
    fn advance(&mut self) -> Token {
        mem::replace(&mut self.cur_token, self.lexer.next_token())
    }

    fn cur_token_is(&self, token: &TokenKind) -> bool {
        mem::discriminant(&self.cur_token.kind) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        if self.cur_token_is(&expected) {
            Ok(self.advance())
        } else {
            Err(ParserError::UnexpectedToken {
                expected,
                actual: self.cur_token.clone(),
            })
        }
    }

    fn expect_identifier(&mut self) -> Result<ast::Identifier, ParserError> {
        match &mut self.cur_token.kind {
            TokenKind::Identifier(name) => {
                let name = mem::take(name);
                self.advance();
                Ok(name)
            }
            _ => Err(ParserError::UnexpectedToken {
                expected: TokenKind::Identifier(String::new()),
                actual: self.cur_token.clone(),
            }),
        }
    }

    pub fn parse_program(&mut self) -> Result<ast::Program, ParserError> {
        let mut functions = vec![self.parse_function_definition()?];

        while !self.cur_token_is(&TokenKind::Eof) {
            functions.push(self.parse_function_definition()?);
        }

        Ok(ast::Program { functions })
    }

    fn parse_function_definition(&mut self) -> Result<ast::FunctionDefinition, ParserError> {
        self.expect(TokenKind::KWInt)?;
        let name = self.expect_identifier()?;

        self.expect(TokenKind::OpenParen)?;
        let params = self.parse_param_list()?;
        self.expect(TokenKind::CloseParen)?;

        let body = self.parse_block()?;

        Ok(ast::FunctionDefinition { name, params, body })
    }

    // Only the names are kept, every parameter is an int.
    fn parse_param_list(&mut self) -> Result<ast::ParameterList, ParserError> {
        let mut params = vec![];

        if self.cur_token_is(&TokenKind::KWInt) {
            loop {
                self.expect(TokenKind::KWInt)?;
                params.push(self.expect_identifier()?);

                if !self.cur_token_is(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }

        Ok(ast::ParameterList(params))
    }

    fn parse_block(&mut self) -> Result<ast::Block, ParserError> {
        self.expect(TokenKind::OpenBrace)?;

        let mut body = vec![];
        while !self.cur_token_is(&TokenKind::CloseBrace) && !self.cur_token_is(&TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }

        self.expect(TokenKind::CloseBrace)?;

        Ok(ast::Block(body))
    }

    // Statements

    fn parse_statement(&mut self) -> Result<ast::Statement, ParserError> {
        match self.cur_token.kind {
            TokenKind::KWReturn => self.parse_return_statement(),
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(ast::Statement::Expression(expr))
            }
        }
    }

    fn parse_return_statement(&mut self) -> Result<ast::Statement, ParserError> {
        self.expect(TokenKind::KWReturn)?;

        let expr = self.parse_expression()?;

        self.expect(TokenKind::Semicolon)?;

        Ok(ast::Statement::Return(expr))
    }

    // Expressions

    fn additive_operator(&self) -> Option<BinaryOperator> {
        match self.cur_token.kind {
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Minus => Some(BinaryOperator::Subtract),
            _ => None,
        }
    }

    fn multiplicative_operator(&self) -> Option<BinaryOperator> {
        match self.cur_token.kind {
            TokenKind::Asterisk => Some(BinaryOperator::Multiply),
            TokenKind::Slash => Some(BinaryOperator::Divide),
            _ => None,
        }
    }

    fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        let mut left = self.parse_term()?;

        while let Some(op) = self.additive_operator() {
            self.advance();
            let right = self.parse_term()?;
            left = Expression::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expression, ParserError> {
        let mut left = self.parse_factor()?;

        while let Some(op) = self.multiplicative_operator() {
            self.advance();
            let right = self.parse_factor()?;
            left = Expression::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expression, ParserError> {
        match self.cur_token.kind {
            TokenKind::Constant(value) => {
                self.advance();
                Ok(Expression::Constant(value))
            }
            TokenKind::Identifier(_) => self.parse_identifier(),
            TokenKind::OpenParen => self.parse_grouped_expression(),
            _ => Err(ParserError::UnexpectedTokens {
                expected: vec![
                    TokenKind::Constant(0),
                    TokenKind::Identifier(String::new()),
                    TokenKind::OpenParen,
                ],
                actual: self.cur_token.clone(),
            }),
        }
    }

    // An identifier directly followed by '(' is a call.
    fn parse_identifier(&mut self) -> Result<Expression, ParserError> {
        let name = self.expect_identifier()?;

        if self.cur_token_is(&TokenKind::OpenParen) {
            let args = self.parse_argument_list()?;
            Ok(Expression::FunctionCall { name, args })
        } else {
            Ok(Expression::Var(name))
        }
    }

    fn parse_argument_list(&mut self) -> Result<ast::ArgumentList, ParserError> {
        self.expect(TokenKind::OpenParen)?;

        let mut args = vec![];

        if !self.cur_token_is(&TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expression()?);

                if !self.cur_token_is(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }

        self.expect(TokenKind::CloseParen)?;

        Ok(ast::ArgumentList(args))
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression, ParserError> {
        self.expect(TokenKind::OpenParen)?;

        let expr = self.parse_expression()?;

        self.expect(TokenKind::CloseParen)?;

        Ok(expr)
    }
}

/// Scans and parses `source` in one go.
pub fn parse(source: &str) -> Result<ast::Program, ParserError> {
    Parser::new(Lexer::new(source)).parse_program()
}

#[cfg(test)]
mod tests {
    use crate::ast::{ArgumentList, FunctionDefinition, Statement};

    use super::*;

    fn parse_ok(input: &str) -> ast::Program {
        let lexer = Lexer::new(input);
        let mut parser = Parser::new(lexer);

        parser
            .parse_program()
            .expect("the program should be parsed successfully")
    }

    fn get_first_function(mut program: ast::Program) -> FunctionDefinition {
        program.functions.remove(0)
    }

    fn return_expression(input: &str) -> Expression {
        let func = get_first_function(parse_ok(input));
        match func.body.0.into_iter().next() {
            Some(Statement::Return(expr)) => expr,
            other => panic!("expected a return statement, got {:?}", other),
        }
    }

    fn binary(op: BinaryOperator, lhs: Expression, rhs: Expression) -> Expression {
        Expression::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    #[test]
    fn test_function_definition() {
        let program = parse_ok(
            r"
        int main() {
            return 2;
        }
        ",
        );

        assert_eq!(
            get_first_function(program),
            FunctionDefinition {
                name: "main".to_owned(),
                params: ast::ParameterList(vec![]),
                body: ast::Block(vec![Statement::Return(Expression::Constant(2))]),
            }
        );
    }

    #[test]
    fn test_parameters() {
        let func = get_first_function(parse_ok("int add(int a, int b, int c) { a; }"));

        assert_eq!(
            func.params,
            ast::ParameterList(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()])
        );
        assert_eq!(
            func.body,
            ast::Block(vec![Statement::Expression(Expression::Var("a".to_owned()))])
        );
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            return_expression("int main() { return 1 + 2 * 3; }"),
            binary(
                BinaryOperator::Add,
                Expression::Constant(1),
                binary(
                    BinaryOperator::Multiply,
                    Expression::Constant(2),
                    Expression::Constant(3)
                )
            )
        );
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            return_expression("int main() { return 8 - 3 - 2; }"),
            binary(
                BinaryOperator::Subtract,
                binary(
                    BinaryOperator::Subtract,
                    Expression::Constant(8),
                    Expression::Constant(3)
                ),
                Expression::Constant(2)
            )
        );
        assert_eq!(
            return_expression("int main() { return 8 / 4 * 2; }"),
            binary(
                BinaryOperator::Multiply,
                binary(
                    BinaryOperator::Divide,
                    Expression::Constant(8),
                    Expression::Constant(4)
                ),
                Expression::Constant(2)
            )
        );
    }

    #[test]
    fn test_grouping() {
        assert_eq!(
            return_expression("int main() { return (3 - 2) * 4; }"),
            binary(
                BinaryOperator::Multiply,
                binary(
                    BinaryOperator::Subtract,
                    Expression::Constant(3),
                    Expression::Constant(2)
                ),
                Expression::Constant(4)
            )
        );
    }

    #[test]
    fn test_function_call() {
        assert_eq!(
            return_expression("int main() { return f(g(1), 2, h()); }"),
            Expression::FunctionCall {
                name: "f".to_owned(),
                args: ArgumentList(vec![
                    Expression::FunctionCall {
                        name: "g".to_owned(),
                        args: ArgumentList(vec![Expression::Constant(1)]),
                    },
                    Expression::Constant(2),
                    Expression::FunctionCall {
                        name: "h".to_owned(),
                        args: ArgumentList(vec![]),
                    },
                ]),
            }
        );
    }

    #[test]
    fn test_multiple_functions() {
        let program = parse_ok(
            r"
        int one() { return 1; }
        int main() { one(); return one() + 1; }
        ",
        );

        let names: Vec<_> = program.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["one", "main"]);
        assert_eq!(program.functions[1].body.0.len(), 2);
    }

    #[test]
    fn test_missing_close_brace() {
        let err = parse("int main() { return 1;").expect_err("should fail");

        match err {
            ParserError::UnexpectedToken { expected, actual } => {
                assert_eq!(expected, TokenKind::CloseBrace);
                assert_eq!(actual.kind, TokenKind::Eof);
            }
            err => panic!("unexpected error {:?}", err),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("int main() { return 1 }").expect_err("should fail");

        assert!(matches!(
            err,
            ParserError::UnexpectedToken {
                expected: TokenKind::Semicolon,
                ..
            }
        ));
        assert_eq!(err.to_string(), "1:23: expected ';', found '}'");
    }

    #[test]
    fn test_empty_program() {
        let err = parse("// nothing here").expect_err("should fail");

        assert_eq!(err.to_string(), "1:16: expected 'int', found end of input");
    }

    #[test]
    fn test_bad_factor() {
        let err = parse("int main() { return *; }").expect_err("should fail");

        assert_eq!(
            err.to_string(),
            "1:21: expected one of integer constant, identifier, '(', found '*'"
        );
    }

    #[test]
    fn test_parameter_needs_type() {
        let err = parse("int f(int a, b) { return 1; }").expect_err("should fail");

        assert!(matches!(
            err,
            ParserError::UnexpectedToken {
                expected: TokenKind::KWInt,
                ..
            }
        ));
    }

    #[test]
    fn test_skipped_characters_are_reported() {
        let mut parser = Parser::new(Lexer::new("int main() { return 1 # ; }"));
        parser.parse_program().expect("should parse");

        let diagnostics = parser.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0],
            LexerError::UnknownCharacter { ch: '#', .. }
        ));
    }
}
