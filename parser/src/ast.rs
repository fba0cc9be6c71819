use std::fmt::{self, Display};

pub type Identifier = String;

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Expression {
    Constant(i64),
    /// A name on its own. Only function names are usable today, so lowering rejects it.
    Var(Identifier),
    Binary {
        op: BinaryOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    FunctionCall {
        name: Identifier,
        args: ArgumentList,
    },
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Statement {
    Return(Expression),
    Expression(Expression),
}

#[derive(Debug, Eq, PartialEq, Clone, Default)]
pub struct Block(pub Vec<Statement>);

#[derive(Debug, Eq, PartialEq, Clone, Default)]
pub struct ParameterList(pub Vec<Identifier>);

#[derive(Debug, Eq, PartialEq, Clone, Default)]
pub struct ArgumentList(pub Vec<Expression>);

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct FunctionDefinition {
    pub name: Identifier,
    pub params: ParameterList,
    pub body: Block,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Program {
    pub functions: Vec<FunctionDefinition>,
}

/// Indented, one node per line rendering of the tree. Each level adds two spaces.
trait PrintTree {
    fn print_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result;
}

fn line(f: &mut fmt::Formatter<'_>, depth: usize, text: impl Display) -> fmt::Result {
    writeln!(f, "{}{}", "  ".repeat(depth), text)
}

impl PrintTree for Program {
    fn print_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        line(f, depth, "PROGRAM:")?;
        for function in &self.functions {
            function.print_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl PrintTree for FunctionDefinition {
    fn print_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        line(f, depth, format_args!("FUNCTION_DEF: {}", self.name))?;
        line(f, depth + 1, "Parameters:")?;
        self.params.print_tree(f, depth + 2)?;
        line(f, depth + 1, "Body:")?;
        self.body.print_tree(f, depth + 2)
    }
}

impl PrintTree for ParameterList {
    fn print_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        line(f, depth, format_args!("PARAM_LIST (count: {}):", self.0.len()))?;
        for param in &self.0 {
            line(f, depth + 1, format_args!("IDENTIFIER: {}", param))?;
        }
        Ok(())
    }
}

impl PrintTree for Block {
    fn print_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        line(f, depth, format_args!("BLOCK_LIST (count: {}):", self.0.len()))?;
        for stmt in &self.0 {
            stmt.print_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl PrintTree for ArgumentList {
    fn print_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        line(f, depth, format_args!("ARG_LIST (count: {}):", self.0.len()))?;
        for arg in &self.0 {
            arg.print_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl PrintTree for Statement {
    fn print_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Statement::Return(expr) => {
                line(f, depth, "RETURN_STMT:")?;
                expr.print_tree(f, depth + 1)
            }
            Statement::Expression(expr) => {
                line(f, depth, "EXPRESSION_STMT:")?;
                expr.print_tree(f, depth + 1)
            }
        }
    }
}

impl PrintTree for Expression {
    fn print_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Expression::Constant(value) => line(f, depth, format_args!("NUMBER: {}", value)),
            Expression::Var(name) => line(f, depth, format_args!("IDENTIFIER: {}", name)),
            Expression::Binary { op, lhs, rhs } => {
                line(f, depth, format_args!("BINARY_OP: {}", op.symbol()))?;
                lhs.print_tree(f, depth + 1)?;
                rhs.print_tree(f, depth + 1)
            }
            Expression::FunctionCall { name, args } => {
                line(f, depth, format_args!("FUNCTION_CALL: {}", name))?;
                line(f, depth + 1, "Arguments:")?;
                args.print_tree(f, depth + 2)
            }
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_tree(f, 0)
    }
}
