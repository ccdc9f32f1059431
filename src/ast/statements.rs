use std::fmt::Display;

use super::expressions::{CallExpr, Expression};

/// A single statement. A program is an ordered sequence of these; blank
/// lines parse to `NoOp`.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assignment(AssignmentStmt),
    Call(CallExpr),
    If(IfStmt),
    While(WhileStmt),
    NoOp,
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Assignment(assignment) => write!(f, "{}", assignment),
            Stmt::Call(call) => write!(f, "{}", call),
            Stmt::If(if_stmt) => write!(f, "{}", if_stmt),
            Stmt::While(while_stmt) => write!(f, "{}", while_stmt),
            Stmt::NoOp => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    pub target: String,
    pub value: Expression,
}

impl Display for AssignmentStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expression,
    pub then_body: Vec<Stmt>,
    pub else_body: Vec<Stmt>,
}

impl Display for IfStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "if {}", self.condition)?;
        for stmt in &self.then_body {
            writeln!(f, "  {}", stmt)?;
        }
        if !self.else_body.is_empty() {
            writeln!(f, "else")?;
            for stmt in &self.else_body {
                writeln!(f, "  {}", stmt)?;
            }
        }
        write!(f, "endif")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expression,
    pub body: Vec<Stmt>,
}

impl Display for WhileStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "while {}", self.condition)?;
        for stmt in &self.body {
            writeln!(f, "  {}", stmt)?;
        }
        write!(f, "endwhile")
    }
}
