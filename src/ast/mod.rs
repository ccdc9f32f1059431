/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - expressions: postfix expressions, argument lists and calls
/// - statements: statement nodes produced by the parser
pub mod expressions;
pub mod statements;
