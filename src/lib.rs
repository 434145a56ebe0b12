pub mod ast;
mod eval;
pub mod heap;
pub mod repl;
pub mod report;
pub mod samples;
mod scope;
pub mod thunk;

pub use ast::errors::*;
pub use eval::*;
pub use scope::*;
