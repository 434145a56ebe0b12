pub mod errors;
pub mod expressions;
pub mod paths;
pub mod types;
pub mod values;

pub use errors::*;
pub use expressions::*;
pub use paths::*;
pub use types::*;
pub use values::*;
