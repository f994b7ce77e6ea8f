pub mod error;
pub mod scanner;

pub use error::{Diagnostic, Reporter, ScanError};
pub use scanner::token::{Literal, Token, TokenKind};
pub use scanner::{scan, Scan, Scanner};
