pub mod presyntax;
pub mod semantics;
pub mod syntax;
