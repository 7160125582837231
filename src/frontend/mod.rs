pub mod context;
pub mod conversion;
pub mod elaborate;
pub mod equation;
pub mod error;
pub mod evaluate;
pub mod inclusion;
pub mod module;
pub mod parse;
pub mod solution;
pub mod unevaluate;
pub mod unparse;
