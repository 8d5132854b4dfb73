pub mod rewrite;
pub mod style;
