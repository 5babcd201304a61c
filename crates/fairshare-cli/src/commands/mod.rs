pub mod parse;
pub mod replay;
pub mod share;
