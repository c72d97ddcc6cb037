pub mod binary;
pub mod unary;

pub use binary::evaluate_binary_op;
pub use unary::evaluate_unary_op;
