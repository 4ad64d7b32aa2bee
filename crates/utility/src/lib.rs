pub mod id;
pub mod let_also;
