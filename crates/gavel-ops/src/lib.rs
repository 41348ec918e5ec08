pub mod ops_path;
pub mod ops_resolve;
pub mod sink;
