pub mod lint;
pub mod smoke;
