pub mod detect;
pub mod extract;
pub mod signature;
