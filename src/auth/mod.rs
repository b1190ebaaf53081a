pub mod jwt;
mod types;

pub use jwt::{JwtKeys, JwtVerifier};
pub use types::Claims;
