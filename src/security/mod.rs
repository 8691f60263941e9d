pub mod password;
pub mod token;

pub use password::Hasher;
pub use token::TokenIssuer;
