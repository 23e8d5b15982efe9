pub mod errors;
pub mod generator;

pub use errors::TokenGenerationError;
pub use generator::hash_token;
pub use generator::GeneratedToken;
pub use generator::TokenGenerator;
pub use generator::TokenHash;
pub use generator::TOKEN_LENGTH;
