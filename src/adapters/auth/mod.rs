//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port. Identity providers are
//! external; this service maps configured bearer tokens to users and roles.

mod static_tokens;

pub use static_tokens::StaticTokenValidator;
