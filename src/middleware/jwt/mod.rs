pub mod guard;

pub use guard::{JwtGuard, apply};
