pub mod guard;
pub mod password;
pub mod token;

pub use guard::{require_admin, require_user, AuthContext};
