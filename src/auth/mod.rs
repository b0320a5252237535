pub mod authorizor;
mod user;

pub use authorizor::Platform;
pub use user::{Role, User, USER_ID_HEADER, USER_ROLE_HEADER};
