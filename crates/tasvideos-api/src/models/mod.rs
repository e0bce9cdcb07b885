pub mod permission;
pub mod publication;
pub mod publication_author;
pub mod publication_flag;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod user_role;

pub use permission::PermissionTo;
