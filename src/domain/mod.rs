pub mod admin_user;
pub mod member;
pub mod notice;
pub mod registration;

pub use admin_user::*;
pub use member::*;
pub use notice::*;
pub use registration::*;
