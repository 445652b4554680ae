pub mod contest;
pub mod participation;
pub mod user;

pub use contest::Entity as Contest;
pub use participation::Entity as Participation;
pub use user::Entity as User;
