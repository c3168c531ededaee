pub mod contact;
pub mod project;

pub use contact::{ContactRequest, ContactResponse, Message, NewMessage};
pub use project::{NewProject, Project};
