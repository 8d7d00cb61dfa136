pub mod contact;
pub mod post;

pub use contact::Contact;
pub use post::Post;
