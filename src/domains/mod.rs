mod contact_email;
mod contact_message;
mod contact_name;
mod new_contact;

pub use contact_email::*;
pub use contact_message::*;
pub use contact_name::*;
pub use new_contact::*;
