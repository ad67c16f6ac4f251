mod confirmation_email;
mod waitlist_entry;

pub use confirmation_email::{CONFIRMATION_SUBJECT, COMMUNITY_URL, ConfirmationEmail};
pub use waitlist_entry::WaitlistEntry;
