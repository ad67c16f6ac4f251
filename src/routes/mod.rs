pub mod health_check;
pub mod waitlist;

pub use health_check::*;
pub use waitlist::*;
