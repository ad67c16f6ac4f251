use serde::{Deserialize, Serialize};

/// A signup as submitted by the landing page form.
///
/// Fields are forwarded to the store exactly as received. A missing field
/// stays `None` and is left for the store's own constraints to reject, so
/// `name`, `email` and `phone_number` being optional here does not make them
/// optional in the waitlist table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub interest: Option<String>,
}

impl WaitlistEntry {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        interest: Option<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            phone_number: Some(phone_number.into()),
            interest,
        }
    }
}
