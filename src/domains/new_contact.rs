use crate::domains::{ContactEmail, ContactMessage, ContactName};

#[derive(Debug)]
pub struct NewContact {
    pub name: ContactName,
    pub email: ContactEmail,
    pub message: ContactMessage,
}

#[derive(Debug, serde::Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

/// Every failing field of one submission, in field order.
#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid fields: {}", self.fields().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl NewContact {
    /// All three fields are checked in one pass, no short-circuiting, so the
    /// caller can report every problem at once. A field missing from the
    /// request fails its own check instead of aborting deserialization.
    pub fn parse(
        name: Option<String>,
        email: Option<String>,
        message: Option<String>,
    ) -> Result<NewContact, ValidationErrors> {
        let name = ContactName::parse(name.unwrap_or_default());
        let email = ContactEmail::parse(email.unwrap_or_default());
        let message = ContactMessage::parse(message.unwrap_or_default());

        match (name, email, message) {
            (Ok(name), Ok(email), Ok(message)) => Ok(NewContact {
                name,
                email,
                message,
            }),
            (name, email, message) => {
                let mut errors = Vec::new();
                if let Err(reason) = name {
                    errors.push(FieldError {
                        field: "name",
                        reason,
                    });
                }
                if let Err(reason) = email {
                    errors.push(FieldError {
                        field: "email",
                        reason,
                    });
                }
                if let Err(reason) = message {
                    errors.push(FieldError {
                        field: "message",
                        reason,
                    });
                }
                Err(ValidationErrors(errors))
            }
        }
    }
}
