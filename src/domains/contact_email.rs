use validator::validate_email;

#[derive(Debug)]
pub struct ContactEmail(String);

impl ContactEmail {
    /// Basic shape check, not full RFC validation: the `validator` rules plus
    /// a dot somewhere in the domain part.
    pub fn parse(email: String) -> Result<ContactEmail, String> {
        let domain_has_dot = email
            .rsplit_once('@')
            .map_or(false, |(_, domain)| domain.contains('.'));
        if validate_email(email.as_str()) && domain_has_dot {
            Ok(Self(email))
        } else {
            Err(format!("{} is not a valid contact email", email))
        }
    }
}

impl AsRef<str> for ContactEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
