use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug)]
pub struct ContactMessage(String);

impl ContactMessage {
    /// Keeps the trimmed value; anything under ten graphemes is noise.
    pub fn parse(message: String) -> Result<ContactMessage, String> {
        let trimmed = message.trim();
        if trimmed.graphemes(true).count() < 10 {
            Err("the message must be at least 10 characters long".to_string())
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for ContactMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
