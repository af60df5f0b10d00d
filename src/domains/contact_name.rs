use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug)]
pub struct ContactName(String);

impl ContactName {
    /// Keeps the trimmed value; a name needs at least two graphemes.
    pub fn parse(name: String) -> Result<ContactName, String> {
        let trimmed = name.trim();
        if trimmed.graphemes(true).count() < 2 {
            Err(format!("{} is not a valid contact name", name))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
