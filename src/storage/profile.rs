//! Candidate profile storage: a single Markdown file.

use std::{fs, io};

use tracing::debug;

use super::{Result, Storage};

impl Storage {
    /// Writes the candidate profile, replacing any previous one.
    pub fn save_profile(&self, content: &str) -> Result<()> {
        let path = self.profile_path();
        fs::write(&path, content)?;
        debug!(path = %path.display(), "saved profile");
        Ok(())
    }

    /// Reads the candidate profile, or `None` if none has been saved.
    pub fn load_profile(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.profile_path()) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
