//! Input size limits.
//!
//! Enforced at the operation boundary; violations are soft validation
//! failures, never truncation.

use serde::{Deserialize, Serialize};

use super::error::LimitExceeded;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_title_bytes: usize,
    pub max_description_bytes: usize,
    pub max_location_bytes: usize,
    pub max_reason_bytes: usize,
    pub max_photos: usize,
    pub max_photo_url_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_title_bytes: 256,
            max_description_bytes: 16 * 1024,
            max_location_bytes: 512,
            max_reason_bytes: 1024,
            max_photos: 16,
            max_photo_url_bytes: 2048,
        }
    }
}

impl Limits {
    pub fn check_title(&self, title: &str) -> Result<(), LimitExceeded> {
        check("title", title.len(), self.max_title_bytes)
    }

    pub fn check_description(&self, description: &str) -> Result<(), LimitExceeded> {
        check("description", description.len(), self.max_description_bytes)
    }

    pub fn check_location(&self, location: &str) -> Result<(), LimitExceeded> {
        check("location", location.len(), self.max_location_bytes)
    }

    pub fn check_reason(&self, reason: &str) -> Result<(), LimitExceeded> {
        check("reason", reason.len(), self.max_reason_bytes)
    }

    pub fn check_photos(&self, photos: &[String]) -> Result<(), LimitExceeded> {
        check("photos", photos.len(), self.max_photos)?;
        for url in photos {
            check("photo url", url.len(), self.max_photo_url_bytes)?;
        }
        Ok(())
    }
}

fn check(field: &'static str, actual: usize, max: usize) -> Result<(), LimitExceeded> {
    if actual > max {
        Err(LimitExceeded { field, actual, max })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_accept_normal_input() {
        let limits = Limits::default();
        assert!(limits.check_title("Leaking kitchen tap").is_ok());
        assert!(limits.check_photos(&["https://cdn/p/1.jpg".to_string()]).is_ok());
    }

    #[test]
    fn oversized_title_rejected() {
        let limits = Limits {
            max_title_bytes: 4,
            ..Limits::default()
        };
        let err = limits.check_title("too long").unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.max, 4);
    }

    #[test]
    fn too_many_photos_rejected() {
        let limits = Limits {
            max_photos: 1,
            ..Limits::default()
        };
        let photos = vec!["a".to_string(), "b".to_string()];
        assert!(limits.check_photos(&photos).is_err());
    }
}
