//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [paths] Section Defaults
// ============================================================================

pub mod paths {
    use std::path::PathBuf;

    pub fn posts() -> PathBuf {
        "source/_posts".into()
    }

    pub fn backup() -> PathBuf {
        "page-tmp".into()
    }
}

// ============================================================================
// [publish] Section Defaults
// ============================================================================

pub mod publish {
    pub fn date_format() -> String {
        "%Y-%m-%d %H:%M:%S".into()
    }
}
