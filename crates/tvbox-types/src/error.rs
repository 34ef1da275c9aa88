//! Error types for the TV Box launcher.

use std::io;

/// Errors produced by the launcher.
///
/// None of these reach the home surface directly: the launcher corrects
/// faults locally and logs them. The admin login is the one place where an
/// error (`IncorrectPassword`) is shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum TvboxError {
    #[error("settings store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid settings field `{field}`: {reason}")]
    InvalidConfigShape { field: String, reason: String },

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("admin mode required")]
    AdminRequired,

    #[error("unknown tile: {0}")]
    UnknownTile(String),

    #[error("unknown track: {0}")]
    UnknownTrack(String),

    #[error("duplicate tile id: {0}")]
    DuplicateTile(String),

    #[error("not an audio file: {0}")]
    UnsupportedMedia(String),

    #[error("media no longer available: {0}")]
    MediaUnavailable(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TvboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let e = TvboxError::Store("quota exceeded".into());
        assert_eq!(format!("{e}"), "settings store error: quota exceeded");
    }

    #[test]
    fn invalid_shape_display() {
        let e = TvboxError::InvalidConfigShape {
            field: "clock.format".into(),
            reason: "expected string".into(),
        };
        assert_eq!(
            format!("{e}"),
            "invalid settings field `clock.format`: expected string"
        );
    }

    #[test]
    fn incorrect_password_display() {
        assert_eq!(
            TvboxError::IncorrectPassword.to_string(),
            "incorrect password"
        );
    }

    #[test]
    fn media_errors_display() {
        assert_eq!(
            TvboxError::UnsupportedMedia("notes.txt".into()).to_string(),
            "not an audio file: notes.txt"
        );
        assert_eq!(
            TvboxError::MediaUnavailable("blob:tvbox/1".into()).to_string(),
            "media no longer available: blob:tvbox/1"
        );
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: TvboxError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: TvboxError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: TvboxError = json_err.into();
        assert!(format!("{e}").contains("JSON error"));
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(TvboxError::AdminRequired);
        assert!(r.is_err());
    }
}
