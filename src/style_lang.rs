//! Style languages a component's style section or a stylesheet file can be written in.

use crate::error::MigrateError;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Stylesheet dialect, which decides how the rule tree is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleLang {
    /// Plain CSS, the default for a style section without `lang`.
    Css,
    /// Brace-based Sass syntax.
    Scss,
    /// Indentation-based Sass syntax.
    Sass,
}

impl StyleLang {
    /// Resolve the `lang` attribute of a style section.
    ///
    /// An absent attribute (or one without a value) means CSS.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStyleLanguage` for anything but `css`, `scss` or `sass`.
    pub fn from_attribute(lang: Option<&str>, path: &Path) -> Result<Self, MigrateError> {
        match lang {
            None | Some("css") => Ok(Self::Css),
            Some("scss") => Ok(Self::Scss),
            Some("sass") => Ok(Self::Sass),
            Some(other) => Err(MigrateError::UnknownStyleLanguage {
                path: path.to_path_buf(),
                lang: other.to_string(),
            }),
        }
    }

    /// Resolve the language of a stylesheet file from its extension.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStyleLanguage` when the extension is not a style language.
    pub fn from_path(path: &Path) -> Result<Self, MigrateError> {
        let ext = path.extension().and_then(|e| e.to_str());
        match ext {
            Some("css") => Ok(Self::Css),
            Some("scss") => Ok(Self::Scss),
            Some("sass") => Ok(Self::Sass),
            _ => Err(MigrateError::UnknownStyleLanguage {
                path: path.to_path_buf(),
                lang: ext.unwrap_or_default().to_string(),
            }),
        }
    }

    #[must_use]
    /// File extension used for staging units of this language.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Sass => "sass",
        }
    }
}

impl fmt::Display for StyleLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
