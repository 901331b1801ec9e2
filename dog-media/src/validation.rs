use serde::{Deserialize, Serialize};

use crate::{mime, BinaryContent, ProviderConfig};

/// Field every content violation is reported against
pub const BINARY_CONTENT_FIELD: &str = "binary_content";

/// A rejected property of submitted content, reported back to the caller as data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn binary_content<M: Into<String>>(message: M) -> Self {
        Self::new(BINARY_CONTENT_FIELD, message)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check submitted file content against the configured allow-lists.
///
/// Only file handles are checked. The extension and MIME checks are
/// independent and both violations are reported when both fail.
pub async fn validate_file_content(
    content: Option<&BinaryContent>,
    config: &ProviderConfig,
) -> Vec<Violation> {
    let Some(content) = content.filter(|c| c.is_file_handle()) else {
        return Vec::new();
    };

    let file = match content.load().await {
        Ok(file) => file,
        Err(e) => return vec![Violation::binary_content(e.to_string())],
    };

    let mut violations = Vec::new();

    let extension = mime::extension_of(&file.original_name).unwrap_or_default();
    let extension_allowed = config
        .allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&extension));
    if !extension_allowed {
        violations.push(Violation::binary_content(format!(
            "Invalid extension: '{}'",
            extension
        )));
    }

    if !config.allowed_mime_types.iter().any(|allowed| *allowed == file.mime_type) {
        violations.push(Violation::binary_content(format!(
            "Invalid mime type: {}",
            file.mime_type
        )));
    }

    if !violations.is_empty() {
        tracing::warn!(
            filename = %file.original_name,
            mime_type = %file.mime_type,
            count = violations.len(),
            "Submitted content rejected"
        );
    }

    violations
}
