//! Share codes: a whole settings document as one copy-pasteable string.
//!
//! A code is the document's compact JSON encoded with standard base64.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::document::StoredSettings;
use super::error::{PersistError, PersistResult};

/// Encodes `settings` as a share code.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn export_share_code(settings: &StoredSettings) -> PersistResult<String> {
    let json = serde_json::to_vec(settings)?;
    Ok(STANDARD.encode(json))
}

/// Decodes a share code back into a settings document.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`PersistError::ShareCode`] if the code is not valid base64 or
/// does not contain a settings document.
pub fn import_share_code(code: &str) -> PersistResult<StoredSettings> {
    let bytes = STANDARD
        .decode(code.trim())
        .map_err(|err| PersistError::ShareCode(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| PersistError::ShareCode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridRect, Placement};

    #[test]
    fn test_share_code_round_trip() {
        let mut settings = StoredSettings::default();
        settings.layout[0] = Placement::new("clock-1", GridRect::new(8, 0, 4, 4));

        let code = export_share_code(&settings).unwrap();
        assert_eq!(import_share_code(&format!("  {code}\n")).unwrap(), settings);
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let err = import_share_code("not base64 !!").unwrap_err();
        assert!(matches!(err, PersistError::ShareCode(_)));
    }

    #[test]
    fn test_non_document_payload_is_rejected() {
        let code = STANDARD.encode("[1, 2, 3]");
        assert!(matches!(import_share_code(&code), Err(PersistError::ShareCode(_))));
    }
}
