//! Camera list JSON import/export
//!
//! Imports accept `{ id, name, webrtc }` entries, with `url` and `sourceUrl`
//! taken as equivalent names for `webrtc`. A batch is validated as a whole
//! before anything is returned, so a caller either gets every camera or none.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{ValidationError, Violation, ViolationKind};

use super::descriptor::CameraDescriptor;

/// Field names accepted for the source URL, in order of preference
const URL_FIELDS: [&str; 3] = ["webrtc", "url", "sourceUrl"];

/// Parse and validate a camera list from JSON text
pub fn parse_camera_list(text: &str) -> Result<Vec<CameraDescriptor>, ValidationError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
    validate_camera_list(&value)
}

/// How an entry without a source URL is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceRule {
    /// User import: every camera needs a URL
    Required,
    /// Persisted state: a missing or empty URL is a placeholder camera
    Optional,
}

/// Validate an already-parsed JSON value as a camera list
pub fn validate_camera_list(value: &Value) -> Result<Vec<CameraDescriptor>, ValidationError> {
    decode_entries(value, SourceRule::Required)
}

/// Decode the persisted camera list written by [`encode_camera_list`]
///
/// Ids are checked as strictly as on import, but placeholder cameras (no
/// URL) are kept so the saved set matches what was on screen.
pub(crate) fn decode_camera_list(text: &str) -> Result<Vec<CameraDescriptor>, ValidationError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
    decode_entries(&value, SourceRule::Optional)
}

fn decode_entries(value: &Value, rule: SourceRule) -> Result<Vec<CameraDescriptor>, ValidationError> {
    let entries = value.as_array().ok_or(ValidationError::NotAnArray)?;

    let mut cameras = Vec::with_capacity(entries.len());
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        let url = URL_FIELDS
            .iter()
            .filter_map(|field| entry.get(*field).and_then(Value::as_str))
            .find(|s| !s.is_empty());

        let Some(id) = id else {
            violations.push(Violation {
                index,
                kind: ViolationKind::MissingId,
            });
            continue;
        };
        if !seen.insert(id.to_string()) {
            violations.push(Violation {
                index,
                kind: ViolationKind::DuplicateId(id.to_string()),
            });
            continue;
        }
        if url.is_none() && rule == SourceRule::Required {
            violations.push(Violation {
                index,
                kind: ViolationKind::MissingSourceUrl,
            });
            continue;
        }

        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(id);

        cameras.push(CameraDescriptor::new(id, name, url.map(str::to_string)));
    }

    if violations.is_empty() {
        Ok(cameras)
    } else {
        Err(ValidationError::Invalid(violations))
    }
}

/// Validate descriptors built in code before they replace the camera set
///
/// Same rules as a JSON import: non-empty unique ids and a non-empty source URL.
pub fn validate_descriptors(cameras: &[CameraDescriptor]) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for (index, camera) in cameras.iter().enumerate() {
        let kind = if camera.id.is_empty() {
            Some(ViolationKind::MissingId)
        } else if !seen.insert(camera.id.as_str()) {
            Some(ViolationKind::DuplicateId(camera.id.clone()))
        } else if camera.source_url.as_deref().map_or(true, str::is_empty) {
            Some(ViolationKind::MissingSourceUrl)
        } else {
            None
        };
        if let Some(kind) = kind {
            violations.push(Violation { index, kind });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Invalid(violations))
    }
}

/// Export a camera list as a pretty-printed JSON array of `{ id, name, webrtc }`
pub fn export_camera_list(cameras: &[CameraDescriptor]) -> String {
    let exported: Vec<_> = cameras.iter().map(CameraDescriptor::to_exported).collect();
    // Serializing borrowed string fields cannot fail.
    serde_json::to_string_pretty(&exported).unwrap_or_else(|_| "[]".to_string())
}

/// Compact export used for the persisted camera list
pub(crate) fn encode_camera_list(cameras: &[CameraDescriptor]) -> String {
    let exported: Vec<_> = cameras.iter().map(CameraDescriptor::to_exported).collect();
    serde_json::to_string(&exported).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_legacy_url_field() {
        let cams = parse_camera_list(
            r#"[
                {"id": "a", "name": "Alpha", "webrtc": "http://h/a/whep"},
                {"id": "b", "url": "http://h/b/whep"},
                {"id": "c", "name": "", "sourceUrl": "http://h/c/whep"}
            ]"#,
        )
        .unwrap();

        assert_eq!(cams.len(), 3);
        assert_eq!(cams[0].source_url.as_deref(), Some("http://h/a/whep"));
        assert_eq!(cams[1].name, "b");
        assert_eq!(cams[1].source_url.as_deref(), Some("http://h/b/whep"));
        assert_eq!(cams[2].name, "c");
        assert_eq!(cams[2].source_url.as_deref(), Some("http://h/c/whep"));
    }

    #[test]
    fn test_webrtc_preferred_over_url() {
        let cams =
            parse_camera_list(r#"[{"id": "a", "webrtc": "http://new", "url": "http://old"}]"#)
                .unwrap();
        assert_eq!(cams[0].source_url.as_deref(), Some("http://new"));
    }

    #[test]
    fn test_missing_url_rejected() {
        let err = parse_camera_list(r#"[{"id": "x"}]"#).unwrap_err();
        assert_eq!(
            err.violations(),
            &[Violation {
                index: 0,
                kind: ViolationKind::MissingSourceUrl
            }]
        );
    }

    #[test]
    fn test_all_violations_reported() {
        let err = parse_camera_list(
            r#"[
                {"id": "a", "webrtc": "http://a"},
                {"name": "no id", "webrtc": "http://b"},
                {"id": "a", "webrtc": "http://c"},
                42
            ]"#,
        )
        .unwrap_err();

        let kinds: Vec<_> = err.violations().iter().map(|v| (v.index, v.kind.clone())).collect();
        assert_eq!(
            kinds,
            vec![
                (1, ViolationKind::MissingId),
                (2, ViolationKind::DuplicateId("a".into())),
                (3, ViolationKind::MissingId),
            ]
        );
    }

    #[test]
    fn test_malformed_and_non_array() {
        assert!(matches!(
            parse_camera_list("[{"),
            Err(ValidationError::MalformedJson(_))
        ));
        assert_eq!(
            parse_camera_list(r#"{"id": "a"}"#),
            Err(ValidationError::NotAnArray)
        );
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert_eq!(parse_camera_list("[]").unwrap(), Vec::new());
    }

    #[test]
    fn test_validate_descriptors() {
        let ok = vec![CameraDescriptor::with_url("a", "A", "http://a")];
        assert!(validate_descriptors(&ok).is_ok());

        let bad = vec![
            CameraDescriptor::with_url("a", "A", "http://a"),
            CameraDescriptor::new("b", "B", None),
            CameraDescriptor::with_url("", "", "http://c"),
            CameraDescriptor::with_url("a", "A again", "http://a2"),
        ];
        let kinds: Vec<_> = validate_descriptors(&bad)
            .unwrap_err()
            .violations()
            .iter()
            .map(|v| v.kind.clone())
            .collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::MissingSourceUrl,
                ViolationKind::MissingId,
                ViolationKind::DuplicateId("a".into()),
            ]
        );
    }

    #[test]
    fn test_persisted_list_keeps_placeholders() {
        let cams = vec![
            CameraDescriptor::with_url("a", "A", "http://h/a/whep"),
            CameraDescriptor::new("b", "B", None),
        ];
        let decoded = decode_camera_list(&encode_camera_list(&cams)).unwrap();
        assert_eq!(decoded, cams);

        // Ids stay strict
        assert!(decode_camera_list(r#"[{"id": "a"}, {"id": "a"}]"#).is_err());
        assert!(decode_camera_list(r#"[{"name": "no id"}]"#).is_err());
        // User import stays strict
        assert!(parse_camera_list(&encode_camera_list(&cams)).is_err());
    }

    #[test]
    fn test_export_shape() {
        let cams = vec![
            CameraDescriptor::with_url("a", "", "http://h/a/whep"),
            CameraDescriptor::new("b", "Bee", None),
        ];
        let value: Value = serde_json::from_str(&export_camera_list(&cams)).unwrap();

        assert_eq!(
            value,
            serde_json::json!([
                {"id": "a", "name": "a", "webrtc": "http://h/a/whep"},
                {"id": "b", "name": "Bee", "webrtc": ""}
            ])
        );
    }
}
