//! Multipart form collection shared by the upload-bearing resources.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::ApiError;

#[derive(Debug)]
pub struct UploadedFile {
    pub field: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A fully drained multipart request: text fields by name, files in arrival
/// order. Draining up front keeps field ordering concerns out of handlers.
#[derive(Debug, Default)]
pub struct FormData {
    pub texts: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FormData::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    form.files.push(UploadedFile {
                        field: name,
                        filename,
                        content_type,
                        bytes,
                    });
                }
                None => {
                    let value = field.text().await?;
                    form.texts.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    /// Non-blank text field value.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.texts
            .get(key)
            .map(String::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn require_text(&self, key: &str) -> Result<&str, ApiError> {
        self.text(key)
            .ok_or_else(|| ApiError::validation(format!("{} is required", key)))
    }

    /// Checkbox-style flags arrive as strings; accept the common truthy forms.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.text(key)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes"))
    }

    /// Lenient integer parse; garbage reads as absent.
    pub fn int(&self, key: &str) -> Option<i32> {
        self.text(key).and_then(|v| v.parse().ok())
    }

    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == key)
    }

    pub fn files(&self, key: &str) -> Vec<&UploadedFile> {
        self.files.iter().filter(|f| f.field == key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(texts: &[(&str, &str)]) -> FormData {
        FormData {
            texts: texts
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: Vec::new(),
        }
    }

    #[test]
    fn blank_text_reads_as_absent() {
        let form = form_with(&[("title", "   "), ("category", "Residential")]);
        assert_eq!(form.text("title"), None);
        assert_eq!(form.text("category"), Some("Residential"));
        assert!(form.require_text("title").is_err());
    }

    #[test]
    fn flags_accept_string_and_boolean_forms() {
        let form = form_with(&[("a", "true"), ("b", "1"), ("c", "false"), ("d", "nope")]);
        assert_eq!(form.flag("a"), Some(true));
        assert_eq!(form.flag("b"), Some(true));
        assert_eq!(form.flag("c"), Some(false));
        assert_eq!(form.flag("d"), Some(false));
        assert_eq!(form.flag("missing"), None);
    }

    #[test]
    fn integers_parse_leniently() {
        let form = form_with(&[("year", "2021"), ("bad", "twenty")]);
        assert_eq!(form.int("year"), Some(2021));
        assert_eq!(form.int("bad"), None);
        assert_eq!(form.int("missing"), None);
    }

    #[test]
    fn files_filter_by_field_name() {
        let form = FormData {
            texts: HashMap::new(),
            files: vec![
                UploadedFile {
                    field: "galleryImages".to_string(),
                    filename: "a.jpg".to_string(),
                    content_type: None,
                    bytes: Bytes::new(),
                },
                UploadedFile {
                    field: "mainImage".to_string(),
                    filename: "b.jpg".to_string(),
                    content_type: None,
                    bytes: Bytes::new(),
                },
            ],
        };
        assert_eq!(form.files("galleryImages").len(), 1);
        assert_eq!(form.file("mainImage").unwrap().filename, "b.jpg");
        assert!(form.file("cvFile").is_none());
    }
}
