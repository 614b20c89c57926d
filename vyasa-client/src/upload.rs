//! Bulk-upload files
//!
//! Spreadsheets go to the backend as multipart field `file`. CSV headers are
//! checked against the resource's [`CsvTemplate`] before anything is sent;
//! Excel files are passed through untouched.

use std::path::Path;

use shared::templates::{CsvTemplate, parse_header};

use crate::error::{ClientError, ClientResult};

/// Accepted spreadsheet kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Csv,
    Xlsx,
    Xls,
}

impl UploadKind {
    /// Kind from a file name, case-insensitive on the extension
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Xls => "application/vnd.ms-excel",
        }
    }
}

/// In-memory file ready for a multipart upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    file_name: String,
    kind: UploadKind,
    bytes: Vec<u8>,
}

impl UploadFile {
    /// Wrap bytes under a file name; the extension must be csv, xlsx or xls
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> ClientResult<Self> {
        let file_name = file_name.into();
        let kind = UploadKind::from_file_name(&file_name).ok_or_else(|| {
            ClientError::Validation("Please upload a CSV or Excel file (.csv, .xlsx, .xls)".into())
        })?;
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ClientError::Validation("The selected file is empty".into()));
        }
        Ok(Self {
            file_name,
            kind,
            bytes,
        })
    }

    /// Read a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::Validation(format!("Invalid file path: {}", path.display())))?
            .to_string();
        // Reject by extension before reading
        UploadKind::from_file_name(&file_name).ok_or_else(|| {
            ClientError::Validation("Please upload a CSV or Excel file (.csv, .xlsx, .xls)".into())
        })?;
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> UploadKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Check a CSV header row against `template`
    pub fn check_columns(&self, template: &CsvTemplate) -> ClientResult<()> {
        if self.kind != UploadKind::Csv {
            return Ok(());
        }
        let text = std::str::from_utf8(&self.bytes)
            .map_err(|_| ClientError::Validation("CSV file must be UTF-8 encoded".into()))?;
        let header = parse_header(text);
        let missing = template.missing_columns(&header);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Validation(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )))
        }
    }
}
