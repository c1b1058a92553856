use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// PDF, legacy Word, OOXML Word.
pub const ALLOWED_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// An accepted resume attachment. Construction is the guard: a file that
/// fails the size ceiling or the type allow-list never becomes a value of
/// this type, so it can never reach the outgoing record.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub enum ResumeError {
    TooLarge(usize),
    UnsupportedType(String),
    InvalidBase64(String),
}

impl std::fmt::Display for ResumeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResumeError::TooLarge(size) => {
                write!(f, "File size must be less than 10MB (got {size} bytes)")
            }
            ResumeError::UnsupportedType(mime) => {
                write!(f, "Please upload a PDF or Word document (got {mime})")
            }
            ResumeError::InvalidBase64(msg) => write!(f, "Invalid resume encoding: {msg}"),
        }
    }
}

impl ResumeFile {
    pub fn new(
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    ) -> Result<Self, ResumeError> {
        if bytes.len() > MAX_RESUME_BYTES {
            return Err(ResumeError::TooLarge(bytes.len()));
        }
        if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(ResumeError::UnsupportedType(mime_type));
        }
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    /// JSON path: the page script pre-encodes the file with FileReader.
    pub fn from_base64(
        file_name: String,
        mime_type: String,
        encoded: &str,
    ) -> Result<Self, ResumeError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ResumeError::InvalidBase64(e.to_string()))?;
        Self::new(file_name, mime_type, bytes)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}
