use serde::{Deserialize, Serialize};

/// Largest file intake will accept (20 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Document formats accepted by file intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    PlainText,
    LegacyDoc,
    ModernDoc,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 4] = [
        DocumentFormat::Pdf,
        DocumentFormat::PlainText,
        DocumentFormat::LegacyDoc,
        DocumentFormat::ModernDoc,
    ];

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::PlainText => "text/plain",
            DocumentFormat::LegacyDoc => "application/msword",
            DocumentFormat::ModernDoc => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Exact match only; browsers report these verbatim.
    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.mime_type() == mime)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, byte_size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_size,
            mime_type: mime_type.into(),
        }
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_mime(&self.mime_type)
    }

    /// Size in MiB with two decimals, as shown next to the file name
    pub fn display_size(&self) -> String {
        format!("{:.2} MB", self.byte_size as f64 / 1024.0 / 1024.0)
    }
}

/// Where extracted text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOrigin {
    File,
    Paste,
    PeerSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub text: String,
    pub origin: DocumentOrigin,
}

/// A peer company's filing chosen for comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSelection {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub report_id: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub focus_style: String,
}

impl PeerSelection {
    /// Names of the fields that are still blank, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("company", &self.company),
            ("report_id", &self.report_id),
            ("section", &self.section),
            ("focus_style", &self.focus_style),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// SEC filing forms offered by the filing type selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingType {
    #[serde(rename = "10K")]
    Form10K,
    #[serde(rename = "10Q")]
    Form10Q,
    #[serde(rename = "8K")]
    Form8K,
    #[serde(rename = "S1")]
    FormS1,
}

impl FilingType {
    pub fn label(&self) -> &'static str {
        match self {
            FilingType::Form10K => "Form 10-K (Annual Report)",
            FilingType::Form10Q => "Form 10-Q (Quarterly Report)",
            FilingType::Form8K => "Form 8-K (Current Report)",
            FilingType::FormS1 => "Form S-1 (Registration Statement)",
        }
    }
}

/// Which tab of the upload page is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadTab {
    #[default]
    Primary,
    Peer,
}

/// How the primary document is supplied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    File,
    Text,
}
