use serde::{Deserialize, Serialize};

/// A single reading: citation plus body text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReading {
    /// Scripture reference, e.g. "Isaías 25, 6-10"
    pub cita: Option<String>,

    /// Body paragraphs joined with single spaces
    pub lectura: Option<String>,
}

/// Everything extracted from one daily readings page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingsResult {
    /// Liturgical day or season label
    pub indicacion_liturgica: Option<String>,

    /// Section headed "Lectura del Día"
    pub primera_lectura: ExtractedReading,

    /// Section headed "Evangelio del Día"
    pub evangelio: ExtractedReading,
}

/// Successful retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    /// Always `true`
    pub success: bool,

    /// The requested date, as given
    pub fecha: String,

    /// Page the readings were extracted from
    pub url: String,

    /// Extracted readings; fields are `null` when the page lacks them
    pub lecturas: ReadingsResult,
}

/// Failed retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEnvelope {
    /// Always `false`
    pub success: bool,

    /// Human-readable cause
    pub error: String,

    /// The requested date, as given (possibly malformed)
    pub fecha: String,
}

/// Outcome of a readings request, serialized as
/// `{ "success": true, "fecha", "url", "lecturas" }` or
/// `{ "success": false, "error", "fecha" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultEnvelope {
    /// The page was fetched; extraction itself never fails
    Success(SuccessEnvelope),
    /// Invalid date or fetch failure
    Failure(FailureEnvelope),
}

impl ResultEnvelope {
    /// Builds a success envelope
    pub fn success(fecha: impl Into<String>, url: impl Into<String>, lecturas: ReadingsResult) -> Self {
        ResultEnvelope::Success(SuccessEnvelope {
            success: true,
            fecha: fecha.into(),
            url: url.into(),
            lecturas,
        })
    }

    /// Builds a failure envelope
    pub fn failure(fecha: impl Into<String>, error: impl Into<String>) -> Self {
        ResultEnvelope::Failure(FailureEnvelope {
            success: false,
            error: error.into(),
            fecha: fecha.into(),
        })
    }

    /// Whether the readings were retrieved
    pub fn is_success(&self) -> bool {
        matches!(self, ResultEnvelope::Success(_))
    }

    /// The echoed input date
    pub fn fecha(&self) -> &str {
        match self {
            ResultEnvelope::Success(s) => &s.fecha,
            ResultEnvelope::Failure(f) => &f.fecha,
        }
    }

    /// Extracted readings, on success only
    pub fn lecturas(&self) -> Option<&ReadingsResult> {
        match self {
            ResultEnvelope::Success(s) => Some(&s.lecturas),
            ResultEnvelope::Failure(_) => None,
        }
    }

    /// Error message, on failure only
    pub fn error(&self) -> Option<&str> {
        match self {
            ResultEnvelope::Success(_) => None,
            ResultEnvelope::Failure(f) => Some(&f.error),
        }
    }
}
