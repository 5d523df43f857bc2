use crate::error::PipelineError;
use std::path::PathBuf;

/// What the user asks for: research framing plus the PDFs to draw from.
#[derive(Debug, Clone, Default)]
pub struct PipelineRequest {
    pub title: String,
    pub objective: String,
    pub summary: String,
    pub paths: Vec<PathBuf>,
}

impl PipelineRequest {
    pub fn validate(&self) -> Result<(), PipelineError> {
        let blank = |s: &str| s.trim().is_empty();
        if blank(&self.title) || blank(&self.objective) || blank(&self.summary) || self.paths.is_empty() {
            return Err(PipelineError::MissingInput);
        }
        Ok(())
    }

    /// Retrieval query: title, summary and objective joined by spaces.
    pub fn query(&self) -> String {
        format!("{} {} {}", self.title, self.summary, self.objective)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PipelineRequest {
        PipelineRequest {
            title: "Título".to_string(),
            objective: "Objetivo".to_string(),
            summary: "Resumen".to_string(),
            paths: vec![PathBuf::from("a.pdf")],
        }
    }

    #[test]
    fn test_complete_request_is_valid() {
        assert!(request().validate().is_ok());
        assert_eq!(request().query(), "Título Resumen Objetivo");
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let cases = [
            PipelineRequest { title: "  ".to_string(), ..request() },
            PipelineRequest { objective: String::new(), ..request() },
            PipelineRequest { summary: "\n".to_string(), ..request() },
            PipelineRequest { paths: vec![], ..request() },
        ];
        for case in cases {
            let err = case.validate().unwrap_err();
            assert!(matches!(err, PipelineError::MissingInput));
            assert_eq!(
                err.to_string(),
                "Se requiere título, objetivo, resumen y al menos un PDF."
            );
        }
    }
}
