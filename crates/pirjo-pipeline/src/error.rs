use pirjo_config::ConfigError;
use pirjo_core::pdf::ExtractionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Se requiere título, objetivo, resumen y al menos un PDF.")]
    MissingInput,

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("No se pudo preparar el índice vectorial: {0:#}")]
    Index(#[source] anyhow::Error),

    #[error("Falló la etapa {stage}: {source:#}")]
    Stage {
        stage: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    pub(crate) fn stage(stage: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| PipelineError::Stage { stage, source }
    }
}
