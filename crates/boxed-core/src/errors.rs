//! Errores del motor de composición.
//!
//! Un fallo de un step (síncrono o diferido) se propaga tal cual al caller,
//! anotado con la posición del step que lo produjo en cada nivel de
//! anidamiento. La terminación anticipada nunca es un error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipeError {
    /// Fallo anotado con la posición (0 = entry) y la etiqueta del step en
    /// la cadena que lo ejecutó. Un fallo de un pipe anidado queda como
    /// `source` de la anotación exterior.
    #[error("step #{index} ({}) failed: {source}", .label.as_deref().unwrap_or("anonymous"))]
    Step {
        index: usize,
        label: Option<String>,
        #[source]
        source: Box<PipeError>,
    },
    /// Fallo levantado por el código de un step.
    #[error("{0}")]
    Failed(String),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    External(Box<dyn std::error::Error + Send + Sync>),
}

impl PipeError {
    pub fn failed(message: impl Into<String>) -> Self {
        PipeError::Failed(message.into())
    }

    /// Envuelve cualquier error externo producido dentro de un step.
    pub fn external<E>(error: E) -> Self
        where E: std::error::Error + Send + Sync + 'static
    {
        PipeError::External(Box::new(error))
    }

    /// Anota el error con la posición del step en la cadena actual. Un
    /// error ya anotado (p.ej. de un pipe anidado) se envuelve de nuevo, así
    /// la anotación exterior siempre se refiere a la cadena del caller.
    pub(crate) fn at(self, index: usize, label: Option<&str>) -> Self {
        PipeError::Step { index,
                          label: label.map(str::to_owned),
                          source: Box::new(self) }
    }

    /// Posición del step que falló en la cadena invocada por el caller.
    pub fn index(&self) -> Option<usize> {
        match self {
            PipeError::Step { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Posiciones desde la cadena exterior hasta el pipe anidado más
    /// interno donde ocurrió el fallo.
    pub fn path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = self;
        while let PipeError::Step { index, source, .. } = current {
            path.push(*index);
            current = &**source;
        }
        path
    }

    /// Error original, sin la anotación de posición.
    pub fn root(&self) -> &PipeError {
        match self {
            PipeError::Step { source, .. } => source.root(),
            other => other,
        }
    }
}
