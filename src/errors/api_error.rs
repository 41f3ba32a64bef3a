use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Detalle de un error de validación 422 devuelto por el colaborador remoto.
/// Se muestra tal cual llega; el núcleo no lo reinterpreta.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetalleCampo {
    pub loc: Vec<String>,
    pub msg: String,
}

impl std::fmt::Display for DetalleCampo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.loc.join("."), self.msg)
    }
}

/// Errores del colaborador HTTP remoto. Un 404 en la búsqueda de empleado
/// NO pasa por aquí: la implementación lo mapea a `Ok(None)`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error {status}: {mensaje}")]
    Http { status: u16, mensaje: String },
    #[error("Validación del servidor: {}", .0.iter().map(|d| d.to_string()).collect::<Vec<_>>().join("; "))]
    Validacion(Vec<DetalleCampo>),
    #[error("Error de conexión: {0}")]
    Conexion(String),
    #[error("Respuesta inesperada: {0}")]
    Respuesta(String),
}

impl ApiError {
    /// Código de estado HTTP asociado, si lo hay.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Validacion(_) => Some(422),
            _ => None,
        }
    }
}
