use thiserror::Error;

use super::api_error::ApiError;
use crate::form::value::ErrorMap;

/// Errores de la máquina de pasos. La validación local nunca llega a la red;
/// los errores de red nunca corrompen el FormState (el estado previo queda
/// intacto para reintentar).
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("La validación del paso falló ({} campo(s) con error)", .0.len())]
    Validacion(ErrorMap),
    #[error("Paso inválido: {0}")]
    PasoInvalido(usize),
    #[error("{0}")]
    PrecondicionFallida(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Datos incompletos: {0}")]
    EstadoIncompleto(String),
}

impl FlowError {
    /// Mapa de errores por campo cuando la falla es de validación local.
    pub fn errores(&self) -> Option<&ErrorMap> {
        match self {
            FlowError::Validacion(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validacion_cuenta_campos() {
        let mut errores = ErrorMap::new();
        errores.insert("cedula".into(), "Este campo es requerido".into());
        errores.insert("correo".into(), "Correo inválido".into());
        let err = FlowError::Validacion(errores);
        assert_eq!(err.to_string(), "La validación del paso falló (2 campo(s) con error)");
        assert_eq!(err.errores().unwrap().len(), 2);
    }

    #[test]
    fn test_api_transparente() {
        let err: FlowError = ApiError::Conexion("sin red".into()).into();
        assert_eq!(err.to_string(), "Error de conexión: sin red");
        assert!(err.errores().is_none());
    }
}
