//! Compuerta jurídica: acciones administrativas sobre el ciclo de vida del
//! empleado que ocurren por fuera del wizard de ingreso (aprobación o rechazo
//! de contrato, y el flujo de retiro).
use std::sync::Arc;

use crate::api::BackofficeApi;
use crate::errors::ApiError;

pub struct CompuertaJuridica {
    api: Arc<dyn BackofficeApi>,
}

impl CompuertaJuridica {
    pub fn new(api: Arc<dyn BackofficeApi>) -> Self {
        Self { api }
    }

    /// Aprueba el contrato de un empleado PENDIENTE_APROBACION_JURIDICO.
    pub async fn aprobar_contrato(&self, cedula: &str) -> Result<(), ApiError> {
        self.api.aprobar_contrato(cedula).await
    }

    /// Rechaza el contrato pendiente; el motivo es opcional.
    pub async fn rechazar_contrato(&self, cedula: &str, motivo: Option<&str>) -> Result<(), ApiError> {
        self.api.rechazar_contrato(cedula, motivo).await
    }

    /// Inicia el retiro de un empleado activo (queda pendiente de jurídico).
    pub async fn solicitar_retiro(&self, cedula: &str) -> Result<(), ApiError> {
        self.api.solicitar_retiro(cedula).await
    }

    pub async fn aprobar_retiro(&self, cedula: &str) -> Result<(), ApiError> {
        self.api.aprobar_retiro(cedula).await
    }

    /// Rechaza el retiro solicitado; el motivo jurídico es opcional.
    pub async fn rechazar_retiro(&self, cedula: &str, motivo: Option<&str>) -> Result<(), ApiError> {
        self.api.rechazar_retiro(cedula, motivo).await
    }
}
