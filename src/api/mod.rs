//! Colaborador externo del back-office. El núcleo habla únicamente con el
//! trait [`BackofficeApi`]; la implementación real HTTP vive fuera de este
//! crate y el mock de pruebas en [`mock`].
pub mod mock;
pub mod retry;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Obligación de cartera asociada a una cédula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligacion {
    pub obligacion: String,
    pub sistema_origen: String,
}

/// Tipo de plantilla de comunicación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TipoPlantilla {
    #[serde(rename = "FORM")]
    Form,
    #[serde(rename = "LEGAL")]
    Legal,
    #[serde(rename = "AUTOMATIC")]
    Automatic,
}

/// Plantilla de comunicación disponible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plantilla {
    pub id: String,
    pub nombre: String,
    pub tipo: TipoPlantilla,
    /// Nombre del archivo asociado (para URLs firmadas de media).
    #[serde(default)]
    pub archivo: Option<String>,
}

/// Resultado de generar una comunicación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComunicacionCreada {
    pub id: String,
}

/// Respuesta cruda del preview de una comunicación generada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespuestaPreview {
    pub mime: String,
    pub cuerpo: Vec<u8>,
}

/// Empleado ya registrado en el back-office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empleado {
    pub cedula: String,
    pub nombre_completo: String,
    pub estado: String,
}

/// Payload plano de creación de empleado, en orden de inserción.
pub type PayloadEmpleado = IndexMap<String, String>;

/// Contrato con el back-office. Todos los métodos son falibles; el 404 de
/// búsqueda de empleado se modela como `Ok(None)`, no como error.
#[async_trait]
pub trait BackofficeApi: Send + Sync {
    /// Obligaciones de cartera de la cédula dada.
    async fn obligaciones_por_cedula(&self, cedula: &str) -> Result<Vec<Obligacion>, ApiError>;

    /// Plantillas disponibles, filtradas por estado de aprobación y,
    /// opcionalmente, por tipo.
    async fn listar_plantillas(
        &self,
        estado: &str,
        tipo: Option<TipoPlantilla>,
    ) -> Result<Vec<Plantilla>, ApiError>;

    /// Registro fresco de una plantilla puntual.
    async fn plantilla(&self, id: &str) -> Result<Plantilla, ApiError>;

    /// Descarga el archivo de una plantilla (cuerpo + MIME), para la vista
    /// previa anterior a la generación.
    async fn archivo_plantilla(&self, ruta: &str) -> Result<RespuestaPreview, ApiError>;

    /// Campos dinámicos declarados por una plantilla.
    async fn campos_plantilla(
        &self,
        plantilla_id: &str,
    ) -> Result<Vec<crate::fields::CampoPlantilla>, ApiError>;

    /// Genera la comunicación con el payload ensamblado.
    async fn generar_comunicacion(
        &self,
        payload: serde_json::Value,
    ) -> Result<ComunicacionCreada, ApiError>;

    /// Preview de una comunicación ya generada.
    async fn preview_comunicacion(&self, id: &str) -> Result<RespuestaPreview, ApiError>;

    /// Busca un empleado por cédula. `None` cuando el back-office responde 404.
    async fn empleado_por_cedula(&self, cedula: &str) -> Result<Option<Empleado>, ApiError>;

    /// Crea el empleado con el payload ya ensamblado.
    async fn crear_empleado(&self, payload: &PayloadEmpleado) -> Result<Empleado, ApiError>;

    /// Compuerta jurídica: aprueba el contrato pendiente de una cédula.
    async fn aprobar_contrato(&self, cedula: &str) -> Result<(), ApiError>;

    /// Compuerta jurídica: rechaza el contrato pendiente, con motivo opcional.
    async fn rechazar_contrato(&self, cedula: &str, motivo: Option<&str>) -> Result<(), ApiError>;

    /// Inicia el flujo de retiro de un empleado activo.
    async fn solicitar_retiro(&self, cedula: &str) -> Result<(), ApiError>;

    async fn aprobar_retiro(&self, cedula: &str) -> Result<(), ApiError>;

    /// Rechaza el retiro solicitado, con motivo jurídico opcional.
    async fn rechazar_retiro(&self, cedula: &str, motivo: Option<&str>) -> Result<(), ApiError>;

    /// URL firmada temporal para el archivo de media de una plantilla.
    async fn url_media_firmada(&self, archivo: &str) -> Result<String, ApiError>;
}
