//! Ciclo de vida del empleado: estados del back-office, derivación automática
//! del estado inicial según el tipo de contrato y los mensajes de bloqueo
//! cuando una cédula ya existe en el sistema.
use serde::{Deserialize, Serialize};

/// Estado de un empleado en el back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoEmpleado {
    #[serde(rename = "PENDIENTE_APROBACION_JURIDICO")]
    PendienteAprobacionJuridico,
    #[serde(rename = "EN_PROCESO_DE_CONTRATACION")]
    EnProcesoDeContratacion,
    #[serde(rename = "ACTIVO")]
    Activo,
    #[serde(rename = "RETIRADO")]
    Retirado,
    #[serde(rename = "PENDIENTE_RETIRO_JURIDICO")]
    PendienteRetiroJuridico,
    #[serde(rename = "RECHAZO_JURIDICO")]
    RechazoJuridico,
    #[serde(rename = "RECHAZO_RETIRO_JURIDICO")]
    RechazoRetiroJuridico,
}

impl EstadoEmpleado {
    /// Código textual tal como viaja por el contrato externo.
    pub fn codigo(&self) -> &'static str {
        match self {
            EstadoEmpleado::PendienteAprobacionJuridico => "PENDIENTE_APROBACION_JURIDICO",
            EstadoEmpleado::EnProcesoDeContratacion => "EN_PROCESO_DE_CONTRATACION",
            EstadoEmpleado::Activo => "ACTIVO",
            EstadoEmpleado::Retirado => "RETIRADO",
            EstadoEmpleado::PendienteRetiroJuridico => "PENDIENTE_RETIRO_JURIDICO",
            EstadoEmpleado::RechazoJuridico => "RECHAZO_JURIDICO",
            EstadoEmpleado::RechazoRetiroJuridico => "RECHAZO_RETIRO_JURIDICO",
        }
    }

    /// Forma legible para humanos.
    pub fn legible(&self) -> &'static str {
        match self {
            EstadoEmpleado::PendienteAprobacionJuridico => "Pendiente Aprobación Jurídica",
            EstadoEmpleado::EnProcesoDeContratacion => "En Proceso de Contratación",
            EstadoEmpleado::Activo => "Activo",
            EstadoEmpleado::Retirado => "Retirado",
            EstadoEmpleado::PendienteRetiroJuridico => "Pendiente Retiro Jurídico",
            EstadoEmpleado::RechazoJuridico => "Rechazo Jurídico",
            EstadoEmpleado::RechazoRetiroJuridico => "Rechazo Retiro Jurídico",
        }
    }

    pub fn desde_codigo(codigo: &str) -> Option<Self> {
        match codigo {
            "PENDIENTE_APROBACION_JURIDICO" => Some(Self::PendienteAprobacionJuridico),
            "EN_PROCESO_DE_CONTRATACION" => Some(Self::EnProcesoDeContratacion),
            "ACTIVO" => Some(Self::Activo),
            "RETIRADO" => Some(Self::Retirado),
            "PENDIENTE_RETIRO_JURIDICO" => Some(Self::PendienteRetiroJuridico),
            "RECHAZO_JURIDICO" => Some(Self::RechazoJuridico),
            "RECHAZO_RETIRO_JURIDICO" => Some(Self::RechazoRetiroJuridico),
            _ => None,
        }
    }
}

/// Estado inicial derivado del tipo de contrato:
/// PLANTA pasa por aprobación jurídica; CORRETAJE, TEMPORAL y CASA DE COBRO
/// entran directo al proceso de contratación. Cualquier otro valor cae al
/// proceso de contratación.
pub fn estado_por_tipo_contrato(tipo_contrato: &str) -> EstadoEmpleado {
    match tipo_contrato {
        "PLANTA" => EstadoEmpleado::PendienteAprobacionJuridico,
        _ => EstadoEmpleado::EnProcesoDeContratacion,
    }
}

/// Mensaje de bloqueo cuando la cédula ya existe, según el estado registrado.
/// `estado` llega crudo del back-office (puede ser un código desconocido).
pub fn mensaje_cedula_existente(estado: &str) -> String {
    match EstadoEmpleado::desde_codigo(estado) {
        Some(EstadoEmpleado::Activo) => {
            "Esta cédula ya está registrada como empleado activo.".to_string()
        }
        Some(EstadoEmpleado::PendienteAprobacionJuridico) => {
            "Esta cédula está pendiente de aprobación jurídica.".to_string()
        }
        Some(EstadoEmpleado::Retirado) => {
            "Esta cédula corresponde a un empleado retirado.".to_string()
        }
        _ => format!("Esta cédula ya existe en el sistema (Estado: {estado})."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_por_tipo_contrato() {
        assert_eq!(
            estado_por_tipo_contrato("PLANTA"),
            EstadoEmpleado::PendienteAprobacionJuridico
        );
        for tipo in ["CORRETAJE", "TEMPORAL", "CASA DE COBRO", "OTRO"] {
            assert_eq!(estado_por_tipo_contrato(tipo), EstadoEmpleado::EnProcesoDeContratacion);
        }
    }

    #[test]
    fn test_codigo_y_legible_van_y_vuelven() {
        let todos = [
            EstadoEmpleado::PendienteAprobacionJuridico,
            EstadoEmpleado::EnProcesoDeContratacion,
            EstadoEmpleado::Activo,
            EstadoEmpleado::Retirado,
            EstadoEmpleado::PendienteRetiroJuridico,
            EstadoEmpleado::RechazoJuridico,
            EstadoEmpleado::RechazoRetiroJuridico,
        ];
        for estado in todos {
            assert_eq!(EstadoEmpleado::desde_codigo(estado.codigo()), Some(estado));
            assert!(!estado.legible().is_empty());
        }
    }

    #[test]
    fn test_mensajes_de_cedula_existente() {
        assert_eq!(
            mensaje_cedula_existente("ACTIVO"),
            "Esta cédula ya está registrada como empleado activo."
        );
        assert_eq!(
            mensaje_cedula_existente("PENDIENTE_APROBACION_JURIDICO"),
            "Esta cédula está pendiente de aprobación jurídica."
        );
        assert_eq!(
            mensaje_cedula_existente("RETIRADO"),
            "Esta cédula corresponde a un empleado retirado."
        );
        assert_eq!(
            mensaje_cedula_existente("EN_PROCESO_DE_CONTRATACION"),
            "Esta cédula ya existe en el sistema (Estado: EN_PROCESO_DE_CONTRATACION)."
        );
    }
}
