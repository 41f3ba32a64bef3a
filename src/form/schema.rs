//! Schemas declarativos de paso: cada paso del wizard declara sus campos,
//! su condición de requerido y el validador de formato que le aplica. El
//! intérprete genérico vive en [`crate::form::engine`].
use serde::{Deserialize, Serialize};

/// Condición de requerido de un campo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requerido {
    /// Siempre obligatorio.
    Siempre,
    /// Nunca obligatorio (solo formato si hay valor).
    Nunca,
    /// Obligatorio únicamente cuando otro campo del mismo form vale `valor`.
    SiCampoIgual { campo: String, valor: String },
}

/// Validador de formato asociado a un campo. `Ninguno` valida solo presencia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validador {
    Ninguno,
    Cedula,
    Celular,
    Email,
    /// Solo formato ISO; admite fechas futuras.
    FechaIso,
    /// Formato ISO y no futura.
    Fecha,
    FechaNacimiento,
    Password,
    /// Compara contra el campo hermano indicado (la clave de la contraseña
    /// primaria). El error siempre se reporta sobre la confirmación.
    ConfirmacionPassword { primaria: String },
    Nombre,
    Direccion { minimo: usize },
    NumeroPlantilla,
    FechaPlantilla,
}

/// Declaración de un campo dentro de un paso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampoSpec {
    /// Clave canónica bajo la cual el campo vive en el `FormState`.
    pub clave: String,
    /// Etiqueta legible (para mensajes y capas de presentación).
    pub etiqueta: String,
    pub requerido: Requerido,
    pub validador: Validador,
}

impl CampoSpec {
    pub fn nuevo(clave: impl Into<String>, etiqueta: impl Into<String>) -> Self {
        Self {
            clave: clave.into(),
            etiqueta: etiqueta.into(),
            requerido: Requerido::Siempre,
            validador: Validador::Ninguno,
        }
    }

    pub fn opcional(mut self) -> Self {
        self.requerido = Requerido::Nunca;
        self
    }

    pub fn requerido_si(mut self, campo: impl Into<String>, valor: impl Into<String>) -> Self {
        self.requerido = Requerido::SiCampoIgual { campo: campo.into(), valor: valor.into() };
        self
    }

    pub fn con_validador(mut self, validador: Validador) -> Self {
        self.validador = validador;
        self
    }
}

/// Schema completo de un paso del wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasoSchema {
    /// Índice del paso dentro del wizard.
    pub id: usize,
    pub titulo: String,
    pub campos: Vec<CampoSpec>,
}

impl PasoSchema {
    pub fn nuevo(id: usize, titulo: impl Into<String>, campos: Vec<CampoSpec>) -> Self {
        Self { id, titulo: titulo.into(), campos }
    }

    /// Claves declaradas por este paso, en orden de declaración.
    pub fn claves(&self) -> impl Iterator<Item = &str> {
        self.campos.iter().map(|c| c.clave.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_de_campo() {
        let campo = CampoSpec::nuevo("celular", "Celular")
            .con_validador(Validador::Celular)
            .requerido_si("canal", "SMS");
        assert_eq!(campo.clave, "celular");
        assert_eq!(
            campo.requerido,
            Requerido::SiCampoIgual { campo: "canal".into(), valor: "SMS".into() }
        );
        assert_eq!(campo.validador, Validador::Celular);
    }

    #[test]
    fn test_claves_en_orden() {
        let paso = PasoSchema::nuevo(
            0,
            "Identificación",
            vec![CampoSpec::nuevo("cedula", "Cédula"), CampoSpec::nuevo("nombre", "Nombre")],
        );
        let claves: Vec<&str> = paso.claves().collect();
        assert_eq!(claves, vec!["cedula", "nombre"]);
    }
}
