//! Resolutor de claves para campos de plantilla.
//!
//! Los campos llegan del colaborador externo sin identificador único
//! garantizado: `field_name`, `id` y `field_label` pueden faltar o colisionar
//! entre sí. Este módulo deriva una clave estable y libre de colisiones por
//! campo, UNA sola vez por carga de lista; la clave queda adherida al registro
//! y no se recalcula en mitad de la sesión, de modo que las claves del
//! `FormState` nunca cambian bajo los dedos del usuario.
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Tipo declarado de un campo de plantilla.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoCampo {
    #[serde(rename = "TEXT")]
    Text,
    #[serde(rename = "NUMBER")]
    Number,
    #[serde(rename = "DATE")]
    Date,
    /// Lo llena el sistema; nunca se vuelve un campo editable del formulario.
    #[serde(rename = "SYSTEM_DATA")]
    SystemData,
}

/// Registro crudo de campo tal como lo entrega el colaborador de plantillas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampoPlantilla {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub field_id: Option<String>,
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub field_label: Option<String>,
    pub field_type: TipoCampo,
    #[serde(default)]
    pub is_required: bool,
}

/// Campo con su clave ya resuelta, vigente durante toda la carga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampoResuelto {
    pub clave: String,
    pub campo: CampoPlantilla,
}

impl CampoResuelto {
    /// Nombre canónico para transmisión: el `field_name` externo si existe,
    /// de lo contrario la clave resuelta.
    pub fn nombre_canonico(&self) -> &str {
        self.campo.field_name.as_deref().unwrap_or(&self.clave)
    }

    pub fn etiqueta(&self) -> &str {
        self.campo
            .field_label
            .as_deref()
            .or(self.campo.field_name.as_deref())
            .unwrap_or(&self.clave)
    }
}

fn candidato_util(candidato: Option<&str>, usadas: &IndexSet<String>) -> Option<String> {
    let c = candidato?.trim();
    if c.is_empty() || usadas.contains(c) {
        return None;
    }
    Some(c.to_string())
}

/// Resuelve la clave de un campo probando candidatos en orden fijo de
/// prioridad: `field_name`, `id`, `field_id`, `field_label` y por último la
/// sintética `campo_<indice>`. Si todos colisionan, incrementa el sufijo
/// numérico hasta hallar una libre.
pub fn resolver_clave(
    campo: &CampoPlantilla,
    indice: usize,
    usadas: &IndexSet<String>,
) -> String {
    let candidatos = [
        campo.field_name.as_deref(),
        campo.id.as_deref(),
        campo.field_id.as_deref(),
        campo.field_label.as_deref(),
    ];
    for candidato in candidatos {
        if let Some(clave) = candidato_util(candidato, usadas) {
            return clave;
        }
    }
    let mut n = indice;
    loop {
        let sintetica = format!("campo_{n}");
        if !usadas.contains(&sintetica) {
            return sintetica;
        }
        n += 1;
    }
}

/// Resuelve toda la lista en orden, filtrando los campos `SYSTEM_DATA` (se
/// llenan del lado del sistema y no deben volverse entradas editables).
/// Garantía: las claves del resultado son distintas dos a dos, y re-resolver
/// la misma lista desde cero produce las mismas claves.
pub fn resolver_claves(campos: &[CampoPlantilla]) -> Vec<CampoResuelto> {
    let mut usadas = IndexSet::new();
    let mut resueltos = Vec::new();
    for (indice, campo) in campos.iter().enumerate() {
        if campo.field_type == TipoCampo::SystemData {
            continue;
        }
        let clave = resolver_clave(campo, indice, &usadas);
        usadas.insert(clave.clone());
        resueltos.push(CampoResuelto { clave, campo: campo.clone() });
    }
    resueltos
}
