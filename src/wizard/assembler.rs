//! Ensamblador de payloads: traduce el estado interno del formulario a la
//! forma exacta que espera el contrato externo, tanto para comunicaciones
//! (claves canónicas + mapa de metadatos) como para ingreso de personal
//! (limpieza de campos de solo-UI, renombres y estado derivado).
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::PayloadEmpleado;
use crate::fields::{CampoResuelto, TipoCampo};
use crate::form::value::FormState;
use crate::personal::estado_por_tipo_contrato;

/// Partes discretas de un nombre editado por separado. El string unido se
/// regenera desde las 4 partes en CADA edición; nunca queda rezagado.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartesNombre {
    pub primer_nombre: String,
    pub segundo_nombre: String,
    pub primer_apellido: String,
    pub segundo_apellido: String,
}

/// Parte editable de un campo de nombre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParteNombre {
    PrimerNombre,
    SegundoNombre,
    PrimerApellido,
    SegundoApellido,
}

impl PartesNombre {
    /// Asigna una parte puntual.
    pub fn asignar(&mut self, parte: ParteNombre, valor: &str) {
        match parte {
            ParteNombre::PrimerNombre => self.primer_nombre = valor.to_string(),
            ParteNombre::SegundoNombre => self.segundo_nombre = valor.to_string(),
            ParteNombre::PrimerApellido => self.primer_apellido = valor.to_string(),
            ParteNombre::SegundoApellido => self.segundo_apellido = valor.to_string(),
        }
    }

    /// Une las partes no vacías con espacio simple, en orden natural.
    pub fn unir(&self) -> String {
        [
            self.primer_nombre.trim(),
            self.segundo_nombre.trim(),
            self.primer_apellido.trim(),
            self.segundo_apellido.trim(),
        ]
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Heurística para campos "tipo nombre": el nombre o la etiqueta contiene un
/// token de nombre de persona y no uno de razón social.
pub fn es_campo_nombre(campo: &CampoResuelto) -> bool {
    let texto = format!(
        "{} {}",
        campo.campo.field_name.as_deref().unwrap_or(""),
        campo.campo.field_label.as_deref().unwrap_or("")
    )
    .to_lowercase();
    texto.contains("nombre") && !texto.contains("empresa")
}

fn codigo_tipo(tipo: TipoCampo) -> &'static str {
    match tipo {
        TipoCampo::Text => "TEXT",
        TipoCampo::Number => "NUMBER",
        TipoCampo::Date => "DATE",
        TipoCampo::SystemData => "SYSTEM_DATA",
    }
}

/// Metadato de un campo dinámico, para uso de auditoría y despliegue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadatoCampo {
    pub field_name: String,
    pub label: String,
    pub tipo: String,
    pub value: String,
}

/// Ensambla el payload de generación de una comunicación.
///
/// `form_data` viaja con las claves CANÓNICAS externas (`field_name`); las
/// claves sintéticas del resolutor existen solo dentro del `FormState`. En
/// paralelo se produce un mapa de metadatos indexado por la clave resuelta
/// (así dos campos que colisionan en `field_name` conservan entradas
/// separadas).
pub fn ensamblar_comunicacion(
    form: &FormState,
    campos: &[CampoResuelto],
) -> (serde_json::Value, IndexMap<String, MetadatoCampo>) {
    let mut form_data = serde_json::Map::new();
    let mut metadatos = IndexMap::new();
    for campo in campos {
        let valor = form.texto(&campo.clave).to_string();
        form_data.insert(campo.nombre_canonico().to_string(), json!(valor));
        metadatos.insert(
            campo.clave.clone(),
            MetadatoCampo {
                field_name: campo.nombre_canonico().to_string(),
                label: campo.etiqueta().to_string(),
                tipo: codigo_tipo(campo.campo.field_type).to_string(),
                value: valor,
            },
        );
    }
    let rol = {
        let crudo = form.texto("tipo_deudor");
        if crudo.is_empty() {
            "DEUDOR".to_string()
        } else {
            crudo.to_uppercase()
        }
    };
    let payload = json!({
        "template_id": form.texto("plantilla_id"),
        "client_id": form.texto("cedula"),
        "client_role": rol,
        "obligacion": form.texto("obligacion"),
        "canal": form.texto("canal_comunicacion"),
        "form_data": serde_json::Value::Object(form_data),
    });
    (payload, metadatos)
}

/// Campos de solo-UI que jamás viajan en el payload de ingreso.
const CLAVES_SOLO_UI: &[&str] =
    &["password_renovar_confirm", "localidad", "extension_3cx", "cola", "asignacion"];

/// Ensambla el payload de creación de empleado: elimina los campos de solo-UI,
/// renombra `nombre` -> `nombre_completo` y `contrato` -> `tipo_contrato`, e
/// inserta el estado derivado del tipo de contrato.
pub fn ensamblar_empleado(form: &FormState) -> PayloadEmpleado {
    let mut payload = PayloadEmpleado::new();
    for (clave, valor) in form.iter() {
        if CLAVES_SOLO_UI.contains(&clave.as_str()) {
            continue;
        }
        let clave_externa = match clave.as_str() {
            "nombre" => "nombre_completo",
            "contrato" => "tipo_contrato",
            otra => otra,
        };
        payload.insert(clave_externa.to_string(), valor.como_texto().to_string());
    }
    let estado = estado_por_tipo_contrato(form.texto("contrato"));
    payload.insert("estado".to_string(), estado.codigo().to_string());
    payload
}
