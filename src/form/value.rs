//! Estado vivo del formulario: el agregado mutable que todos los pasos de un
//! wizard leen y escriben durante una corrida.
//!
//! Invariantes que este módulo sostiene:
//! - Toda clave presente en `FormState` fue declarada por el schema de algún
//!   paso (o por el set de campos de plantilla resuelto vigente); las claves
//!   huérfanas se podan en cada transición (`retener_claves`).
//! - `ErrorMap` solo contiene entradas de la última corrida de validación que
//!   falló; una re-validación exitosa elimina la entrada.
//! - `TouchedSet` gobierna únicamente la visibilidad de errores en capas de
//!   presentación; la validación corre igual sin importar el touched.
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Valor de un campo: texto, lista de textos o nulo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Texto(String),
    Lista(Vec<String>),
    Nulo,
}

impl FieldValue {
    /// Vista como texto; listas y nulos se consideran texto vacío.
    pub fn como_texto(&self) -> &str {
        match self {
            FieldValue::Texto(s) => s,
            _ => "",
        }
    }

    /// Un valor es blanco si es nulo, lista vacía o texto solo-espacios.
    /// El texto NO se recorta antes de almacenarse (eso es asunto de la capa
    /// de presentación); el recorte aquí es solo para decidir requeridos.
    pub fn es_blanco(&self) -> bool {
        match self {
            FieldValue::Texto(s) => s.trim().is_empty(),
            FieldValue::Lista(items) => items.is_empty(),
            FieldValue::Nulo => true,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Texto(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Texto(s)
    }
}

/// Mapa clave de campo -> mensaje legible. Ausencia de entrada = campo válido.
pub type ErrorMap = IndexMap<String, String>;

/// Conjunto de campos con los que el usuario ya interactuó.
pub type TouchedSet = IndexSet<String>;

/// Almacén clave-valor que respalda todos los campos de una corrida.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    valores: IndexMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, clave: impl Into<String>, valor: impl Into<FieldValue>) {
        self.valores.insert(clave.into(), valor.into());
    }

    pub fn get(&self, clave: &str) -> Option<&FieldValue> {
        self.valores.get(clave)
    }

    /// Texto del campo; vacío si no existe o es nulo/lista.
    pub fn texto(&self, clave: &str) -> &str {
        self.valores.get(clave).map(FieldValue::como_texto).unwrap_or("")
    }

    pub fn es_blanco(&self, clave: &str) -> bool {
        self.valores.get(clave).map(FieldValue::es_blanco).unwrap_or(true)
    }

    pub fn quitar(&mut self, clave: &str) -> Option<FieldValue> {
        self.valores.shift_remove(clave)
    }

    pub fn claves(&self) -> impl Iterator<Item = &String> {
        self.valores.keys()
    }

    pub fn len(&self) -> usize {
        self.valores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valores.is_empty()
    }

    /// Poda claves huérfanas: conserva únicamente las declaradas. Se invoca en
    /// cada transición de paso para sostener el invariante de claves.
    pub fn retener_claves(&mut self, declaradas: &IndexSet<String>) {
        self.valores.retain(|k, _| declaradas.contains(k));
    }

    pub fn limpiar(&mut self) {
        self.valores.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.valores.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texto_y_blanco() {
        let mut form = FormState::new();
        form.set("cedula", "1023456789");
        form.set("nombre", "   ");
        form.set("tags", FieldValue::Lista(vec!["a".into()]));
        form.set("nulo", FieldValue::Nulo);

        assert_eq!(form.texto("cedula"), "1023456789");
        assert!(!form.es_blanco("cedula"));
        // Solo-espacios cuenta como ausente para requeridos...
        assert!(form.es_blanco("nombre"));
        // ...pero el valor almacenado no se recorta.
        assert_eq!(form.texto("nombre"), "   ");
        assert!(!form.es_blanco("tags"));
        assert!(form.es_blanco("nulo"));
        assert!(form.es_blanco("inexistente"));
    }

    #[test]
    fn test_retener_claves_poda_huerfanas() {
        let mut form = FormState::new();
        form.set("cedula", "123");
        form.set("campo_viejo", "x");
        let declaradas: IndexSet<String> = ["cedula".to_string()].into_iter().collect();
        form.retener_claves(&declaradas);
        assert_eq!(form.len(), 1);
        assert!(form.get("campo_viejo").is_none());
        assert!(form.get("cedula").is_some());
    }

    #[test]
    fn test_limpiar() {
        let mut form = FormState::new();
        form.set("a", "1");
        form.limpiar();
        assert!(form.is_empty());
    }
}
