//! Intérprete genérico de schemas de paso: recorre los `CampoSpec`, evalúa la
//! condición de requerido contra el estado vivo y despacha al validador puro
//! correspondiente. Devuelve un `ErrorMap` fresco; no muta el formulario.
use crate::form::schema::{PasoSchema, Requerido, Validador};
use crate::form::validators;
use crate::form::value::{ErrorMap, FormState};

fn es_requerido(requerido: &Requerido, form: &FormState) -> bool {
    match requerido {
        Requerido::Siempre => true,
        Requerido::Nunca => false,
        Requerido::SiCampoIgual { campo, valor } => form.texto(campo) == valor,
    }
}

fn validar_formato(validador: &Validador, valor: &str, form: &FormState) -> Option<String> {
    match validador {
        Validador::Ninguno => None,
        Validador::Cedula => validators::cedula(valor),
        Validador::Celular => validators::celular(valor),
        Validador::Email => validators::email(valor),
        Validador::FechaIso => validators::fecha_iso(valor),
        Validador::Fecha => validators::fecha(valor),
        Validador::FechaNacimiento => validators::fecha_nacimiento(valor),
        Validador::Password => validators::password(valor),
        Validador::ConfirmacionPassword { primaria } => {
            validators::confirmacion_password(form.texto(primaria), valor)
        }
        Validador::Nombre => validators::nombre(valor),
        Validador::Direccion { minimo } => validators::direccion(valor, *minimo),
        Validador::NumeroPlantilla => validators::numero_plantilla(valor),
        Validador::FechaPlantilla => validators::fecha_plantilla(valor),
    }
}

/// Valida un paso completo contra el estado vivo. El mapa resultante contiene
/// solo los campos que fallaron en ESTA corrida; un mapa vacío es paso válido.
///
/// Orden por campo: la confirmación de contraseña se evalúa antes que el
/// chequeo de blancos (ambos-vacíos debe reportar "Debe confirmar…" sobre la
/// confirmación, no pasar en silencio); para el resto, un campo blanco y
/// requerido reporta requerido y un campo blanco opcional no reporta nada.
pub fn validar_paso(schema: &PasoSchema, form: &FormState) -> ErrorMap {
    let mut errores = ErrorMap::new();
    for campo in &schema.campos {
        let valor = form.texto(&campo.clave);

        if let Validador::ConfirmacionPassword { .. } = campo.validador {
            if let Some(msg) = validar_formato(&campo.validador, valor, form) {
                errores.insert(campo.clave.clone(), msg);
            }
            continue;
        }

        if form.es_blanco(&campo.clave) {
            if es_requerido(&campo.requerido, form) {
                errores.insert(campo.clave.clone(), validators::MSG_REQUERIDO.to_string());
            }
            continue;
        }

        if let Some(msg) = validar_formato(&campo.validador, valor, form) {
            errores.insert(campo.clave.clone(), msg);
        }
    }
    errores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::schema::CampoSpec;

    fn schema_basico() -> PasoSchema {
        PasoSchema::nuevo(
            0,
            "Datos",
            vec![
                CampoSpec::nuevo("cedula", "Cédula").con_validador(Validador::Cedula),
                CampoSpec::nuevo("observaciones", "Observaciones").opcional(),
                CampoSpec::nuevo("celular", "Celular")
                    .con_validador(Validador::Celular)
                    .requerido_si("canal", "SMS"),
            ],
        )
    }

    #[test]
    fn test_requerido_y_opcional() {
        let schema = schema_basico();
        let form = FormState::new();
        let errores = validar_paso(&schema, &form);
        assert_eq!(errores.get("cedula").map(String::as_str), Some("Este campo es requerido"));
        // El opcional blanco no reporta nada.
        assert!(!errores.contains_key("observaciones"));
        // El condicional no aplica porque "canal" no vale "SMS".
        assert!(!errores.contains_key("celular"));
    }

    #[test]
    fn test_requerido_condicional_activo() {
        let schema = schema_basico();
        let mut form = FormState::new();
        form.set("cedula", "1023456789");
        form.set("canal", "SMS");
        let errores = validar_paso(&schema, &form);
        assert_eq!(errores.get("celular").map(String::as_str), Some("Este campo es requerido"));
    }

    #[test]
    fn test_formato_solo_con_valor() {
        let schema = schema_basico();
        let mut form = FormState::new();
        form.set("cedula", "abc");
        let errores = validar_paso(&schema, &form);
        assert_eq!(errores.get("cedula").map(String::as_str), Some("Solo se permiten números"));
    }

    #[test]
    fn test_confirmacion_antes_que_blancos() {
        let schema = PasoSchema::nuevo(
            0,
            "Credenciales",
            vec![
                CampoSpec::nuevo("password", "Contraseña").con_validador(Validador::Password),
                CampoSpec::nuevo("password_confirm", "Confirmación").con_validador(
                    Validador::ConfirmacionPassword { primaria: "password".into() },
                ),
            ],
        );
        // Ambos vacíos: la confirmación reporta requerido, nunca pasa en silencio.
        let form = FormState::new();
        let errores = validar_paso(&schema, &form);
        assert_eq!(
            errores.get("password_confirm").map(String::as_str),
            Some("Debe confirmar la contraseña")
        );

        // Discordancia: el error vive solo en la clave de confirmación.
        let mut form = FormState::new();
        form.set("password", "Abcdefg1");
        form.set("password_confirm", "Abcdefg2");
        let errores = validar_paso(&schema, &form);
        assert!(!errores.contains_key("password"));
        assert_eq!(
            errores.get("password_confirm").map(String::as_str),
            Some("Las contraseñas no coinciden")
        );

        // Coincidencia no vacía: sin errores.
        let mut form = FormState::new();
        form.set("password", "Abcdefg1");
        form.set("password_confirm", "Abcdefg1");
        assert!(validar_paso(&schema, &form).is_empty());
    }

    #[test]
    fn test_mapa_solo_de_la_corrida_actual() {
        let schema = schema_basico();
        let mut form = FormState::new();
        let primera = validar_paso(&schema, &form);
        assert!(primera.contains_key("cedula"));
        form.set("cedula", "1023456789");
        let segunda = validar_paso(&schema, &form);
        assert!(!segunda.contains_key("cedula"));
    }
}
