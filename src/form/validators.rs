//! Validadores de campo: funciones puras de valor crudo a mensaje de error o
//! `None`. Sin I/O, sin estado. Las reglas de formato vienen del contrato del
//! back-office: cédulas de 8 a 12 dígitos, celulares colombianos de 10 dígitos
//! iniciando en 3, fechas ISO no futuras y mayoría de edad para nacimiento.
use chrono::{NaiveDate, Utc};

/// Edad mínima exigida para la fecha de nacimiento.
pub const EDAD_MINIMA: u32 = 18;
/// Longitud mínima de contraseña.
pub const PASSWORD_MIN: usize = 8;

pub const MSG_REQUERIDO: &str = "Este campo es requerido";
pub const MSG_SOLO_NUMEROS: &str = "Solo se permiten números";
pub const MSG_CONFIRMAR_PASSWORD: &str = "Debe confirmar la contraseña";
pub const MSG_PASSWORDS_DISTINTAS: &str = "Las contraseñas no coinciden";

fn es_solo_digitos(valor: &str) -> bool {
    !valor.is_empty() && valor.chars().all(|c| c.is_ascii_digit())
}

/// Presencia: blanco (vacío o solo espacios) -> requerido.
pub fn requerido(valor: &str) -> Option<String> {
    if valor.trim().is_empty() {
        Some(MSG_REQUERIDO.to_string())
    } else {
        None
    }
}

/// Cédula: solo dígitos, entre 8 y 12.
pub fn cedula(valor: &str) -> Option<String> {
    if !es_solo_digitos(valor) {
        return Some(MSG_SOLO_NUMEROS.to_string());
    }
    if valor.len() < 8 || valor.len() > 12 {
        return Some("La cédula debe tener entre 8 y 12 dígitos".to_string());
    }
    None
}

/// Celular: solo dígitos, inicia en 3, exactamente 10.
pub fn celular(valor: &str) -> Option<String> {
    if !es_solo_digitos(valor) {
        return Some(MSG_SOLO_NUMEROS.to_string());
    }
    if !valor.starts_with('3') {
        return Some("El celular debe iniciar en 3".to_string());
    }
    if valor.len() != 10 {
        return Some("El celular debe tener 10 dígitos".to_string());
    }
    None
}

/// Correo: debe contener `@` con parte local y dominio con punto.
pub fn email(valor: &str) -> Option<String> {
    let invalido = Some("Correo electrónico inválido".to_string());
    let Some((local, dominio)) = valor.split_once('@') else {
        return invalido;
    };
    if local.is_empty() || dominio.is_empty() || valor.contains(' ') {
        return invalido;
    }
    let Some((host, tld)) = dominio.rsplit_once('.') else {
        return invalido;
    };
    if host.is_empty() || tld.is_empty() || dominio.contains('@') {
        return invalido;
    }
    None
}

fn parsear_iso(valor: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(valor, "%Y-%m-%d").ok()
}

/// Fecha ISO `YYYY-MM-DD`, solo formato. Admite fechas futuras (p. ej. un
/// ingreso programado); la regla de no-futuro es de nacimiento y aprobación.
pub fn fecha_iso(valor: &str) -> Option<String> {
    if parsear_iso(valor).is_none() {
        return Some("La fecha debe tener formato AAAA-MM-DD".to_string());
    }
    None
}

/// Fecha ISO `YYYY-MM-DD`, parseable y no futura.
pub fn fecha(valor: &str) -> Option<String> {
    let Some(dia) = parsear_iso(valor) else {
        return Some("La fecha debe tener formato AAAA-MM-DD".to_string());
    };
    if dia > Utc::now().date_naive() {
        return Some("La fecha no puede ser futura".to_string());
    }
    None
}

/// Fecha de nacimiento: ISO, no futura y con mayoría de edad.
pub fn fecha_nacimiento(valor: &str) -> Option<String> {
    let Some(dia) = parsear_iso(valor) else {
        return Some("La fecha debe tener formato AAAA-MM-DD".to_string());
    };
    let hoy = Utc::now().date_naive();
    if dia > hoy {
        return Some("La fecha no puede ser futura".to_string());
    }
    match hoy.years_since(dia) {
        Some(edad) if edad >= EDAD_MINIMA => None,
        _ => Some(format!("Debe ser mayor de {EDAD_MINIMA} años")),
    }
}

/// Contraseña: mínimo 8 caracteres con mayúscula, minúscula y dígito.
pub fn password(valor: &str) -> Option<String> {
    if valor.len() < PASSWORD_MIN {
        return Some(format!("La contraseña debe tener al menos {PASSWORD_MIN} caracteres"));
    }
    let tiene_mayuscula = valor.chars().any(|c| c.is_uppercase());
    let tiene_minuscula = valor.chars().any(|c| c.is_lowercase());
    let tiene_digito = valor.chars().any(|c| c.is_ascii_digit());
    if !(tiene_mayuscula && tiene_minuscula && tiene_digito) {
        return Some("La contraseña debe incluir mayúscula, minúscula y número".to_string());
    }
    None
}

/// Confirmación de contraseña. Propiedad sostenida:
/// `confirmacion_password(p, c) == None  ⟺  p == c && p != ""`.
/// El caso ambos-vacíos se reporta como requerido sobre la confirmación, no
/// como discordancia; la discordancia siempre se reporta en la confirmación.
pub fn confirmacion_password(primaria: &str, confirmacion: &str) -> Option<String> {
    if primaria.is_empty() || confirmacion.is_empty() {
        return Some(MSG_CONFIRMAR_PASSWORD.to_string());
    }
    if primaria != confirmacion {
        return Some(MSG_PASSWORDS_DISTINTAS.to_string());
    }
    None
}

/// Nombre: letras (incluyendo acentos y ñ) y espacios.
pub fn nombre(valor: &str) -> Option<String> {
    if valor.trim().is_empty() {
        return Some(MSG_REQUERIDO.to_string());
    }
    let valido = valor.chars().all(|c| c.is_alphabetic() || c.is_whitespace());
    if !valido {
        return Some("Solo se permiten letras y espacios".to_string());
    }
    None
}

/// Dirección: longitud mínima tras recorte.
pub fn direccion(valor: &str, minimo: usize) -> Option<String> {
    if valor.trim().len() < minimo {
        return Some(format!("La dirección debe tener al menos {minimo} caracteres"));
    }
    None
}

/// Campo NUMBER de plantilla: solo dígitos, ventana de 8 a 12.
pub fn numero_plantilla(valor: &str) -> Option<String> {
    if !es_solo_digitos(valor) {
        return Some(MSG_SOLO_NUMEROS.to_string());
    }
    if valor.len() < 8 || valor.len() > 12 {
        return Some("Debe tener entre 8 y 12 dígitos".to_string());
    }
    None
}

/// Campo DATE de plantilla: ISO y no futura.
pub fn fecha_plantilla(valor: &str) -> Option<String> {
    fecha(valor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_requerido() {
        assert_eq!(requerido(""), Some(MSG_REQUERIDO.to_string()));
        assert_eq!(requerido("   "), Some(MSG_REQUERIDO.to_string()));
        assert_eq!(requerido("x"), None);
    }

    #[test]
    fn test_cedula_ventana_de_digitos() {
        assert!(cedula("1023456789").is_none());
        assert!(cedula("12345678").is_none()); // 8 dígitos: límite inferior
        assert!(cedula("123456789012").is_none()); // 12 dígitos: límite superior
        assert_eq!(cedula("1234567"), Some("La cédula debe tener entre 8 y 12 dígitos".into()));
        assert_eq!(cedula("1234567890123"), Some("La cédula debe tener entre 8 y 12 dígitos".into()));
        assert_eq!(cedula("10234a6789"), Some(MSG_SOLO_NUMEROS.to_string()));
        assert_eq!(cedula(""), Some(MSG_SOLO_NUMEROS.to_string()));
    }

    #[test]
    fn test_celular() {
        assert!(celular("3101234567").is_none());
        assert!(celular("4101234567").is_some());
        assert!(celular("310123456").is_some());
        assert!(celular("31012345678").is_some());
        assert!(celular("310-123456").is_some());
    }

    #[test]
    fn test_email() {
        assert!(email("ana@renovar.com").is_none());
        assert!(email("sin-arroba").is_some());
        assert!(email("@renovar.com").is_some());
        assert!(email("ana@").is_some());
        assert!(email("ana@renovar").is_some());
        assert!(email("ana maria@renovar.com").is_some());
    }

    #[test]
    fn test_fecha_iso_admite_futuras() {
        assert!(fecha_iso("2020-01-15").is_none());
        let futura = (Utc::now().date_naive() + Duration::days(30)).format("%Y-%m-%d").to_string();
        assert!(fecha_iso(&futura).is_none());
        assert!(fecha_iso("15/01/2020").is_some());
        assert!(fecha_iso("2020-13-40").is_some());
    }

    #[test]
    fn test_fecha() {
        assert!(fecha("2020-01-15").is_none());
        assert!(fecha("15/01/2020").is_some());
        assert!(fecha("2020-13-40").is_some());
        let futura = (Utc::now().date_naive() + Duration::days(2)).format("%Y-%m-%d").to_string();
        assert_eq!(fecha(&futura), Some("La fecha no puede ser futura".into()));
    }

    #[test]
    fn test_fecha_nacimiento_mayoria_de_edad() {
        let hoy = Utc::now().date_naive();
        let adulto = (hoy - Duration::days(365 * 30)).format("%Y-%m-%d").to_string();
        assert!(fecha_nacimiento(&adulto).is_none());
        let menor = (hoy - Duration::days(365 * 10)).format("%Y-%m-%d").to_string();
        assert_eq!(fecha_nacimiento(&menor), Some("Debe ser mayor de 18 años".into()));
        let futura = (hoy + Duration::days(1)).format("%Y-%m-%d").to_string();
        assert_eq!(fecha_nacimiento(&futura), Some("La fecha no puede ser futura".into()));
    }

    #[test]
    fn test_password_clases_de_caracteres() {
        assert!(password("Abcdefg1").is_none());
        assert!(password("corta1A").is_some());
        assert!(password("todominusculas1").is_some());
        assert!(password("TODOMAYUSCULAS1").is_some());
        assert!(password("SinNumeros").is_some());
    }

    #[test]
    fn test_confirmacion_propiedad() {
        // error == None ⟺ p == c && p != ""
        let casos = [
            ("Abcdefg1", "Abcdefg1", true),
            ("Abcdefg1", "Abcdefg2", false),
            ("", "", false),
            ("Abcdefg1", "", false),
            ("", "Abcdefg1", false),
        ];
        for (p, c, valido) in casos {
            assert_eq!(confirmacion_password(p, c).is_none(), valido, "caso ({p:?}, {c:?})");
        }
        // Ambos vacíos: violación de requerido, no de coincidencia.
        assert_eq!(confirmacion_password("", ""), Some(MSG_CONFIRMAR_PASSWORD.to_string()));
        // Discordancia con ambos llenos: mensaje de no-coincidencia.
        assert_eq!(
            confirmacion_password("Abcdefg1", "Abcdefg2"),
            Some(MSG_PASSWORDS_DISTINTAS.to_string())
        );
    }

    #[test]
    fn test_nombre_y_direccion() {
        assert!(nombre("María Fernández").is_none());
        assert!(nombre("Juan123").is_some());
        assert!(nombre("").is_some());
        assert!(direccion("Calle 10 # 5-33", 5).is_none());
        assert_eq!(direccion("Cra", 5), Some("La dirección debe tener al menos 5 caracteres".into()));
    }

    #[test]
    fn test_campos_de_plantilla() {
        assert!(numero_plantilla("12345678").is_none());
        assert!(numero_plantilla("1234567").is_some());
        assert!(numero_plantilla("12a45678").is_some());
        assert!(fecha_plantilla("2021-06-30").is_none());
        assert!(fecha_plantilla("30-06-2021").is_some());
    }
}
