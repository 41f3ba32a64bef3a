//! Clasificación del preview de una comunicación o de un archivo de
//! plantilla, según el tipo MIME reportado por el colaborador.
use crate::api::RespuestaPreview;

/// MIME de documentos Word generados por el back-office; se renderizan
/// convirtiéndolos a HTML del lado del cliente.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Cómo debe tratarse el cuerpo del preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipoPreview {
    Pdf,
    Imagen,
    /// Word: se convierte a HTML para la vista en línea.
    Docx,
    Texto,
    Json,
    /// MIME sin vista previa; se informa el formato recibido.
    NoSoportado(String),
}

/// Preview listo para la capa de presentación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub tipo: TipoPreview,
    pub cuerpo: Vec<u8>,
}

pub fn clasificar_preview(respuesta: RespuestaPreview) -> Preview {
    let mime = respuesta.mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    let tipo = if mime == "application/pdf" {
        TipoPreview::Pdf
    } else if mime.starts_with("image/") {
        TipoPreview::Imagen
    } else if mime == MIME_DOCX {
        TipoPreview::Docx
    } else if mime == "application/json" {
        TipoPreview::Json
    } else if mime.starts_with("text/") {
        TipoPreview::Texto
    } else {
        TipoPreview::NoSoportado(mime)
    };
    Preview { tipo, cuerpo: respuesta.cuerpo }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respuesta(mime: &str) -> RespuestaPreview {
        RespuestaPreview { mime: mime.into(), cuerpo: vec![1, 2, 3] }
    }

    #[test]
    fn test_clasificacion_por_mime() {
        assert_eq!(clasificar_preview(respuesta("application/pdf")).tipo, TipoPreview::Pdf);
        assert_eq!(clasificar_preview(respuesta("image/png")).tipo, TipoPreview::Imagen);
        assert_eq!(clasificar_preview(respuesta("application/json")).tipo, TipoPreview::Json);
        assert_eq!(clasificar_preview(respuesta("text/plain; charset=utf-8")).tipo, TipoPreview::Texto);
        assert_eq!(
            clasificar_preview(respuesta("application/zip")).tipo,
            TipoPreview::NoSoportado("application/zip".into())
        );
    }

    #[test]
    fn test_docx_no_cae_en_no_soportado() {
        // El documento Word es el caso principal de los generados.
        let preview = clasificar_preview(respuesta(MIME_DOCX));
        assert_eq!(preview.tipo, TipoPreview::Docx);
        let con_parametros = clasificar_preview(respuesta(&format!("{MIME_DOCX}; charset=utf-8")));
        assert_eq!(con_parametros.tipo, TipoPreview::Docx);
    }
}
