//! Reintento con backoff exponencial acotado para operaciones idempotentes
//! del colaborador (hoy, únicamente las URLs firmadas de media).
use std::future::Future;
use std::time::Duration;

use crate::errors::ApiError;

/// Ejecuta `operacion` hasta `max_intentos` veces, duplicando la espera tras
/// cada falla a partir de `inicial_ms`. Devuelve el primer éxito o el último
/// error. Solo apto para operaciones idempotentes de lectura.
pub async fn con_backoff<T, F, Fut>(
    max_intentos: u32,
    inicial_ms: u64,
    mut operacion: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let intentos = max_intentos.max(1);
    let mut espera_ms = inicial_ms;
    let mut ultimo = None;
    for intento in 0..intentos {
        match operacion().await {
            Ok(valor) => return Ok(valor),
            Err(err) => {
                eprintln!("[retry] intento {}/{} falló: {err}", intento + 1, intentos);
                ultimo = Some(err);
            }
        }
        if intento + 1 < intentos {
            tokio::time::sleep(Duration::from_millis(espera_ms)).await;
            espera_ms = espera_ms.saturating_mul(2);
        }
    }
    Err(ultimo.unwrap_or_else(|| ApiError::Respuesta("reintento sin intentos".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_exito_tras_fallas() {
        let llamadas = AtomicU32::new(0);
        let resultado = con_backoff(3, 100, || {
            let n = llamadas.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ApiError::Conexion("caída".into()))
                } else {
                    Ok("url")
                }
            }
        })
        .await;
        assert_eq!(resultado.unwrap(), "url");
        assert_eq!(llamadas.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_agotados_devuelve_ultimo_error() {
        let llamadas = AtomicU32::new(0);
        let resultado: Result<&str, _> = con_backoff(2, 50, || {
            llamadas.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::Http { status: 503, mensaje: "media no disponible".into() }) }
        })
        .await;
        assert!(resultado.is_err());
        assert_eq!(llamadas.load(Ordering::SeqCst), 2);
    }
}
