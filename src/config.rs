//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).
//! Aquí viven los parámetros de los cargadores dependientes (periodo de
//! silencio del debounce) y los límites del reintento con backoff para URLs
//! firmadas de media.
use once_cell::sync::Lazy;
use std::env;

/// Configuración global de la aplicación (extensible para más secciones).
pub struct AppConfig {
    /// Configuración del colaborador remoto.
    pub api: ApiConfig,
    /// Parámetros de los cargadores de datos dependientes.
    pub carga: CargaConfig,
}

/// Parámetros del colaborador HTTP (solo informativos para el binario demo;
/// el núcleo habla con un trait, no con la red).
pub struct ApiConfig {
    pub base_url: String,
}

/// Parámetros de carga dependiente y reintentos.
pub struct CargaConfig {
    /// Periodo de silencio del debounce (ms) para disparadores tecleados.
    pub debounce_ms: u64,
    /// Reintentos máximos al pedir URLs firmadas de media.
    pub reintentos_media: u32,
    /// Espera inicial del backoff exponencial (ms).
    pub backoff_inicial_ms: u64,
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let _ = dotenvy::dotenv();
    let base_url = env::var("RENOFLOW_API_BASE_URL")
        .unwrap_or_else(|_| "https://backend.example.com/api/v1".to_string());
    let debounce_ms = env::var("RENOFLOW_DEBOUNCE_MS").ok()
        .and_then(|v| v.parse().ok()).unwrap_or(400);
    let reintentos_media = env::var("RENOFLOW_REINTENTOS_MEDIA").ok()
        .and_then(|v| v.parse().ok()).unwrap_or(3);
    let backoff_inicial_ms = env::var("RENOFLOW_BACKOFF_INICIAL_MS").ok()
        .and_then(|v| v.parse().ok()).unwrap_or(500);
    AppConfig {
        api: ApiConfig { base_url },
        carga: CargaConfig { debounce_ms, reintentos_media, backoff_inicial_ms },
    }
});
