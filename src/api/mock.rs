//! Implementación en memoria de [`BackofficeApi`] para pruebas y para el
//! binario de demostración. Soporta latencia configurable por disparador
//! (para ejercitar la guardia de respuestas obsoletas con relojes virtuales)
//! y fallas inyectadas (generación, obligaciones, URLs de media).
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{
    BackofficeApi, ComunicacionCreada, Empleado, Obligacion, PayloadEmpleado, Plantilla,
    RespuestaPreview, TipoPlantilla,
};
use crate::errors::ApiError;
use crate::fields::CampoPlantilla;

/// Acción de compuerta jurídica registrada por el mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccionRegistrada {
    AprobarContrato(String),
    RechazarContrato(String, Option<String>),
    SolicitarRetiro(String),
    AprobarRetiro(String),
    RechazarRetiro(String, Option<String>),
}

#[derive(Default)]
pub struct MockApi {
    obligaciones: DashMap<String, Vec<Obligacion>>,
    plantillas: DashMap<TipoPlantilla, Vec<Plantilla>>,
    campos: DashMap<String, Vec<CampoPlantilla>>,
    /// Archivos de plantilla descargables, por ruta: (MIME, cuerpo).
    archivos: DashMap<String, (String, Vec<u8>)>,
    empleados: DashMap<String, Empleado>,
    previews: DashMap<String, (String, Vec<u8>)>,
    /// Latencia simulada (ms) por valor de disparador.
    latencias: DashMap<String, u64>,
    fallar_obligaciones: AtomicBool,
    fallar_generacion: AtomicBool,
    fallar_creacion: AtomicBool,
    /// Cuántas llamadas iniciales a `url_media_firmada` fallan antes de servir.
    fallos_media: AtomicU32,
    contador_ids: AtomicU64,
    /// Consultas de obligaciones que llegaron a la red (para observar el debounce).
    pub llamadas_obligaciones: AtomicU32,
    /// Filtros con los que se pidieron plantillas: (estado, tipo).
    pub filtros_plantillas: Mutex<Vec<(String, Option<TipoPlantilla>)>>,
    pub payloads_generados: Mutex<Vec<serde_json::Value>>,
    pub empleados_creados: Mutex<Vec<PayloadEmpleado>>,
    pub acciones: Mutex<Vec<AccionRegistrada>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn con_obligaciones(&self, cedula: &str, items: Vec<Obligacion>) {
        self.obligaciones.insert(cedula.to_string(), items);
    }

    pub fn con_plantillas(&self, tipo: TipoPlantilla, items: Vec<Plantilla>) {
        self.plantillas.insert(tipo, items);
    }

    pub fn con_campos(&self, plantilla_id: &str, campos: Vec<CampoPlantilla>) {
        self.campos.insert(plantilla_id.to_string(), campos);
    }

    pub fn con_archivo(&self, ruta: &str, mime: &str, cuerpo: Vec<u8>) {
        self.archivos.insert(ruta.to_string(), (mime.to_string(), cuerpo));
    }

    pub fn con_empleado(&self, empleado: Empleado) {
        self.empleados.insert(empleado.cedula.clone(), empleado);
    }

    pub fn con_preview(&self, id: &str, mime: &str, cuerpo: Vec<u8>) {
        self.previews.insert(id.to_string(), (mime.to_string(), cuerpo));
    }

    /// Latencia simulada para las consultas cuyo disparador valga `clave`.
    pub fn con_latencia(&self, clave: &str, ms: u64) {
        self.latencias.insert(clave.to_string(), ms);
    }

    pub fn fallar_obligaciones(&self, fallar: bool) {
        self.fallar_obligaciones.store(fallar, Ordering::SeqCst);
    }

    pub fn fallar_generacion(&self, fallar: bool) {
        self.fallar_generacion.store(fallar, Ordering::SeqCst);
    }

    pub fn fallar_creacion(&self, fallar: bool) {
        self.fallar_creacion.store(fallar, Ordering::SeqCst);
    }

    pub fn fallos_media(&self, cuantos: u32) {
        self.fallos_media.store(cuantos, Ordering::SeqCst);
    }

    async fn demorar(&self, clave: &str) {
        if let Some(ms) = self.latencias.get(clave).map(|e| *e.value()) {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn registrar(&self, accion: AccionRegistrada) {
        if let Ok(mut acciones) = self.acciones.lock() {
            acciones.push(accion);
        }
    }
}

#[async_trait]
impl BackofficeApi for MockApi {
    async fn obligaciones_por_cedula(&self, cedula: &str) -> Result<Vec<Obligacion>, ApiError> {
        self.llamadas_obligaciones.fetch_add(1, Ordering::SeqCst);
        self.demorar(cedula).await;
        if self.fallar_obligaciones.load(Ordering::SeqCst) {
            return Err(ApiError::Conexion("fallo simulado de obligaciones".into()));
        }
        Ok(self.obligaciones.get(cedula).map(|e| e.value().clone()).unwrap_or_default())
    }

    async fn listar_plantillas(
        &self,
        estado: &str,
        tipo: Option<TipoPlantilla>,
    ) -> Result<Vec<Plantilla>, ApiError> {
        if let Ok(mut filtros) = self.filtros_plantillas.lock() {
            filtros.push((estado.to_string(), tipo));
        }
        let tipos = match tipo {
            Some(t) => vec![t],
            None => vec![TipoPlantilla::Form, TipoPlantilla::Legal, TipoPlantilla::Automatic],
        };
        Ok(tipos
            .into_iter()
            .flat_map(|t| self.plantillas.get(&t).map(|e| e.value().clone()).unwrap_or_default())
            .collect())
    }

    async fn plantilla(&self, id: &str) -> Result<Plantilla, ApiError> {
        for entrada in self.plantillas.iter() {
            if let Some(p) = entrada.value().iter().find(|p| p.id == id) {
                return Ok(p.clone());
            }
        }
        Err(ApiError::Http { status: 404, mensaje: format!("plantilla {id} no encontrada") })
    }

    async fn archivo_plantilla(&self, ruta: &str) -> Result<RespuestaPreview, ApiError> {
        self.demorar(ruta).await;
        match self.archivos.get(ruta) {
            Some(entrada) => {
                let (mime, cuerpo) = entrada.value().clone();
                Ok(RespuestaPreview { mime, cuerpo })
            }
            None => Err(ApiError::Http { status: 404, mensaje: format!("archivo {ruta} no encontrado") }),
        }
    }

    async fn campos_plantilla(
        &self,
        plantilla_id: &str,
    ) -> Result<Vec<CampoPlantilla>, ApiError> {
        self.demorar(plantilla_id).await;
        Ok(self.campos.get(plantilla_id).map(|e| e.value().clone()).unwrap_or_default())
    }

    async fn generar_comunicacion(
        &self,
        payload: serde_json::Value,
    ) -> Result<ComunicacionCreada, ApiError> {
        if self.fallar_generacion.load(Ordering::SeqCst) {
            return Err(ApiError::Http { status: 500, mensaje: "generación fallida".into() });
        }
        if let Ok(mut payloads) = self.payloads_generados.lock() {
            payloads.push(payload);
        }
        let n = self.contador_ids.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ComunicacionCreada { id: format!("com-{n}") })
    }

    async fn preview_comunicacion(&self, id: &str) -> Result<RespuestaPreview, ApiError> {
        match self.previews.get(id) {
            Some(entrada) => {
                let (mime, cuerpo) = entrada.value().clone();
                Ok(RespuestaPreview { mime, cuerpo })
            }
            None => Ok(RespuestaPreview {
                mime: "application/pdf".into(),
                cuerpo: b"%PDF-1.4".to_vec(),
            }),
        }
    }

    async fn empleado_por_cedula(&self, cedula: &str) -> Result<Option<Empleado>, ApiError> {
        self.demorar(cedula).await;
        Ok(self.empleados.get(cedula).map(|e| e.value().clone()))
    }

    async fn crear_empleado(&self, payload: &PayloadEmpleado) -> Result<Empleado, ApiError> {
        if self.fallar_creacion.load(Ordering::SeqCst) {
            return Err(ApiError::Validacion(vec![crate::errors::DetalleCampo {
                loc: vec!["body".into(), "correo".into()],
                msg: "correo ya registrado".into(),
            }]));
        }
        let cedula = payload.get("cedula").cloned().unwrap_or_default();
        let nombre = payload.get("nombre_completo").cloned().unwrap_or_default();
        let estado = payload.get("estado").cloned().unwrap_or_default();
        let empleado = Empleado { cedula: cedula.clone(), nombre_completo: nombre, estado };
        if let Ok(mut creados) = self.empleados_creados.lock() {
            creados.push(payload.clone());
        }
        self.empleados.insert(cedula, empleado.clone());
        Ok(empleado)
    }

    async fn aprobar_contrato(&self, cedula: &str) -> Result<(), ApiError> {
        self.registrar(AccionRegistrada::AprobarContrato(cedula.to_string()));
        Ok(())
    }

    async fn rechazar_contrato(&self, cedula: &str, motivo: Option<&str>) -> Result<(), ApiError> {
        self.registrar(AccionRegistrada::RechazarContrato(
            cedula.to_string(),
            motivo.map(String::from),
        ));
        Ok(())
    }

    async fn solicitar_retiro(&self, cedula: &str) -> Result<(), ApiError> {
        self.registrar(AccionRegistrada::SolicitarRetiro(cedula.to_string()));
        Ok(())
    }

    async fn aprobar_retiro(&self, cedula: &str) -> Result<(), ApiError> {
        self.registrar(AccionRegistrada::AprobarRetiro(cedula.to_string()));
        Ok(())
    }

    async fn rechazar_retiro(&self, cedula: &str, motivo: Option<&str>) -> Result<(), ApiError> {
        self.registrar(AccionRegistrada::RechazarRetiro(
            cedula.to_string(),
            motivo.map(String::from),
        ));
        Ok(())
    }

    async fn url_media_firmada(&self, archivo: &str) -> Result<String, ApiError> {
        let restantes = self.fallos_media.load(Ordering::SeqCst);
        if restantes > 0 {
            self.fallos_media.store(restantes - 1, Ordering::SeqCst);
            return Err(ApiError::Http { status: 503, mensaje: "media no disponible".into() });
        }
        Ok(format!("https://media.example.com/firmada/{archivo}?token={}", uuid::Uuid::new_v4()))
    }
}
