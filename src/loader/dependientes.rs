//! Cargadores de datos dependientes: listas del servidor (obligaciones,
//! plantillas, campos de plantilla) cuyo contenido depende de selecciones de
//! pasos anteriores.
//!
//! Todos comparten la misma disciplina de concurrencia:
//! - solo la petición MÁS RECIENTE por clave de disparador puede escribir su
//!   resultado; las superadas se descartan al llegar (guardia de obsoletos);
//! - una respuesta de una corrida anterior del wizard (token de corrida
//!   distinto) jamás escribe;
//! - las fallas de red limpian la lista dependiente sin error bloqueante: el
//!   usuario reintenta cambiando de nuevo el disparador.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use uuid::Uuid;

use crate::api::{BackofficeApi, Obligacion, Plantilla, TipoPlantilla};
use crate::config::CONFIG;
use crate::fields::{resolver_claves, CampoResuelto};
use crate::loader::debounce::Debouncer;

fn bloquear<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Guardia de respuestas obsoletas: token de corrida + secuencia por clave de
/// disparador. Una respuesta escribe solo si su billete sigue vigente.
pub struct GuardiaCarga {
    run: Mutex<Uuid>,
    ultimos: DashMap<String, u64>,
    contador: AtomicU64,
}

/// Permiso de escritura emitido al iniciar una petición.
#[derive(Debug, Clone)]
pub struct Billete {
    run: Uuid,
    clave: String,
    seq: u64,
}

impl Default for GuardiaCarga {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardiaCarga {
    pub fn new() -> Self {
        Self { run: Mutex::new(Uuid::new_v4()), ultimos: DashMap::new(), contador: AtomicU64::new(0) }
    }

    pub fn run_actual(&self) -> Uuid {
        *bloquear(&self.run)
    }

    /// Emite un billete para `clave`, superando cualquier petición en vuelo
    /// con la misma clave.
    pub fn emitir(&self, clave: &str) -> Billete {
        let seq = self.contador.fetch_add(1, Ordering::SeqCst) + 1;
        self.ultimos.insert(clave.to_string(), seq);
        Billete { run: self.run_actual(), clave: clave.to_string(), seq }
    }

    /// Un billete sigue vigente si pertenece a la corrida viva y ninguna
    /// petición posterior reclamó su clave.
    pub fn sigue_vigente(&self, billete: &Billete) -> bool {
        if billete.run != self.run_actual() {
            return false;
        }
        self.ultimos.get(&billete.clave).map(|e| *e.value()) == Some(billete.seq)
    }

    /// Reinicia la corrida: nuevo token, secuencias olvidadas. Todo billete
    /// emitido antes queda muerto.
    pub fn reiniciar(&self) -> Uuid {
        let nuevo = Uuid::new_v4();
        *bloquear(&self.run) = nuevo;
        self.ultimos.clear();
        nuevo
    }
}

/// Lista dependiente de obligaciones con su selección.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListaObligaciones {
    pub items: Vec<Obligacion>,
    pub seleccion: Option<String>,
    /// Con resultado único la selección queda fija (una obligación no deja
    /// ambigüedad que resolver) y deseleccionar es un no-op.
    pub bloqueada: bool,
}

fn es_cedula_consultable(valor: &str) -> bool {
    let largo = valor.len();
    (8..=12).contains(&largo) && valor.chars().all(|c| c.is_ascii_digit())
}

/// Cargador de obligaciones por cédula: con debounce sobre el valor tecleado.
pub struct CargadorObligaciones {
    api: Arc<dyn BackofficeApi>,
    guardia: Arc<GuardiaCarga>,
    debounce: Debouncer,
    estado: Mutex<ListaObligaciones>,
}

const CLAVE_OBLIGACIONES: &str = "obligaciones";

impl CargadorObligaciones {
    pub fn new(api: Arc<dyn BackofficeApi>, guardia: Arc<GuardiaCarga>) -> Self {
        let quieto = std::time::Duration::from_millis(CONFIG.carga.debounce_ms);
        Self { api, guardia, debounce: Debouncer::new(quieto), estado: Mutex::new(ListaObligaciones::default()) }
    }

    pub fn estado(&self) -> ListaObligaciones {
        bloquear(&self.estado).clone()
    }

    /// Reacciona a un cambio de la cédula disparadora. Un valor que aún no es
    /// cédula consultable limpia la lista de inmediato, sin ir a la red.
    pub async fn al_cambiar(&self, cedula: &str) {
        if !es_cedula_consultable(cedula) {
            // La limpieza supersede ecos pendientes del debounce y peticiones
            // en vuelo: un valor viejo no puede repoblar la lista.
            self.debounce.superar();
            self.guardia.emitir(CLAVE_OBLIGACIONES);
            *bloquear(&self.estado) = ListaObligaciones::default();
            return;
        }
        let billete = self.guardia.emitir(CLAVE_OBLIGACIONES);
        if !self.debounce.espera().await {
            return;
        }
        let resultado = self.api.obligaciones_por_cedula(cedula).await;
        if !self.guardia.sigue_vigente(&billete) {
            return;
        }
        let mut estado = bloquear(&self.estado);
        match resultado {
            Ok(items) => {
                let unica = items.len() == 1;
                let seleccion = unica.then(|| items[0].obligacion.clone());
                *estado = ListaObligaciones { items, seleccion, bloqueada: unica };
            }
            Err(err) => {
                eprintln!("[obligaciones] consulta fallida para {cedula}: {err}");
                *estado = ListaObligaciones::default();
            }
        }
    }

    /// Selecciona una obligación de la lista vigente.
    pub fn seleccionar(&self, obligacion: &str) {
        let mut estado = bloquear(&self.estado);
        if estado.items.iter().any(|o| o.obligacion == obligacion) {
            estado.seleccion = Some(obligacion.to_string());
        }
    }

    /// Quita la selección. No-op cuando la lista es de resultado único.
    pub fn deseleccionar(&self) {
        let mut estado = bloquear(&self.estado);
        if !estado.bloqueada {
            estado.seleccion = None;
        }
    }
}

/// Ruta de aprobación elegida en un paso previo del wizard de comunicaciones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RutaAprobacion {
    /// Sin aprobación: una sola categoría de plantillas.
    SinAprobacion,
    /// Con aprobación: dos categorías consultadas por separado y concatenadas
    /// (se asumen disjuntas por construcción; no se deduplica).
    ConAprobacion,
}

/// Cargador de plantillas, ramificado por la ruta de aprobación.
pub struct CargadorPlantillas {
    api: Arc<dyn BackofficeApi>,
    guardia: Arc<GuardiaCarga>,
    estado: Mutex<Vec<Plantilla>>,
}

const CLAVE_PLANTILLAS: &str = "plantillas";

/// Solo se ofrecen plantillas ya aprobadas.
const FILTRO_APROBADAS: &str = "APPROVED";

impl CargadorPlantillas {
    pub fn new(api: Arc<dyn BackofficeApi>, guardia: Arc<GuardiaCarga>) -> Self {
        Self { api, guardia, estado: Mutex::new(Vec::new()) }
    }

    pub fn estado(&self) -> Vec<Plantilla> {
        bloquear(&self.estado).clone()
    }

    pub async fn cargar(&self, ruta: RutaAprobacion) {
        let billete = self.guardia.emitir(CLAVE_PLANTILLAS);
        let resultado = match ruta {
            RutaAprobacion::SinAprobacion => {
                self.api.listar_plantillas(FILTRO_APROBADAS, Some(TipoPlantilla::Automatic)).await
            }
            RutaAprobacion::ConAprobacion => {
                match self.api.listar_plantillas(FILTRO_APROBADAS, Some(TipoPlantilla::Form)).await {
                    Ok(mut formales) => {
                        match self.api.listar_plantillas(FILTRO_APROBADAS, Some(TipoPlantilla::Legal)).await {
                            Ok(legales) => {
                                formales.extend(legales);
                                Ok(formales)
                            }
                            Err(err) => Err(err),
                        }
                    }
                    Err(err) => Err(err),
                }
            }
        };
        if !self.guardia.sigue_vigente(&billete) {
            return;
        }
        match resultado {
            Ok(items) => *bloquear(&self.estado) = items,
            Err(err) => {
                eprintln!("[plantillas] consulta fallida: {err}");
                bloquear(&self.estado).clear();
            }
        }
    }
}

/// Cargador de campos dinámicos de la plantilla seleccionada.
pub struct CargadorCampos {
    api: Arc<dyn BackofficeApi>,
    guardia: Arc<GuardiaCarga>,
    estado: Mutex<Vec<CampoResuelto>>,
}

const CLAVE_CAMPOS: &str = "campos_plantilla";

impl CargadorCampos {
    pub fn new(api: Arc<dyn BackofficeApi>, guardia: Arc<GuardiaCarga>) -> Self {
        Self { api, guardia, estado: Mutex::new(Vec::new()) }
    }

    pub fn estado(&self) -> Vec<CampoResuelto> {
        bloquear(&self.estado).clone()
    }

    /// Dispara la carga solo para plantillas con campos editables (FORM y
    /// LEGAL); para el resto limpia síncronamente, sin esperar ningún viaje
    /// de red que pudiera llegar tarde.
    pub async fn al_seleccionar(&self, plantilla: &Plantilla) {
        match plantilla.tipo {
            TipoPlantilla::Form | TipoPlantilla::Legal => {}
            _ => {
                self.guardia.emitir(CLAVE_CAMPOS);
                bloquear(&self.estado).clear();
                return;
            }
        }
        let billete = self.guardia.emitir(CLAVE_CAMPOS);
        let resultado = self.api.campos_plantilla(&plantilla.id).await;
        if !self.guardia.sigue_vigente(&billete) {
            return;
        }
        match resultado {
            Ok(campos) => *bloquear(&self.estado) = resolver_claves(&campos),
            Err(err) => {
                eprintln!("[campos] consulta fallida para {}: {err}", plantilla.id);
                bloquear(&self.estado).clear();
            }
        }
    }

    pub fn limpiar(&self) {
        self.guardia.emitir(CLAVE_CAMPOS);
        bloquear(&self.estado).clear();
    }

    /// Claves editables vigentes, útil para la poda de huérfanas.
    pub fn claves(&self) -> Vec<String> {
        bloquear(&self.estado).iter().map(|c| c.clave.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;

    fn obligacion(numero: &str) -> Obligacion {
        Obligacion { obligacion: numero.into(), sistema_origen: "SISCO".into() }
    }

    fn armar() -> (Arc<MockApi>, Arc<GuardiaCarga>) {
        (Arc::new(MockApi::new()), Arc::new(GuardiaCarga::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_disparador_invalido_limpia_sin_red() {
        let (api, guardia) = armar();
        api.con_obligaciones("1023456789", vec![obligacion("OB-1")]);
        let cargador = CargadorObligaciones::new(api, guardia);
        // 3 dígitos: por debajo del mínimo, no dispara consulta.
        cargador.al_cambiar("123").await;
        assert!(cargador.estado().items.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resultado_unico_se_autoselecciona_y_bloquea() {
        let (api, guardia) = armar();
        api.con_obligaciones("1023456789", vec![obligacion("OB-77")]);
        let cargador = CargadorObligaciones::new(api, guardia);
        cargador.al_cambiar("1023456789").await;
        let estado = cargador.estado();
        assert_eq!(estado.seleccion.as_deref(), Some("OB-77"));
        assert!(estado.bloqueada);
        // Deseleccionar es un no-op con resultado único.
        cargador.deseleccionar();
        assert_eq!(cargador.estado().seleccion.as_deref(), Some("OB-77"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_varios_resultados_permiten_deseleccion() {
        let (api, guardia) = armar();
        api.con_obligaciones("1023456789", vec![obligacion("OB-1"), obligacion("OB-2")]);
        let cargador = CargadorObligaciones::new(api, guardia);
        cargador.al_cambiar("1023456789").await;
        assert!(cargador.estado().seleccion.is_none());
        cargador.seleccionar("OB-2");
        assert_eq!(cargador.estado().seleccion.as_deref(), Some("OB-2"));
        cargador.deseleccionar();
        assert!(cargador.estado().seleccion.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_falla_limpia_sin_error_bloqueante() {
        let (api, guardia) = armar();
        api.con_obligaciones("1023456789", vec![obligacion("OB-1")]);
        api.fallar_obligaciones(true);
        let cargador = CargadorObligaciones::new(api.clone(), guardia);
        cargador.al_cambiar("1023456789").await;
        assert!(cargador.estado().items.is_empty());
        // El usuario reintenta cambiando el disparador otra vez.
        api.fallar_obligaciones(false);
        cargador.al_cambiar("1023456789").await;
        assert_eq!(cargador.estado().items.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ruta_con_aprobacion_concatena_dos_categorias() {
        let (api, guardia) = armar();
        api.con_plantillas(
            TipoPlantilla::Form,
            vec![Plantilla { id: "f1".into(), nombre: "Carta".into(), tipo: TipoPlantilla::Form, archivo: None }],
        );
        api.con_plantillas(
            TipoPlantilla::Legal,
            vec![Plantilla { id: "l1".into(), nombre: "Poder".into(), tipo: TipoPlantilla::Legal, archivo: None }],
        );
        let cargador = CargadorPlantillas::new(api.clone(), guardia);
        cargador.cargar(RutaAprobacion::ConAprobacion).await;
        let ids: Vec<String> = cargador.estado().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec!["f1", "l1"]);
        // Ambas consultas piden únicamente plantillas aprobadas, por tipo.
        let filtros = api.filtros_plantillas.lock().unwrap().clone();
        assert_eq!(
            filtros,
            vec![
                ("APPROVED".to_string(), Some(TipoPlantilla::Form)),
                ("APPROVED".to_string(), Some(TipoPlantilla::Legal)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_plantilla_automatica_limpia_campos_sincronamente() {
        let (api, guardia) = armar();
        let cargador = CargadorCampos::new(api, guardia);
        // Simula campos previos de una plantilla FORM anterior.
        let automatica = Plantilla {
            id: "a1".into(),
            nombre: "Recordatorio".into(),
            tipo: TipoPlantilla::Automatic,
            archivo: None,
        };
        cargador.al_seleccionar(&automatica).await;
        assert!(cargador.estado().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reinicio_de_corrida_mata_billetes_previos() {
        let guardia = GuardiaCarga::new();
        let billete = guardia.emitir("obligaciones");
        assert!(guardia.sigue_vigente(&billete));
        guardia.reiniciar();
        assert!(!guardia.sigue_vigente(&billete));
    }
}
