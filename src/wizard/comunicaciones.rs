//! Wizard de generación de comunicaciones (4 pasos):
//! 1. identificación del deudor: cédula, obligación, rol y canal;
//! 2. ruta de aprobación y selección de plantilla;
//! 3. campos dinámicos de la plantilla seleccionada;
//! 4. revisión y generación con preview.
//!
//! El estado acumulado sobrevive la navegación adelante/atrás; las claves que
//! dejan de estar declaradas (p. ej. campos de una plantilla anterior) se
//! podan en cada transición.
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::api::{BackofficeApi, ComunicacionCreada, Plantilla};
use crate::config::CONFIG;
use crate::errors::FlowError;
use crate::fields::{CampoResuelto, TipoCampo};
use crate::form::engine::validar_paso;
use crate::form::schema::{CampoSpec, PasoSchema, Requerido, Validador};
use crate::form::value::{ErrorMap, FormState, TouchedSet};
use crate::loader::{
    CargadorCampos, CargadorObligaciones, CargadorPlantillas, GuardiaCarga, ListaObligaciones,
    RutaAprobacion,
};
use crate::wizard::assembler::{
    ensamblar_comunicacion, es_campo_nombre, MetadatoCampo, ParteNombre, PartesNombre,
};
use crate::wizard::controller::MaquinaPasos;
use crate::wizard::preview::{clasificar_preview, Preview};

const TOTAL_PASOS: usize = 4;

/// Resultado de completar el wizard.
#[derive(Debug, Clone)]
pub struct ComunicacionGenerada {
    pub creada: ComunicacionCreada,
    pub preview: Preview,
    /// Metadatos por clave resuelta, para auditoría y despliegue posterior.
    pub metadatos: IndexMap<String, MetadatoCampo>,
}

pub struct ComunicacionesWizard {
    api: Arc<dyn BackofficeApi>,
    maquina: MaquinaPasos,
    form: FormState,
    errores: ErrorMap,
    tocados: TouchedSet,
    guardia: Arc<GuardiaCarga>,
    obligaciones: CargadorObligaciones,
    plantillas: CargadorPlantillas,
    campos: CargadorCampos,
    /// Partes de nombre por clave resuelta, para campos "tipo nombre".
    partes: IndexMap<String, PartesNombre>,
}

fn schema_paso1() -> PasoSchema {
    PasoSchema::nuevo(
        1,
        "Identificación del deudor",
        vec![
            CampoSpec::nuevo("cedula", "Cédula").con_validador(Validador::Cedula),
            CampoSpec::nuevo("obligacion", "Obligación"),
            CampoSpec::nuevo("tipo_deudor", "Tipo de deudor"),
            CampoSpec::nuevo("canal_comunicacion", "Canal de comunicación"),
        ],
    )
}

fn schema_paso2() -> PasoSchema {
    PasoSchema::nuevo(
        2,
        "Plantilla",
        vec![
            CampoSpec::nuevo("ruta_aprobacion", "Ruta de aprobación"),
            CampoSpec::nuevo("plantilla_id", "Plantilla"),
        ],
    )
}

fn validador_por_tipo(tipo: TipoCampo) -> Validador {
    match tipo {
        TipoCampo::Number => Validador::NumeroPlantilla,
        TipoCampo::Date => Validador::FechaPlantilla,
        _ => Validador::Ninguno,
    }
}

/// Schema del paso 3, reconstruido desde los campos resueltos vigentes.
fn schema_paso3(campos: &[CampoResuelto]) -> PasoSchema {
    let specs = campos
        .iter()
        .map(|c| {
            let requerido = if c.campo.is_required { Requerido::Siempre } else { Requerido::Nunca };
            CampoSpec {
                clave: c.clave.clone(),
                etiqueta: c.etiqueta().to_string(),
                requerido,
                validador: validador_por_tipo(c.campo.field_type),
            }
        })
        .collect();
    PasoSchema::nuevo(3, "Campos de la plantilla", specs)
}

fn schema_paso4() -> PasoSchema {
    PasoSchema::nuevo(4, "Revisión y generación", vec![])
}

impl ComunicacionesWizard {
    pub fn new(api: Arc<dyn BackofficeApi>) -> Self {
        let guardia = Arc::new(GuardiaCarga::new());
        Self {
            obligaciones: CargadorObligaciones::new(Arc::clone(&api), Arc::clone(&guardia)),
            plantillas: CargadorPlantillas::new(Arc::clone(&api), Arc::clone(&guardia)),
            campos: CargadorCampos::new(Arc::clone(&api), Arc::clone(&guardia)),
            api,
            maquina: MaquinaPasos::new(TOTAL_PASOS),
            form: FormState::new(),
            errores: ErrorMap::new(),
            tocados: TouchedSet::new(),
            guardia,
            partes: IndexMap::new(),
        }
    }

    pub fn paso_actual(&self) -> usize {
        self.maquina.paso_actual()
    }

    pub fn run_id(&self) -> uuid::Uuid {
        self.maquina.run().run_id
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn errores(&self) -> &ErrorMap {
        &self.errores
    }

    /// Errores visibles: solo los de campos ya tocados (regla de cortesía de
    /// presentación; la validación corre igual sobre todos).
    pub fn errores_visibles(&self) -> ErrorMap {
        self.errores
            .iter()
            .filter(|(clave, _)| self.tocados.contains(*clave))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn obligaciones(&self) -> ListaObligaciones {
        self.obligaciones.estado()
    }

    pub fn plantillas_disponibles(&self) -> Vec<Plantilla> {
        self.plantillas.estado()
    }

    pub fn campos_plantilla(&self) -> Vec<CampoResuelto> {
        self.campos.estado()
    }

    fn schema_actual(&self) -> PasoSchema {
        match self.maquina.paso_actual() {
            1 => schema_paso1(),
            2 => schema_paso2(),
            3 => schema_paso3(&self.campos.estado()),
            _ => schema_paso4(),
        }
    }

    /// Re-valida un solo campo contra el schema vigente y actualiza su
    /// entrada en el mapa de errores (la quita si la última corrida pasó).
    fn revalidar_campo(&mut self, clave: &str) {
        let schema = self.schema_actual();
        if !schema.campos.iter().any(|c| c.clave == clave) {
            return;
        }
        let corrida = validar_paso(&schema, &self.form);
        match corrida.get(clave) {
            Some(msg) => {
                self.errores.insert(clave.to_string(), msg.clone());
            }
            None => {
                self.errores.shift_remove(clave);
            }
        }
    }

    /// Cambia un campo y dispara las cargas dependientes que correspondan.
    pub async fn cambiar_campo(&mut self, clave: &str, valor: &str) {
        self.form.set(clave, valor);
        self.tocados.insert(clave.to_string());
        self.revalidar_campo(clave);
        match clave {
            "cedula" => {
                self.obligaciones.al_cambiar(valor).await;
                self.sincronizar_obligacion();
            }
            "ruta_aprobacion" => {
                // Cambiar de ruta invalida la plantilla elegida y sus campos.
                self.form.quitar("plantilla_id");
                self.campos.limpiar();
                self.podar_huerfanas();
                if let Some(ruta) = ruta_desde_codigo(valor) {
                    self.plantillas.cargar(ruta).await;
                }
            }
            "plantilla_id" => {
                let plantilla = self.plantillas.estado().into_iter().find(|p| p.id == valor);
                match plantilla {
                    Some(p) => self.campos.al_seleccionar(&p).await,
                    None => self.campos.limpiar(),
                }
                self.partes.clear();
                self.podar_huerfanas();
            }
            _ => {}
        }
    }

    /// Copia la selección del cargador al formulario (incluida la
    /// autoselección de resultado único).
    fn sincronizar_obligacion(&mut self) {
        match self.obligaciones.estado().seleccion {
            Some(numero) => self.form.set("obligacion", numero),
            None => {
                self.form.quitar("obligacion");
            }
        }
    }

    pub fn seleccionar_obligacion(&mut self, numero: &str) {
        self.obligaciones.seleccionar(numero);
        self.sincronizar_obligacion();
    }

    /// No-op cuando la lista quedó bloqueada por resultado único.
    pub fn deseleccionar_obligacion(&mut self) {
        self.obligaciones.deseleccionar();
        self.sincronizar_obligacion();
    }

    /// Edita una parte de un campo de nombre; el valor unido se regenera en
    /// cada edición, nunca queda rezagado.
    pub fn editar_parte_nombre(&mut self, clave: &str, parte: ParteNombre, valor: &str) {
        let partes = self.partes.entry(clave.to_string()).or_default();
        partes.asignar(parte, valor);
        let unido = partes.unir();
        self.form.set(clave, unido);
        self.tocados.insert(clave.to_string());
        self.revalidar_campo(clave);
    }

    /// Claves de nombre del paso 3 que se editan por partes.
    pub fn claves_de_nombre(&self) -> Vec<String> {
        self.campos
            .estado()
            .iter()
            .filter(|c| es_campo_nombre(c))
            .map(|c| c.clave.clone())
            .collect()
    }

    fn claves_declaradas(&self) -> IndexSet<String> {
        let mut claves: IndexSet<String> = IndexSet::new();
        for schema in [schema_paso1(), schema_paso2()] {
            claves.extend(schema.claves().map(String::from));
        }
        claves.extend(self.campos.claves());
        claves
    }

    fn podar_huerfanas(&mut self) {
        let declaradas = self.claves_declaradas();
        self.form.retener_claves(&declaradas);
        self.errores.retain(|clave, _| declaradas.contains(clave));
    }

    /// Valida el paso vigente, marcando TODOS sus campos como tocados para
    /// que los errores se rendericen de inmediato.
    pub fn validar_actual(&mut self) -> ErrorMap {
        let schema = self.schema_actual();
        for clave in schema.claves() {
            self.tocados.insert(clave.to_string());
        }
        let corrida = validar_paso(&schema, &self.form);
        // Refresca solo las entradas de este paso.
        for clave in schema.claves() {
            self.errores.shift_remove(clave);
        }
        for (clave, msg) in &corrida {
            self.errores.insert(clave.clone(), msg.clone());
        }
        corrida
    }

    /// Avanza si el paso vigente valida. Nunca mueve el índice con errores.
    pub async fn avanzar(&mut self) -> Result<usize, FlowError> {
        let corrida = self.validar_actual();
        if !corrida.is_empty() {
            return Err(FlowError::Validacion(corrida));
        }
        let paso = self.maquina.avanzar()?;
        self.podar_huerfanas();
        Ok(paso)
    }

    /// Retrocede sin tocar el estado acumulado.
    pub fn retroceder(&mut self) -> usize {
        self.maquina.retroceder()
    }

    pub fn ir_a(&mut self, paso: usize) -> Result<usize, FlowError> {
        let terminal_poblado = self.maquina.run().paso_maximo == TOTAL_PASOS;
        self.maquina.ir_a(paso, terminal_poblado)
    }

    /// Archivo de la plantilla seleccionada en ese momento, si declara uno.
    /// Consulta el registro fresco: el archivo puede haber cambiado desde que
    /// se listó la plantilla.
    async fn archivo_seleccionado(&self) -> Result<Option<String>, FlowError> {
        let plantilla_id = self.form.texto("plantilla_id");
        if plantilla_id.is_empty() {
            return Ok(None);
        }
        Ok(self.api.plantilla(plantilla_id).await?.archivo)
    }

    /// Vista previa del archivo de la plantilla seleccionada, clasificada por
    /// MIME (la comunicación generada tiene su propio preview en `completar`).
    pub async fn preview_plantilla(&self) -> Result<Option<Preview>, FlowError> {
        let Some(archivo) = self.archivo_seleccionado().await? else {
            return Ok(None);
        };
        let respuesta = self.api.archivo_plantilla(&archivo).await?;
        Ok(Some(clasificar_preview(respuesta)))
    }

    /// URL firmada del archivo de la plantilla seleccionada, con reintento
    /// acotado (las URLs expiran y el servicio de media parpadea).
    pub async fn url_media_plantilla(&self) -> Result<Option<String>, FlowError> {
        let Some(archivo) = self.archivo_seleccionado().await? else {
            return Ok(None);
        };
        let api = Arc::clone(&self.api);
        let url = crate::api::retry::con_backoff(
            CONFIG.carga.reintentos_media,
            CONFIG.carga.backoff_inicial_ms,
            || {
                let api = Arc::clone(&api);
                let archivo = archivo.clone();
                async move { api.url_media_firmada(&archivo).await }
            },
        )
        .await?;
        Ok(Some(url))
    }

    /// Genera la comunicación y clasifica su preview. En éxito la máquina
    /// vuelve al paso 1 con formulario limpio y token de corrida nuevo; en
    /// falla el estado queda intacto para reintentar.
    pub async fn completar(&mut self) -> Result<ComunicacionGenerada, FlowError> {
        if !self.maquina.es_final() {
            return Err(FlowError::EstadoIncompleto(format!(
                "completar requiere el paso {TOTAL_PASOS}; vigente: {}",
                self.maquina.paso_actual()
            )));
        }
        let (payload, metadatos) = ensamblar_comunicacion(&self.form, &self.campos.estado());
        let creada = self.api.generar_comunicacion(payload).await?;
        let preview = clasificar_preview(self.api.preview_comunicacion(&creada.id).await?);
        self.reiniciar();
        Ok(ComunicacionGenerada { creada, preview, metadatos })
    }

    /// Reinicio completo: paso 1, formulario limpio, token nuevo y billetes
    /// anteriores muertos.
    pub fn reiniciar(&mut self) {
        self.maquina.reiniciar();
        self.form.limpiar();
        self.errores.clear();
        self.tocados.clear();
        self.guardia.reiniciar();
        self.campos.limpiar();
        self.partes.clear();
    }
}

fn ruta_desde_codigo(codigo: &str) -> Option<RutaAprobacion> {
    match codigo {
        "SIN_APROBACION" => Some(RutaAprobacion::SinAprobacion),
        "CON_APROBACION" => Some(RutaAprobacion::ConAprobacion),
        _ => None,
    }
}
