//! Wizard de ingreso de personal (4 pasos):
//! 1. vinculación: cédula (con chequeo de unicidad al avanzar), tipo de
//!    contrato y fecha de ingreso;
//! 2. datos personales: nombre, nacimiento, contacto y ubicación (la
//!    localidad solo es obligatoria en Bogotá);
//! 3. credenciales y asignación operativa;
//! 4. revisión y creación del empleado.
use std::sync::Arc;

use indexmap::IndexSet;

use crate::api::{BackofficeApi, Empleado};
use crate::errors::FlowError;
use crate::form::engine::validar_paso;
use crate::form::schema::{CampoSpec, PasoSchema, Validador};
use crate::form::value::{ErrorMap, FormState, TouchedSet};
use crate::personal::{estado_por_tipo_contrato, mensaje_cedula_existente, EstadoEmpleado};
use crate::wizard::assembler::{ensamblar_empleado, ParteNombre, PartesNombre};
use crate::wizard::controller::MaquinaPasos;

const TOTAL_PASOS: usize = 4;

pub struct IngresoWizard {
    api: Arc<dyn BackofficeApi>,
    maquina: MaquinaPasos,
    form: FormState,
    errores: ErrorMap,
    tocados: TouchedSet,
    partes_nombre: PartesNombre,
}

fn schema_paso1() -> PasoSchema {
    PasoSchema::nuevo(
        1,
        "Vinculación",
        vec![
            CampoSpec::nuevo("cedula", "Cédula").con_validador(Validador::Cedula),
            CampoSpec::nuevo("contrato", "Tipo de contrato"),
            // El ingreso puede programarse a futuro; solo se exige formato.
            CampoSpec::nuevo("fecha_ingreso", "Fecha de ingreso")
                .con_validador(Validador::FechaIso),
        ],
    )
}

fn schema_paso2() -> PasoSchema {
    PasoSchema::nuevo(
        2,
        "Datos personales",
        vec![
            CampoSpec::nuevo("nombre", "Nombre completo").con_validador(Validador::Nombre),
            CampoSpec::nuevo("fecha_nacimiento", "Fecha de nacimiento")
                .con_validador(Validador::FechaNacimiento),
            CampoSpec::nuevo("correo", "Correo electrónico").con_validador(Validador::Email),
            CampoSpec::nuevo("celular", "Celular").con_validador(Validador::Celular),
            CampoSpec::nuevo("direccion", "Dirección")
                .con_validador(Validador::Direccion { minimo: 5 }),
            CampoSpec::nuevo("ciudad", "Ciudad"),
            CampoSpec::nuevo("localidad", "Localidad").requerido_si("ciudad", "BOGOTA"),
        ],
    )
}

fn schema_paso3() -> PasoSchema {
    PasoSchema::nuevo(
        3,
        "Credenciales y asignación",
        vec![
            CampoSpec::nuevo("password_renovar", "Contraseña").con_validador(Validador::Password),
            CampoSpec::nuevo("password_renovar_confirm", "Confirmación de contraseña")
                .con_validador(Validador::ConfirmacionPassword {
                    primaria: "password_renovar".into(),
                }),
            CampoSpec::nuevo("extension_3cx", "Extensión 3CX").opcional(),
            CampoSpec::nuevo("cola", "Cola").opcional(),
            CampoSpec::nuevo("asignacion", "Asignación").opcional(),
        ],
    )
}

fn schema_paso4() -> PasoSchema {
    PasoSchema::nuevo(4, "Revisión", vec![])
}

fn schema_de(paso: usize) -> PasoSchema {
    match paso {
        1 => schema_paso1(),
        2 => schema_paso2(),
        3 => schema_paso3(),
        _ => schema_paso4(),
    }
}

impl IngresoWizard {
    pub fn new(api: Arc<dyn BackofficeApi>) -> Self {
        Self {
            api,
            maquina: MaquinaPasos::new(TOTAL_PASOS),
            form: FormState::new(),
            errores: ErrorMap::new(),
            tocados: TouchedSet::new(),
            partes_nombre: PartesNombre::default(),
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

    pub fn errores_visibles(&self) -> ErrorMap {
        self.errores
            .iter()
            .filter(|(clave, _)| self.tocados.contains(*clave))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Estado que recibirá el empleado según el tipo de contrato vigente.
    pub fn estado_derivado(&self) -> EstadoEmpleado {
        estado_por_tipo_contrato(self.form.texto("contrato"))
    }

    fn revalidar_campo(&mut self, clave: &str) {
        let schema = schema_de(self.maquina.paso_actual());
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

    pub fn cambiar_campo(&mut self, clave: &str, valor: &str) {
        self.form.set(clave, valor);
        self.tocados.insert(clave.to_string());
        self.revalidar_campo(clave);
        // La confirmación depende de la primaria: su error se refresca junto.
        if clave == "password_renovar" {
            self.revalidar_campo("password_renovar_confirm");
        }
        // Cambiar de ciudad puede activar o desactivar la localidad.
        if clave == "ciudad" {
            self.revalidar_campo("localidad");
        }
    }

    /// Edita una parte del nombre; el campo `nombre` unido se regenera en
    /// cada edición desde las 4 partes.
    pub fn editar_parte_nombre(&mut self, parte: ParteNombre, valor: &str) {
        self.partes_nombre.asignar(parte, valor);
        let unido = self.partes_nombre.unir();
        self.form.set("nombre", unido);
        self.tocados.insert("nombre".to_string());
        self.revalidar_campo("nombre");
    }

    pub fn validar_actual(&mut self) -> ErrorMap {
        let schema = schema_de(self.maquina.paso_actual());
        for clave in schema.claves() {
            self.tocados.insert(clave.to_string());
        }
        let corrida = validar_paso(&schema, &self.form);
        for clave in schema.claves() {
            self.errores.shift_remove(clave);
        }
        for (clave, msg) in &corrida {
            self.errores.insert(clave.clone(), msg.clone());
        }
        corrida
    }

    /// Precondición del paso 1: la cédula no debe existir ya en el sistema.
    /// Un error de red en la consulta no bloquea el avance (el back-office
    /// vuelve a validar al crear); una cédula encontrada sí.
    async fn verificar_cedula_unica(&self) -> Result<(), FlowError> {
        let cedula = self.form.texto("cedula");
        match self.api.empleado_por_cedula(cedula).await {
            Ok(Some(empleado)) => {
                Err(FlowError::PrecondicionFallida(mensaje_cedula_existente(&empleado.estado)))
            }
            Ok(None) => Ok(()),
            Err(err) => {
                eprintln!("[ingreso] consulta de cédula fallida, se continúa: {err}");
                Ok(())
            }
        }
    }

    pub async fn avanzar(&mut self) -> Result<usize, FlowError> {
        let corrida = self.validar_actual();
        if !corrida.is_empty() {
            return Err(FlowError::Validacion(corrida));
        }
        if self.maquina.paso_actual() == 1 {
            self.verificar_cedula_unica().await?;
        }
        let paso = self.maquina.avanzar()?;
        self.podar_huerfanas();
        Ok(paso)
    }

    pub fn retroceder(&mut self) -> usize {
        self.maquina.retroceder()
    }

    pub fn ir_a(&mut self, paso: usize) -> Result<usize, FlowError> {
        let terminal_poblado = self.maquina.run().paso_maximo == TOTAL_PASOS;
        self.maquina.ir_a(paso, terminal_poblado)
    }

    fn claves_declaradas() -> IndexSet<String> {
        let mut claves = IndexSet::new();
        for paso in 1..=TOTAL_PASOS {
            claves.extend(schema_de(paso).claves().map(String::from));
        }
        claves
    }

    fn podar_huerfanas(&mut self) {
        let declaradas = Self::claves_declaradas();
        self.form.retener_claves(&declaradas);
        self.errores.retain(|clave, _| declaradas.contains(clave));
    }

    /// Crea el empleado con el payload ensamblado. En éxito el wizard vuelve
    /// al paso 1 con formulario limpio y token nuevo; en falla (p. ej. un 422
    /// del back-office) el estado queda intacto para corregir y reintentar.
    pub async fn completar(&mut self) -> Result<Empleado, FlowError> {
        if !self.maquina.es_final() {
            return Err(FlowError::EstadoIncompleto(format!(
                "completar requiere el paso {TOTAL_PASOS}; vigente: {}",
                self.maquina.paso_actual()
            )));
        }
        let payload = ensamblar_empleado(&self.form);
        let empleado = self.api.crear_empleado(&payload).await?;
        self.reiniciar();
        Ok(empleado)
    }

    pub fn reiniciar(&mut self) {
        self.maquina.reiniciar();
        self.form.limpiar();
        self.errores.clear();
        self.tocados.clear();
        self.partes_nombre = PartesNombre::default();
    }
}
