//! Demo de los dos wizards contra el colaborador en memoria: genera una
//! comunicación de cartera y crea un empleado de ingreso, imprimiendo el
//! recorrido paso a paso.
use std::sync::Arc;

use renoflow::api::mock::MockApi;
use renoflow::api::{Obligacion, Plantilla, TipoPlantilla};
use renoflow::errors::FlowError;
use renoflow::fields::{CampoPlantilla, TipoCampo};
use renoflow::personal::CompuertaJuridica;
use renoflow::wizard::{ComunicacionesWizard, IngresoWizard, ParteNombre, TipoPreview, MIME_DOCX};

fn sembrar(api: &MockApi) {
    api.con_obligaciones(
        "1023456789",
        vec![Obligacion { obligacion: "OB-2024-001".into(), sistema_origen: "SISCO".into() }],
    );
    api.con_plantillas(
        TipoPlantilla::Form,
        vec![Plantilla {
            id: "plantilla-carta".into(),
            nombre: "Carta de cobro".into(),
            tipo: TipoPlantilla::Form,
            archivo: Some("carta_cobro.docx".into()),
        }],
    );
    api.con_plantillas(TipoPlantilla::Legal, vec![]);
    api.con_archivo("carta_cobro.docx", MIME_DOCX, b"PK\x03\x04".to_vec());
    api.con_campos(
        "plantilla-carta",
        vec![
            CampoPlantilla {
                id: Some("1".into()),
                field_id: None,
                field_name: Some("nombre_deudor".into()),
                field_label: Some("Nombre del deudor".into()),
                field_type: TipoCampo::Text,
                is_required: true,
            },
            CampoPlantilla {
                id: Some("2".into()),
                field_id: None,
                field_name: Some("valor_deuda".into()),
                field_label: Some("Valor de la deuda".into()),
                field_type: TipoCampo::Number,
                is_required: true,
            },
            CampoPlantilla {
                id: Some("3".into()),
                field_id: None,
                field_name: Some("fecha_generacion".into()),
                field_label: None,
                field_type: TipoCampo::SystemData,
                is_required: false,
            },
        ],
    );
}

async fn demo_comunicaciones(api: Arc<MockApi>) -> Result<(), FlowError> {
    println!("--- Wizard de comunicaciones ---");
    let mut wizard = ComunicacionesWizard::new(api);

    wizard.cambiar_campo("cedula", "1023456789").await;
    let obligaciones = wizard.obligaciones();
    println!(
        "Obligaciones: {} (selección: {:?}, bloqueada: {})",
        obligaciones.items.len(),
        obligaciones.seleccion,
        obligaciones.bloqueada
    );
    wizard.cambiar_campo("tipo_deudor", "deudor").await;
    wizard.cambiar_campo("canal_comunicacion", "CARTA").await;
    println!("Paso {} -> {}", wizard.paso_actual(), wizard.avanzar().await?);

    wizard.cambiar_campo("ruta_aprobacion", "CON_APROBACION").await;
    println!("Plantillas disponibles: {}", wizard.plantillas_disponibles().len());
    wizard.cambiar_campo("plantilla_id", "plantilla-carta").await;
    println!("Paso {} -> {}", wizard.paso_actual(), wizard.avanzar().await?);

    for campo in wizard.campos_plantilla() {
        println!("Campo dinámico: {} ({})", campo.clave, campo.etiqueta());
    }
    wizard.editar_parte_nombre("nombre_deudor", ParteNombre::PrimerNombre, "Carlos");
    wizard.editar_parte_nombre("nombre_deudor", ParteNombre::PrimerApellido, "Rodríguez");
    wizard.cambiar_campo("valor_deuda", "12500000").await;
    println!("Paso {} -> {}", wizard.paso_actual(), wizard.avanzar().await?);

    if let Some(preview) = wizard.preview_plantilla().await? {
        println!("Preview de plantilla: {:?} ({} bytes)", preview.tipo, preview.cuerpo.len());
    }
    if let Some(url) = wizard.url_media_plantilla().await? {
        println!("URL de media firmada: {url}");
    }
    let generada = wizard.completar().await?;
    println!("Comunicación generada: {}", generada.creada.id);
    match generada.preview.tipo {
        TipoPreview::Pdf => println!("Preview: PDF de {} bytes", generada.preview.cuerpo.len()),
        otro => println!("Preview: {otro:?}"),
    }
    println!("Wizard reiniciado al paso {}", wizard.paso_actual());
    Ok(())
}

async fn demo_ingreso(api: Arc<MockApi>) -> Result<(), FlowError> {
    println!("--- Wizard de ingreso de personal ---");
    let mut wizard = IngresoWizard::new(api.clone());

    wizard.cambiar_campo("cedula", "52987654");
    wizard.cambiar_campo("contrato", "PLANTA");
    wizard.cambiar_campo("fecha_ingreso", "2026-08-01");
    println!("Estado derivado: {}", wizard.estado_derivado().legible());
    println!("Paso {} -> {}", wizard.paso_actual(), wizard.avanzar().await?);

    wizard.editar_parte_nombre(ParteNombre::PrimerNombre, "Ana");
    wizard.editar_parte_nombre(ParteNombre::SegundoNombre, "María");
    wizard.editar_parte_nombre(ParteNombre::PrimerApellido, "Pérez");
    wizard.cambiar_campo("fecha_nacimiento", "1995-03-20");
    wizard.cambiar_campo("correo", "ana.perez@renovar.com");
    wizard.cambiar_campo("celular", "3109876543");
    wizard.cambiar_campo("direccion", "Calle 10 # 5-33");
    wizard.cambiar_campo("ciudad", "BOGOTA");
    wizard.cambiar_campo("localidad", "USAQUEN");
    println!("Paso {} -> {}", wizard.paso_actual(), wizard.avanzar().await?);

    wizard.cambiar_campo("password_renovar", "Abcdefg1");
    wizard.cambiar_campo("password_renovar_confirm", "Abcdefg1");
    println!("Paso {} -> {}", wizard.paso_actual(), wizard.avanzar().await?);

    let empleado = wizard.completar().await?;
    println!("Empleado creado: {} ({})", empleado.nombre_completo, empleado.estado);

    // La compuerta jurídica aprueba el contrato PLANTA recién creado.
    let compuerta = CompuertaJuridica::new(api);
    compuerta.aprobar_contrato(&empleado.cedula).await?;
    println!("Contrato aprobado para {}", empleado.cedula);
    Ok(())
}

#[tokio::main]
async fn main() {
    let api = Arc::new(MockApi::new());
    sembrar(&api);

    if let Err(e) = demo_comunicaciones(Arc::clone(&api)).await {
        eprintln!("[demo] comunicaciones falló: {e}");
    }
    if let Err(e) = demo_ingreso(api).await {
        eprintln!("[demo] ingreso falló: {e}");
    }
}
