pub mod debounce;
pub mod dependientes;

pub use debounce::Debouncer;
pub use dependientes::{
    CargadorCampos, CargadorObligaciones, CargadorPlantillas, GuardiaCarga, ListaObligaciones,
    RutaAprobacion,
};
