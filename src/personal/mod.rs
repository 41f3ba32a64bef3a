pub mod estado;
pub mod juridico;

pub use estado::{estado_por_tipo_contrato, mensaje_cedula_existente, EstadoEmpleado};
pub use juridico::CompuertaJuridica;
