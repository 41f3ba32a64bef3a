pub mod resolver;

pub use resolver::{resolver_claves, CampoPlantilla, CampoResuelto, TipoCampo};
