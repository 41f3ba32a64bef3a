pub mod assembler;
pub mod comunicaciones;
pub mod controller;
pub mod ingreso;
pub mod preview;

pub use assembler::{ParteNombre, PartesNombre};
pub use comunicaciones::{ComunicacionGenerada, ComunicacionesWizard};
pub use controller::{MaquinaPasos, WizardRun};
pub use ingreso::IngresoWizard;
pub use preview::{clasificar_preview, Preview, TipoPreview, MIME_DOCX};
