//! RenoFlow Rust Library
//!
//! Este crate actúa como el núcleo headless del back-office:
//! - Expone `form` para el estado vivo del formulario, los validadores puros
//!   y el intérprete genérico de schemas de paso.
//! - Expone `fields` para resolver claves estables de campos de plantilla.
//! - Expone `loader` para las cargas dependientes con debounce y guardia de
//!   respuestas obsoletas.
//! - Expone `wizard` para la máquina de pasos, los dos wizards concretos y
//!   el ensamblador de payloads.
//! - Expone `api` (trait del colaborador externo + mock) y `personal` (ciclo
//!   de vida del empleado y compuerta jurídica).
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod api;
pub mod config;
pub mod errors;
pub mod fields;
pub mod form;
pub mod loader;
pub mod personal;
pub mod wizard;
