//! Máquina de pasos del wizard: estados = índices ordinales 1..N, con las
//! reglas de transición compartidas por todos los wizards. La validación y
//! las precondiciones asíncronas viven en cada wizard concreto; aquí solo se
//! mueve el índice y se sostiene el token de corrida.
use uuid::Uuid;

use crate::errors::FlowError;

/// Corrida viva de un wizard. El token se regenera en cada reinicio; toda
/// respuesta asíncrona emitida bajo un token anterior se descarta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardRun {
    pub run_id: Uuid,
    /// Paso vigente (base uno).
    pub paso_actual: usize,
    /// Paso más alto alcanzado en esta corrida.
    pub paso_maximo: usize,
}

/// Máquina de transición de pasos.
#[derive(Debug, Clone)]
pub struct MaquinaPasos {
    total: usize,
    run: WizardRun,
}

impl MaquinaPasos {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            run: WizardRun { run_id: Uuid::new_v4(), paso_actual: 1, paso_maximo: 1 },
        }
    }

    pub fn run(&self) -> &WizardRun {
        &self.run
    }

    pub fn paso_actual(&self) -> usize {
        self.run.paso_actual
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn es_final(&self) -> bool {
        self.run.paso_actual == self.total
    }

    /// Avanza un paso. El llamador ya validó el paso vigente y sus
    /// precondiciones; aquí solo se rechaza avanzar desde el paso final.
    pub fn avanzar(&mut self) -> Result<usize, FlowError> {
        if self.es_final() {
            return Err(FlowError::PasoInvalido(self.run.paso_actual + 1));
        }
        self.run.paso_actual += 1;
        self.run.paso_maximo = self.run.paso_maximo.max(self.run.paso_actual);
        Ok(self.run.paso_actual)
    }

    /// Retrocede un paso. Siempre permitido por encima del paso 1; nunca toca
    /// el estado acumulado del formulario.
    pub fn retroceder(&mut self) -> usize {
        if self.run.paso_actual > 1 {
            self.run.paso_actual -= 1;
        }
        self.run.paso_actual
    }

    /// Salta a un paso. Permitido solo hacia pasos ya alcanzados, o a
    /// cualquiera cuando el paso terminal está completamente poblado
    /// (pantallas de resumen permiten volver a editar cualquier sección).
    pub fn ir_a(&mut self, paso: usize, terminal_poblado: bool) -> Result<usize, FlowError> {
        if paso == 0 || paso > self.total {
            return Err(FlowError::PasoInvalido(paso));
        }
        if paso > self.run.paso_maximo && !terminal_poblado {
            return Err(FlowError::PasoInvalido(paso));
        }
        self.run.paso_actual = paso;
        self.run.paso_maximo = self.run.paso_maximo.max(paso);
        Ok(paso)
    }

    /// Vuelve al paso 1 con token de corrida nuevo.
    pub fn reiniciar(&mut self) -> Uuid {
        let nuevo = Uuid::new_v4();
        self.run = WizardRun { run_id: nuevo, paso_actual: 1, paso_maximo: 1 };
        nuevo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avance_y_tope() {
        let mut maquina = MaquinaPasos::new(4);
        assert_eq!(maquina.paso_actual(), 1);
        assert_eq!(maquina.avanzar().unwrap(), 2);
        assert_eq!(maquina.avanzar().unwrap(), 3);
        assert_eq!(maquina.avanzar().unwrap(), 4);
        assert!(maquina.es_final());
        assert!(maquina.avanzar().is_err());
        assert_eq!(maquina.paso_actual(), 4);
    }

    #[test]
    fn test_retroceder_nunca_baja_de_uno() {
        let mut maquina = MaquinaPasos::new(4);
        assert_eq!(maquina.retroceder(), 1);
        maquina.avanzar().unwrap();
        assert_eq!(maquina.retroceder(), 1);
    }

    #[test]
    fn test_ir_a_solo_pasos_alcanzados() {
        let mut maquina = MaquinaPasos::new(4);
        maquina.avanzar().unwrap();
        maquina.avanzar().unwrap(); // maximo = 3
        maquina.retroceder();
        assert_eq!(maquina.ir_a(3, false).unwrap(), 3);
        assert!(maquina.ir_a(4, false).is_err());
        // Con el terminal poblado, el salto libre queda habilitado.
        assert_eq!(maquina.ir_a(4, true).unwrap(), 4);
        assert!(maquina.ir_a(0, true).is_err());
        assert!(maquina.ir_a(5, true).is_err());
    }

    #[test]
    fn test_reiniciar_emite_token_nuevo() {
        let mut maquina = MaquinaPasos::new(4);
        let viejo = maquina.run().run_id;
        maquina.avanzar().unwrap();
        let nuevo = maquina.reiniciar();
        assert_ne!(viejo, nuevo);
        assert_eq!(maquina.paso_actual(), 1);
        assert_eq!(maquina.run().paso_maximo, 1);
    }
}
