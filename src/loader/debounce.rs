//! Primitivo de debounce desacoplado de cualquier framework: un temporizador
//! con cancelación-por-superación, probado con el reloj virtual de tokio.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Debounce por llamada: cada invocación supersede a las anteriores; solo la
/// más reciente sobrevive al periodo de silencio.
pub struct Debouncer {
    quieto: Duration,
    seq: AtomicU64,
}

impl Debouncer {
    pub fn new(quieto: Duration) -> Self {
        Self { quieto, seq: AtomicU64::new(0) }
    }

    /// Espera el periodo de silencio. Devuelve `true` si esta llamada sigue
    /// siendo la más reciente al despertar; `false` si otra la superó y su
    /// trabajo debe abandonarse.
    pub async fn espera(&self) -> bool {
        let mia = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.quieto).await;
        self.seq.load(Ordering::SeqCst) == mia
    }

    /// Supersede cualquier espera en curso sin iniciar una nueva (para
    /// limpiezas síncronas que no deben ser pisadas por un eco tardío).
    pub fn superar(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_solo_sobrevive_la_ultima() {
        let debounce = Arc::new(Debouncer::new(Duration::from_millis(400)));
        let d1 = Arc::clone(&debounce);
        let primera = tokio::spawn(async move { d1.espera().await });
        // Deja que la primera registre su turno antes de dispararse la segunda.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let d2 = Arc::clone(&debounce);
        let segunda = tokio::spawn(async move { d2.espera().await });

        assert!(!primera.await.unwrap());
        assert!(segunda.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superar_cancela_la_espera_en_curso() {
        let debounce = Arc::new(Debouncer::new(Duration::from_millis(400)));
        let d1 = Arc::clone(&debounce);
        let espera = tokio::spawn(async move { d1.espera().await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        debounce.superar();
        assert!(!espera.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_llamada_solitaria_sobrevive() {
        let debounce = Debouncer::new(Duration::from_millis(400));
        assert!(debounce.espera().await);
    }
}
