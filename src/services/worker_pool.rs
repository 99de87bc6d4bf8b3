//! Pool de workers acotado
//!
//! Limita cuántas llamadas de detalle corren a la vez contra Ophim. El pool
//! se construye una vez y se comparte entre todas las secciones.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

#[derive(Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Ejecutar `task` para cada item con como mucho `size` en vuelo.
    ///
    /// Espera a que terminen todos; el resultado respeta el orden de entrada,
    /// no el orden de finalización.
    pub async fn map_ordered<T, R, F, Fut>(&self, items: Vec<T>, task: F) -> Vec<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = R>,
    {
        let semaphore = &self.semaphore;
        let jobs = items.into_iter().map(|item| {
            let job = task(item);
            async move {
                // El semáforo nunca se cierra
                let _permit = semaphore.acquire().await.ok();
                job.await
            }
        });

        join_all(jobs).await
    }
}
