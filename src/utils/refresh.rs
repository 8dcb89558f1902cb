//! Revisão da listagem de usuários.
//!
//! Incrementada após toda mutação bem-sucedida. A camada HTTP publica o valor
//! como ETag, então qualquer listagem em cache é descartada na próxima leitura.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct ListingRevision {
    epoch: i64,
    counter: Arc<AtomicU64>,
}

impl ListingRevision {
    pub fn new() -> Self {
        Self {
            // Distingue ETags de processos diferentes (a revisão recomeça em 0)
            epoch: chrono::Utc::now().timestamp_millis(),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn bump(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Weak ETag for the current listing
    pub fn etag(&self) -> String {
        format!("W/\"{}-{}\"", self.epoch, self.current())
    }

    /// Avalia um `If-None-Match` com comparação fraca (RFC 9110):
    /// `*` casa sempre, e o prefixo `W/` é ignorado dos dois lados.
    pub fn matches(&self, if_none_match: &str) -> bool {
        let current = self.etag();
        let current = strip_weak(&current);

        if_none_match
            .split(',')
            .map(str::trim)
            .any(|tag| tag == "*" || strip_weak(tag) == current)
    }
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

impl Default for ListingRevision {
    fn default() -> Self {
        Self::new()
    }
}
