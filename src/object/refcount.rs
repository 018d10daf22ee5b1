//! Arquivo: object/refcount.rs
//!
//! Propósito: Contagem de referências atômica para objetos base e registros.
//!
//! Detalhes de Implementação:
//! - Usa `AtomicUsize` para thread-safety.
//! - Semântica Acquire/Release ao decrementar a última referência.
//! - `inc_not_zero` e `dec_not_last` são laços de CAS: nunca ressuscitam um
//!   contador que já chegou a zero e nunca fazem a transição 1 → 0 fora do
//!   lock que a protege.

use core::sync::atomic::{fence, AtomicUsize, Ordering};

/// Contador de referências atômico
#[derive(Debug)]
pub struct RefCount {
    count: AtomicUsize,
}

impl RefCount {
    /// Cria um novo contador com valor inicial
    pub const fn new(initial: usize) -> Self {
        Self {
            count: AtomicUsize::new(initial),
        }
    }

    /// Incrementa o contador de referências.
    /// Retorna o valor ANTERIOR.
    ///
    /// Quem chama já segura uma referência válida (contador > 0).
    #[inline]
    pub fn inc(&self) -> usize {
        let prev = self.count.fetch_add(1, Ordering::Relaxed);
        debug_assert!(prev != 0, "RefCount::inc a partir de zero");
        prev
    }

    /// Incrementa apenas se o contador não for zero.
    /// Retorna `false` se o objeto já está sendo destruído.
    #[inline]
    pub fn inc_not_zero(&self) -> bool {
        let mut current = self.count.load(Ordering::Relaxed);
        loop {
            if current == 0 {
                return false;
            }
            match self.count.compare_exchange_weak(
                current,
                current + 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Decrementa o contador de referências.
    /// Retorna `true` se a contagem chegou a ZERO (o objeto deve ser destruído).
    ///
    /// Decrementar um contador zerado é violação de invariante: fatal.
    #[inline]
    #[must_use]
    pub fn dec(&self) -> bool {
        // Release garante que escritas anteriores a este dec sejam vistas
        // antes de qualquer coisa que aconteça após o objeto morrer.
        let prev = self.count.fetch_sub(1, Ordering::Release);
        if prev == 0 {
            panic!("(Object) RefCount underflow");
        }

        if prev == 1 {
            // Quem destrói precisa ver tudo que os outros threads soltaram.
            fence(Ordering::Acquire);
            true
        } else {
            false
        }
    }

    /// Decrementa apenas se esta NÃO for a última referência.
    /// Retorna `false` (sem alterar nada) se o contador vale 1.
    #[inline]
    #[must_use]
    pub fn dec_not_last(&self) -> bool {
        let mut current = self.count.load(Ordering::Relaxed);
        loop {
            if current <= 1 {
                return false;
            }
            match self.count.compare_exchange_weak(
                current,
                current - 1,
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Retorna o valor atual (aproximado/relaxado).
    #[inline]
    pub fn get(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}
