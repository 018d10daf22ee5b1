//! # Contabilidade com Quota
//!
//! Contadores atômicos e relatório de uso.

use super::{AccountingDenied, MemAccounting};
use core::sync::atomic::{AtomicUsize, Ordering};

/// Contabilidade de memória com quota opcional
#[repr(C, align(64))] // Evita false sharing
pub struct QuotaAccounting {
    /// Nome exibido nos relatórios
    name: &'static str,
    /// Bytes atualmente reservados
    allocated: AtomicUsize,
    /// Número de cargas aceitas
    alloc_count: AtomicUsize,
    /// Número de descargas
    free_count: AtomicUsize,
    /// Pico de uso (bytes)
    peak: AtomicUsize,
    /// Quota em bytes (0 = sem limite)
    quota: AtomicUsize,
    /// Cargas negadas por quota
    quota_denials: AtomicUsize,
}

impl QuotaAccounting {
    /// Cria contabilidade sem limite
    pub const fn new(name: &'static str) -> Self {
        Self::with_quota(name, 0)
    }

    /// Cria contabilidade com quota em bytes (0 = sem limite)
    pub const fn with_quota(name: &'static str, quota: usize) -> Self {
        Self {
            name,
            allocated: AtomicUsize::new(0),
            alloc_count: AtomicUsize::new(0),
            free_count: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            quota: AtomicUsize::new(quota),
            quota_denials: AtomicUsize::new(0),
        }
    }

    /// Define quota
    pub fn set_quota(&self, bytes: usize) {
        self.quota.store(bytes, Ordering::Relaxed);
    }

    /// Nome da contabilidade
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bytes atualmente reservados
    pub fn allocated_bytes(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }

    /// Número de cargas aceitas
    pub fn allocation_count(&self) -> usize {
        self.alloc_count.load(Ordering::Relaxed)
    }

    /// Número de descargas
    pub fn free_count(&self) -> usize {
        self.free_count.load(Ordering::Relaxed)
    }

    /// Pico de uso
    pub fn peak_bytes(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    /// Quota atual
    pub fn quota_bytes(&self) -> usize {
        self.quota.load(Ordering::Relaxed)
    }

    /// Cargas negadas por quota
    pub fn denials(&self) -> usize {
        self.quota_denials.load(Ordering::Relaxed)
    }

    /// Cargas pendentes (cargas - descargas)
    pub fn outstanding(&self) -> usize {
        let allocs = self.alloc_count.load(Ordering::Relaxed);
        let frees = self.free_count.load(Ordering::Relaxed);
        allocs.saturating_sub(frees)
    }

    /// Verifica se há leak provável
    pub fn has_probable_leak(&self) -> bool {
        let allocs = self.alloc_count.load(Ordering::Relaxed);
        let frees = self.free_count.load(Ordering::Relaxed);

        // Threshold: 90% de diferença
        allocs > 100 && frees < allocs / 10
    }

    /// Imprime relatório de uso
    pub fn report(&self) {
        let quota = self.quota_bytes();
        crate::kinfo!(
            "(Accounting) {}: alocado={} pico={} quota={} pendentes={} negadas={}{}",
            self.name,
            format_bytes(self.allocated_bytes()),
            format_bytes(self.peak_bytes()),
            if quota > 0 { format_bytes(quota) } else { "∞".into() },
            self.outstanding(),
            self.denials(),
            if self.has_probable_leak() { " ⚠ leak?" } else { "" }
        );
    }

    fn update_peak(&self, new_total: usize) {
        let mut peak = self.peak.load(Ordering::Relaxed);
        while new_total > peak {
            match self.peak.compare_exchange_weak(
                peak,
                new_total,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => peak = current,
            }
        }
    }
}

impl MemAccounting for QuotaAccounting {
    fn charge(&self, bytes: usize) -> Result<(), AccountingDenied> {
        let quota = self.quota.load(Ordering::Relaxed);

        // Verificação de quota e reserva num único CAS: duas cargas
        // concorrentes nunca passam juntas do limite.
        let mut current = self.allocated.load(Ordering::Relaxed);
        let new_total = loop {
            let new_total = current.saturating_add(bytes);
            if quota > 0 && new_total > quota {
                self.quota_denials.fetch_add(1, Ordering::Relaxed);
                crate::ktrace!(
                    "(Accounting) {}: carga de {} negada (uso={} quota={})",
                    self.name,
                    bytes,
                    current,
                    quota
                );
                return Err(AccountingDenied { requested: bytes });
            }
            match self.allocated.compare_exchange_weak(
                current,
                new_total,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break new_total,
                Err(actual) => current = actual,
            }
        };

        self.alloc_count.fetch_add(1, Ordering::Relaxed);
        self.update_peak(new_total);
        Ok(())
    }

    fn uncharge(&self, bytes: usize) {
        // Satura em zero: descarga maior que o uso não pode dar a volta e
        // bloquear todas as cargas seguintes.
        let mut prev = self.allocated.load(Ordering::Relaxed);
        loop {
            match self.allocated.compare_exchange_weak(
                prev,
                prev.saturating_sub(bytes),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => prev = actual,
            }
        }
        if prev < bytes {
            crate::kerror!(
                "(Accounting) {}: descarga de {} maior que o uso {}",
                self.name,
                bytes,
                prev
            );
        }
        self.free_count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Formata bytes para exibição legível
fn format_bytes(bytes: usize) -> alloc::string::String {
    if bytes >= 1024 * 1024 * 1024 {
        let gb = bytes / (1024 * 1024 * 1024);
        let mb = (bytes % (1024 * 1024 * 1024)) / (1024 * 1024);
        alloc::format!("{}.{}GB", gb, mb * 10 / 1024)
    } else if bytes >= 1024 * 1024 {
        let mb = bytes / (1024 * 1024);
        let kb = (bytes % (1024 * 1024)) / 1024;
        alloc::format!("{}.{}MB", mb, kb * 10 / 1024)
    } else if bytes >= 1024 {
        alloc::format!("{}KB", bytes / 1024)
    } else {
        alloc::format!("{}B", bytes)
    }
}
