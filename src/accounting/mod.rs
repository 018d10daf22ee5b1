//! # Memory Accounting - Contabilidade de Memória
//!
//! Serviço de capacidade limitada que o registro carrega a cada
//! `RefRecord` criado e descarrega a cada registro liberado.
//!
//! ## 🎯 Propósito
//!
//! Um cliente que cria referências sem parar não pode esgotar a memória do
//! kernel. Toda alocação de registro passa por `charge`, que pode negar;
//! a negação vira `ObjectError::AllocationDenied` para quem chamou.
//!
//! ## 🔧 Uso
//!
//! ```rust
//! let accounting = Arc::new(QuotaAccounting::with_quota("ttm-refs", 64 * 1024));
//! let dir = ObjectDirectory::new(accounting.clone(), DirectoryConfig::default());
//! // ...
//! accounting.report();
//! ```

pub mod stats;


pub use stats::QuotaAccounting;

/// A contabilidade recusou uma carga
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountingDenied {
    /// Bytes pedidos na carga negada
    pub requested: usize,
}

/// Interface consumida pelo registro.
///
/// `charge` deve ser não-bloqueante: o registro chama sem segurar locks,
/// mas espera resposta imediata (sem espera por memória).
pub trait MemAccounting: Send + Sync {
    /// Reserva `bytes` ou nega a reserva.
    fn charge(&self, bytes: usize) -> Result<(), AccountingDenied>;

    /// Devolve `bytes` reservados por um `charge` bem-sucedido.
    fn uncharge(&self, bytes: usize);
}

/// Contabilidade sem limite e sem estado
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlimitedAccounting;

impl MemAccounting for UnlimitedAccounting {
    #[inline]
    fn charge(&self, _bytes: usize) -> Result<(), AccountingDenied> {
        Ok(())
    }

    #[inline]
    fn uncharge(&self, _bytes: usize) {}
}
