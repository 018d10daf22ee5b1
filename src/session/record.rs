//! # Reference Record
//!
//! Junção (sessão, objeto, tipo). Segura exatamente UMA referência ao
//! objeto base, não importa quantas vezes a sessão adquiriu o par.

use crate::object::{BaseRef, RefCount, RefKind};

/// Bytes cobrados da contabilidade por registro
pub const REF_RECORD_CHARGE: usize = core::mem::size_of::<RefRecord>();

/// Registro de referência de uma sessão
pub(crate) struct RefRecord {
    pub(crate) kind: RefKind,
    /// Quantas aquisições ainda não foram liberadas (≥ 1 enquanto vivo)
    pub(crate) count: RefCount,
    /// A referência ao objeto base que este registro segura
    pub(crate) base: BaseRef,
    /// Posição na lista ordenada da sessão
    pub(crate) seq: u64,
}

impl RefRecord {
    pub(crate) fn new(kind: RefKind, base: BaseRef, seq: u64) -> Self {
        Self {
            kind,
            count: RefCount::new(1),
            base,
            seq,
        }
    }
}
