//! Chave opaca de objeto base

use crate::config::KEY_MASK;

/// Chave global de um objeto base.
///
/// Clientes nunca veem ponteiros reais, apenas chaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ObjectKey(u32);

impl ObjectKey {
    /// Chave inválida/nula
    pub const INVALID: ObjectKey = ObjectKey(0);

    /// Cria chave a partir do valor raw (bits acima de KEY_BITS são descartados)
    pub const fn new(raw: u32) -> Self {
        Self(raw & KEY_MASK)
    }

    /// Retorna o valor raw da chave
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Verifica se é válida
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl core::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
