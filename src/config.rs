//! # Configuração do Registro
//!
//! Define constantes e a configuração por diretório.

// =============================================================================
// ESPAÇO DE CHAVES
// =============================================================================

/// Bits úteis de uma chave de objeto
pub const KEY_BITS: u32 = 31;

/// Máscara do espaço de chaves (chave 0 é reservada como inválida)
pub const KEY_MASK: u32 = (1 << KEY_BITS) - 1;

// =============================================================================
// LIMITES PADRÃO
// =============================================================================

/// Número máximo de objetos vivos por diretório
pub const DEFAULT_MAX_OBJECTS: usize = 1 << 20;

/// Tentativas de chave antes de desistir com KeyCollision
pub const DEFAULT_MAX_PROBES: usize = 64;

/// Quota padrão para registros de referência (16 MiB)
pub const DEFAULT_RECORD_QUOTA: usize = 16 * 1024 * 1024;

// =============================================================================
// POLÍTICA DE CHAVES
// =============================================================================

/// Como as chaves de objetos são geradas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Contador monotônico (1, 2, 3, ...)
    Sequential,
    /// Contador passado por uma bijeção do espaço de 31 bits.
    ///
    /// Chaves continuam únicas (propriedade do contador), mas não são
    /// previsíveis a partir de uma chave vizinha.
    Scrambled,
}

impl KeyPolicy {
    /// Mapeia o valor do contador para uma chave
    pub const fn apply(self, counter: u32) -> u32 {
        match self {
            Self::Sequential => counter & KEY_MASK,
            Self::Scrambled => scramble(counter & KEY_MASK),
        }
    }
}

/// Bijeção em [0, 2^31): multiplicação por ímpar e xorshift, ambos
/// inversíveis módulo 2^31.
const fn scramble(mut x: u32) -> u32 {
    x = x.wrapping_mul(0x2545_F491) & KEY_MASK;
    x ^= x >> 15;
    x = x.wrapping_mul(0x6C07_8965) & KEY_MASK;
    x ^= x >> 13;
    x
}

// =============================================================================
// CONFIGURAÇÃO DO DIRETÓRIO
// =============================================================================

/// Parâmetros de um `ObjectDirectory`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Limite de objetos vivos (DirectoryFull acima disso)
    pub max_objects: usize,
    /// Tentativas de chave por registro (KeyCollision ao esgotar)
    pub max_probes: usize,
    /// Política de geração de chaves
    pub key_policy: KeyPolicy,
}

impl DirectoryConfig {
    pub const fn new() -> Self {
        Self {
            max_objects: DEFAULT_MAX_OBJECTS,
            max_probes: DEFAULT_MAX_PROBES,
            key_policy: KeyPolicy::Sequential,
        }
    }

    pub const fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    pub const fn with_max_probes(mut self, max_probes: usize) -> Self {
        self.max_probes = max_probes;
        self
    }

    pub const fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrambled_keys_stay_in_key_space() {
        for counter in [1u32, 2, 3, 0x1234, KEY_MASK - 1, KEY_MASK] {
            assert!(KeyPolicy::Scrambled.apply(counter) <= KEY_MASK);
        }
    }

    #[test]
    fn scrambled_keys_are_distinct_for_small_counters() {
        let mut seen = alloc::collections::BTreeSet::new();
        for counter in 1..4096u32 {
            assert!(seen.insert(KeyPolicy::Scrambled.apply(counter)));
        }
    }

    #[test]
    fn sequential_policy_is_identity_inside_key_space() {
        assert_eq!(KeyPolicy::Sequential.apply(7), 7);
        assert_eq!(KeyPolicy::Sequential.apply(KEY_MASK + 1), 0);
    }
}
