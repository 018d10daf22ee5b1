//! Arquivo: object/kobject.rs
//!
//! Propósito: Interface que todo recurso registrado implementa.
//! O registro não sabe o que é o recurso (buffer, fence, lock...): só chama
//! estes hooks nos pontos certos do ciclo de vida.
//!
//! Detalhes de Implementação:
//! - Polimorfismo via Trait Objects (`Arc<dyn KObject>`).
//! - Hooks rodam FORA de qualquer lock do registro e podem bloquear.
//! - Hooks não falham: estado compensatório é responsabilidade do recurso.
use super::kind::RefKind;

/// Recurso gerenciável pelo diretório de objetos.
pub trait KObject: Send + Sync {
    /// Retorna o nome do tipo do recurso (para debug/diagnóstico).
    fn type_name(&self) -> &'static str;

    /// Chamado exatamente uma vez, depois que o objeto saiu do diretório,
    /// quando a última referência é solta. É o destrutor lógico.
    fn on_zero_reference(&self) {
        // Default: nada (Drop cuida da memória)
    }

    /// Chamado quando um registro de tipo diferente de `Usage` chega a zero,
    /// antes de soltar a referência ao objeto. Permite revogar um acesso
    /// sem destruir o recurso.
    fn on_ref_kind_released(&self, _kind: RefKind) {}
}
