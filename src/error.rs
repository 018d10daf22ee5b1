//! Tipos de Erro do Registro
//!
//! Erros recuperáveis das operações de diretório e sessão. Violações de
//! invariante interna (underflow de contador) não aparecem aqui: são fatais.

/// Erros do registro de objetos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectError {
    /// A contabilidade de memória recusou a carga de um registro
    AllocationDenied,
    /// Diretório atingiu o limite de objetos vivos
    DirectoryFull,
    /// Nenhuma chave livre encontrada dentro do limite de tentativas
    KeyCollision,
    /// Chave/tipo ausente, não compartilhável com a sessão, ou já liberado
    NotFound,
    /// Invariante específica do tipo violada (sinalizada pelo dono do recurso)
    AlreadyInUse,
    /// Sessão já foi fechada
    SessionClosed,
}

impl ObjectError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllocationDenied => "Contabilidade de memória negou a alocação",
            Self::DirectoryFull => "Diretório de objetos cheio",
            Self::KeyCollision => "Nenhuma chave única disponível",
            Self::NotFound => "Objeto ou referência não encontrado",
            Self::AlreadyInUse => "Recurso já em uso",
            Self::SessionClosed => "Sessão fechada",
        }
    }
}

impl core::fmt::Display for ObjectError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<crate::accounting::AccountingDenied> for ObjectError {
    fn from(_: crate::accounting::AccountingDenied) -> Self {
        Self::AllocationDenied
    }
}

/// Tipo Result específico do registro
pub type ObjectResult<T> = Result<T, ObjectError>;
