//! ObjRef - Registro de Objetos Base e Referências por Sessão.
//!
//! Ponto central de exportação dos módulos do registro.
//!
//! ## Visão Geral
//!
//! ```text
//! ObjectDirectory (um por dispositivo)
//!   └── key → BaseObject (RefCount + KObject)
//!          ▲
//!          │ BaseRef (uma referência contada)
//!          │
//! Session (uma por cliente)
//!   ├── tabela[Usage]        key → RefRecord
//!   ├── tabela[SyncCpuRead]  key → RefRecord
//!   ├── tabela[SyncCpuWrite] key → RefRecord
//!   └── lista ordenada de RefRecords (drenada no close)
//! ```
//!
//! ## Ordem de Locks
//!
//! - Lock do diretório: mapa de chaves e toda transição 1 → 0.
//! - Lock da sessão: tabelas por tipo e lista de registros.
//! - Nenhuma referência base é solta com o lock da sessão adquirido, e
//!   nenhum callback roda com qualquer lock do registro adquirido.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (necessário para Arc/BTreeMap)
extern crate alloc;

#[doc(hidden)]
pub use log as __log;

// --- Infraestrutura ---
#[macro_use]
pub mod logging; // Macros kerror!/kwarn!/kinfo!/kdebug!/ktrace!
pub mod config; // Constantes e DirectoryConfig
pub mod error; // ObjectError / ObjectResult
#[cfg(any(test, feature = "self_test"))]
pub mod klib; // Framework de self-test

// --- Registro ---
pub mod accounting; // Contabilidade de memória (charge/uncharge)
pub mod object; // Diretório global e objetos base
pub mod session; // Sessões ("object files") e registros de referência

pub use accounting::{AccountingDenied, MemAccounting, QuotaAccounting, UnlimitedAccounting};
pub use config::{DirectoryConfig, KeyPolicy};
pub use error::{ObjectError, ObjectResult};
pub use object::{BaseObject, BaseRef, KObject, ObjectDirectory, ObjectKey, ObjectType, RefKind, RefKinds};
pub use session::{Session, SessionId};

/// Executa todas as suítes de self-test do registro.
///
/// Retorna o total de falhas. Pensado para ser chamado pelo kernel que
/// embute o crate durante o boot (feature `self_test`).
#[cfg(any(test, feature = "self_test"))]
pub fn run_self_tests() -> usize {
    let (_, accounting_failed, _) = accounting::test::run_accounting_tests();
    let (_, object_failed, _) = object::test::run_object_tests();
    let (_, session_failed, _) = session::test::run_session_tests();
    accounting_failed + object_failed + session_failed
}
