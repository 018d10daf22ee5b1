//! # Session - Escopo de Referências por Cliente
//!
//! Uma sessão ("object file") por conexão de cliente. Guarda, por tipo de
//! referência, quais objetos base o cliente segura, e derruba tudo quando
//! é fechada.
//!
//! ## Estrutura
//!
//! ```text
//! Session
//!   ├── state (spin::Mutex)
//!   │     ├── tables[RefKind]  key → RefRecord
//!   │     └── records          seq → (kind, key)   (ordem de criação)
//!   └── closed
//! ```
//!
//! Um registro está em `records` se e somente se está em `tables[kind]`:
//! as duas estruturas só mudam juntas, sob o mesmo lock.
//!
//! ## Regras de lock
//!
//! - Nenhuma `BaseRef` é solta com o lock da sessão adquirido (soltar pode
//!   pegar o lock do diretório e rodar callbacks do recurso).
//! - Hooks `on_ref_kind_released` rodam com o lock liberado.

pub mod record;


use crate::error::{ObjectError, ObjectResult};
use crate::object::{BaseRef, ObjectDirectory, ObjectKey, RefKind, RefKinds};
use alloc::collections::btree_map::Entry;
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use record::RefRecord;
pub use record::REF_RECORD_CHARGE;
use spin::Mutex;

// =============================================================================
// SESSION ID
// =============================================================================

/// Identificador único de sessão
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Gera um novo ID único
    fn generate() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Estado protegido pelo lock da sessão
struct SessionState {
    /// Uma tabela por tipo de referência
    tables: [BTreeMap<ObjectKey, RefRecord>; RefKind::COUNT],
    /// Todos os registros vivos, em ordem de criação
    records: BTreeMap<u64, (RefKind, ObjectKey)>,
    /// Próxima posição na lista
    next_seq: u64,
}

impl SessionState {
    fn new() -> Self {
        Self {
            tables: [BTreeMap::new(), BTreeMap::new(), BTreeMap::new()],
            records: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

/// Escopo de referências de um cliente
pub struct Session {
    id: SessionId,
    directory: Arc<ObjectDirectory>,
    state: Mutex<SessionState>,
    closed: AtomicBool,
}

impl Session {
    /// Abre uma sessão vazia sobre `directory`
    pub fn open(directory: &Arc<ObjectDirectory>) -> Arc<Self> {
        let session = Arc::new(Self {
            id: SessionId::generate(),
            directory: Arc::clone(directory),
            state: Mutex::new(SessionState::new()),
            closed: AtomicBool::new(false),
        });
        crate::kdebug!("(Session) Sessão {} aberta", session.id);
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn directory(&self) -> &Arc<ObjectDirectory> {
        &self.directory
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    // =========================================================================
    // AQUISIÇÃO
    // =========================================================================

    /// Procura `key` no diretório e adquire uma referência do tipo `kind`.
    ///
    /// Retorna `existed`: `true` se a sessão já tinha um registro para
    /// (key, kind) e só o contador interno subiu.
    pub fn acquire(&self, key: ObjectKey, kind: RefKind) -> ObjectResult<bool> {
        self.ensure_open()?;

        // Registro existente: nem precisa passar pelo diretório
        if self.bump_existing(key, kind) {
            return Ok(true);
        }

        let base = self
            .directory
            .lookup(self, key)
            .ok_or(ObjectError::NotFound)?;
        // A referência temporária do lookup é solta no fim do escopo
        self.add_ref(&base, kind)
    }

    /// Adquire uma referência do tipo `kind` a um objeto que quem chama já
    /// segura.
    ///
    /// N chamadas sem release intermediário produzem um único registro com
    /// contador interno N e UM incremento na contagem do objeto base.
    pub fn add_ref(&self, base: &BaseRef, kind: RefKind) -> ObjectResult<bool> {
        self.ensure_open()?;
        debug_assert!(
            Arc::ptr_eq(base.directory(), &self.directory),
            "objeto de outro diretório"
        );

        let key = base.key();
        loop {
            if self.bump_existing(key, kind) {
                return Ok(true);
            }

            // Sem lock: cobra a contabilidade e toma a referência do registro
            self.directory.accounting().charge(REF_RECORD_CHARGE)?;
            let held = base.duplicate();

            let mut state = self.state.lock();
            if state.tables[kind.index()].contains_key(&key) {
                // Outro thread inseriu o mesmo (key, kind): descarta e repete
                drop(state);
                drop(held);
                self.directory.accounting().uncharge(REF_RECORD_CHARGE);
                crate::ktrace!(
                    "(Session) {} corrida em key={} {}, repetindo",
                    self.id,
                    key,
                    kind.name()
                );
                continue;
            }

            let seq = state.next_seq;
            state.next_seq += 1;
            state.tables[kind.index()].insert(key, RefRecord::new(kind, held, seq));
            state.records.insert(seq, (kind, key));
            drop(state);

            crate::kdebug!(
                "(Session) {} novo registro key={} {} refcount={}",
                self.id,
                key,
                kind.name(),
                base.ref_count()
            );
            return Ok(false);
        }
    }

    /// Incrementa o registro (key, kind) se ele existir
    fn bump_existing(&self, key: ObjectKey, kind: RefKind) -> bool {
        let state = self.state.lock();
        match state.tables[kind.index()].get(&key) {
            Some(record) => {
                let prev = record.count.inc();
                crate::ktrace!(
                    "(Session) {} key={} {} count={}",
                    self.id,
                    key,
                    kind.name(),
                    prev + 1
                );
                true
            }
            None => false,
        }
    }

    fn ensure_open(&self) -> ObjectResult<()> {
        if self.is_closed() {
            crate::kwarn!("(Session) {} já fechada", self.id);
            return Err(ObjectError::SessionClosed);
        }
        Ok(())
    }

    // =========================================================================
    // LIBERAÇÃO
    // =========================================================================

    /// Libera uma aquisição de (key, kind).
    ///
    /// Quando o contador interno chega a zero o registro sai da sessão, o
    /// hook de tipo roda (exceto para `Usage`) e a referência ao objeto base
    /// é solta, o que pode destruí-lo.
    pub fn release(&self, key: ObjectKey, kind: RefKind) -> ObjectResult<()> {
        let record = {
            let mut state = self.state.lock();
            let record = match state.tables[kind.index()].entry(key) {
                Entry::Vacant(_) => return Err(ObjectError::NotFound),
                Entry::Occupied(entry) => {
                    if !entry.get().count.dec() {
                        crate::ktrace!(
                            "(Session) {} key={} {} count={}",
                            self.id,
                            key,
                            kind.name(),
                            entry.get().count.get()
                        );
                        return Ok(());
                    }
                    entry.remove()
                }
            };
            state.records.remove(&record.seq);
            record
        };

        self.finish_record(record);
        Ok(())
    }

    /// Derruba um registro já removido das estruturas da sessão.
    /// Chamado SEM o lock da sessão.
    fn finish_record(&self, record: RefRecord) {
        let RefRecord { kind, base, .. } = record;
        crate::kdebug!(
            "(Session) {} solta registro key={} {}",
            self.id,
            base.key(),
            kind.name()
        );

        if kind != RefKind::Usage {
            base.resource().on_ref_kind_released(kind);
        }
        base.release();
        self.directory.accounting().uncharge(REF_RECORD_CHARGE);
    }

    // =========================================================================
    // FECHAMENTO
    // =========================================================================

    /// Fecha a sessão, soltando todos os registros que ela ainda segura.
    ///
    /// Cada registro sai inteiro, independente do contador interno. Quem
    /// chama garante que nenhuma aquisição/liberação concorre com o close.
    /// Chamadas repetidas não fazem nada.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let mut drained = 0usize;
        loop {
            let record = {
                let mut state = self.state.lock();
                let Some((_, (kind, key))) = state.records.pop_first() else {
                    break;
                };
                match state.tables[kind.index()].remove(&key) {
                    Some(record) => record,
                    None => {
                        crate::kerror!(
                            "(Session) {} lista e tabela inconsistentes em key={} {}",
                            self.id,
                            key,
                            kind.name()
                        );
                        continue;
                    }
                }
            };
            self.finish_record(record);
            drained += 1;
        }

        let mut state = self.state.lock();
        for table in state.tables.iter_mut() {
            table.clear();
        }
        drop(state);

        crate::kinfo!(
            "(Session) Sessão {} fechada, {} registros soltos",
            self.id,
            drained
        );
    }

    // =========================================================================
    // CONSULTAS
    // =========================================================================

    /// Contador interno do registro (key, kind), se existir
    pub fn ref_count(&self, key: ObjectKey, kind: RefKind) -> Option<usize> {
        self.state.lock().tables[kind.index()]
            .get(&key)
            .map(|record| record.count.get())
    }

    /// Tipos de referência que a sessão segura para `key`
    pub fn held_kinds(&self, key: ObjectKey) -> RefKinds {
        let state = self.state.lock();
        RefKind::all()
            .iter()
            .filter(|kind| state.tables[kind.index()].contains_key(&key))
            .fold(RefKinds::empty(), |acc, kind| acc | kind.flag())
    }

    /// Número de registros vivos
    pub fn record_count(&self) -> usize {
        self.state.lock().records.len()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("records", &self.record_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}
