//! # Object Directory
//!
//! Diretório global (um por dispositivo) que mapeia chave → objeto base.
//!
//! ## Protocolo da transição a zero
//!
//! ```text
//! release_base(obj)
//!   ├── dec_not_last() ok?  → fim (não era a última, sem lock)
//!   └── lock(diretório)
//!         ├── dec() != 0     → fim (um lookup subiu a contagem antes do lock)
//!         ├── remove(key)    ← mesma seção crítica da transição 1 → 0
//!         └── unlock → on_zero_reference()
//!
//! lookup(key)
//!   └── lock(diretório) → get(key) → inc_not_zero()
//! ```
//!
//! Como a remoção e a transição acontecem sob o mesmo lock que o lookup
//! usa, uma chave que chegou a zero nunca é devolvida de novo.

use super::base::{BaseObject, BaseRef};
use super::handle::ObjectKey;
use super::kind::{ObjectType, RefKind};
use super::kobject::KObject;
use crate::accounting::MemAccounting;
use crate::config::{DirectoryConfig, KEY_MASK};
use crate::error::{ObjectError, ObjectResult};
use crate::session::Session;
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use spin::Mutex;

/// Estado protegido pelo lock do diretório
struct ObjectTable {
    /// Objetos por chave
    objects: BTreeMap<ObjectKey, Arc<BaseObject>>,
    /// Próximo valor do contador de chaves
    next_key: u32,
}

/// Diretório global de objetos base
pub struct ObjectDirectory {
    table: Mutex<ObjectTable>,
    /// Objetos presentes no diretório (atualizado sob o lock)
    object_count: AtomicUsize,
    accounting: Arc<dyn MemAccounting>,
    config: DirectoryConfig,
}

impl ObjectDirectory {
    /// Cria diretório vazio
    pub fn new(accounting: Arc<dyn MemAccounting>, config: DirectoryConfig) -> Arc<Self> {
        crate::kdebug!(
            "(Object) Diretório criado: max_objects={} policy={:?}",
            config.max_objects,
            config.key_policy
        );
        Arc::new(Self {
            table: Mutex::new(ObjectTable {
                objects: BTreeMap::new(),
                next_key: 1,
            }),
            object_count: AtomicUsize::new(0),
            accounting,
            config,
        })
    }

    /// Contabilidade usada para os registros de referência
    pub fn accounting(&self) -> &Arc<dyn MemAccounting> {
        &self.accounting
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Número de objetos presentes no diretório
    pub fn object_count(&self) -> usize {
        self.object_count.load(Ordering::Relaxed)
    }

    /// Verifica se a chave está no diretório
    pub fn contains(&self, key: ObjectKey) -> bool {
        self.table.lock().objects.contains_key(&key)
    }

    /// Lê a contagem de referências sem tomar referência (diagnóstico)
    pub fn peek_ref_count(&self, key: ObjectKey) -> Option<usize> {
        self.table.lock().objects.get(&key).map(|obj| obj.ref_count())
    }

    /// Chaves presentes, em ordem
    pub fn keys(&self) -> Vec<ObjectKey> {
        self.table.lock().objects.keys().copied().collect()
    }

    // =========================================================================
    // REGISTRO
    // =========================================================================

    /// Registra `resource` como objeto base em nome de `session`.
    ///
    /// Em caso de sucesso o objeto tem contagem 1, mantida pelo registro
    /// `Usage` que a sessão recebe.
    pub fn register(
        self: &Arc<Self>,
        session: &Arc<Session>,
        resource: Arc<dyn KObject>,
        shareable: bool,
        object_type: ObjectType,
    ) -> ObjectResult<ObjectKey> {
        debug_assert!(
            Arc::ptr_eq(session.directory(), self),
            "sessão de outro diretório"
        );

        // 1-2. Objeto com contagem 1, inserido sob chave nova
        let base = {
            let mut table = self.table.lock();
            let key = self.alloc_key(&mut table)?;
            let base = Arc::new(BaseObject::new(
                key,
                session,
                resource,
                shareable,
                object_type,
            ));
            table.objects.insert(key, Arc::clone(&base));
            self.object_count.fetch_add(1, Ordering::Relaxed);
            base
        };
        let key = base.key();
        let type_name = base.type_name();
        let initial = BaseRef::adopt(Arc::clone(self), base);

        // 3. Registro Usage da sessão criadora
        if let Err(err) = session.add_ref(&initial, RefKind::Usage) {
            crate::kwarn!("(Object) Registro de key={} falhou: {}", key, err);
            self.discard_unpublished(initial);
            return Err(err);
        }

        // 4. A referência inicial é redundante com a do registro Usage
        initial.release();

        crate::kinfo!(
            "(Object) Registrado key={} tipo={} ({}) shareable={} sessão={}",
            key,
            object_type.name(),
            type_name,
            shareable,
            session.id()
        );
        Ok(key)
    }

    /// Aloca chave livre. Chamado com o lock do diretório adquirido.
    fn alloc_key(&self, table: &mut ObjectTable) -> ObjectResult<ObjectKey> {
        if table.objects.len() >= self.config.max_objects {
            crate::kwarn!(
                "(Object) Diretório cheio ({} objetos)",
                table.objects.len()
            );
            return Err(ObjectError::DirectoryFull);
        }

        for _ in 0..self.config.max_probes {
            let counter = table.next_key;
            table.next_key = table.next_key.wrapping_add(1) & KEY_MASK;

            let key = ObjectKey::new(self.config.key_policy.apply(counter));
            if !key.is_valid() {
                continue;
            }
            if !table.objects.contains_key(&key) {
                return Ok(key);
            }
            crate::ktrace!("(Object) Colisão de chave {}, tentando próxima", key);
        }

        crate::kwarn!(
            "(Object) Nenhuma chave livre em {} tentativas",
            self.config.max_probes
        );
        Err(ObjectError::KeyCollision)
    }

    /// Desfaz um registro que não chegou a ter dono.
    ///
    /// Remove a chave e consome a referência inicial sem chamar
    /// `on_zero_reference`. Se um lookup concorrente pegou o objeto nesse
    /// meio tempo, a última liberação dele segue o caminho normal.
    fn discard_unpublished(&self, initial: BaseRef) {
        let base = initial.into_unreleased();
        let mut table = self.table.lock();
        if remove_if_same(&mut table, &base) {
            self.object_count.fetch_sub(1, Ordering::Relaxed);
        }
        if base.refcount().dec() {
            crate::kdebug!("(Object) key={} descartado antes de publicar", base.key());
        }
    }

    // =========================================================================
    // LOOKUP / RELEASE
    // =========================================================================

    /// Procura `key` e toma uma referência.
    ///
    /// Devolve `None` se a chave não existe, se o objeto já está sendo
    /// destruído, ou se ele não é compartilhável e `session` não é a dona.
    /// Os três casos são indistinguíveis para quem chama.
    pub fn lookup(self: &Arc<Self>, session: &Session, key: ObjectKey) -> Option<BaseRef> {
        let base = {
            let table = self.table.lock();
            let base = table.objects.get(&key)?;
            if !base.refcount().inc_not_zero() {
                crate::ktrace!("(Object) lookup key={} perdeu a corrida para o release", key);
                return None;
            }
            Arc::clone(base)
        };
        let handle = BaseRef::adopt(Arc::clone(self), base);

        if !handle.visible_to(session.id()) {
            crate::kwarn!(
                "(Object) Sessão {} tentou acessar objeto não compartilhável key={}",
                session.id(),
                key
            );
            handle.release();
            return None;
        }

        crate::ktrace!(
            "(Object) lookup key={} refcount={}",
            key,
            handle.ref_count()
        );
        Some(handle)
    }

    /// Solta uma referência de `base` (chamado pelo drop de `BaseRef`).
    pub(crate) fn release_base(&self, base: &Arc<BaseObject>) {
        // Caminho rápido: não é a última referência
        if base.refcount().dec_not_last() {
            crate::ktrace!(
                "(Object) release key={} refcount={}",
                base.key(),
                base.ref_count()
            );
            return;
        }

        let mut table = self.table.lock();
        if !base.refcount().dec() {
            // Um lookup subiu a contagem entre o caminho rápido e o lock
            return;
        }
        if remove_if_same(&mut table, base) {
            self.object_count.fetch_sub(1, Ordering::Relaxed);
        }
        drop(table);

        crate::kdebug!(
            "(Object) key={} ({}) chegou a zero, destruindo",
            base.key(),
            base.type_name()
        );
        base.resource().on_zero_reference();
    }
}

impl Drop for ObjectDirectory {
    fn drop(&mut self) {
        // Todo objeto presente é segurado por um RefRecord ou BaseRef, e cada
        // um deles mantém um Arc do diretório: com objetos no mapa o drop
        // não acontece (salvo mem::forget).
        debug_assert!(
            self.table.get_mut().objects.is_empty(),
            "diretório destruído com objetos registrados"
        );
    }
}

/// Remove `base` do mapa apenas se a entrada da chave for o próprio objeto.
fn remove_if_same(table: &mut ObjectTable, base: &Arc<BaseObject>) -> bool {
    let key = base.key();
    match table.objects.get(&key) {
        Some(current) if Arc::ptr_eq(current, base) => {
            table.objects.remove(&key);
            true
        }
        _ => false,
    }
}
