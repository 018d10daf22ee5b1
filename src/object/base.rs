//! # Base Object
//!
//! Objeto base registrado no diretório e o handle de referência que o
//! mantém vivo.
//!
//! ## Contagem
//!
//! O `RefCount` do objeto é a contagem LÓGICA de referências (registros de
//! sessão + handles temporários). O `Arc` só garante que a memória não suma
//! enquanto alguém ainda olha para o objeto; destruição lógica acontece na
//! transição 1 → 0 do `RefCount`, sob o lock do diretório.

use super::directory::ObjectDirectory;
use super::handle::ObjectKey;
use super::kind::ObjectType;
use super::kobject::KObject;
use super::refcount::RefCount;
use crate::session::{Session, SessionId};
use alloc::sync::{Arc, Weak};
use core::ops::Deref;

/// Objeto base: recurso + contagem de referências + metadados de acesso.
pub struct BaseObject {
    key: ObjectKey,
    refcount: RefCount,
    shareable: bool,
    object_type: ObjectType,
    owner_id: SessionId,
    /// Back-reference fraca: não mantém a sessão viva
    owner: Weak<Session>,
    resource: Arc<dyn KObject>,
}

impl BaseObject {
    /// Cria objeto com uma referência inicial (de quem registra)
    pub(crate) fn new(
        key: ObjectKey,
        owner: &Arc<Session>,
        resource: Arc<dyn KObject>,
        shareable: bool,
        object_type: ObjectType,
    ) -> Self {
        Self {
            key,
            refcount: RefCount::new(1),
            shareable,
            object_type,
            owner_id: owner.id(),
            owner: Arc::downgrade(owner),
            resource,
        }
    }

    /// Chave global do objeto
    #[inline]
    pub fn key(&self) -> ObjectKey {
        self.key
    }

    /// Contagem de referências atual (relaxada)
    #[inline]
    pub fn ref_count(&self) -> usize {
        self.refcount.get()
    }

    pub fn is_shareable(&self) -> bool {
        self.shareable
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// ID da sessão que registrou o objeto
    pub fn owner_id(&self) -> SessionId {
        self.owner_id
    }

    /// Sessão que registrou o objeto, se ainda estiver viva
    pub fn owner(&self) -> Option<Arc<Session>> {
        self.owner.upgrade()
    }

    /// Verifica se `session` pode ver este objeto
    pub fn visible_to(&self, session: SessionId) -> bool {
        self.shareable || self.owner_id == session
    }

    /// Recurso subjacente
    pub fn resource(&self) -> &Arc<dyn KObject> {
        &self.resource
    }

    pub fn type_name(&self) -> &'static str {
        self.resource.type_name()
    }

    #[inline]
    pub(crate) fn refcount(&self) -> &RefCount {
        &self.refcount
    }
}

impl core::fmt::Debug for BaseObject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BaseObject")
            .field("key", &self.key)
            .field("refcount", &self.refcount.get())
            .field("shareable", &self.shareable)
            .field("object_type", &self.object_type)
            .field("owner_id", &self.owner_id)
            .field("resource", &self.resource.type_name())
            .finish()
    }
}

// =============================================================================
// BASE REF
// =============================================================================

/// Uma referência contada a um objeto base.
///
/// Retornada por `ObjectDirectory::lookup`. Quem recebe deve convertê-la em
/// registro de sessão (`Session::add_ref`) ou soltá-la (`release` ou drop).
/// Soltar pode disparar a destruição do objeto.
pub struct BaseRef {
    directory: Arc<ObjectDirectory>,
    base: Arc<BaseObject>,
    /// `false` depois que a referência foi consumida sem passar pelo release
    armed: bool,
}

impl BaseRef {
    /// Embrulha uma referência JÁ contada em `base.refcount`.
    pub(crate) fn adopt(directory: Arc<ObjectDirectory>, base: Arc<BaseObject>) -> Self {
        Self {
            directory,
            base,
            armed: true,
        }
    }

    /// Toma uma referência extra a partir desta.
    pub fn duplicate(&self) -> BaseRef {
        self.base.refcount().inc();
        Self::adopt(Arc::clone(&self.directory), Arc::clone(&self.base))
    }

    /// Solta a referência (release_base_reference).
    pub fn release(self) {
        drop(self);
    }

    /// Objeto referenciado
    pub fn object(&self) -> &Arc<BaseObject> {
        &self.base
    }

    /// Diretório ao qual o objeto pertence
    pub fn directory(&self) -> &Arc<ObjectDirectory> {
        &self.directory
    }

    /// Desarma o handle e devolve o objeto, sem soltar a referência.
    /// Quem chama passa a ser dono dessa contagem.
    pub(crate) fn into_unreleased(mut self) -> Arc<BaseObject> {
        self.armed = false;
        Arc::clone(&self.base)
    }
}

impl Deref for BaseRef {
    type Target = BaseObject;

    fn deref(&self) -> &BaseObject {
        &self.base
    }
}

impl Drop for BaseRef {
    fn drop(&mut self) {
        if self.armed {
            self.directory.release_base(&self.base);
        }
    }
}

impl core::fmt::Debug for BaseRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("BaseRef").field(&*self.base).finish()
    }
}
