//! # Object - Diretório Global de Objetos Base
//!
//! Todo recurso compartilhável entre sessões é registrado aqui como um
//! objeto base com contagem de referências e chave global.

pub mod base;
pub mod directory;
pub mod handle;
pub mod kind;
pub mod kobject;
pub mod refcount;

#[cfg(any(test, feature = "self_test"))]
pub mod test;

pub use base::{BaseObject, BaseRef};
pub use directory::ObjectDirectory;
pub use handle::ObjectKey;
pub use kind::{ObjectType, RefKind, RefKinds};
pub use kobject::KObject;
pub use refcount::RefCount;
