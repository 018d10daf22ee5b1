//! Testes do Diretório de Objetos

use super::{KObject, ObjectDirectory, ObjectKey, ObjectType, RefKind};
use crate::accounting::{QuotaAccounting, UnlimitedAccounting};
use crate::check;
use crate::config::{DirectoryConfig, KeyPolicy};
use crate::error::ObjectError;
use crate::klib::test_framework::{run_test_suite, TestCase, TestResult};
use crate::session::Session;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Recurso de teste que conta as chamadas de hook
pub(crate) struct CountingResource {
    zero_calls: AtomicUsize,
    kind_calls: [AtomicUsize; RefKind::COUNT],
}

impl CountingResource {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            zero_calls: AtomicUsize::new(0),
            kind_calls: [AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0)],
        })
    }

    pub(crate) fn zero_calls(&self) -> usize {
        self.zero_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn kind_calls(&self, kind: RefKind) -> usize {
        self.kind_calls[kind.index()].load(Ordering::SeqCst)
    }
}

impl KObject for CountingResource {
    fn type_name(&self) -> &'static str {
        "CountingResource"
    }

    fn on_zero_reference(&self) {
        self.zero_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn on_ref_kind_released(&self, kind: RefKind) {
        self.kind_calls[kind.index()].fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) fn unlimited_directory() -> Arc<ObjectDirectory> {
    ObjectDirectory::new(Arc::new(UnlimitedAccounting), DirectoryConfig::new())
}

/// Casos de teste do diretório
const OBJECT_TESTS: &[TestCase] = &[
    TestCase::new("shareable_lookup", test_shareable_lookup),
    TestCase::new("private_hidden_from_others", test_private_hidden_from_others),
    TestCase::new("no_resurrection", test_no_resurrection),
    TestCase::new("sequential_keys", test_sequential_keys),
    TestCase::new("scrambled_keys", test_scrambled_keys),
    TestCase::new("directory_full", test_directory_full),
    TestCase::new("probes_exhausted", test_probes_exhausted),
    TestCase::new("register_quota_denied", test_register_quota_denied),
    TestCase::new("unknown_key", test_unknown_key),
];

/// Executa todos os testes do diretório
pub fn run_object_tests() -> (usize, usize, usize) {
    run_test_suite("Object", OBJECT_TESTS)
}

fn test_shareable_lookup() -> TestResult {
    let dir = unlimited_directory();
    let owner = Session::open(&dir);
    let other = Session::open(&dir);
    let res = CountingResource::new();

    let key = match dir.register(&owner, res.clone(), true, ObjectType::Buffer) {
        Ok(key) => key,
        Err(_) => return TestResult::Fail,
    };
    check!(dir.peek_ref_count(key) == Some(1), "registro deixa contagem 1");
    check!(owner.ref_count(key, RefKind::Usage) == Some(1), "registro Usage do dono");

    let handle = dir.lookup(&other, key);
    check!(handle.is_some(), "compartilhável visível para outra sessão");
    check!(dir.peek_ref_count(key) == Some(2), "lookup toma referência");
    drop(handle);
    check!(dir.peek_ref_count(key) == Some(1), "drop solta a referência");
    check!(res.zero_calls() == 0, "objeto continua vivo");
    TestResult::Pass
}

fn test_private_hidden_from_others() -> TestResult {
    let dir = unlimited_directory();
    let owner = Session::open(&dir);
    let other = Session::open(&dir);
    let res = CountingResource::new();

    let Ok(key) = dir.register(&owner, res.clone(), false, ObjectType::Fence) else {
        return TestResult::Fail;
    };

    check!(dir.lookup(&other, key).is_none(), "privado invisível para outros");
    check!(dir.peek_ref_count(key) == Some(1), "lookup negado não vaza referência");
    check!(dir.lookup(&owner, key).is_some(), "dono enxerga o próprio objeto");
    check!(
        other.acquire(key, RefKind::Usage) == Err(ObjectError::NotFound),
        "acquire de privado vira NotFound"
    );
    TestResult::Pass
}

fn test_no_resurrection() -> TestResult {
    let dir = unlimited_directory();
    let session = Session::open(&dir);
    let res = CountingResource::new();

    let Ok(key) = dir.register(&session, res.clone(), true, ObjectType::Buffer) else {
        return TestResult::Fail;
    };
    check!(session.release(key, RefKind::Usage).is_ok(), "release do registro inicial");

    check!(res.zero_calls() == 1, "on_zero_reference exatamente uma vez");
    check!(!dir.contains(key), "chave removida");
    check!(dir.object_count() == 0, "contador de objetos zerado");
    check!(dir.lookup(&session, key).is_none(), "chave morta não volta");
    check!(
        session.acquire(key, RefKind::Usage) == Err(ObjectError::NotFound),
        "acquire de chave morta"
    );
    TestResult::Pass
}

fn test_sequential_keys() -> TestResult {
    let dir = unlimited_directory();
    let session = Session::open(&dir);

    let first = dir.register(&session, CountingResource::new(), true, ObjectType::Buffer);
    let second = dir.register(&session, CountingResource::new(), true, ObjectType::Buffer);
    check!(first == Ok(ObjectKey::new(1)), "primeira chave é 1");
    check!(second == Ok(ObjectKey::new(2)), "chaves seguem o contador");
    check!(dir.keys().len() == 2, "duas chaves presentes");
    TestResult::Pass
}

fn test_scrambled_keys() -> TestResult {
    let config = DirectoryConfig::new().with_key_policy(KeyPolicy::Scrambled);
    let dir = ObjectDirectory::new(Arc::new(UnlimitedAccounting), config);
    let session = Session::open(&dir);

    let mut previous = ObjectKey::INVALID;
    for _ in 0..32 {
        let Ok(key) = dir.register(&session, CountingResource::new(), true, ObjectType::Lock)
        else {
            return TestResult::Fail;
        };
        check!(key.is_valid(), "chave embaralhada válida");
        check!(key != previous, "chaves distintas");
        previous = key;
    }
    check!(dir.object_count() == 32, "todos registrados");
    check!(dir.keys().len() == 32, "nenhuma chave repetida");
    TestResult::Pass
}

fn test_directory_full() -> TestResult {
    let config = DirectoryConfig::new().with_max_objects(1);
    let dir = ObjectDirectory::new(Arc::new(UnlimitedAccounting), config);
    let session = Session::open(&dir);
    let res = CountingResource::new();

    check!(
        dir.register(&session, CountingResource::new(), true, ObjectType::Buffer).is_ok(),
        "primeiro cabe"
    );
    check!(
        dir.register(&session, res.clone(), true, ObjectType::Buffer)
            == Err(ObjectError::DirectoryFull),
        "segundo excede o limite"
    );
    check!(dir.object_count() == 1, "falha não deixa objeto");
    check!(session.record_count() == 1, "falha não deixa registro");
    check!(res.zero_calls() == 0, "recurso rejeitado não é destruído pelo registro");
    TestResult::Pass
}

fn test_probes_exhausted() -> TestResult {
    let config = DirectoryConfig::new().with_max_probes(0);
    let dir = ObjectDirectory::new(Arc::new(UnlimitedAccounting), config);
    let session = Session::open(&dir);

    check!(
        dir.register(&session, CountingResource::new(), true, ObjectType::Buffer)
            == Err(ObjectError::KeyCollision),
        "sem tentativas não há chave"
    );
    check!(dir.object_count() == 0, "nada inserido");
    TestResult::Pass
}

fn test_register_quota_denied() -> TestResult {
    let acct = Arc::new(QuotaAccounting::with_quota("test", 1));
    let dir = ObjectDirectory::new(acct.clone(), DirectoryConfig::new());
    let session = Session::open(&dir);
    let res = CountingResource::new();

    check!(
        dir.register(&session, res.clone(), true, ObjectType::Buffer)
            == Err(ObjectError::AllocationDenied),
        "quota recusa o registro Usage"
    );
    check!(dir.object_count() == 0, "objeto desfeito");
    check!(dir.keys().is_empty(), "chave removida");
    check!(session.record_count() == 0, "sessão continua vazia");
    check!(res.zero_calls() == 0, "sem destrutor para objeto não publicado");
    check!(acct.allocated_bytes() == 0, "nada cobrado");
    TestResult::Pass
}

fn test_unknown_key() -> TestResult {
    let dir = unlimited_directory();
    let session = Session::open(&dir);

    check!(dir.peek_ref_count(ObjectKey::new(42)).is_none(), "sem contagem");
    check!(dir.lookup(&session, ObjectKey::new(42)).is_none(), "lookup vazio");
    check!(dir.lookup(&session, ObjectKey::INVALID).is_none(), "chave 0 nunca existe");
    TestResult::Pass
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_suite_passes() {
        let (passed, failed, _) = run_object_tests();
        assert_eq!(failed, 0);
        assert_eq!(passed, OBJECT_TESTS.len());
    }

    #[test]
    fn lookup_handle_keeps_object_after_owner_release() {
        let dir = unlimited_directory();
        let session = Session::open(&dir);
        let res = CountingResource::new();

        let key = dir
            .register(&session, res.clone(), true, ObjectType::Buffer)
            .unwrap();
        let handle = dir.lookup(&session, key).unwrap();
        session.release(key, RefKind::Usage).unwrap();

        assert_eq!(res.zero_calls(), 0);
        assert_eq!(handle.ref_count(), 1);
        handle.release();
        assert_eq!(res.zero_calls(), 1);
        assert!(!dir.contains(key));
    }

    #[test]
    fn directory_outlives_every_registered_object() {
        let dir = unlimited_directory();
        let session = Session::open(&dir);
        let key = dir
            .register(&session, CountingResource::new(), true, ObjectType::Buffer)
            .unwrap();

        // Sessão + registro seguram o diretório
        assert!(Arc::strong_count(&dir) > 1);
        let handle = dir.lookup(&session, key).unwrap();
        drop(session);
        assert!(dir.contains(key));
        assert!(Arc::strong_count(&dir) > 1);

        handle.release();
        assert!(!dir.contains(key));
        assert_eq!(Arc::strong_count(&dir), 1);
        // Último Arc com o mapa vazio: o drop não dispara a asserção
        drop(dir);
    }

    #[test]
    fn owner_back_reference_is_weak() {
        let dir = unlimited_directory();
        let session = Session::open(&dir);
        let other = Session::open(&dir);

        let key = dir
            .register(&session, CountingResource::new(), true, ObjectType::Buffer)
            .unwrap();
        let handle = dir.lookup(&other, key).unwrap();
        assert_eq!(handle.owner_id(), session.id());
        assert!(handle.owner().is_some());

        drop(session);
        assert!(handle.owner().is_none());
        assert_eq!(handle.ref_count(), 1);
    }
}
