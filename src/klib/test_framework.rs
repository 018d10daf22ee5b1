//! Framework de self-test do registro
//!
//! As suítes rodam tanto dentro de um kernel (feature `self_test`) quanto
//! sob `cargo test`, onde cada suíte é embrulhada em um `#[test]`.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    Fail,
    Skip,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Executa suíte de testes e retorna (passed, failed, skipped)
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> (usize, usize, usize) {
    crate::kinfo!("=== Executando suíte: {}", name);

    let mut passed = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for test in tests {
        match (test.func)() {
            TestResult::Pass => {
                crate::kok!("{}::{}", name, test.name);
                passed += 1;
            }
            TestResult::Fail => {
                crate::kfail!("{}::{}", name, test.name);
                failed += 1;
            }
            TestResult::Skip => {
                crate::kwarn!("[SKIP] {}::{}", name, test.name);
                skipped += 1;
            }
        }
    }

    crate::kinfo!(
        "=== {}: passed={} failed={} skipped={}",
        name,
        passed,
        failed,
        skipped
    );
    (passed, failed, skipped)
}

/// Falha o caso de teste atual se a condição for falsa.
///
/// ```rust
/// fn test_x() -> TestResult {
///     check!(1 + 1 == 2, "aritmética");
///     TestResult::Pass
/// }
/// ```
#[macro_export]
macro_rules! check {
    ($cond:expr, $what:expr) => {
        if !$cond {
            $crate::kerror!("(SelfTest) Falhou: {} [{}]", $what, stringify!($cond));
            return $crate::klib::test_framework::TestResult::Fail;
        }
    };
}
