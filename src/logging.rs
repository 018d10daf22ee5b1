// =============================================================================
// LOGGING DO REGISTRO - ZERO OVERHEAD
// =============================================================================
//
// Mesmo esquema de níveis do kernel, mas emitindo pela fachada `log`:
// quem embute o crate registra o logger (serial, console, arquivo...).
//
// ARQUITETURA:
// - Usa features do Cargo para filtrar em tempo de compilação
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - Todas as mensagens saem com target "objref"
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Violações de invariante, estados inconsistentes
// - WARN:  Situações suspeitas mas recuperáveis (acesso negado, leaks)
// - INFO:  Fluxo normal (registro de objetos, fechamento de sessão)
// - DEBUG: Criação/destruição de registros de referência
// - TRACE: Cada incremento/decremento
//
// FEATURES:
// - no_logs:   Remove 100% dos logs
// - log_error: Apenas ERROR, WARN
// - log_info:  ERROR, WARN, INFO
// - log_debug: ERROR, WARN, INFO, DEBUG
// - log_trace: Todos os níveis (padrão)
//
// COMO USAR:
//   kinfo!("(Object) Registrado key={:#x}", key.raw());
//   kwarn!("(Session) Acesso negado a key={:#x}", key.raw());
//
// =============================================================================

/// Target usado em todas as mensagens do crate.
pub const LOG_TARGET: &str = "objref";

// =============================================================================
// MACROS DE LOG - NÍVEL ERROR
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($($arg:tt)+) => {
        $crate::__log::error!(target: $crate::logging::LOG_TARGET, $($arg)+)
    };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)+) => {
        $crate::__log::warn!(target: $crate::logging::LOG_TARGET, $($arg)+)
    };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL INFO
// =============================================================================
//
// kinfo! - Desligado apenas com no_logs ou log_error
//

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)+) => {
        $crate::__log::info!(target: $crate::logging::LOG_TARGET, $($arg)+)
    };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL DEBUG
// =============================================================================

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)+) => {
        $crate::__log::debug!(target: $crate::logging::LOG_TARGET, $($arg)+)
    };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL TRACE
// =============================================================================

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)+) => {
        $crate::__log::trace!(target: $crate::logging::LOG_TARGET, $($arg)+)
    };
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE STATUS (OK/FAIL)
// =============================================================================

/// kok! - Log de sucesso (usado pelas suítes de self-test).
#[macro_export]
macro_rules! kok {
    ($($arg:tt)+) => {
        $crate::kinfo!("[OK] {}", format_args!($($arg)+))
    };
}

/// kfail! - Log de falha (usado pelas suítes de self-test).
#[macro_export]
macro_rules! kfail {
    ($($arg:tt)+) => {
        $crate::kerror!("[FAIL] {}", format_args!($($arg)+))
    };
}
