//! # KLib - Utilitários Internos
//!
//! Infraestrutura compartilhada pelos módulos do registro.

pub mod test_framework;
