//! Tipos de referência e classes de objeto

// =============================================================================
// TIPOS DE REFERÊNCIA
// =============================================================================

/// Por que uma sessão segura uma referência a um objeto
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum RefKind {
    /// Uso normal. Tipo privilegiado: liberar não chama o hook de tipo.
    Usage = 0,
    /// Acesso de leitura sincronizado com a CPU
    SyncCpuRead = 1,
    /// Acesso de escrita sincronizado com a CPU
    SyncCpuWrite = 2,
}

impl RefKind {
    /// Número de tipos (uma tabela por tipo em cada sessão)
    pub const COUNT: usize = 3;

    /// Índice da tabela da sessão
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Converte de u8
    pub const fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Self::Usage),
            1 => Some(Self::SyncCpuRead),
            2 => Some(Self::SyncCpuWrite),
            _ => None,
        }
    }

    /// Nome legível
    pub const fn name(self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::SyncCpuRead => "synccpu-read",
            Self::SyncCpuWrite => "synccpu-write",
        }
    }

    /// Flag correspondente em `RefKinds`
    pub const fn flag(self) -> RefKinds {
        match self {
            Self::Usage => RefKinds::USAGE,
            Self::SyncCpuRead => RefKinds::SYNCCPU_READ,
            Self::SyncCpuWrite => RefKinds::SYNCCPU_WRITE,
        }
    }

    /// Todos os tipos
    pub const fn all() -> &'static [Self] {
        &[Self::Usage, Self::SyncCpuRead, Self::SyncCpuWrite]
    }
}

bitflags::bitflags! {
    /// Conjunto de tipos de referência que uma sessão segura para uma chave
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RefKinds: u8 {
        const USAGE         = 1 << 0;
        const SYNCCPU_READ  = 1 << 1;
        const SYNCCPU_WRITE = 1 << 2;
    }
}

impl RefKinds {
    /// Referências de sincronização com a CPU (leitura ou escrita)
    pub const SYNCCPU: Self = Self::SYNCCPU_READ.union(Self::SYNCCPU_WRITE);
}

// =============================================================================
// CLASSES DE OBJETO
// =============================================================================

/// Classificador opaco do recurso (o registro não interpreta)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectType {
    Fence = 0,
    Buffer = 1,
    Lock = 2,
    Driver0 = 3,
    Driver1 = 4,
    Driver2 = 5,
    Driver3 = 6,
    Driver4 = 7,
    Driver5 = 8,
}

impl ObjectType {
    /// Converte de u8
    pub const fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Self::Fence),
            1 => Some(Self::Buffer),
            2 => Some(Self::Lock),
            3 => Some(Self::Driver0),
            4 => Some(Self::Driver1),
            5 => Some(Self::Driver2),
            6 => Some(Self::Driver3),
            7 => Some(Self::Driver4),
            8 => Some(Self::Driver5),
            _ => None,
        }
    }

    /// Nome legível
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fence => "fence",
            Self::Buffer => "buffer",
            Self::Lock => "lock",
            Self::Driver0 => "driver0",
            Self::Driver1 => "driver1",
            Self::Driver2 => "driver2",
            Self::Driver3 => "driver3",
            Self::Driver4 => "driver4",
            Self::Driver5 => "driver5",
        }
    }
}
