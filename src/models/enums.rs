use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr + wire serde names
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(OperationKind {
    Import => "import",
    Export => "export",
});

impl OperationKind {
    /// Prefix used in generated process codes.
    pub fn code_prefix(&self) -> &'static str {
        match self {
            Self::Import => "IMP",
            Self::Export => "EXP",
        }
    }
}

str_enum!(DocumentStatus {
    Pending => "Pendente",
    Validated => "Validado",
    Rejected => "Rejeitado",
    Sent => "Enviado",
});

str_enum!(NotificationKind {
    Success => "success",
    Warning => "warning",
    Info => "info",
});

str_enum!(TransactionKind {
    Credit => "credit",
    Debit => "debit",
});
