use serde::{Deserialize, Serialize};

/// Macro to generate an enum whose `as_str` and serde forms are the same string
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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
    };
}

str_enum!(SlotPeriod {
    Morning => "Morning",
    Noon => "Noon",
    Afternoon => "Afternoon",
    Evening => "Evening",
    Night => "Night",
});
