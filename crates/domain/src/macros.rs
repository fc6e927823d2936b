//! Macro for implementing string conversions on closed domain enums
//!
//! Entity and provider-type enums travel through logs, config files and
//! persisted property snapshots as lowercase strings. This macro generates a
//! single mapping used by `as_str`, `Display` and `FromStr`.
//!
//! # Example
//!
//! ```rust
//! use forgeprops_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum HookKind {
//!     Repository,
//!     Organization,
//! }
//!
//! impl_domain_enum_conversions!(HookKind {
//!     Repository => "repository",
//!     Organization => "organization",
//! });
//!
//! assert_eq!(HookKind::Organization.to_string(), "organization");
//! assert_eq!("REPOSITORY".parse::<HookKind>(), Ok(HookKind::Repository));
//! assert_eq!(HookKind::ALL.len(), 2);
//! ```

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for a closed enum
///
/// This macro generates:
/// - `ALL`: every variant in declaration order
/// - `as_str`: the canonical lowercase representation
/// - Display trait: writes `as_str`
/// - FromStr trait: parses case-insensitive strings to enum variants
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical string representation.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
