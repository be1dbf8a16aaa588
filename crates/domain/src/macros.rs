//! Macro for implementing Display and FromStr for wire-named enums
//!
//! Auth-client enums travel as camelCase strings (`"acquireToken"`,
//! `"handleRedirect"`). The macro keeps the wire spelling for `Display` and
//! accepts any ASCII casing when parsing.
//!
//! # Example
//!
//! ```rust
//! use authgate_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Prompt {
//!     None,
//!     SelectAccount,
//! }
//!
//! impl_wire_name_conversions!(Prompt {
//!     None => "none",
//!     SelectAccount => "selectAccount",
//! });
//!
//! assert_eq!(Prompt::SelectAccount.to_string(), "selectAccount");
//! assert_eq!("SELECTACCOUNT".parse::<Prompt>(), Ok(Prompt::SelectAccount));
//! ```

/// Implements Display and FromStr traits for enums with a fixed wire name
/// per variant.
///
/// # Features
///
/// - Case-insensitive parsing (`"acquireToken"`, `"ACQUIRETOKEN"` both work)
/// - `Display` emits the wire spelling exactly as declared
/// - Descriptive error messages with enum name
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire spelling of this variant.
            #[must_use]
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
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
