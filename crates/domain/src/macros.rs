//! Macro for implementing Display and FromStr for status enums
//!
//! Generates both conversions from a single variant/string table so wire
//! values and display values can never drift apart. Parsing is
//! case-insensitive and unknown values are rejected with
//! [`AgendaError::InvalidInput`](crate::AgendaError::InvalidInput).
//!
//! # Example
//!
//! ```rust
//! use agendaflow_domain::ConfirmationStatus;
//!
//! assert_eq!(ConfirmationStatus::Declined.to_string(), "declined");
//! assert_eq!("CONFIRMED".parse::<ConfirmationStatus>().unwrap(), ConfirmationStatus::Confirmed);
//! assert!("maybe".parse::<ConfirmationStatus>().is_err());
//! ```

/// Implements Display and FromStr traits for status enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of this value.
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
            type Err = $crate::AgendaError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::AgendaError::InvalidInput(format!(
                        "Invalid {}: {}",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}
