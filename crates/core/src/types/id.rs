//! Newtype IDs for type-safe entity references.
//!
//! Vendor systems hand out opaque string identifiers (Square object IDs,
//! Toast GUIDs, mock sequence IDs). Use the `define_id!` macro to create
//! wrappers that prevent accidentally passing an order ID where a shift ID
//! is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use pos_bridge_core::define_id;
/// define_id!(TicketId);
/// define_id!(TableId);
///
/// let ticket = TicketId::new("T-1");
/// let table = TableId::from("12");
///
/// assert_eq!(ticket.as_str(), "T-1");
/// // These are different types, so this won't compile:
/// // let _: TicketId = table;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying vendor identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Canonical entity IDs
define_id!(MenuItemId);
define_id!(ModifierId);
define_id!(InventoryItemId);
define_id!(EmployeeId);
define_id!(ShiftId);
define_id!(OrderId);
define_id!(OrderItemId);
define_id!(TransactionId);
define_id!(WebhookId);
