mod record;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Record)] derive macro
// ============================================================================

/// Derive macro for the `Record` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Debug, Serialize, Deserialize, Record)]
/// #[record(collection = "cars", key = "@CarApp:cars")]
/// struct Car {
///     #[record(id)]
///     pub id: RecordId,
///     pub brand_car: String,
/// }
/// ```
///
/// - `#[record(collection = "...")]` sets the collection name.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[record(key = "...")]` sets the persistence key the collection is
///   mirrored under. If omitted, defaults to the collection name.
/// - `#[record(id)]` marks the `RecordId` field used as the identifier.
///   If omitted, defaults to a field named `id`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
