//! Macros para declarar value objects con su esquema.
//!
//! Exportadas en la raíz del crate para poder usarlas como:
//!   use boxed_builder::value_object;

/// Declara un struct serializable junto con su `ValueObject` (esquema
/// estático construido una sola vez).
///
/// Cada campo indica su tipo Rust y su `FieldKind`. Un campo con `= default`
/// es opcional; sin default es obligatorio. El crate que usa la macro
/// necesita `serde` como dependencia (igual que los derives).
///
/// ```ignore
/// value_object! {
///     #[derive(Debug, PartialEq)]
///     pub struct Student {
///         pub name: String as String,
///         pub location: String as String,
///         pub age: Option<u32> as Number = None::<u32>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! value_object {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $fty:ty as $kind:ident $(= $default:expr)? ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(serde::Serialize, serde::Deserialize)]
        $vis struct $name { $( $(#[$fmeta])* $fvis $field : $fty ),+ }

        impl $crate::ValueObject for $name {
            fn schema() -> &'static $crate::Schema {
                static SCHEMA: $crate::__private::Lazy<$crate::Schema> = $crate::__private::Lazy::new(|| {
                    $crate::Schema::new()
                        $( .field($crate::__field_spec!($field, $kind $(, $default)?)) )+
                });
                &SCHEMA
            }

            fn type_name() -> &'static str {
                stringify!($name)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_spec {
    ($field:ident, $kind:ident) => {
        $crate::FieldSpec::required(stringify!($field), $crate::FieldKind::$kind)
    };
    ($field:ident, $kind:ident, $default:expr) => {
        $crate::FieldSpec::optional(stringify!($field),
                                    $crate::FieldKind::$kind,
                                    $crate::__private::to_default(&$default))
    };
}
