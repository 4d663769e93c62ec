//! Macros utilitarias.
//!
//! Exportadas en la raíz del crate para poder usarlas como:
//!   use boxed_core::args;

/// Construye la lista de argumentos (`Args`) de una llamada a partir de
/// expresiones convertibles a `serde_json::Value`.
///
/// ```
/// use boxed_core::args;
/// let a = args![10, "x", true];
/// assert_eq!(a.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::__private::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::__private::Value::from($arg)),+]
    };
}
