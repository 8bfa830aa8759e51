//! Public macros for building parameter override maps.

/// Builds a [`Params`](crate::Params) map.
///
/// Keys are anything convertible into a `String`, values anything
/// convertible into a [`Value`](crate::Value).
///
/// # Examples
///
/// ```
/// use fibre_autowire::{params, Value};
///
/// let overrides = params! {
///   "inches" => 55,
///   "remote" => Value::instance_of("TVRemote"),
/// };
/// assert_eq!(overrides["inches"], Value::Int(55));
///
/// let none = params! {};
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! params {
  () => {
    $crate::Params::new()
  };

  ($($key:expr => $value:expr),+ $(,)?) => {{
    let mut params = $crate::Params::new();
    $(
      params.insert(::std::string::String::from($key), $crate::Value::from($value));
    )+
    params
  }};
}
