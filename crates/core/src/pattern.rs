//! Lazily compiled regex constants shared by the parsing crates.

#[doc(hidden)]
pub use regex::Regex;
#[doc(hidden)]
pub use std::sync::OnceLock;

/// Declares a function returning a `&'static Regex` compiled on first use.
///
/// ```
/// hisab_core::re!(re_digits, r"\d+");
/// assert!(re_digits().is_match("Rs.400"));
/// ```
#[macro_export]
macro_rules! re {
    ($vis:vis $name:ident, $pat:expr) => {
        $vis fn $name() -> &'static $crate::pattern::Regex {
            static R: $crate::pattern::OnceLock<$crate::pattern::Regex> =
                $crate::pattern::OnceLock::new();
            R.get_or_init(|| $crate::pattern::Regex::new($pat).expect("invalid regex"))
        }
    };
}
