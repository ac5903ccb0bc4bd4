macro_rules! instrument {
    ($name:ident) => {
        ::cfg_if::cfg_if! {
            if #[cfg(feature = "tracing")] {
                ::paste::paste! {
                    let [<_ $name _entered>] = ::tracing::trace_span!(stringify!($name)).entered();
                }
            }
        }
    };
    ($name:ident, $($field:tt)+) => {
        ::cfg_if::cfg_if! {
            if #[cfg(feature = "tracing")] {
                ::paste::paste! {
                    let [<_ $name _entered>] =
                        ::tracing::trace_span!(stringify!($name), $($field)+).entered();
                }
            }
        }
    };
}
pub(crate) use instrument;

macro_rules! trace {
    ($($arg:tt)+) => {
        ::cfg_if::cfg_if! {
            if #[cfg(feature = "tracing")] {
                ::tracing::trace!($($arg)+);
            }
        }
    };
}
pub(crate) use trace;
