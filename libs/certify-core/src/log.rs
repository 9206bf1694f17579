//! log_msg!() vs ~console!()~ macro
//! ---
//!
//! Debug messages are wanted in few places:
//!
//! 1. Certify contract release deployed to Nitro node, then all logging is disabled.
//!
//! 2. Certify contract with `stylus-debug` feature deployed to Nitro node, then
//!    `stylus_sdk::console!()` prints messages into Nitro log.
//!
//! 3. Unit tests and the off-chain client with `debug` feature, then `println!()`
//!    is used, as ~`console!()`~ will SIGSEGV or fail to link outside of Nitro.
//!

#[cfg(all(
    feature = "debug",
    not(feature = "stylus-debug"),
    any(feature = "stylus-test", not(feature = "stylus"))
))]
pub fn print_msg(msg: &str) {
    println!("{}", msg);
}

#[cfg(all(
    feature = "debug",
    not(feature = "stylus-debug"),
    any(feature = "stylus-test", not(feature = "stylus"))
))]
#[macro_export]
macro_rules! log_msg {
    ($fmt:literal $(, $args:expr)*) => {
        $crate::log::print_msg(&format!($fmt $(, $args)*));
    };
}

#[cfg(all(feature = "stylus-debug", not(feature = "stylus-test")))]
#[macro_export]
macro_rules! log_msg {
    ($fmt:literal $(, $args:expr)*) => {
        stylus_sdk::console!($fmt $(, $args)*);
    };
}

#[cfg(not(any(
    all(
        feature = "debug",
        not(feature = "stylus-debug"),
        any(feature = "stylus-test", not(feature = "stylus"))
    ),
    all(feature = "stylus-debug", not(feature = "stylus-test"))
)))]
#[macro_export]
macro_rules! log_msg {
    ($($t:tt)*) => {};
}
