#![cfg_attr(all(feature = "stylus", not(feature = "stylus-test")), no_std)]

extern crate alloc;

pub mod error;
pub mod log;
pub mod registry;
pub mod signature;
pub mod store;

pub mod interfaces {
    pub mod certify;
}
