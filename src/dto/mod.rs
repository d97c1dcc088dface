//! Request and response shapes of the remote procedure surface.

pub mod products;
