//! Event protocol through the manager, without a front-end.

mod forwarding;
mod input;
mod properties;
