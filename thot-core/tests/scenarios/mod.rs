//! Whole documents through the textile front-end.

mod headers;
mod lists;
mod output;
mod references;
mod styles;
