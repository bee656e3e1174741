#![allow(missing_docs)]

mod readers;
pub(crate) mod util;
