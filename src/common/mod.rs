mod fs;
mod io;

pub(crate) use fs::*;
pub(crate) use io::*;
