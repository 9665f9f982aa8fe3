pub mod constants;
pub mod io;
pub mod swrite;
