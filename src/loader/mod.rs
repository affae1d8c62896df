//! Model file loading.

pub use self::obj::{load_obj_file, parse_obj, ParseError};

pub mod obj;
