//! Free-text name handling: shape classification and nickname detection.

pub mod nickname;
pub mod parser;

pub use nickname::{is_nickname_placeholder, match_key};
pub use parser::{parse_name, NameShape, ParsedName};
