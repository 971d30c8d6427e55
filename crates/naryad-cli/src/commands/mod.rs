pub mod compose;
pub mod export;
pub mod parse;
pub mod profiles;
