pub mod completion;
pub mod diagnostics;
pub mod live;
pub mod position;
