pub use smarty_core::error::{SmartyError, SmartyResult};
