pub mod conversation;
pub mod enums;
pub mod identity;
pub mod records;
pub mod results;

pub use conversation::*;
pub use enums::*;
pub use identity::*;
pub use records::*;
pub use results::*;
