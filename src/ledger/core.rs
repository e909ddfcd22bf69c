// One module per ledger operating on the shared state, plus the guard
// predicates and the call dispatcher.
pub mod apply;
pub mod events;
pub mod fungible;
pub mod guard;
pub mod registry;
pub mod state;

pub use apply::*;
pub use events::*;
pub use guard::*;
pub use state::*;
