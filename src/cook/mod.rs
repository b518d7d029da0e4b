//! Guided cook mode: step navigation, one step timer, and per-step
//! ingredient checklists.

mod narration;
mod session;
mod ticker;
mod timer;

pub use narration::{LogNarrator, Narrator, SilentNarrator};
pub use session::CookSession;
pub use ticker::{Ticker, TICK_PERIOD};
pub use timer::Timer;
