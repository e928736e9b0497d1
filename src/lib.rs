//! Calendar, focus timer and task list for a host workspace panel.
//!
//! The host creates a [`WidgetView`] around a mount [`Element`], calls
//! [`WidgetView::on_open`] and [`WidgetView::on_close`] with its panel
//! lifecycle, and forwards clicks as [`WidgetAction`]s. Views must be driven
//! from inside a tokio runtime.

pub mod audio;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod deferred;
pub mod host;
pub mod notes;
pub mod tasks;
pub mod timer;
pub mod ui;
mod utils;
pub mod view;

pub use audio::{default_cue_player, CuePlayer, SilentCuePlayer, ToneCue};
pub use clock::{Clock, MonotonicClock, SystemClock};
pub use config::{ConfigStore, WidgetConfig};
pub use host::{Document, DocumentStore, FsDocumentStore, MemoryDocumentStore};
pub use ui::Element;
pub use utils::logging::init_logging;
pub use view::{Collaborators, WidgetAction, WidgetView};
