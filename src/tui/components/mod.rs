//! # TUI Components
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (backend + pending replies)
//! ├── message.rs       (one chat bubble)
//! ├── suggestions.rs   (a row of clickable chips)
//! ├── message_list.rs  (scrollable conversation, chip hit testing)
//! └── input_box.rs     (single-line question field)
//! ```
//!
//! Stateless components (`TitleBar`, `MessageBubble`, `SuggestionRow`) take
//! everything as props. Stateful ones keep their state in a struct owned by
//! `TerminalView` (`InputBox`, `MessageListState`) and are driven through
//! `EventHandler`.

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod suggestions;
mod title_bar;

pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
