//! # Widgets
//!
//! Every prompt rebullet can show, plus the two ways of chaining them.
//!
//! ## Modules
//!
//! - [`component`]: the `Prompt` trait and the answer types
//! - [`list`]: rendering and navigation shared by the list widgets
//! - [`bullet`], [`check`], [`scroll`]: the list widgets
//! - [`line_editor`]: single-line editing under the cursor
//! - [`text`]: yes/no, input, password, numbers and date fields
//! - [`sequence`]: vertical and slide layouts
//! - [`form`]: widgets built from a TOML form

pub mod bullet;
pub mod check;
pub mod component;
pub mod form;
pub mod line_editor;
pub mod list;
pub mod scroll;
pub mod sequence;
pub mod text;

pub use bullet::Bullet;
pub use check::Check;
pub use component::{Answer, Field, MultiSelection, Number, Prompt, Selection};
pub use form::Form;
pub use list::ListBuilder;
pub use scroll::ScrollBar;
pub use sequence::{Answers, SlidePrompt, VerticalPrompt};
pub use text::{Date, Input, NumberKind, Numbers, Password, YesNo};
