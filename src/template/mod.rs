//! Component template markup
//!
//! Templates are plain markup with `{{ key }}` model references in text
//! positions:
//!
//! ```text
//! <div>
//!     {{ title }}
//!     <span>{{ subtitle }}</span>
//! </div>
//! ```
//!
//! The source is lexed with logos and parsed with chumsky into a [`Template`]
//! tree once per component definition; every instance mounts that same tree.

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::parse;
