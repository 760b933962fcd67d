//! Assemble minimal EPUB ebooks from text or HTML chapters.
//!
//! Chapters are normalized to XHTML, their embedded images deduplicated and
//! repacked under short internal names, and the result is serialized through
//! `epub-builder`.
//!
//! ```no_run
//! use chapbook::{Chapter, EpubBook};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut book = EpubBook::new("my-book.epub", "eng", "Author Name")?;
//! book.add_chapter(Chapter::from_text("Chapter One", "First line.\nSecond line."))?;
//! book.write_file(std::path::Path::new("out/my-book.epub"))?;
//! # Ok(())
//! # }
//! ```

mod book;
mod chapter;
mod xhtml;

pub use book::EpubBook;
pub use chapter::Chapter;
