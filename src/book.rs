use crate::chapter::Chapter;
use crate::xhtml;
use anyhow::{anyhow, Context, Result};
use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ReferenceType, ZipLibrary};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use uuid::Uuid;

struct ChapterEntry {
    file_name: String,
    title: String,
    language: String,
    content: String,
}

/// Accumulates chapters into an EPUB book and writes the final file.
///
/// Chapters are added in reading order; embedded images are deduplicated
/// across all chapters and repacked under short index-based names. A single
/// `write_file` call finalizes the book.
pub struct EpubBook {
    builder: EpubBuilder<ZipLibrary>,
    book_name: String,
    language: String,
    author: String,
    chapter_count: usize,
    /// Original image path -> assigned internal name, first-seen order wins
    image_names: HashMap<String, String>,
    chapters: Vec<ChapterEntry>,
    toc: Vec<(String, String)>,
}

impl EpubBook {
    /// Create an empty book. A trailing `.epub` on `book_name` is stripped
    /// from the display name.
    pub fn new(book_name: &str, language: &str, author: &str) -> Result<Self> {
        let book_name = book_name
            .strip_suffix(".epub")
            .unwrap_or(book_name)
            .to_string();

        let zip = ZipLibrary::new().map_err(|e| anyhow!(e))?;
        let mut builder = EpubBuilder::new(zip).map_err(|e| anyhow!(e))?;
        builder.epub_version(EpubVersion::V30);

        Ok(Self {
            builder,
            book_name,
            language: language.to_string(),
            author: author.to_string(),
            chapter_count: 0,
            image_names: HashMap::new(),
            chapters: Vec::new(),
            toc: Vec::new(),
        })
    }

    /// Number of chapters added so far.
    pub fn chapter_count(&self) -> usize {
        self.chapter_count
    }

    /// Add one chapter to the end of the reading order.
    ///
    /// Embedded images are loaded from the filesystem here; a missing file
    /// surfaces as an error with no rollback of images already registered.
    pub fn add_chapter(&mut self, mut chapter: Chapter) -> Result<()> {
        self.embed_images(&mut chapter)?;

        let file_name = format!("{}_{}.xhtml", self.chapter_count, chapter.title);
        debug!("Adding chapter `{}` as `{}`", chapter.title, file_name);

        self.toc.push((file_name.clone(), chapter.title.clone()));
        self.chapters.push(ChapterEntry {
            file_name,
            title: chapter.title,
            language: chapter.language,
            content: chapter.content,
        });
        self.chapter_count += 1;

        Ok(())
    }

    /// Add chapters in input order. No rollback on failure: chapters added
    /// before the failing one remain committed.
    pub fn add_chapters(&mut self, chapters: impl IntoIterator<Item = Chapter>) -> Result<()> {
        for chapter in chapters {
            self.add_chapter(chapter)?;
        }
        Ok(())
    }

    /// Finalize the book and write it to `path`, creating intermediate
    /// directories as needed. Intended to be called once per book.
    pub fn write_file(&mut self, path: &Path) -> Result<()> {
        let identifier = generate_identifier(&self.book_name);
        self.builder.set_uuid(identifier);
        self.builder
            .metadata("title", &self.book_name)
            .map_err(|e| anyhow!(e))?;
        self.builder
            .metadata("lang", &self.language)
            .map_err(|e| anyhow!(e))?;
        self.builder
            .metadata("author", &self.author)
            .map_err(|e| anyhow!(e))?;

        // Navigation page leads the spine, then chapters in add order
        let nav = xhtml::nav_page(&self.language, &self.toc);
        self.builder
            .add_content(
                EpubContent::new("contents.xhtml", nav.as_bytes())
                    .title("Table of Contents")
                    .reftype(ReferenceType::Toc),
            )
            .map_err(|e| anyhow!(e))?;

        for entry in &self.chapters {
            let document = xhtml::document(&entry.title, &entry.language, &entry.content);
            self.builder
                .add_content(
                    EpubContent::new(&entry.file_name, document.as_bytes())
                        .title(&entry.title)
                        .reftype(ReferenceType::Text),
                )
                .map_err(|e| anyhow!(e))?;
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = fs::File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        self.builder
            .generate(file)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("Failed to write EPUB: {}", path.display()))?;

        info!(
            "Wrote `{}` ({} chapters, {} images) to {}",
            self.book_name,
            self.chapter_count,
            self.image_names.len(),
            path.display()
        );
        Ok(())
    }

    /// Register the chapter's images and rewrite its content to point at the
    /// internal names. A source path keeps its first assigned name for the
    /// lifetime of the book, no matter how many chapters reference it.
    fn embed_images(&mut self, chapter: &mut Chapter) -> Result<()> {
        for path in chapter.image_paths() {
            let internal = match self.image_names.get(&path) {
                Some(name) => name.clone(),
                None => {
                    let ext = Path::new(&path)
                        .extension()
                        .and_then(OsStr::to_str)
                        .unwrap_or("bin");
                    let name = format!("{}.{}", self.image_names.len(), ext);
                    let media_type = format!("image/{}", ext);

                    let data = fs::read(&path)
                        .with_context(|| format!("Failed to read image: {}", path))?;
                    self.builder
                        .add_resource(&name, data.as_slice(), &media_type)
                        .map_err(|e| anyhow!(e))?;

                    debug!("Registered image `{}` as `{}`", path, name);
                    self.image_names.insert(path.clone(), name.clone());
                    name
                }
            };

            // Rewrite on registry hits too: this chapter's content still
            // holds the original path literal
            chapter.content = chapter.content.replace(&path, &internal);
        }
        Ok(())
    }
}

/// Derive the book identifier from the display name: same name, same
/// identifier on every run. Reproducibility only, not a security mechanism.
fn generate_identifier(book_name: &str) -> Uuid {
    let mut hasher = DefaultHasher::new();
    book_name.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());
    Uuid::from_u64_pair(rng.gen(), rng.gen())
}
