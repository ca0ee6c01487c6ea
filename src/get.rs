//! Document retrieval by ID.
//!
//! Used by both the `efta get` command and `GET /files/{id}`.

use anyhow::Result;

use crate::corpus::Corpus;
use crate::error::CorpusError;
use crate::models::Document;
use crate::progress::format_number;

/// Fetch a document, turning a missing row into [`CorpusError::NotFound`].
pub async fn get_document<C>(corpus: &C, id: i64) -> Result<Document, CorpusError>
where
    C: Corpus + ?Sized,
{
    corpus
        .find_by_id(id)
        .await?
        .ok_or(CorpusError::NotFound(id))
}

/// CLI entry point: print metadata and the full extracted text.
pub async fn run_get<C>(corpus: &C, id: i64) -> Result<()>
where
    C: Corpus + ?Sized,
{
    let doc = get_document(corpus, id).await?;

    println!("--- {} ---", doc.filename);
    println!("id:       {}", doc.id);
    println!("dataset:  {}", doc.dataset);
    println!("path:     {}", doc.rel_path);

    match doc.extracted_text.as_deref() {
        Some(text) if !text.is_empty() => {
            println!("method:   {}", doc.method.as_deref().unwrap_or("(unknown)"));
            println!("chars:    {}", format_number(doc.char_count.max(0) as u64));
            println!();
            println!("{}", text);
        }
        _ => {
            println!();
            println!("No text extracted.");
        }
    }

    Ok(())
}
