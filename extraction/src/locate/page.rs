use crate::{Page, failure::DocumentFailure};

/// Best scoring page for a set of locate keywords.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageMatch {
    pub index: usize,
    pub score: usize,
}

/// Weight given to each distinct keyword found on a page, on top of its length.
const KEYWORD_HIT_WEIGHT: usize = 10;

/// Finds the page most likely to hold the target section.
///
/// Each page scores `10 × (distinct keywords found) + (total characters of keywords found)`.
/// The highest score wins, with ties going to the earliest page. Pages without any keyword are
/// never chosen.
pub fn locate_page(pages: &[Page], keywords: &[String]) -> Result<PageMatch, DocumentFailure> {
    if keywords.is_empty() {
        return Err(DocumentFailure::NoLocateKeywords);
    }

    let mut best: Option<PageMatch> = None;
    for page in pages {
        let score = score_page(&page.text, keywords);
        log::trace!("Page {} scored {score} against locate keywords.", page.index);
        if score > best.map_or(0, |best| best.score) {
            best = Some(PageMatch {
                index: page.index,
                score,
            });
        }
    }

    match best {
        Some(found) => {
            log::debug!("Located page {} with score {}.", found.index, found.score);
            Ok(found)
        }
        None => Err(DocumentFailure::PageNotFound),
    }
}

fn score_page(text: &str, keywords: &[String]) -> usize {
    let lower_text = text.to_lowercase();
    let (hits, hit_chars) = keywords
        .iter()
        .filter(|keyword| lower_text.contains(&keyword.to_lowercase()))
        .fold((0, 0), |(hits, chars), keyword| {
            (hits + 1, chars + keyword.chars().count())
        });
    if hits == 0 {
        return 0;
    }
    KEYWORD_HIT_WEIGHT * hits + hit_chars
}
