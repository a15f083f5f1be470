use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::extract::RawRecord;

static ITEM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.timeline-item").unwrap());
static TIME_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.timeago").unwrap());
static CASES_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.item-bigstory-tit > h3").unwrap());
static DETAIL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.kbwscwl-content").unwrap());

/// Select the timeline entries out of one page body.
///
/// Every `li.timeline-item` carries a time element, a case headline, and any
/// number of content blocks. One RawRecord is emitted per content block,
/// repeating the item's time and headline; an item with no content block
/// emits nothing. Text is handed over untrimmed — the extraction layer owns
/// all normalization.
pub fn timeline_records(url: &str, html: &str) -> Vec<RawRecord> {
    let doc = Html::parse_document(html);
    let mut records = Vec::new();

    for item in doc.select(&ITEM_SEL) {
        let time_text = item.select(&TIME_SEL).next().and_then(first_text);
        let case_text = item.select(&CASES_SEL).next().and_then(first_text);

        for content in item.select(&DETAIL_SEL) {
            records.push(RawRecord {
                source_url: url.to_string(),
                time_text: time_text.clone(),
                case_text: case_text.clone(),
                detail_text: Some(content.text().collect()),
            });
        }
    }

    records
}

// First text node only, mirroring a `::text` selection on the element.
fn first_text(el: ElementRef) -> Option<String> {
    el.text().next().map(str::to_string)
}

// ── Tests ──
