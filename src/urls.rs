/// The crawl targets: every page of the two timeline big-story archives.
/// These ranges live only here; nothing downstream knows about them.
const TIMELINE_BASE: &str = "https://covid19.gov.vn/timelinebigstory";

const STORIES: &[(&str, u32)] = &[
    ("1d44b380-0adb-11ec-bf1c-e9c9e7c491f4", 32),
    ("77be6f00-0ada-11ec-bb49-178244d0bacf", 96),
];

/// Generate (url, label) pairs for the page queue. Labels are short
/// "story/page" tags used in logs and the queue table.
pub fn timeline_urls() -> Vec<(String, String)> {
    let mut pages = Vec::new();
    for (story_id, page_count) in STORIES {
        let short_id = &story_id[..8];
        for n in 1..=*page_count {
            pages.push((
                format!("{}/{}/{}.htm", TIMELINE_BASE, story_id, n),
                format!("{}/{}", short_id, n),
            ));
        }
    }
    pages
}

// ── Tests ──
