//! JavaScript evaluated inside match centre pages

/// Reports whether the document has finished loading
pub const READY_STATE_SCRIPT: &str = r"
    (() => document.readyState === 'complete' && document.body !== null)()
";

/// Reads the page title and the text of the first heading
pub const PAGE_SUMMARY_SCRIPT: &str = r"
    (() => ({
        title: document.title || null,
        heading: document.querySelector('h1, h2')?.textContent?.trim() || null
    }))()
";

/// Build a script that selects `season` in the `<select>` matched by `selector`
///
/// The script returns `'selected'` after firing a change event, `'current'`
/// when the season is already selected, and `'missing'` when either the
/// select or the option is absent. Arguments are JSON-encoded so any
/// quoting in the season label is safe.
#[must_use]
pub fn select_season_script(selector: &str, season: &str) -> String {
    let selector = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
    let season = serde_json::to_string(season).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r"
    (() => {{
        const select = document.querySelector({selector});
        if (!select) return 'missing';
        const wanted = {season};
        const option = Array.from(select.options).find(o => o.text.trim() === wanted);
        if (!option) return 'missing';
        if (option.selected) return 'current';
        select.value = option.value;
        select.dispatchEvent(new Event('change', {{ bubbles: true }}));
        return 'selected';
    }})()
"
    )
}
