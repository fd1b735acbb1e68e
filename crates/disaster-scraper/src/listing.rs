//! Parsing of the paginated disaster listing table.

use disaster_core::{normalize_agrn, strip_agrn};
use scraper::{ElementRef, Html, Selector};

/// Minimum number of non-empty cells for a row to describe a disaster.
const MIN_ROW_CELLS: usize = 5;

/// One `<tr>` of the listing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    /// Trimmed, whitespace-collapsed text of each data `<td>`, in column
    /// order, excluding the link cell. Empty cells are kept as empty strings
    /// so column positions hold.
    pub cells: Vec<String>,
    /// `href` of the first link in the last cell.
    pub detail_link: Option<String>,
    /// First cell mentioning `AGRN`.
    pub agrn_cell: Option<String>,
}

/// Listing-row fields carried alongside a detail-page request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingContext {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub state: Option<String>,
    pub disaster_type: Option<String>,
    pub name: Option<String>,
    /// AGRN with prefix and thousands separators stripped, e.g. `"1023"`.
    pub agrn: String,
}

impl ListingRow {
    fn non_empty_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// A row is usable when it has enough populated cells, a detail link,
    /// and an AGRN cell.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.non_empty_cells() >= MIN_ROW_CELLS
            && self.detail_link.as_deref().is_some_and(|l| !l.is_empty())
            && self.agrn_cell.is_some()
    }

    /// Canonical `AGRN-<digits>` de-duplication key.
    #[must_use]
    pub fn agrn_key(&self) -> Option<String> {
        self.agrn_cell.as_deref().map(normalize_agrn)
    }

    /// Builds the context passed to the detail extractor.
    ///
    /// Positional columns are start date, end date, state, type, and name.
    #[must_use]
    pub fn context(&self) -> Option<ListingContext> {
        let agrn = strip_agrn(self.agrn_cell.as_deref()?);
        let cell = |i: usize| self.cells.get(i).filter(|c| !c.is_empty()).cloned();
        Some(ListingContext {
            start_date: cell(0),
            end_date: cell(1),
            state: cell(2),
            disaster_type: cell(3),
            name: cell(4),
            agrn,
        })
    }
}

/// Extracts every data row from a listing page.
///
/// A row is any `table tr` with at least one `<td>`; header rows made only
/// of `<th>` are dropped whether or not they sit in a `<thead>`. When the
/// last cell carries the detail link it is kept out of `cells`, so link text
/// never counts as data. Validity is left to [`ListingRow::is_valid`] so the
/// caller can log what it skips.
#[must_use]
pub fn parse_listing(html: &str) -> Vec<ListingRow> {
    let document = Html::parse_document(html);
    let (Ok(rows), Ok(td), Ok(link)) = (
        Selector::parse("table tr"),
        Selector::parse("td"),
        Selector::parse("a[href]"),
    ) else {
        return Vec::new();
    };

    document
        .select(&rows)
        .filter_map(|row| {
            let mut tds: Vec<ElementRef<'_>> = row.select(&td).collect();
            let last = *tds.last()?;
            let detail_link = last
                .select(&link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| href.trim().to_owned())
                .filter(|href| !href.is_empty());
            if detail_link.is_some() {
                tds.pop();
            }

            let cells: Vec<String> = tds.into_iter().map(element_text).collect();
            let agrn_cell = cells.iter().find(|c| c.contains("AGRN")).cloned();
            Some(ListingRow {
                cells,
                detail_link,
                agrn_cell,
            })
        })
        .collect()
}

/// All descendant text of `element`, whitespace-collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
