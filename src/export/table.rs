use crate::model::{Product, Review};

/// A record that flattens into one spreadsheet row
pub trait Tabular {
    /// Column headers, in output order
    const HEADERS: &'static [&'static str];

    /// Cell values, same length and order as `HEADERS`
    fn cells(&self) -> Vec<String>;
}

/// Rows and columns ready to be rendered
///
/// One row per record, in the order the records were accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_records<T: Tabular>(records: &[T]) -> Self {
        Self {
            headers: T::HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: records.iter().map(Tabular::cells).collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "Yes" } else { "No" };
    label.to_string()
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl Tabular for Product {
    const HEADERS: &'static [&'static str] = &[
        "Page",
        "ASIN",
        "Title",
        "Price",
        "Currency",
        "Rating",
        "Reviews",
        "Best Seller",
        "Amazon's Choice",
        "Prime",
        "Image URL",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.page.to_string(),
            self.asin.clone(),
            self.title.clone(),
            self.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
            optional(&self.currency),
            self.rating.map(|r| format!("{:.1}", r)).unwrap_or_default(),
            optional(&self.review_count),
            yes_no(self.is_best_seller),
            yes_no(self.is_amazon_choice),
            yes_no(self.is_prime),
            optional(&self.image_url),
        ]
    }
}

impl Tabular for Review {
    const HEADERS: &'static [&'static str] = &[
        "Page",
        "Review ID",
        "Rating",
        "Title",
        "Body",
        "Author",
        "Date",
        "Verified Purchase",
        "Helpful Votes",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.page.to_string(),
            self.id.clone(),
            self.rating.map(|r| format!("{:.1}", r)).unwrap_or_default(),
            self.title.clone(),
            self.body.clone(),
            optional(&self.author),
            optional(&self.date),
            yes_no(self.verified),
            optional(&self.helpful_votes),
        ]
    }
}
