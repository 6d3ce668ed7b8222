use crate::ValidationError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Marketplace country code (two ASCII letters, upper case)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Country(String);

impl Country {
    /// Parses and normalises a country code ("br" -> "BR")
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        let code = code.trim();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(ValidationError::InvalidCountry(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Country {
    fn default() -> Self {
        Self("BR".to_string())
    }
}

impl FromStr for Country {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort order for keyword search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Rating,
    Newest,
    BestSellers,
}

/// Sort order for review extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    #[default]
    Recent,
    Helpful,
}

/// Parameters of one keyword search run
///
/// Built from user input at submit time and never mutated while the run is
/// in progress; only the page number varies between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub country: Country,
    pub sort: SearchSort,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub brand: Option<String>,
    pub prime_only: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, country: Country) -> Self {
        Self {
            query: query.into().trim().to_string(),
            country,
            sort: SearchSort::default(),
            min_price: None,
            max_price: None,
            brand: None,
            prime_only: false,
        }
    }

    pub fn with_sort(mut self, sort: SearchSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Restricts results to a brand or seller; blank input clears the filter
    pub fn with_brand(mut self, brand: Option<String>) -> Self {
        self.brand = brand
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        self
    }

    pub fn with_prime_only(mut self, prime_only: bool) -> Self {
        self.prime_only = prime_only;
        self
    }

    /// Checks the request before any page is requested
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.query.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }

        for bound in [self.min_price, self.max_price].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(ValidationError::NonFinitePrice(bound));
            }
            if bound < 0.0 {
                return Err(ValidationError::NegativePrice(bound));
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(ValidationError::InvalidPriceRange { min, max });
            }
        }

        Ok(())
    }
}

/// Parameters of one review-extraction run
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRequest {
    pub asin: String,
    pub country: Country,
    pub sort: ReviewSort,
}

impl ReviewRequest {
    pub fn new(asin: impl Into<String>, country: Country) -> Self {
        Self {
            asin: asin.into().trim().to_ascii_uppercase(),
            country,
            sort: ReviewSort::default(),
        }
    }

    pub fn with_sort(mut self, sort: ReviewSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.asin.is_empty() {
            return Err(ValidationError::EmptyAsin);
        }

        if self.asin.len() != 10 || !self.asin.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::InvalidAsin(self.asin.clone()));
        }

        Ok(())
    }
}
